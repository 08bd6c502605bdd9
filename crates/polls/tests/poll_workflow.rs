use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, Utc};
use polls::polls::{
    poll_router, Choice, ChoiceId, InMemoryPollRepository, PollFixture, PollRepository,
    PollService, Question, QuestionId, MISSING_CHOICE_MESSAGE,
};
use serde_json::Value;
use tower::ServiceExt;

fn scenario_repository() -> InMemoryPollRepository {
    let now = Utc::now();
    let repository = InMemoryPollRepository::new();
    repository
        .add_question(Question {
            id: QuestionId(1),
            question_text: "Yesterday's poll".to_string(),
            pub_date: now - Duration::days(1),
        })
        .expect("question 1 stored");
    for id in [10, 11] {
        repository
            .add_choice(Choice {
                id: ChoiceId(id),
                question_id: QuestionId(1),
                choice_text: format!("Choice {id}"),
                votes: 0,
            })
            .expect("choice stored");
    }
    repository
        .add_question(Question {
            id: QuestionId(2),
            question_text: "Tomorrow's poll".to_string(),
            pub_date: now + Duration::days(1),
        })
        .expect("question 2 stored");
    repository
}

fn app(repository: &InMemoryPollRepository) -> axum::Router {
    poll_router(Arc::new(PollService::new(Arc::new(repository.clone()))))
}

fn vote(question_id: u64, body: &'static str) -> Request<Body> {
    Request::post(format!("/polls/{question_id}/vote/"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request builds")
}

fn votes(repository: &InMemoryPollRepository, choice_id: u64) -> u64 {
    repository
        .choices(QuestionId(1))
        .expect("choices readable")
        .into_iter()
        .find(|choice| choice.id == ChoiceId(choice_id))
        .map(|choice| choice.votes)
        .expect("choice present")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn vote_then_follow_redirect_to_results() {
    let repository = scenario_repository();

    let response = app(&repository)
        .oneshot(vote(1, "choice=10"))
        .await
        .expect("vote response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
        .to_string();
    assert_eq!(location, "/polls/1/results/");
    assert_eq!(votes(&repository, 10), 1);
    assert_eq!(votes(&repository, 11), 0);

    let response = app(&repository)
        .oneshot(
            Request::get(location)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("results response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_votes"], 1);
    assert_eq!(body["choices"][0]["id"], 10);
    assert_eq!(body["choices"][0]["votes"], 1);
}

#[tokio::test]
async fn nonexistent_choice_leaves_counts_untouched() {
    let repository = scenario_repository();

    let response = app(&repository)
        .oneshot(vote(1, "choice=999"))
        .await
        .expect("vote response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["error_message"], MISSING_CHOICE_MESSAGE);
    assert_eq!(votes(&repository, 10), 0);
    assert_eq!(votes(&repository, 11), 0);
}

#[tokio::test]
async fn future_question_detail_is_not_found() {
    let repository = scenario_repository();
    let response = app(&repository)
        .oneshot(
            Request::get("/polls/2/")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("detail response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repeated_votes_each_count_once() {
    let repository = scenario_repository();
    for _ in 0..3 {
        let response = app(&repository)
            .oneshot(vote(1, "choice=11"))
            .await
            .expect("vote response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
    assert_eq!(votes(&repository, 11), 3);
    assert_eq!(votes(&repository, 10), 0);
}

#[test]
fn bundled_fixture_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/polls.json");
    let repository = PollFixture::from_path(path)
        .expect("fixture parses")
        .into_repository()
        .expect("fixture applies");
    assert_eq!(repository.question_count().expect("count"), 3);

    let service = PollService::new(Arc::new(repository));
    let page = service.index(Utc::now()).expect("index renders");
    assert!(page
        .latest_question_list
        .iter()
        .all(|question| question.id != QuestionId(3)));
}
