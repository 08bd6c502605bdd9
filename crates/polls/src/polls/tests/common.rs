use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::polls::domain::{Choice, ChoiceId, Question, QuestionId};
use crate::polls::memory::InMemoryPollRepository;
use crate::polls::repository::{PollRepository, RepositoryError};
use crate::polls::{poll_router, PollService};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn question(id: u64, text: &str, pub_date: DateTime<Utc>) -> Question {
    Question {
        id: QuestionId(id),
        question_text: text.to_string(),
        pub_date,
    }
}

pub(super) fn choice(id: u64, question_id: u64, text: &str, votes: u64) -> Choice {
    Choice {
        id: ChoiceId(id),
        question_id: QuestionId(question_id),
        choice_text: text.to_string(),
        votes,
    }
}

/// Question 1 published yesterday with choices 10 and 11, question 2
/// publishing tomorrow with choice 20. Dates are relative to `now`.
pub(super) fn seeded_repository(now: DateTime<Utc>) -> InMemoryPollRepository {
    let repository = InMemoryPollRepository::new();
    repository
        .add_question(question(1, "What's new?", now - Duration::days(1)))
        .expect("question 1 inserted");
    repository
        .add_choice(choice(10, 1, "Not much", 0))
        .expect("choice 10 inserted");
    repository
        .add_choice(choice(11, 1, "The sky", 0))
        .expect("choice 11 inserted");
    repository
        .add_question(question(2, "Future question", now + Duration::days(1)))
        .expect("question 2 inserted");
    repository
        .add_choice(choice(20, 2, "Someday", 0))
        .expect("choice 20 inserted");
    repository
}

pub(super) fn seeded_service(now: DateTime<Utc>) -> PollService<InMemoryPollRepository> {
    PollService::new(Arc::new(seeded_repository(now)))
}

/// Router plus a handle sharing the same tables, for asserting counters.
pub(super) fn seeded_router() -> (axum::Router, InMemoryPollRepository) {
    let repository = seeded_repository(Utc::now());
    let service = PollService::new(Arc::new(repository.clone()));
    (poll_router(Arc::new(service)), repository)
}

pub(super) fn votes_of(repository: &InMemoryPollRepository, question_id: u64) -> Vec<(u64, u64)> {
    repository
        .choices(QuestionId(question_id))
        .expect("choices readable")
        .into_iter()
        .map(|choice| (choice.id.0, choice.votes))
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableRepository;

impl PollRepository for UnavailableRepository {
    fn latest_published(
        &self,
        _now: DateTime<Utc>,
        _limit: usize,
    ) -> Result<Vec<Question>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn question(&self, _id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn choices(&self, _question_id: QuestionId) -> Result<Vec<Choice>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn increment_votes(
        &self,
        _question_id: QuestionId,
        _choice_id: ChoiceId,
    ) -> Result<Option<Choice>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
