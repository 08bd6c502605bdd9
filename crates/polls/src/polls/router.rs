use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::domain::QuestionId;
use super::repository::PollRepository;
use super::service::{PollService, VoteOutcome};
use super::views::results_path;
use crate::error::AppError;

/// Submitted voting form. `choice` is kept raw so a missing or garbled value
/// re-prompts instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub choice: Option<String>,
}

/// Router builder exposing the poll pages.
pub fn poll_router<R>(service: Arc<PollService<R>>) -> Router
where
    R: PollRepository + 'static,
{
    Router::new()
        .route("/polls/", get(index_handler::<R>))
        .route("/polls/:question_id/", get(detail_handler::<R>))
        .route("/polls/:question_id/results/", get(results_handler::<R>))
        .route("/polls/:question_id/vote/", post(vote_handler::<R>))
        .with_state(service)
}

pub(crate) async fn index_handler<R>(
    State(service): State<Arc<PollService<R>>>,
) -> Result<Response, AppError>
where
    R: PollRepository + 'static,
{
    let page = service.index(Utc::now())?;
    Ok((StatusCode::OK, Json(page)).into_response())
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<PollService<R>>>,
    Path(question_id): Path<String>,
) -> Result<Response, AppError>
where
    R: PollRepository + 'static,
{
    let Some(question_id) = parse_question_id(&question_id) else {
        return Ok(not_found(&question_id));
    };
    let page = service.detail(question_id, Utc::now())?;
    Ok((StatusCode::OK, Json(page)).into_response())
}

pub(crate) async fn results_handler<R>(
    State(service): State<Arc<PollService<R>>>,
    Path(question_id): Path<String>,
) -> Result<Response, AppError>
where
    R: PollRepository + 'static,
{
    let Some(question_id) = parse_question_id(&question_id) else {
        return Ok(not_found(&question_id));
    };
    let page = service.results(question_id, Utc::now())?;
    Ok((StatusCode::OK, Json(page)).into_response())
}

/// A body the form extractor cannot read (no content type, wrong encoding)
/// is treated as a submission without a choice.
pub(crate) async fn vote_handler<R>(
    State(service): State<Arc<PollService<R>>>,
    Path(question_id): Path<String>,
    form: Result<Form<VoteForm>, FormRejection>,
) -> Result<Response, AppError>
where
    R: PollRepository + 'static,
{
    let Some(question_id) = parse_question_id(&question_id) else {
        return Ok(not_found(&question_id));
    };
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(%question_id, %rejection, "unreadable vote form");
            VoteForm::default()
        }
    };

    let response = match service.vote(question_id, form.choice.as_deref(), Utc::now())? {
        // See Other so a reload re-issues a GET on results instead of the vote.
        VoteOutcome::Recorded { question_id, .. } => {
            Redirect::to(&results_path(question_id)).into_response()
        }
        VoteOutcome::Reprompt(page) => (StatusCode::OK, Json(page)).into_response(),
    };
    Ok(response)
}

fn parse_question_id(raw: &str) -> Option<QuestionId> {
    raw.parse().ok()
}

fn not_found(raw: &str) -> Response {
    let payload = json!({
        "error": format!("question {raw} not found"),
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}
