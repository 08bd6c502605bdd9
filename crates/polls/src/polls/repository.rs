use chrono::{DateTime, Utc};

use super::domain::{Choice, ChoiceId, Question, QuestionId};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait PollRepository: Send + Sync {
    /// Questions with `pub_date <= now`, newest first, capped at `limit`.
    fn latest_published(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Question>, RepositoryError>;

    fn question(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError>;

    /// Choices owned by the question, ordered by id.
    fn choices(&self, question_id: QuestionId) -> Result<Vec<Choice>, RepositoryError>;

    /// Adds one vote to the choice if and only if it belongs to the question,
    /// returning the updated row. Implementations must apply the increment as a
    /// single atomic update; `Ok(None)` means no row matched.
    fn increment_votes(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> Result<Option<Choice>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("vote counter for choice {0} cannot be incremented further")]
    CounterSaturated(ChoiceId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
