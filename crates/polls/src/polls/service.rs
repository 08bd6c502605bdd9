use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{ChoiceId, Question, QuestionId};
use super::repository::{PollRepository, RepositoryError};
use super::views::{
    ChoiceView, DetailPage, IndexPage, QuestionView, ResultsPage, MISSING_CHOICE_MESSAGE,
};

/// Number of questions shown on the listing page.
pub const LATEST_QUESTION_LIMIT: usize = 5;

/// Service answering the four poll pages on top of a repository handle.
pub struct PollService<R> {
    repository: Arc<R>,
}

impl<R> Clone for PollService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Result of a vote submission that resolved its question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The counter was incremented; the caller should redirect to results.
    Recorded {
        question_id: QuestionId,
        choice_id: ChoiceId,
        votes: u64,
    },
    /// No valid choice was submitted; re-render the form with an error.
    Reprompt(DetailPage),
}

impl<R> PollService<R>
where
    R: PollRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// The latest published questions, newest first.
    pub fn index(&self, now: DateTime<Utc>) -> Result<IndexPage, PollServiceError> {
        let questions = self
            .repository
            .latest_published(now, LATEST_QUESTION_LIMIT)?;
        let views = questions
            .into_iter()
            .map(|question| QuestionView::new(question, now))
            .collect();
        Ok(IndexPage::new(views))
    }

    /// Voting form for a published question. Unpublished questions are
    /// reported as missing.
    pub fn detail(
        &self,
        question_id: QuestionId,
        now: DateTime<Utc>,
    ) -> Result<DetailPage, PollServiceError> {
        let question = self
            .find_question(question_id)?
            .filter(|question| question.is_published(now))
            .ok_or(PollServiceError::QuestionNotFound(question_id))?;
        self.detail_page(question, now, None)
    }

    /// Current tallies. No publish gating is applied here.
    pub fn results(
        &self,
        question_id: QuestionId,
        now: DateTime<Utc>,
    ) -> Result<ResultsPage, PollServiceError> {
        let question = self
            .find_question(question_id)?
            .ok_or(PollServiceError::QuestionNotFound(question_id))?;
        let choices = self.choice_views(question.id)?;
        Ok(ResultsPage::new(QuestionView::new(question, now), choices))
    }

    /// Record a vote for `choice` (the raw submitted form value).
    pub fn vote(
        &self,
        question_id: QuestionId,
        choice: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<VoteOutcome, PollServiceError> {
        let question = self
            .find_question(question_id)?
            .ok_or(PollServiceError::QuestionNotFound(question_id))?;

        let Some(choice_id) = choice.and_then(|raw| raw.parse::<ChoiceId>().ok()) else {
            debug!(%question_id, submitted = ?choice, "vote missing a usable choice");
            return self.reprompt(question, now);
        };

        match self.repository.increment_votes(question.id, choice_id)? {
            Some(updated) => {
                info!(%question_id, %choice_id, votes = updated.votes, "vote recorded");
                Ok(VoteOutcome::Recorded {
                    question_id: question.id,
                    choice_id: updated.id,
                    votes: updated.votes,
                })
            }
            None => {
                debug!(%question_id, %choice_id, "choice does not belong to question");
                self.reprompt(question, now)
            }
        }
    }

    fn reprompt(
        &self,
        question: Question,
        now: DateTime<Utc>,
    ) -> Result<VoteOutcome, PollServiceError> {
        let page = self.detail_page(question, now, Some(MISSING_CHOICE_MESSAGE))?;
        Ok(VoteOutcome::Reprompt(page))
    }

    fn detail_page(
        &self,
        question: Question,
        now: DateTime<Utc>,
        error_message: Option<&'static str>,
    ) -> Result<DetailPage, PollServiceError> {
        let choices = self.choice_views(question.id)?;
        Ok(DetailPage {
            question: QuestionView::new(question, now),
            choices,
            error_message,
        })
    }

    fn find_question(&self, question_id: QuestionId) -> Result<Option<Question>, PollServiceError> {
        Ok(self.repository.question(question_id)?)
    }

    fn choice_views(&self, question_id: QuestionId) -> Result<Vec<ChoiceView>, PollServiceError> {
        Ok(self
            .repository
            .choices(question_id)?
            .into_iter()
            .map(ChoiceView::from)
            .collect())
    }
}

/// Error raised by the poll service.
#[derive(Debug, thiserror::Error)]
pub enum PollServiceError {
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
