//! Poll listing, detail, results, and voting.

pub mod domain;
pub mod fixtures;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{Choice, ChoiceId, Question, QuestionId};
pub use fixtures::{ChoiceFixture, FixtureError, PollFixture, QuestionFixture};
pub use memory::InMemoryPollRepository;
pub use repository::{PollRepository, RepositoryError};
pub use router::{poll_router, VoteForm};
pub use service::{PollService, PollServiceError, VoteOutcome, LATEST_QUESTION_LIMIT};
pub use views::{
    results_path, ChoiceView, DetailPage, IndexPage, QuestionView, ResultsPage,
    MISSING_CHOICE_MESSAGE, NO_POLLS_MESSAGE,
};
