//! JSON fixtures used to seed the in-memory store, standing in for records
//! created through admin tooling.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::domain::{Choice, ChoiceId, Question, QuestionId};
use super::memory::InMemoryPollRepository;
use super::repository::RepositoryError;

#[derive(Debug, Clone, Deserialize)]
pub struct PollFixture {
    #[serde(default)]
    pub questions: Vec<QuestionFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionFixture {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub choices: Vec<ChoiceFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceFixture {
    pub id: ChoiceId,
    pub choice_text: String,
    #[serde(default)]
    pub votes: u64,
}

impl PollFixture {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<Rd: Read>(reader: Rd) -> Result<Self, FixtureError> {
        let fixture: PollFixture = serde_json::from_reader(reader)?;
        fixture.validate()?;
        Ok(fixture)
    }

    fn validate(&self) -> Result<(), FixtureError> {
        let mut question_ids = HashSet::new();
        let mut choice_ids = HashSet::new();

        for question in &self.questions {
            if !question_ids.insert(question.id) {
                return Err(FixtureError::DuplicateQuestion(question.id));
            }
            if question.question_text.trim().is_empty() {
                return Err(FixtureError::BlankText(format!("question {}", question.id)));
            }
            for choice in &question.choices {
                if !choice_ids.insert(choice.id) {
                    return Err(FixtureError::DuplicateChoice(choice.id));
                }
                if choice.choice_text.trim().is_empty() {
                    return Err(FixtureError::BlankText(format!("choice {}", choice.id)));
                }
            }
        }

        Ok(())
    }

    /// Build a store holding every question and choice in the fixture.
    pub fn into_repository(self) -> Result<InMemoryPollRepository, FixtureError> {
        let repository = InMemoryPollRepository::new();
        let mut choice_count = 0usize;

        for question in self.questions {
            let question_id = question.id;
            repository.add_question(Question {
                id: question_id,
                question_text: question.question_text,
                pub_date: question.pub_date,
            })?;

            for choice in question.choices {
                repository.add_choice(Choice {
                    id: choice.id,
                    question_id,
                    choice_text: choice.choice_text,
                    votes: choice.votes,
                })?;
                choice_count += 1;
            }
        }

        info!(
            questions = repository.question_count()?,
            choices = choice_count,
            "poll fixture loaded"
        );
        Ok(repository)
    }
}

/// Error raised while reading or applying a fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("unable to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed fixture: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question id {0} appears more than once")]
    DuplicateQuestion(QuestionId),
    #[error("choice id {0} appears more than once")]
    DuplicateChoice(ChoiceId),
    #[error("{0} has blank text")]
    BlankText(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
