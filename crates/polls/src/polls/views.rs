//! Render contexts handed to the presentation layer. Each page is a plain
//! serializable struct; the HTTP layer emits them as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Choice, ChoiceId, Question, QuestionId};

pub const NO_POLLS_MESSAGE: &str = "No polls are available.";
pub const MISSING_CHOICE_MESSAGE: &str = "You didn't select a choice";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub was_published_recently: bool,
}

impl QuestionView {
    pub fn new(question: Question, now: DateTime<Utc>) -> Self {
        let was_published_recently = question.was_published_recently(now);
        Self {
            id: question.id,
            question_text: question.question_text,
            pub_date: question.pub_date,
            was_published_recently,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub id: ChoiceId,
    pub choice_text: String,
    pub votes: u64,
}

impl From<Choice> for ChoiceView {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text,
            votes: choice.votes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexPage {
    pub latest_question_list: Vec<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl IndexPage {
    pub fn new(latest_question_list: Vec<QuestionView>) -> Self {
        let message = latest_question_list
            .is_empty()
            .then_some(NO_POLLS_MESSAGE);
        Self {
            latest_question_list,
            message,
        }
    }
}

/// Voting form context. `error_message` is only set when a submission is
/// re-prompted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailPage {
    pub question: QuestionView,
    pub choices: Vec<ChoiceView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsPage {
    pub question: QuestionView,
    pub choices: Vec<ChoiceView>,
    pub total_votes: u64,
}

impl ResultsPage {
    pub fn new(question: QuestionView, choices: Vec<ChoiceView>) -> Self {
        let total_votes = choices.iter().map(|choice| choice.votes).sum();
        Self {
            question,
            choices,
            total_votes,
        }
    }

    pub fn votes_for(&self, choice_id: ChoiceId) -> Option<u64> {
        self.choices
            .iter()
            .find(|choice| choice.id == choice_id)
            .map(|choice| choice.votes)
    }
}

/// Path the vote handler redirects to after a recorded vote.
pub fn results_path(question_id: QuestionId) -> String {
    format!("/polls/{question_id}/results/")
}
