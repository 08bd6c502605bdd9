use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{Choice, ChoiceId, Question, QuestionId};
use super::repository::{PollRepository, RepositoryError};

#[derive(Debug, Default)]
struct PollTables {
    questions: BTreeMap<QuestionId, Question>,
    choices: BTreeMap<ChoiceId, Choice>,
}

/// Mutex-guarded store backing the service when no database is attached.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPollRepository {
    tables: Arc<Mutex<PollTables>>,
}

impl InMemoryPollRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, PollTables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("poll store mutex poisoned".to_string()))
    }

    pub fn add_question(&self, question: Question) -> Result<Question, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.questions.contains_key(&question.id) {
            return Err(RepositoryError::Conflict(format!("question {}", question.id)));
        }
        tables.questions.insert(question.id, question.clone());
        Ok(question)
    }

    pub fn add_choice(&self, choice: Choice) -> Result<Choice, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.questions.contains_key(&choice.question_id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.choices.contains_key(&choice.id) {
            return Err(RepositoryError::Conflict(format!("choice {}", choice.id)));
        }
        tables.choices.insert(choice.id, choice.clone());
        Ok(choice)
    }

    pub fn question_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.questions.len())
    }
}

impl PollRepository for InMemoryPollRepository {
    fn latest_published(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Question>, RepositoryError> {
        let tables = self.lock()?;
        let mut published: Vec<Question> = tables
            .questions
            .values()
            .filter(|question| question.is_published(now))
            .cloned()
            .collect();
        published.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        published.truncate(limit);
        Ok(published)
    }

    fn question(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        Ok(self.lock()?.questions.get(&id).cloned())
    }

    fn choices(&self, question_id: QuestionId) -> Result<Vec<Choice>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .choices
            .values()
            .filter(|choice| choice.question_id == question_id)
            .cloned()
            .collect())
    }

    fn increment_votes(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> Result<Option<Choice>, RepositoryError> {
        let mut tables = self.lock()?;
        match tables.choices.get_mut(&choice_id) {
            Some(choice) if choice.question_id == question_id => {
                choice.votes = choice
                    .votes
                    .checked_add(1)
                    .ok_or(RepositoryError::CounterSaturated(choice_id))?;
                Ok(Some(choice.clone()))
            }
            _ => Ok(None),
        }
    }
}
