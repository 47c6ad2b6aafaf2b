//! In-memory catalog for tests and offline demos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use survey_types::{
    Answers, QuestionId, ResponseId, StoredAnswer, StoredResponse, SurveyDefinition, SurveyId,
};

use crate::{Catalog, CatalogError};

/// A catalog that keeps everything in process memory.
///
/// Holds at most one survey, like the hosted tables it stands in for.
/// Failures can be injected to exercise error paths.
///
/// # Example
///
/// ```
/// use survey_catalog::MemoryCatalog;
/// use survey_types::{Question, QuestionKind, Survey, SurveyDefinition};
///
/// let catalog = MemoryCatalog::new().with_survey(SurveyDefinition::new(
///     Survey::new("s1", "Intake"),
///     vec![Question::new("name", "Your name", QuestionKind::Text).required()],
/// ));
/// assert_eq!(catalog.response_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    survey: Option<SurveyDefinition>,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    responses: HashMap<ResponseId, StoredResponse>,
    create_calls: usize,
    create_failure: Option<String>,
    fetch_response_failure: Option<String>,
}

impl MemoryCatalog {
    /// Create a catalog without a survey.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this survey.
    pub fn with_survey(mut self, survey: SurveyDefinition) -> Self {
        self.survey = Some(survey);
        self
    }

    /// Make every `create_response` fail with `message`.
    pub fn failing_creates(self, message: impl Into<String>) -> Self {
        self.set_create_failure(Some(message.into()));
        self
    }

    /// Make every `fetch_response` fail with `message`.
    pub fn failing_response_fetches(self, message: impl Into<String>) -> Self {
        self.lock().fetch_response_failure = Some(message.into());
        self
    }

    /// Change whether `create_response` fails; `None` lets it succeed again.
    pub fn set_create_failure(&self, message: Option<String>) {
        self.lock().create_failure = message;
    }

    /// Number of times `create_response` was called, including failed calls.
    pub fn create_calls(&self) -> usize {
        self.lock().create_calls
    }

    /// Number of stored responses.
    pub fn response_count(&self) -> usize {
        self.lock().responses.len()
    }

    /// Get the stored answers of a response as `(question id, value)` pairs.
    pub fn stored_answers(&self, id: &ResponseId) -> Option<Vec<(String, String)>> {
        self.lock().responses.get(id).map(|response| {
            response
                .answers
                .iter()
                .map(|answer| (answer.question_id.to_string(), answer.value.clone()))
                .collect()
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn fetch_survey(&self) -> Result<SurveyDefinition, CatalogError> {
        self.survey.clone().ok_or(CatalogError::NoSurvey)
    }

    async fn fetch_response(&self, id: &ResponseId) -> Result<StoredResponse, CatalogError> {
        let state = self.lock();
        if let Some(message) = &state.fetch_response_failure {
            return Err(CatalogError::Unavailable(message.clone()));
        }
        state
            .responses
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::ResponseNotFound(id.clone()))
    }

    async fn create_response(
        &self,
        survey_id: &SurveyId,
        values: &Answers,
    ) -> Result<ResponseId, CatalogError> {
        let mut state = self.lock();
        state.create_calls += 1;
        if let Some(message) = &state.create_failure {
            return Err(CatalogError::Unavailable(message.clone()));
        }

        let id = ResponseId::new(uuid::Uuid::new_v4().to_string());
        let title_of = |question_id: &QuestionId| {
            self.survey
                .as_ref()
                .and_then(|survey| survey.question(question_id))
                .map(|question| question.title().to_string())
                .unwrap_or_default()
        };
        let mut answers: Vec<StoredAnswer> = values
            .sorted()
            .into_iter()
            .map(|(question_id, value)| StoredAnswer {
                question_title: title_of(question_id),
                question_id: question_id.clone(),
                value: value.to_string(),
            })
            .collect();
        if let Some(survey) = &self.survey {
            let position = |answer: &StoredAnswer| {
                survey
                    .questions()
                    .iter()
                    .position(|question| question.id() == &answer.question_id)
                    .unwrap_or(usize::MAX)
            };
            answers.sort_by_key(position);
        }

        state.responses.insert(
            id.clone(),
            StoredResponse {
                id: id.clone(),
                survey_id: survey_id.clone(),
                created_at: Utc::now(),
                answers,
            },
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_types::{Question, QuestionKind, Survey};

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new().with_survey(SurveyDefinition::new(
            Survey::new("s1", "Intake"),
            vec![
                Question::new("name", "Your name", QuestionKind::Text).with_order(1),
                Question::new("age", "Age", QuestionKind::Number).with_order(2),
            ],
        ))
    }

    #[tokio::test]
    async fn no_survey() {
        let err = MemoryCatalog::new().fetch_survey().await.unwrap_err();
        assert!(matches!(err, CatalogError::NoSurvey));
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let catalog = catalog();
        let values = Answers::new().with("age", "30").with("name", "Ada");

        let id = catalog
            .create_response(&SurveyId::new("s1"), &values)
            .await
            .unwrap();
        let stored = catalog.fetch_response(&id).await.unwrap();

        assert_eq!(stored.survey_id.as_str(), "s1");
        let titles: Vec<_> = stored
            .answers
            .iter()
            .map(|a| a.question_title.as_str())
            .collect();
        assert_eq!(titles, ["Your name", "Age"]);
        assert_eq!(catalog.create_calls(), 1);
    }

    #[tokio::test]
    async fn missing_response() {
        let err = catalog()
            .fetch_response(&ResponseId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ResponseNotFound(_)));
    }

    #[tokio::test]
    async fn injected_create_failure_can_be_lifted() {
        let catalog = catalog().failing_creates("boom");
        let values = Answers::new().with("name", "Ada");

        let err = catalog
            .create_response(&SurveyId::new("s1"), &values)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(catalog.response_count(), 0);

        catalog.set_create_failure(None);
        catalog
            .create_response(&SurveyId::new("s1"), &values)
            .await
            .unwrap();
        assert_eq!(catalog.create_calls(), 2);
        assert_eq!(catalog.response_count(), 1);
    }
}
