use std::sync::Arc;

use async_trait::async_trait;
use survey_types::{Answers, ResponseId, StoredResponse, SurveyDefinition, SurveyId};

use crate::CatalogError;

/// Read and write access to surveys, questions, responses and answers.
///
/// Implementations are handed to the form and page explicitly, so tests can
/// substitute an in-memory catalog for the remote table API.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Load the single survey in scope together with its ordered questions.
    ///
    /// Fails with [`CatalogError::NoSurvey`] when no survey row exists.
    async fn fetch_survey(&self) -> Result<SurveyDefinition, CatalogError>;

    /// Load a stored response, each answer joined with its question's title.
    ///
    /// Fails with [`CatalogError::ResponseNotFound`] when no row matches.
    async fn fetch_response(&self, id: &ResponseId) -> Result<StoredResponse, CatalogError>;

    /// Store a new response and one answer row per entry of `values`.
    ///
    /// Entries with an empty value are stored too.
    async fn create_response(
        &self,
        survey_id: &SurveyId,
        values: &Answers,
    ) -> Result<ResponseId, CatalogError>;
}

#[async_trait]
impl<C> Catalog for Arc<C>
where
    C: Catalog + ?Sized,
{
    async fn fetch_survey(&self) -> Result<SurveyDefinition, CatalogError> {
        (**self).fetch_survey().await
    }

    async fn fetch_response(&self, id: &ResponseId) -> Result<StoredResponse, CatalogError> {
        (**self).fetch_response(id).await
    }

    async fn create_response(
        &self,
        survey_id: &SurveyId,
        values: &Answers,
    ) -> Result<ResponseId, CatalogError> {
        (**self).create_response(survey_id, values).await
    }
}
