//! Catalog backed by a PostgREST table API (Supabase `rest/v1`).

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use survey_types::{
    Answers, Question, ResponseId, StoredResponse, Survey, SurveyDefinition, SurveyId,
};
use tracing::{debug, info};

use crate::rows::{AnswerRow, NewAnswer, NewResponse, QuestionRow, ResponseRow, join_answers};
use crate::{Catalog, CatalogConfig, CatalogError};

static API_KEY_HEADER: &str = "apikey";
static PREFER_HEADER: &str = "Prefer";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Catalog client talking to the hosted tables over HTTP.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestCatalog {
    base: String,
    client: Client,
}

impl RestCatalog {
    /// Build a client that authenticates every request with the anon key.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(&config.anon_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.anon_key))?,
        );

        let client = Client::builder().default_headers(headers).build()?;
        let base = format!("{}/rest/v1", config.url.as_str().trim_end_matches('/'));

        Ok(Self { base, client })
    }

    fn table(&self, name: &str) -> String {
        format!("{}/{}", self.base, name)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, CatalogError> {
        let response = self
            .client
            .get(self.table(table))
            .query(&[("select", "*")])
            .query(query)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }
}

/// Turn a non-success status into an error carrying the API's message.
async fn check(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    tracing::error!(
        body=%body,
        status=%status,
        "unexpected response from table API"
    );
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("HTTP {status}"));
    Err(CatalogError::api(status.as_u16(), message))
}

#[async_trait]
impl Catalog for RestCatalog {
    #[tracing::instrument(skip(self), err)]
    async fn fetch_survey(&self) -> Result<SurveyDefinition, CatalogError> {
        let survey = self
            .select::<Survey>("surveys", &[("limit", "1")])
            .await?
            .into_iter()
            .next()
            .ok_or(CatalogError::NoSurvey)?;

        let survey_filter = format!("eq.{}", survey.id);
        let questions: Vec<QuestionRow> = self
            .select(
                "questions",
                &[("survey_id", survey_filter.as_str()), ("order", "order.asc")],
            )
            .await?;

        debug!(survey_id = %survey.id, questions = questions.len(), "loaded survey");
        Ok(SurveyDefinition::new(
            survey,
            questions.into_iter().map(Question::from).collect(),
        ))
    }

    #[tracing::instrument(skip(self), err)]
    async fn fetch_response(&self, id: &ResponseId) -> Result<StoredResponse, CatalogError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .select::<ResponseRow>("responses", &[("id", id_filter.as_str())])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::ResponseNotFound(id.clone()))?;

        let survey_filter = format!("eq.{}", response.survey_id);
        let answers_query = [("response_id", id_filter.as_str())];
        let questions_query = [("survey_id", survey_filter.as_str())];
        let (answers, questions) = tokio::try_join!(
            self.select::<AnswerRow>("answers", &answers_query),
            self.select::<QuestionRow>("questions", &questions_query),
        )?;

        let questions: Vec<Question> = questions.into_iter().map(Question::from).collect();
        Ok(join_answers(response, answers, &questions))
    }

    #[tracing::instrument(skip(self, values), fields(answers = values.len()), err)]
    async fn create_response(
        &self,
        survey_id: &SurveyId,
        values: &Answers,
    ) -> Result<ResponseId, CatalogError> {
        let response = self
            .client
            .post(self.table("responses"))
            .header(PREFER_HEADER, "return=representation")
            .json(&NewResponse { survey_id })
            .send()
            .await?;
        let created: Vec<ResponseRow> = check(response).await?.json().await?;
        let response_id = created
            .into_iter()
            .next()
            .ok_or(CatalogError::CreateFailed)?
            .id;

        let rows: Vec<NewAnswer<'_>> = values
            .sorted()
            .into_iter()
            .map(|(question_id, value)| NewAnswer {
                response_id: &response_id,
                question_id,
                value,
            })
            .collect();
        if !rows.is_empty() {
            let response = self
                .client
                .post(self.table("answers"))
                .header(PREFER_HEADER, "return=minimal")
                .json(&rows)
                .send()
                .await?;
            check(response).await?;
        }

        info!(response_id = %response_id, "stored response");
        Ok(response_id)
    }
}
