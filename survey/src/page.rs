//! The top-level page controller.

use survey_catalog::{Catalog, CatalogError};
use survey_types::{ResponseId, StoredResponse};
use tracing::{info, warn};

use crate::{SubmitOutcome, SurveyForm};

/// Shown while the survey is being fetched.
pub const LOADING: &str = "Loading…";

/// Message shown when loading fails without a message of its own.
pub const LOAD_FAILED: &str = "Failed to load";

/// What the page currently shows.
#[derive(Debug, Clone)]
pub enum PageState {
    /// The survey is being fetched.
    Loading,

    /// Loading the survey or the stored response failed. Terminal.
    Error(String),

    /// The survey is loaded and being filled in.
    FormActive(SurveyForm),

    /// A stored response is shown read-only. Terminal.
    ReviewActive(StoredResponse),
}

impl PageState {
    /// Short name of the state, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error(_) => "error",
            Self::FormActive(_) => "form",
            Self::ReviewActive(_) => "review",
        }
    }

    /// Check if no further transitions can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error(_) | Self::ReviewActive(_))
    }
}

/// One page load: the survey form, and then the review of what was stored.
#[derive(Debug, Clone)]
pub struct SurveyPage {
    state: PageState,
}

impl Default for SurveyPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyPage {
    /// Create a page that has not loaded anything yet.
    pub fn new() -> Self {
        Self {
            state: PageState::Loading,
        }
    }

    /// Create a page and load the survey into it.
    pub async fn load<C>(catalog: &C) -> Self
    where
        C: Catalog + ?Sized,
    {
        let mut page = Self::new();
        page.load_from(catalog).await;
        page
    }

    /// Create a page showing a stored response, skipping the form.
    pub async fn review<C>(id: &ResponseId, catalog: &C) -> Self
    where
        C: Catalog + ?Sized,
    {
        let mut page = Self::new();
        page.show_review(id, catalog).await;
        page
    }

    /// Fetch the survey once. Only does something while loading.
    pub async fn load_from<C>(&mut self, catalog: &C)
    where
        C: Catalog + ?Sized,
    {
        if !matches!(self.state, PageState::Loading) {
            warn!(state = self.state.name(), "page already loaded");
            return;
        }

        self.state = match catalog.fetch_survey().await {
            Ok(definition) => {
                info!(
                    survey_id = %definition.survey_id(),
                    questions = definition.len(),
                    "survey loaded"
                );
                PageState::FormActive(SurveyForm::new(definition))
            }
            Err(err) => {
                warn!(error = %err, "failed to load survey");
                PageState::Error(message_or(err, LOAD_FAILED))
            }
        };
    }

    /// Fetch a freshly stored response and switch to its review.
    pub async fn on_submitted<C>(&mut self, id: &ResponseId, catalog: &C)
    where
        C: Catalog + ?Sized,
    {
        self.show_review(id, catalog).await;
    }

    /// Submit the form and, once the response is stored, switch to its review.
    ///
    /// Returns `None` if the page is not showing the form.
    pub async fn submit<C>(&mut self, catalog: &C) -> Option<SubmitOutcome>
    where
        C: Catalog + ?Sized,
    {
        let form = self.form_mut()?;
        let outcome = form.submit(catalog).await;
        if let SubmitOutcome::Submitted(id) = &outcome {
            self.on_submitted(id, catalog).await;
        }
        Some(outcome)
    }

    async fn show_review<C>(&mut self, id: &ResponseId, catalog: &C)
    where
        C: Catalog + ?Sized,
    {
        self.state = match catalog.fetch_response(id).await {
            Ok(response) => {
                info!(response_id = %id, answers = response.answers.len(), "showing review");
                PageState::ReviewActive(response)
            }
            Err(err) => {
                warn!(response_id = %id, error = %err, "failed to load response");
                PageState::Error(message_or(err, LOAD_FAILED))
            }
        };
    }

    /// Get the current state.
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Get the form, if the page shows it.
    pub fn form(&self) -> Option<&SurveyForm> {
        match &self.state {
            PageState::FormActive(form) => Some(form),
            _ => None,
        }
    }

    /// Get the form mutably, if the page shows it.
    pub fn form_mut(&mut self) -> Option<&mut SurveyForm> {
        match &mut self.state {
            PageState::FormActive(form) => Some(form),
            _ => None,
        }
    }

    /// Get the stored response, if the page shows its review.
    pub fn response(&self) -> Option<&StoredResponse> {
        match &self.state {
            PageState::ReviewActive(response) => Some(response),
            _ => None,
        }
    }

    /// Get the error message, if the page failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            PageState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Check if no further transitions can happen.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

fn message_or(err: CatalogError, fallback: &str) -> String {
    let message = err.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
