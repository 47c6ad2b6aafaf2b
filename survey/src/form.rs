//! The survey form state machine.
//!
//! A [`SurveyForm`] owns the answers being filled in, the validation message
//! of every failing question, whether a submission is in flight, and the
//! message of the last failed submission. Everything a front-end shows about
//! the form's validity is derived from those on demand.

use survey_catalog::{Catalog, CatalogError};
use survey_types::{
    Answers, FieldErrors, Question, QuestionId, ResponseId, SurveyDefinition, SurveyId,
    validate_all, validate_one,
};
use tracing::{debug, info, warn};

/// Label of the submit control.
pub const SUBMIT_LABEL: &str = "Submit survey";

/// Label of the submit control while a submission is in flight.
pub const SUBMITTING_LABEL: &str = "Submitting…";

/// Hint shown while the form cannot be submitted because of its fields.
pub const FIX_FIELDS_HINT: &str = "Please fix the highlighted fields.";

/// Submission message used when the failure carries no text of its own.
pub const SUBMIT_FAILED: &str = "Failed to submit";

/// Placeholder of empty text fields.
pub const TEXT_PLACEHOLDER: &str = "Type here";

/// Placeholder of empty number fields.
pub const NUMBER_PLACEHOLDER: &str = "0";

/// Label of the blank choice every select starts with.
pub const SELECT_SENTINEL: &str = "Select…";

/// How a call to [`SurveyForm::submit`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The response was stored under this id.
    Submitted(ResponseId),

    /// Validation failed; nothing was sent.
    Blocked,

    /// The catalog rejected the response; see [`SurveyForm::submit_error`].
    Failed,

    /// Another submission is still in flight; nothing was done.
    InFlight,
}

/// Answers validated and ready to be stored.
///
/// Produced by [`SurveyForm::begin_submit`]; the form stays in flight until
/// the result is handed to [`SurveyForm::finish_submit`].
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    survey_id: SurveyId,
    values: Answers,
}

impl PendingSubmission {
    /// Get the survey the answers belong to.
    pub fn survey_id(&self) -> &SurveyId {
        &self.survey_id
    }

    /// Get the answers to store.
    pub fn values(&self) -> &Answers {
        &self.values
    }

    /// Store the answers as a new response.
    pub async fn send<C>(&self, catalog: &C) -> Result<ResponseId, CatalogError>
    where
        C: Catalog + ?Sized,
    {
        catalog.create_response(&self.survey_id, &self.values).await
    }
}

/// Form state for one page load of a survey.
#[derive(Debug, Clone)]
pub struct SurveyForm {
    definition: SurveyDefinition,
    values: Answers,
    errors: FieldErrors,
    submitting: bool,
    submit_error: Option<String>,
}

impl SurveyForm {
    /// Create an empty form for a loaded survey.
    pub fn new(definition: SurveyDefinition) -> Self {
        Self {
            definition,
            values: Answers::new(),
            errors: FieldErrors::new(),
            submitting: false,
            submit_error: None,
        }
    }

    /// Get the survey and its questions.
    pub fn definition(&self) -> &SurveyDefinition {
        &self.definition
    }

    /// Get the questions in display order.
    pub fn questions(&self) -> &[Question] {
        self.definition.questions()
    }

    /// Get the answers entered so far.
    pub fn values(&self) -> &Answers {
        &self.values
    }

    /// Get the raw value of one question; unanswered questions are empty.
    pub fn value(&self, id: &QuestionId) -> &str {
        self.values.get(id)
    }

    /// Get the current validation messages.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Get the validation message of one question, if it is invalid.
    pub fn error(&self, id: &QuestionId) -> Option<&str> {
        self.errors.get(id)
    }

    /// Check if a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Get the message of the last failed submission.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Required questions that have no value yet.
    pub fn required_missing(&self) -> Vec<&Question> {
        self.questions()
            .iter()
            .filter(|question| question.is_required() && !self.values.has_value(question.id()))
            .collect()
    }

    /// Check if any question currently has a validation message.
    pub fn has_field_errors(&self) -> bool {
        self.errors.has_errors()
    }

    /// Check if the form cannot be submitted as it stands.
    pub fn form_invalid(&self) -> bool {
        !self.required_missing().is_empty() || self.has_field_errors()
    }

    /// Check if the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.form_invalid()
    }

    /// Label for the submit control.
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Hint to show next to the submit control, if any.
    pub fn hint(&self) -> Option<&'static str> {
        self.form_invalid().then_some(FIX_FIELDS_HINT)
    }

    /// Store a new raw value and revalidate that question.
    ///
    /// Returns `false`, changing nothing, if the question is not part of the
    /// survey.
    pub fn on_change(&mut self, id: &QuestionId, value: impl Into<String>) -> bool {
        let Some(question) = self.definition.question(id) else {
            warn!(question = %id, "ignoring change to unknown question");
            return false;
        };

        let value = value.into();
        let error = validate_one(question, &value);
        debug!(question = %id, valid = error.is_none(), "field changed");

        self.errors.set(id.clone(), error);
        self.values.insert(id.clone(), value);
        true
    }

    /// Start a submission.
    ///
    /// Revalidates every question, replacing the current messages. On success
    /// the form is left in flight and the answers to store are returned;
    /// otherwise the outcome explains why nothing should be sent.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitOutcome> {
        if self.submitting {
            debug!("submission already in flight");
            return Err(SubmitOutcome::InFlight);
        }

        self.submitting = true;
        self.submit_error = None;
        self.errors = validate_all(self.definition.questions(), &self.values);

        if self.errors.has_errors() {
            self.submitting = false;
            info!(invalid = self.errors.len(), "submission blocked by validation");
            return Err(SubmitOutcome::Blocked);
        }

        Ok(PendingSubmission {
            survey_id: self.definition.survey_id().clone(),
            values: self.values.clone(),
        })
    }

    /// Record the result of a submission started with [`SurveyForm::begin_submit`].
    pub fn finish_submit(&mut self, result: Result<ResponseId, CatalogError>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(id) => {
                info!(response_id = %id, "survey submitted");
                SubmitOutcome::Submitted(id)
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                let message = err.to_string();
                self.submit_error = Some(if message.is_empty() {
                    SUBMIT_FAILED.to_string()
                } else {
                    message
                });
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate and, if everything passes, store the answers as a new response.
    pub async fn submit<C>(&mut self, catalog: &C) -> SubmitOutcome
    where
        C: Catalog + ?Sized,
    {
        match self.begin_submit() {
            Ok(pending) => {
                let result = pending.send(catalog).await;
                self.finish_submit(result)
            }
            Err(outcome) => outcome,
        }
    }
}
