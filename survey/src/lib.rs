//! # survey
//!
//! Collect answers to a single hosted survey.
//!
//! This crate holds the state machines every front-end drives:
//! - [`SurveyForm`] owns the answers, per-field errors and the submission
//!   state, validating live on every change and once more before submitting
//! - [`SurveyPage`] loads the survey, switches from the form to the review of
//!   the stored response, and surfaces loading and error states
//!
//! Storage is reached through the [`Catalog`] trait. [`RestCatalog`] talks to
//! the hosted tables; [`MemoryCatalog`] stands in for them in tests.
//!
//! ## Usage
//!
//! ```rust
//! use survey::{MemoryCatalog, Question, QuestionKind, SubmitOutcome, Survey, SurveyDefinition, SurveyPage};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let catalog = MemoryCatalog::new().with_survey(SurveyDefinition::new(
//!     Survey::new("s1", "Intake"),
//!     vec![Question::new("name", "Your name", QuestionKind::Text).required()],
//! ));
//!
//! let mut page = SurveyPage::load(&catalog).await;
//! let form = page.form_mut().unwrap();
//! form.on_change(&"name".into(), "Ada");
//!
//! let outcome = page.submit(&catalog).await;
//! assert!(matches!(outcome, Some(SubmitOutcome::Submitted(_))));
//! assert!(page.response().is_some());
//! # }
//! ```
//!
//! ## Front-ends
//!
//! - `survey-html-document` renders pages as HTML
//! - `survey-server` hosts the page over HTTP
//! - `survey-ratatui-form` drives it from a terminal

pub use survey_types::*;

pub use survey_catalog::{
    Catalog, CatalogConfig, CatalogError, ConfigError, MemoryCatalog, RestCatalog,
};

pub mod form;
pub use form::{PendingSubmission, SubmitOutcome, SurveyForm};

pub mod page;
pub use page::{PageState, SurveyPage};

pub mod review;
pub use review::format_timestamp;
