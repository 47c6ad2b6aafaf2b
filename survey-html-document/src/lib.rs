//! HTML rendering for survey pages.
//!
//! Renders whatever state a [`survey::SurveyPage`] is in:
//! - the form, one field per question with its current value and message
//! - the review of a stored response
//! - the loading and error states
//!
//! Output is either a complete document or a fragment meant to replace the
//! contents of the `#survey-root` element, which is what the live-update
//! script does after every change.
//!
//! ## Usage
//!
//! ```rust
//! use survey::{Question, QuestionKind, Survey, SurveyDefinition, SurveyForm};
//! use survey_html_document::{HtmlOptions, render_form};
//!
//! let form = SurveyForm::new(SurveyDefinition::new(
//!     Survey::new("s1", "Intake"),
//!     vec![Question::new("name", "Your name", QuestionKind::Text).required()],
//! ));
//!
//! let html = render_form(&form, &HtmlOptions::new().with_action("/submit"));
//! assert!(html.contains("placeholder=\"Type here\""));
//! ```

pub mod field;
mod generator;
pub mod review;

pub use field::render_field;
pub use generator::{
    HtmlOptions, LIVE_SCRIPT, ROOT_ID, render_document, render_error, render_form,
    render_page,
};
pub use review::render_review;
