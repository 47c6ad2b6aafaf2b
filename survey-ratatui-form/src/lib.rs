//! # survey-ratatui-form
//!
//! Terminal front-end for a hosted survey.
//!
//! All questions are shown at once in a scrollable form. Users move between
//! them with Tab/Shift+Tab or the arrow keys, type into text and number
//! fields, pick choices with Space/Enter and submit with Ctrl+S or F10. Every
//! edit goes through [`SurveyForm::on_change`](survey::SurveyForm::on_change),
//! so validation messages show up under a field as soon as it is changed.
//! Once the response is stored, its review replaces the form.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use survey::{CatalogConfig, RestCatalog};
//! use survey_ratatui_form::SurveyTui;
//!
//! fn main() -> anyhow::Result<()> {
//!     let runtime = tokio::runtime::Runtime::new()?;
//!     let catalog = RestCatalog::new(CatalogConfig::from_env()?)?;
//!     let page = SurveyTui::new().run(&catalog, &runtime)?;
//!     if let Some(response) = page.response() {
//!         println!("Stored response {}", response.id);
//!     }
//!     Ok(())
//! }
//! ```

mod app;
mod draw;
mod state;

pub use app::{SurveyTui, Theme, TuiError};
pub use state::{Action, Focus, FormState};
