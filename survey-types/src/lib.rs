//! Core types for the survey workspace.
//!
//! This crate provides the foundational types for collecting survey answers:
//! - `Survey` and `SurveyDefinition` - The survey row and its ordered questions
//! - `Question` and `QuestionKind` - Individual questions and their types
//! - `Answers` and `FieldErrors` - Values being filled in and their validation state
//! - `StoredResponse` - A submitted response read back for review
//! - `validate_one` and `validate_all` - The validation engine

mod ids;
pub use ids::{QuestionId, ResponseId, SurveyId};

mod answers;
pub use answers::{Answers, FieldErrors};

mod question;
pub use question::{ChoiceQuestion, Question, QuestionKind};

mod survey_definition;
pub use survey_definition::{Survey, SurveyDefinition};

mod stored_response;
pub use stored_response::{StoredAnswer, StoredResponse};

pub mod validate;
pub use validate::{validate_all, validate_one};
