use serde::{Deserialize, Serialize};

use crate::{Question, QuestionId, SurveyId};

/// The survey row: the questionnaire's identity and headline text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Survey {
    /// Create a survey without a description.
    pub fn new(id: impl Into<SurveyId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A survey together with its ordered questions, as loaded for one page.
///
/// Questions are kept sorted by [`Question::order`]; questions sharing an
/// order keep the sequence they were given in.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyDefinition {
    survey: Survey,
    questions: Vec<Question>,
}

impl SurveyDefinition {
    /// Create a definition, sorting the questions by order.
    pub fn new(survey: Survey, mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(Question::order);
        Self { survey, questions }
    }

    /// Get the survey row.
    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    /// Get the survey id.
    pub fn survey_id(&self) -> &SurveyId {
        &self.survey.id
    }

    /// Get the questions in display order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }

    /// Check if the survey has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }
}
