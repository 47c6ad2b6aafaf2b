use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{QuestionId, ResponseId, SurveyId};

/// A submitted response as read back for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub id: ResponseId,
    pub survey_id: SurveyId,
    pub created_at: DateTime<Utc>,
    /// Answers in display order.
    pub answers: Vec<StoredAnswer>,
}

/// One answer of a stored response, joined with its question's title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub question_id: QuestionId,
    pub value: String,
    /// Empty when the question no longer exists.
    pub question_title: String,
}

impl StoredResponse {
    /// Find the answer to a question.
    pub fn answer(&self, id: &QuestionId) -> Option<&StoredAnswer> {
        self.answers.iter().find(|answer| &answer.question_id == id)
    }
}
