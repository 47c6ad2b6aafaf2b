//! Row shapes of the `surveys`, `questions`, `responses` and `answers` tables.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use survey_types::{
    Question, QuestionId, QuestionKind, ResponseId, StoredAnswer, StoredResponse, SurveyId,
};
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QuestionRow {
    pub id: QuestionId,
    pub survey_id: SurveyId,
    #[serde(default)]
    pub order: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub qtype: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        let kind = QuestionKind::from_tag(&row.qtype, row.options);
        if let QuestionKind::Unknown(_) = kind {
            warn!(
                question = %row.id,
                qtype = kind.tag(),
                "unknown question type, showing label only"
            );
        }

        let question = Question::new(row.id, row.title, kind)
        .in_survey(row.survey_id)
        .with_order(row.order)
        .with_required(row.required);

        match row.description {
            Some(description) => question.with_description(description),
            None => question,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseRow {
    pub id: ResponseId,
    pub survey_id: SurveyId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnswerRow {
    pub question_id: QuestionId,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewResponse<'a> {
    pub survey_id: &'a SurveyId,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewAnswer<'a> {
    pub response_id: &'a ResponseId,
    pub question_id: &'a QuestionId,
    pub value: &'a str,
}

/// Join answer rows with the survey's questions.
///
/// Answers follow the questions' display order; answers whose question is
/// gone keep their fetched order at the end and get an empty title.
pub(crate) fn join_answers(
    response: ResponseRow,
    answers: Vec<AnswerRow>,
    questions: &[Question],
) -> StoredResponse {
    let position: HashMap<&QuestionId, (i64, &str)> = questions
        .iter()
        .map(|question| (question.id(), (question.order(), question.title())))
        .collect();

    let mut joined: Vec<(Option<i64>, StoredAnswer)> = answers
        .into_iter()
        .map(|row| {
            let known = position.get(&row.question_id).copied();
            let answer = StoredAnswer {
                question_title: known.map(|(_, title)| title.to_string()).unwrap_or_default(),
                question_id: row.question_id,
                value: row.value.unwrap_or_default(),
            };
            (known.map(|(order, _)| order), answer)
        })
        .collect();
    // `None` sorts before `Some`, so key unknown questions past every order.
    joined.sort_by_key(|(order, _)| (order.is_none(), *order));

    StoredResponse {
        id: response.id,
        survey_id: response.survey_id,
        created_at: response.created_at,
        answers: joined.into_iter().map(|(_, answer)| answer).collect(),
    }
}
