//! Field validation.
//!
//! Every rule works on the trimmed raw value. The required check runs first
//! and short-circuits the kind-specific rules.

use crate::{Answers, FieldErrors, Question, QuestionKind};

pub const REQUIRED: &str = "This field is required.";
pub const TEXT_TOO_LONG: &str = "Please keep under 200 characters.";
pub const INVALID_NUMBER: &str = "Enter a valid number.";
pub const NUMBER_OUT_OF_RANGE: &str = "Enter a value between 0 and 150.";
pub const NOT_AN_OPTION: &str = "Choose one of the provided options.";

/// Longest accepted text answer, in characters.
///
/// Counted in Unicode scalar values, not UTF-16 units as a browser's
/// `maxlength` would, so characters outside the BMP count once.
pub const MAX_TEXT_LEN: usize = 200;

/// Smallest accepted number answer.
pub const NUMBER_MIN: f64 = 0.0;

/// Largest accepted number answer.
pub const NUMBER_MAX: f64 = 150.0;

/// Validate one raw answer against its question.
///
/// Returns the message to show next to the field, or `None` if the value is
/// acceptable.
pub fn validate_one(question: &Question, raw: &str) -> Option<String> {
    let value = raw.trim();

    if question.is_required() && value.is_empty() {
        return Some(REQUIRED.to_string());
    }
    if value.is_empty() {
        return None;
    }

    let message = match question.kind() {
        QuestionKind::Text => check_text(value),
        QuestionKind::Number => check_number(value),
        QuestionKind::Select(choice) | QuestionKind::Radio(choice) => {
            (!choice.options().is_empty() && !choice.contains(value)).then_some(NOT_AN_OPTION)
        }
        QuestionKind::Unknown(_) => None,
    };
    message.map(str::to_string)
}

/// Validate every question against the current answers.
///
/// Questions are checked independently; the result has one entry per
/// failing question.
pub fn validate_all<'a, I>(questions: I, values: &Answers) -> FieldErrors
where
    I: IntoIterator<Item = &'a Question>,
{
    let mut errors = FieldErrors::new();
    for question in questions {
        errors.set(
            question.id().clone(),
            validate_one(question, values.get(question.id())),
        );
    }
    errors
}

fn check_text(value: &str) -> Option<&'static str> {
    (value.chars().count() > MAX_TEXT_LEN).then_some(TEXT_TOO_LONG)
}

fn check_number(value: &str) -> Option<&'static str> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => {
            (!(NUMBER_MIN..=NUMBER_MAX).contains(&n)).then_some(NUMBER_OUT_OF_RANGE)
        }
        _ => Some(INVALID_NUMBER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceQuestion, QuestionId};

    fn text() -> Question {
        Question::new("name", "Name", QuestionKind::Text)
    }

    fn number() -> Question {
        Question::new("age", "Age", QuestionKind::Number)
    }

    fn select(options: &[&str]) -> Question {
        Question::new(
            "color",
            "Color",
            QuestionKind::Select(ChoiceQuestion::new(options.iter().copied())),
        )
    }

    fn radio(options: &[&str]) -> Question {
        Question::new(
            "agree",
            "Agree?",
            QuestionKind::Radio(ChoiceQuestion::new(options.iter().copied())),
        )
    }

    #[test]
    fn required_empty_fails_for_every_kind() {
        for question in [
            text(),
            number(),
            select(&["A"]),
            radio(&["Yes"]),
            Question::new("x", "X", QuestionKind::Unknown("date".into())),
        ] {
            let question = question.required();
            assert_eq!(validate_one(&question, "").as_deref(), Some(REQUIRED));
            assert_eq!(validate_one(&question, "   ").as_deref(), Some(REQUIRED));
        }
    }

    #[test]
    fn optional_empty_passes() {
        for question in [text(), number(), select(&["A"]), radio(&["Yes"])] {
            assert_eq!(validate_one(&question, ""), None);
        }
    }

    #[test]
    fn text_length_limit() {
        assert_eq!(validate_one(&text(), &"a".repeat(200)), None);
        assert_eq!(
            validate_one(&text(), &"a".repeat(201)).as_deref(),
            Some(TEXT_TOO_LONG)
        );
        // Surrounding whitespace does not count.
        assert_eq!(validate_one(&text(), &format!("  {}  ", "a".repeat(200))), None);
    }

    #[test]
    fn text_length_counts_characters() {
        assert_eq!(validate_one(&text(), &"é".repeat(200)), None);
        assert_eq!(validate_one(&text(), &"😀".repeat(150)), None);
        assert_eq!(
            validate_one(&text(), &"😀".repeat(201)).as_deref(),
            Some(TEXT_TOO_LONG)
        );
    }

    #[test]
    fn number_bounds_are_inclusive() {
        assert_eq!(validate_one(&number(), "0"), None);
        assert_eq!(validate_one(&number(), "150"), None);
        assert_eq!(validate_one(&number(), "42.5"), None);
        assert_eq!(
            validate_one(&number(), "151").as_deref(),
            Some(NUMBER_OUT_OF_RANGE)
        );
        assert_eq!(
            validate_one(&number(), "-1").as_deref(),
            Some(NUMBER_OUT_OF_RANGE)
        );
    }

    #[test]
    fn number_must_parse_and_be_finite() {
        for raw in ["abc", "12abc", "NaN", "inf", "infinity", "1e400"] {
            assert_eq!(
                validate_one(&number(), raw).as_deref(),
                Some(INVALID_NUMBER),
                "{raw}"
            );
        }
        assert_eq!(validate_one(&number(), " 7 "), None);
        assert_eq!(validate_one(&number(), "1e2"), None);
    }

    #[test]
    fn required_check_short_circuits() {
        let question = number().required();
        assert_eq!(validate_one(&question, "").as_deref(), Some(REQUIRED));
        assert_eq!(
            validate_one(&question, "abc").as_deref(),
            Some(INVALID_NUMBER)
        );
    }

    #[test]
    fn choices_must_be_declared_options() {
        for question in [select(&["A", "B"]), radio(&["A", "B"])] {
            assert_eq!(validate_one(&question, "A"), None);
            assert_eq!(
                validate_one(&question, "C").as_deref(),
                Some(NOT_AN_OPTION)
            );
        }
    }

    #[test]
    fn choices_without_options_accept_anything() {
        assert_eq!(validate_one(&select(&[]), "whatever"), None);
        assert_eq!(validate_one(&radio(&[]), "whatever"), None);
    }

    #[test]
    fn unknown_kind_is_permissive() {
        let question = Question::new("x", "X", QuestionKind::Unknown("slider".into()));
        assert_eq!(validate_one(&question, &"z".repeat(500)), None);
    }

    #[test]
    fn validate_all_checks_each_question() {
        let questions = vec![text().required(), number(), radio(&["Yes", "No"])];
        let values = Answers::new().with("age", "abc").with("agree", "Maybe");

        let errors = validate_all(&questions, &values);

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(&QuestionId::new("name")), Some(REQUIRED));
        assert_eq!(errors.get(&QuestionId::new("age")), Some(INVALID_NUMBER));
        assert_eq!(errors.get(&QuestionId::new("agree")), Some(NOT_AN_OPTION));
    }

    #[test]
    fn validate_all_is_idempotent() {
        let questions = vec![text().required(), number(), select(&["A", "B"])];
        let values = Answers::new().with("name", "Ada").with("age", "200");

        let first = validate_all(&questions, &values);
        let second = validate_all(&questions, &values);

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }
}
