//! Input controls for single questions.

use survey::form::{NUMBER_PLACEHOLDER, SELECT_SENTINEL, TEXT_PLACEHOLDER};
use survey::{Question, QuestionKind};

use crate::generator::escape_html;

/// Render one question as a labelled input control.
///
/// `value` is the current raw answer and `error` its validation message. The
/// control's `name` is the question id, so a plain form post carries one
/// `id=value` pair per answered question. Questions of an unknown kind get
/// their label and no control.
pub fn render_field(question: &Question, value: &str, error: Option<&str>, prefix: &str) -> String {
    let id = escape_html(question.id().as_str());
    let mut html = String::new();

    html.push_str(&format!(
        "    <div class=\"{prefix}-field\" data-question=\"{id}\">\n"
    ));

    match question.kind() {
        QuestionKind::Text => {
            html.push_str(&label(question, &id, prefix, true));
            html.push_str(&format!(
                "      <input type=\"text\" id=\"{id}\" name=\"{id}\" class=\"{prefix}-input\" value=\"{}\" placeholder=\"{TEXT_PLACEHOLDER}\"{}>\n",
                escape_html(value),
                aria(&id, error)
            ));
        }

        QuestionKind::Number => {
            html.push_str(&label(question, &id, prefix, true));
            html.push_str(&format!(
                "      <input type=\"number\" id=\"{id}\" name=\"{id}\" class=\"{prefix}-input\" value=\"{}\" placeholder=\"{NUMBER_PLACEHOLDER}\"{}>\n",
                escape_html(value),
                aria(&id, error)
            ));
        }

        QuestionKind::Select(choice) => {
            html.push_str(&label(question, &id, prefix, true));
            html.push_str(&format!(
                "      <select id=\"{id}\" name=\"{id}\" class=\"{prefix}-select\"{}>\n",
                aria(&id, error)
            ));
            html.push_str(&format!(
                "        <option value=\"\"{}>{SELECT_SENTINEL}</option>\n",
                selected(value.is_empty())
            ));
            for option in choice.options() {
                html.push_str(&format!(
                    "        <option value=\"{0}\"{1}>{0}</option>\n",
                    escape_html(option),
                    selected(option == value)
                ));
            }
            html.push_str("      </select>\n");
        }

        QuestionKind::Radio(choice) => {
            html.push_str(&format!(
                "      <fieldset class=\"{prefix}-fieldset\" role=\"radiogroup\"{}>\n",
                aria(&id, error)
            ));
            html.push_str(&format!("        <legend>{}</legend>\n", title(question, prefix)));
            if let Some(description) = question.description() {
                html.push_str(&format!(
                    "        <p class=\"{prefix}-description\">{}</p>\n",
                    escape_html(description)
                ));
            }
            for (idx, option) in choice.options().iter().enumerate() {
                let checked = if option == value { " checked" } else { "" };
                html.push_str(&format!(
                    "        <label class=\"{prefix}-radio-option\"><input type=\"radio\" id=\"{id}-{idx}\" name=\"{id}\" value=\"{0}\"{checked}{1}> {0}</label>\n",
                    escape_html(option),
                    aria(&id, error)
                ));
            }
            html.push_str("      </fieldset>\n");
        }

        QuestionKind::Unknown(_) => {
            html.push_str(&label(question, &id, prefix, false));
        }
    }

    if let Some(message) = error {
        html.push_str(&format!(
            "      <p id=\"{id}-error\" class=\"{prefix}-error\" role=\"alert\">{}</p>\n",
            escape_html(message)
        ));
    }

    html.push_str("    </div>\n");
    html
}

/// Title text with the required marker.
fn title(question: &Question, prefix: &str) -> String {
    let mut title = escape_html(question.title());
    if question.is_required() {
        title.push_str(&format!(
            " <span class=\"{prefix}-required\" aria-hidden=\"true\">*</span>"
        ));
    }
    title
}

fn label(question: &Question, id: &str, prefix: &str, has_control: bool) -> String {
    let mut html = if has_control {
        format!(
            "      <label for=\"{id}\" class=\"{prefix}-label\">{}</label>\n",
            title(question, prefix)
        )
    } else {
        format!(
            "      <span class=\"{prefix}-label\">{}</span>\n",
            title(question, prefix)
        )
    };
    if let Some(description) = question.description() {
        html.push_str(&format!(
            "      <p class=\"{prefix}-description\">{}</p>\n",
            escape_html(description)
        ));
    }
    html
}

fn aria(id: &str, error: Option<&str>) -> String {
    match error {
        Some(_) => format!(" aria-invalid=\"true\" aria-describedby=\"{id}-error\""),
        None => " aria-invalid=\"false\"".to_string(),
    }
}

fn selected(is_selected: bool) -> &'static str {
    if is_selected { " selected" } else { "" }
}
