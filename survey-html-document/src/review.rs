//! Read-only view of a stored response.

use chrono::{Local, TimeZone};
use survey::StoredResponse;
use survey::review::{EMPTY_ANSWER, REVIEW_HEADING, format_timestamp};

use crate::generator::escape_html;

/// Render a stored response's answers in their given order.
///
/// The submission time is shown in the host's local time zone.
pub fn render_review(response: &StoredResponse, prefix: &str) -> String {
    render_review_in(response, prefix, &Local)
}

/// Like [`render_review`], showing the submission time in `tz`.
pub fn render_review_in<Tz>(response: &StoredResponse, prefix: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut html = String::new();

    html.push_str(&format!("<section class=\"{prefix}-review\">\n"));
    html.push_str(&format!("  <h2 class=\"{prefix}-title\">{REVIEW_HEADING}</h2>\n"));
    html.push_str(&format!("  <dl class=\"{prefix}-answers\">\n"));

    for answer in &response.answers {
        let value = if answer.value.is_empty() {
            format!("<em class=\"{prefix}-empty\">{EMPTY_ANSWER}</em>")
        } else {
            escape_html(&answer.value)
        };
        html.push_str(&format!(
            "    <dt>{}</dt>\n    <dd>{value}</dd>\n",
            escape_html(&answer.question_title)
        ));
    }

    html.push_str("  </dl>\n");
    html.push_str(&format!(
        "  <p class=\"{prefix}-submitted-at\">Submitted at: {}</p>\n",
        format_timestamp(&response.created_at, tz)
    ));
    html.push_str("</section>\n");

    html
}
