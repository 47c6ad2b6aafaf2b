//! Page and form rendering.

use survey::page::LOADING;
use survey::{PageState, SurveyForm, SurveyPage};

use crate::{render_field, render_review};

/// Id of the element whose contents the live-update script replaces.
pub const ROOT_ID: &str = "survey-root";

/// Options for HTML generation.
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Title for the HTML document; defaults to the survey title.
    pub title: Option<String>,
    /// Whether to include default CSS styling.
    pub include_styles: bool,
    /// Whether to generate a complete HTML document (with html/head/body tags).
    pub full_document: bool,
    /// Custom CSS class prefix for all generated elements.
    pub class_prefix: String,
    /// Where the form posts its answers on submit.
    pub action: Option<String>,
    /// Base URL for single-answer updates; `/<question id>` is appended.
    pub live_url: Option<String>,
    /// Whether full documents embed the live-update script.
    pub include_script: bool,
}

impl HtmlOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
            class_prefix: "survey".to_string(),
            action: None,
            live_url: None,
            include_script: true,
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable default CSS styling.
    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Generate a complete HTML document or just the fragment.
    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    /// Set a custom CSS class prefix.
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the URL the form posts to.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the base URL for live single-answer updates.
    pub fn with_live_url(mut self, url: impl Into<String>) -> Self {
        self.live_url = Some(url.into());
        self
    }

    /// Enable or disable the live-update script.
    pub fn with_script(mut self, include: bool) -> Self {
        self.include_script = include;
        self
    }
}

/// Render a page as a document or fragment, depending on `options`.
pub fn render_document(page: &SurveyPage, options: &HtmlOptions) -> String {
    let body = render_page(page, options);
    if !options.full_document {
        return body;
    }

    let title = options.title.clone().or_else(|| {
        page.form()
            .map(|form| form.definition().survey().title.clone())
    });
    wrap_document(title.as_deref(), &body, options)
}

/// Render the contents of the page root for the page's current state.
pub fn render_page(page: &SurveyPage, options: &HtmlOptions) -> String {
    let prefix = &options.class_prefix;
    match page.state() {
        PageState::Loading => format!("<p class=\"{prefix}-loading\">{LOADING}</p>\n"),
        PageState::Error(message) => render_error(message, options),
        PageState::FormActive(form) => render_form(form, options),
        PageState::ReviewActive(response) => render_review(response, prefix),
    }
}

/// Render a page-level error message.
pub fn render_error(message: &str, options: &HtmlOptions) -> String {
    format!(
        "<p class=\"{}-page-error\" role=\"alert\">{}</p>\n",
        options.class_prefix,
        escape_html(message)
    )
}

/// Render the form with every question's current value and message.
pub fn render_form(form: &SurveyForm, options: &HtmlOptions) -> String {
    let prefix = &options.class_prefix;
    let survey = form.definition().survey();
    let mut html = String::new();

    let action = options
        .action
        .as_deref()
        .map(|action| format!(" action=\"{}\"", escape_html(action)))
        .unwrap_or_default();
    let live = options
        .live_url
        .as_deref()
        .map(|url| format!(" data-live=\"{}\"", escape_html(url)))
        .unwrap_or_default();
    html.push_str(&format!(
        "<form class=\"{prefix}-form\" method=\"post\"{action}{live} novalidate>\n"
    ));

    html.push_str(&format!(
        "  <h1 class=\"{prefix}-title\">{}</h1>\n",
        escape_html(&survey.title)
    ));
    if let Some(description) = &survey.description {
        html.push_str(&format!(
            "  <p class=\"{prefix}-intro\">{}</p>\n",
            escape_html(description)
        ));
    }

    html.push_str(&format!("  <div class=\"{prefix}-questions\">\n"));
    for question in form.questions() {
        html.push_str(&render_field(
            question,
            form.value(question.id()),
            form.error(question.id()),
            prefix,
        ));
    }
    html.push_str("  </div>\n");

    if let Some(message) = form.submit_error() {
        html.push_str(&format!(
            "  <p class=\"{prefix}-submit-error\" role=\"alert\">{}</p>\n",
            escape_html(message)
        ));
    }

    let disabled = if form.can_submit() { "" } else { " disabled" };
    html.push_str(&format!(
        "  <button type=\"submit\" class=\"{prefix}-submit\"{disabled}>{}</button>\n",
        form.submit_label()
    ));

    if let Some(hint) = form.hint() {
        html.push_str(&format!("  <p class=\"{prefix}-hint\">{hint}</p>\n"));
    }

    html.push_str("</form>\n");
    html
}

fn wrap_document(title: Option<&str>, body: &str, options: &HtmlOptions) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    if let Some(title) = title {
        html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    }
    if options.include_styles {
        html.push_str(&generate_styles(&options.class_prefix));
    }
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("<main id=\"{ROOT_ID}\">\n"));
    html.push_str(body);
    html.push_str("</main>\n");

    if options.include_script {
        html.push_str("<script>\n");
        html.push_str(LIVE_SCRIPT);
        html.push_str("</script>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Escape HTML special characters.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Posts every edit and the final submit, then swaps in the returned fragment.
///
/// Requests go out one at a time so answers arrive in the order they were
/// typed. The focused input keeps its focus, caret and the text typed while
/// the request was in flight.
pub const LIVE_SCRIPT: &str = r#"(() => {
  const root = document.getElementById("survey-root");
  if (!root) return;
  let queue = Promise.resolve();

  const post = (url, body) =>
    fetch(url, { method: "POST", headers: { "x-survey-fragment": "1" }, body })
      .then((response) => response.text());

  const swap = (html) => {
    const active = document.activeElement;
    const focused = active && root.contains(active) ? active.id : null;
    const typed = active && (active.type === "text" || active.type === "number") ? active.value : null;
    root.innerHTML = html;
    const target = focused ? document.getElementById(focused) : null;
    if (!target) return;
    target.focus();
    if (typed !== null) {
      target.value = typed;
      try { target.setSelectionRange(typed.length, typed.length); } catch (_) {}
    }
  };

  root.addEventListener("input", (event) => {
    const field = event.target.closest("[data-question]");
    const form = event.target.closest("form[data-live]");
    if (!field || !form) return;
    const url = form.dataset.live + "/" + encodeURIComponent(field.dataset.question);
    const body = new URLSearchParams({ value: event.target.value });
    queue = queue.then(() => post(url, body)).then(swap).catch(console.error);
  });

  root.addEventListener("submit", (event) => {
    const form = event.target;
    if (!form.dataset.live) return;
    event.preventDefault();
    const body = new URLSearchParams(new FormData(form));
    queue = queue.then(() => post(form.action, body)).then(swap).catch(console.error);
  });
})();
"#;

/// Generate default CSS styles.
fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    #{ROOT_ID} {{
      max-width: 640px;
      margin: 2rem auto;
      padding: 1.5rem;
      font-family: sans-serif;
    }}
    .{prefix}-title {{
      margin-bottom: 0.25rem;
    }}
    .{prefix}-intro, .{prefix}-description {{
      color: #555;
    }}
    .{prefix}-field {{
      margin: 1rem 0;
    }}
    .{prefix}-label {{
      display: block;
      font-weight: 600;
      margin-bottom: 0.25rem;
    }}
    .{prefix}-required {{
      color: #c00;
    }}
    .{prefix}-input, .{prefix}-select {{
      width: 100%;
      padding: 0.5rem;
      box-sizing: border-box;
    }}
    [aria-invalid="true"] {{
      border-color: #c00;
    }}
    .{prefix}-fieldset {{
      border: none;
      padding: 0;
    }}
    .{prefix}-radio-option {{
      display: block;
      margin: 0.25rem 0;
    }}
    .{prefix}-error, .{prefix}-submit-error, .{prefix}-page-error {{
      color: #c00;
      margin: 0.25rem 0;
    }}
    .{prefix}-submit {{
      margin-top: 1rem;
      padding: 0.5rem 1rem;
    }}
    .{prefix}-submit:disabled {{
      opacity: 0.5;
    }}
    .{prefix}-hint, .{prefix}-empty {{
      color: #888;
    }}
    .{prefix}-answers dt {{
      font-weight: 600;
      margin-top: 0.75rem;
    }}
    .{prefix}-answers dd {{
      margin-left: 0;
    }}
  </style>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey::{MemoryCatalog, Question, QuestionKind, Survey, SurveyDefinition};

    fn definition() -> SurveyDefinition {
        SurveyDefinition::new(
            Survey::new("s1", "Feedback & ideas").with_description("Two minutes."),
            vec![
                Question::new("name", "Your name", QuestionKind::Text)
                    .required()
                    .with_order(1),
                Question::new("age", "Age", QuestionKind::Number).with_order(2),
            ],
        )
    }

    #[test]
    fn html_options_chaining() {
        let options = HtmlOptions::new()
            .with_title("Test Survey")
            .with_styles(false)
            .full_document(false)
            .with_class_prefix("my-form")
            .with_action("/submit")
            .with_live_url("/answers")
            .with_script(false);

        assert_eq!(options.title, Some("Test Survey".to_string()));
        assert!(!options.include_styles);
        assert!(!options.full_document);
        assert_eq!(options.class_prefix, "my-form");
        assert_eq!(options.action.as_deref(), Some("/submit"));
        assert_eq!(options.live_url.as_deref(), Some("/answers"));
        assert!(!options.include_script);
    }

    #[test]
    fn fresh_form_disables_submit_and_shows_hint() {
        let form = SurveyForm::new(definition());
        let html = render_form(&form, &HtmlOptions::new());

        assert!(html.contains("<h1 class=\"survey-title\">Feedback &amp; ideas</h1>"));
        assert!(html.contains("Two minutes."));
        assert!(html.contains("class=\"survey-submit\" disabled>Submit survey</button>"));
        assert!(html.contains("Please fix the highlighted fields."));
        assert!(html.find("Your name").unwrap() < html.find("Age").unwrap());
    }

    #[test]
    fn valid_form_enables_submit() {
        let mut form = SurveyForm::new(definition());
        form.on_change(&"name".into(), "Ada");
        let html = render_form(&form, &HtmlOptions::new());

        assert!(html.contains("class=\"survey-submit\">Submit survey</button>"));
        assert!(!html.contains("survey-hint"));
    }

    #[test]
    fn submitting_form_shows_progress_label() {
        let mut form = SurveyForm::new(definition());
        form.on_change(&"name".into(), "Ada");
        form.begin_submit().unwrap();

        let html = render_form(&form, &HtmlOptions::new());
        assert!(html.contains("disabled>Submitting…</button>"));
    }

    #[test]
    fn form_carries_urls() {
        let form = SurveyForm::new(definition());
        let options = HtmlOptions::new()
            .with_action("/sessions/a/submit")
            .with_live_url("/sessions/a/answers");
        let html = render_form(&form, &options);

        assert!(html.contains("action=\"/sessions/a/submit\""));
        assert!(html.contains("data-live=\"/sessions/a/answers\""));
    }

    #[tokio::test]
    async fn document_wraps_page_in_root() {
        let catalog = MemoryCatalog::new().with_survey(definition());
        let page = SurveyPage::load(&catalog).await;

        let html = render_document(&page, &HtmlOptions::new());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Feedback &amp; ideas</title>"));
        assert!(html.contains("<main id=\"survey-root\">"));
        assert!(html.contains("x-survey-fragment"));
    }

    #[tokio::test]
    async fn fragment_has_no_document_shell() {
        let catalog = MemoryCatalog::new().with_survey(definition());
        let page = SurveyPage::load(&catalog).await;

        let html = render_document(&page, &HtmlOptions::new().full_document(false));

        assert!(html.starts_with("<form"));
        assert!(!html.contains("<html"));
    }

    #[tokio::test]
    async fn error_page() {
        let page = SurveyPage::load(&MemoryCatalog::new()).await;
        let html = render_page(&page, &HtmlOptions::new());

        assert_eq!(
            html,
            "<p class=\"survey-page-error\" role=\"alert\">No survey found</p>\n"
        );
    }

    #[test]
    fn loading_page() {
        let html = render_page(&SurveyPage::new(), &HtmlOptions::new());
        assert!(html.contains("Loading…"));
    }

    #[test]
    fn escape() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
