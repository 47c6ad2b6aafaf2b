use crate::{QuestionId, SurveyId};

/// A single question in a survey.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Key of this question's answer.
    id: QuestionId,

    /// The survey this question belongs to.
    survey_id: SurveyId,

    /// Position within the survey (ascending).
    order: i64,

    /// The prompt text shown to the user.
    title: String,

    /// Optional help text shown below the title.
    description: Option<String>,

    /// The kind of question (determines input control and validation rules).
    kind: QuestionKind,

    /// Whether an empty answer is rejected.
    required: bool,
}

impl Question {
    /// Create a new optional question.
    pub fn new(id: impl Into<QuestionId>, title: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            survey_id: SurveyId::new(""),
            order: 0,
            title: title.into(),
            description: None,
            kind,
            required: false,
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set whether the question is required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the position within the survey.
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Attach the question to a survey.
    pub fn in_survey(mut self, survey_id: impl Into<SurveyId>) -> Self {
        self.survey_id = survey_id.into();
        self
    }

    /// Get the question id.
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Get the id of the owning survey.
    pub fn survey_id(&self) -> &SurveyId {
        &self.survey_id
    }

    /// Get the position within the survey.
    pub fn order(&self) -> i64 {
        self.order
    }

    /// Get the prompt text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the help text.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Check if an answer is mandatory.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// The kind of question, determining the input control and validation rules.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Single-line free text.
    Text,

    /// A number in the accepted range.
    Number,

    /// Pick one option from a dropdown.
    Select(ChoiceQuestion),

    /// Pick one option from a set of radio buttons.
    Radio(ChoiceQuestion),

    /// A kind this version does not know about, holding the raw tag.
    ///
    /// Rendered as a bare label and never rejected by validation.
    Unknown(String),
}

impl QuestionKind {
    /// Build a kind from the `qtype` tag and `options` column of a question row.
    pub fn from_tag(tag: &str, options: Option<Vec<String>>) -> Self {
        let options = options.unwrap_or_default();
        match tag {
            "text" => Self::Text,
            "number" => Self::Number,
            "select" => Self::Select(ChoiceQuestion::new(options)),
            "radio" => Self::Radio(ChoiceQuestion::new(options)),
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The `qtype` tag of this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select(_) => "select",
            Self::Radio(_) => "radio",
            Self::Unknown(tag) => tag,
        }
    }

    /// The declared options of a choice question; empty for other kinds.
    pub fn options(&self) -> &[String] {
        match self {
            Self::Select(choice) | Self::Radio(choice) => choice.options(),
            Self::Text | Self::Number | Self::Unknown(_) => &[],
        }
    }

    /// Check if this is a select or radio question.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select(_) | Self::Radio(_))
    }
}

/// The option set of a select or radio question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceQuestion {
    /// Options in display order.
    pub options: Vec<String>,
}

impl ChoiceQuestion {
    /// Create a choice question with the given options.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the options.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Check if `value` is one of the declared options.
    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }
}
