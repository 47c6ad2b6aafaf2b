use survey_types::ResponseId;

/// Error type for catalog operations.
///
/// The `Display` text of every variant is suitable for showing to the user.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The surveys table has no row.
    #[error("No survey found")]
    NoSurvey,

    /// No response row has the requested id.
    #[error("Not found: response {0}")]
    ResponseNotFound(ResponseId),

    /// The response insert returned no row.
    #[error("Failed to create response")]
    CreateFailed,

    /// The table API rejected the request.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport or decoding failure.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The anon key cannot be sent as a header.
    #[error("Invalid API key header: {0}")]
    InvalidKey(#[from] reqwest::header::InvalidHeaderValue),

    /// The catalog cannot serve requests (used by in-memory catalogs to simulate outages).
    #[error("{0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
