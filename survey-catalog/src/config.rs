use std::fmt;

use reqwest::Url;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Error type for catalog configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

/// Where the table API lives and how to authenticate against it.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Project base URL; table endpoints live under `/rest/v1/`.
    pub url: Url,
    /// Public API key, sent as both `apikey` and bearer token.
    pub anon_key: String,
}

impl CatalogConfig {
    pub fn new(url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            url,
            anon_key: anon_key.into(),
        }
    }

    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY` from the environment.
    ///
    /// Fails if either is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`CatalogConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let raw_url = required(URL_VAR)?;
        let anon_key = required(KEY_VAR)?;
        let url = Url::parse(&raw_url).map_err(|_| ConfigError::InvalidUrl {
            name: URL_VAR,
            value: raw_url,
        })?;

        Ok(Self { url, anon_key })
    }
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"<redacted>")
            .finish()
    }
}
