use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub const PORT_VAR: &str = "PORT";
pub const SESSION_TTL_VAR: &str = "SESSION_TTL_SECS";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// Settings of the web host itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Sessions idle for longer than this are dropped.
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl ServerConfig {
    /// Read `PORT` and `SESSION_TTL_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: try_load(&lookup, PORT_VAR, DEFAULT_PORT),
            session_ttl: Duration::from_secs(try_load(
                &lookup,
                SESSION_TTL_VAR,
                DEFAULT_SESSION_TTL_SECS,
            )),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
    }

    #[test]
    fn reads_values() {
        let config = ServerConfig::from_lookup(|key| match key {
            PORT_VAR => Some("8080".into()),
            SESSION_TTL_VAR => Some(" 60 ".into()),
            _ => None,
        });
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_ttl, Duration::from_secs(60));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(|key| match key {
            PORT_VAR => Some("70000".into()),
            SESSION_TTL_VAR => Some("soon".into()),
            _ => None,
        });
        assert_eq!(config, ServerConfig::default());
    }
}
