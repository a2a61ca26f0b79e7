//! Client configuration.
//!
//! # Responsibility
//! - Hold the knobs shared by the remote client and the sync controller.
//! - Validate values once, at construction, so consumers can trust them.
//!
//! # Invariants
//! - `base_url` is an absolute `http`/`https` URL usable as a path base.
//! - `notification_ttl` and `request_timeout` are non-zero.

use crate::notify::DEFAULT_NOTIFICATION_TTL;
use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How a new note's `important` flag is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportancePolicy {
    /// Every new note starts with this value.
    Fixed(bool),
    /// Uniform coin flip per note.
    Random,
}

impl Default for ImportancePolicy {
    fn default() -> Self {
        Self::Fixed(false)
    }
}

impl ImportancePolicy {
    /// Picks the flag for one new note.
    pub fn pick(self) -> bool {
        match self {
            Self::Fixed(value) => value,
            Self::Random => rand::random::<bool>(),
        }
    }

    /// Stable string form accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed(false) => "fixed-false",
            Self::Fixed(true) => "fixed-true",
            Self::Random => "random",
        }
    }
}

impl Display for ImportancePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportancePolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed-false" | "false" => Ok(Self::Fixed(false)),
            "fixed-true" | "true" => Ok(Self::Fixed(true)),
            "random" => Ok(Self::Random),
            other => Err(ConfigError::UnknownImportancePolicy(other.to_string())),
        }
    }
}

/// Configuration error raised while building `ClientConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBaseUrl { value: String, reason: String },
    ZeroDuration(&'static str),
    UnknownImportancePolicy(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl { value, reason } => {
                write!(f, "invalid base url `{value}`: {reason}")
            }
            Self::ZeroDuration(field) => write!(f, "`{field}` must be greater than zero"),
            Self::UnknownImportancePolicy(value) => write!(
                f,
                "unsupported importance policy `{value}`; expected fixed-false|fixed-true|random"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root; note endpoints live under `{base_url}/notes`.
    pub base_url: Url,
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
    /// Per-request timeout for remote calls.
    pub request_timeout: Duration,
    /// Importance flag policy for new notes.
    pub importance: ImportancePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base url"),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            importance: ImportancePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a config for `base_url` with every other field defaulted.
    ///
    /// # Errors
    /// - Returns `ConfigError::InvalidBaseUrl` when the value is not an
    ///   absolute `http`/`https` URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Result<Self, ConfigError> {
        if ttl.is_zero() {
            return Err(ConfigError::ZeroDuration("notification_ttl"));
        }
        self.notification_ttl = ttl;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("request_timeout"));
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    pub fn with_importance(mut self, importance: ImportancePolicy) -> Self {
        self.importance = importance;
        self
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let trimmed = value.trim();
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        value: trimmed.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(trimmed).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a path base"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, ConfigError, ImportancePolicy};
    use std::time::Duration;

    #[test]
    fn defaults_are_deterministic() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:3001/");
        assert_eq!(config.notification_ttl, Duration::from_millis(5000));
        assert_eq!(config.importance, ImportancePolicy::Fixed(false));
        assert!(!config.importance.pick());
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(ClientConfig::new("https://notes.example.com/api").is_ok());

        let err = ClientConfig::new("ftp://notes.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
        assert!(ClientConfig::new("not a url").is_err());
        assert!(ClientConfig::new("http://host/api?x=1").is_err());
    }

    #[test]
    fn zero_durations_are_rejected() {
        let err = ClientConfig::default()
            .with_notification_ttl(Duration::ZERO)
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroDuration("notification_ttl"));
        assert!(ClientConfig::default()
            .with_request_timeout(Duration::ZERO)
            .is_err());
    }

    #[test]
    fn importance_policy_parses_known_values() {
        assert_eq!(
            " Random ".parse::<ImportancePolicy>().unwrap(),
            ImportancePolicy::Random
        );
        assert_eq!(
            "true".parse::<ImportancePolicy>().unwrap(),
            ImportancePolicy::Fixed(true)
        );
        for policy in [
            ImportancePolicy::Fixed(false),
            ImportancePolicy::Fixed(true),
            ImportancePolicy::Random,
        ] {
            assert_eq!(policy.as_str().parse::<ImportancePolicy>().unwrap(), policy);
        }
        assert!("sometimes".parse::<ImportancePolicy>().is_err());
    }
}
