//! SUT endpoint configuration.
//!
//! A [`SutConfig`] is built once (from the environment, the CLI, or code)
//! and handed to [`crate::client::SutClient`]. It is never global.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the SUT's JSON-RPC endpoint URL.
pub const ENV_SUT_URL: &str = "SUT_URL";

/// Environment variable holding the request timeout in seconds.
pub const ENV_SUT_TIMEOUT_SECS: &str = "SUT_TIMEOUT_SECS";

/// Environment variable holding an optional bearer token.
pub const ENV_SUT_AUTH_TOKEN: &str = "SUT_AUTH_TOKEN";

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SutConfig {
    /// JSON-RPC endpoint requests are POSTed to.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra HTTP headers sent with every request.
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("SUT_URL is required and must not be empty")]
    MissingSutUrl,
    #[error("SUT URL must be an absolute http(s) URL, got '{0}'")]
    InvalidSutUrl(String),
    #[error("SUT_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
    #[error("invalid header '{0}'")]
    InvalidHeader(String),
}

impl SutConfig {
    /// Creates a config for `url` with the default timeout and no headers.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        validate_url(&url)?;
        Ok(Self {
            url,
            timeout: DEFAULT_TIMEOUT,
            headers: HashMap::new(),
        })
    }

    /// Reads `SUT_URL`, `SUT_TIMEOUT_SECS` and `SUT_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SutConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let url = non_empty(ENV_SUT_URL).ok_or(ConfigError::MissingSutUrl)?;
        let mut config = Self::new(url)?;

        if let Some(raw) = non_empty(ENV_SUT_TIMEOUT_SECS) {
            config.timeout = parse_timeout_secs(&raw)?;
        }
        if let Some(token) = non_empty(ENV_SUT_AUTH_TOKEN) {
            config = config.with_bearer_token(token);
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Adds an `Authorization: Bearer <token>` header.
    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        let value = format!("Bearer {}", token.into());
        self.with_header("Authorization", value)
    }

    /// Scheme, host and port of [`SutConfig::url`], without a trailing slash.
    ///
    /// Agent cards are served from well-known paths relative to this origin.
    pub fn origin(&self) -> String {
        match reqwest::Url::parse(&self.url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.url.trim_end_matches('/').to_string(),
        }
    }
}

/// Parses a timeout given in whole seconds.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    let parsed =
        reqwest::Url::parse(url).map_err(|_| ConfigError::InvalidSutUrl(url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(()),
        _ => Err(ConfigError::InvalidSutUrl(url.to_string())),
    }
}
