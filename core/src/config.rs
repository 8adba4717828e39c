//! Connection settings shared read-only by every call.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Production endpoint of the Shortcut REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.app.shortcut.com/api/v3";

/// Header carrying the API token on every request.
pub const TOKEN_HEADER: &str = "Shortcut-Token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SHORTCUT_API_TOKEN is required but was empty")]
    MissingToken,

    #[error("invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("failed to initialise HTTP client: {0}")]
    HttpClient(String),
}

/// Base URL, token and optional request deadline.
///
/// Built once at process start and handed to a client; clients never mutate
/// it.
#[derive(Clone)]
pub struct Config {
    base_url: String,
    api_token: String,
    timeout: Option<Duration>,
}

impl Config {
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, ConfigError> {
        let api_token = api_token.trim();
        if api_token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: base_url.to_string(),
            api_token: api_token.to_string(),
            timeout: None,
        })
    }

    /// Config against the production API.
    pub fn with_token(api_token: &str) -> Result<Self, ConfigError> {
        Self::new(DEFAULT_BASE_URL, api_token)
    }

    /// Bound each request; expiry surfaces as a transport error.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
