//! Configuration for the Plantsitter API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend URL (local API server)
const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Language used for fallback error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English messages
    #[default]
    English,
    /// French messages, matching the web front end
    French,
}

impl Locale {
    /// Parse a language tag such as `fr`, `fr-FR` or `english`
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let lang = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match lang.as_str() {
            "en" | "english" => Some(Self::English),
            "fr" | "french" | "francais" | "français" => Some(Self::French),
            _ => None,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API
    pub base_url: String,
    /// Optional request timeout; by default the transport decides
    #[serde(default, with = "opt_secs")]
    pub timeout: Option<Duration>,
    /// Language of fallback error messages
    #[serde(default)]
    pub locale: Locale,
    /// Fail authenticated calls locally when no token is stored
    #[serde(default)]
    pub require_token: bool,
    /// Session file for a durable token store; `None` keeps the token in memory
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

mod opt_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
            locale: Locale::default(),
            require_token: false,
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at the given backend
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `PLANTSITTER_API_URL`: Base URL of the backend
    /// - `PLANTSITTER_TIMEOUT_SECS`: Request timeout in seconds (optional)
    /// - `PLANTSITTER_LOCALE`: Fallback message language (`en`/`fr`)
    /// - `PLANTSITTER_REQUIRE_TOKEN`: `1`/`true` to fail fast without a token
    /// - `PLANTSITTER_SESSION_FILE`: Session file path (defaults to the user data dir)
    pub fn from_env() -> ApiResult<Self> {
        let base_url = env::var("PLANTSITTER_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout = match env::var("PLANTSITTER_TIMEOUT_SECS") {
            Ok(raw) => Some(raw.trim().parse().map(Duration::from_secs).map_err(|_| {
                ApiError::config(format!("PLANTSITTER_TIMEOUT_SECS is not a number: {raw}"))
            })?),
            Err(_) => None,
        };

        let locale = env::var("PLANTSITTER_LOCALE")
            .ok()
            .and_then(|tag| Locale::parse(&tag))
            .unwrap_or_default();

        let require_token = env::var("PLANTSITTER_REQUIRE_TOKEN")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let session_file = env::var("PLANTSITTER_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::session::FileTokenStore::default_path());

        let config = Self {
            base_url,
            timeout,
            locale,
            require_token,
            session_file: Some(session_file),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create development configuration (local API server, in-memory session)
    #[must_use]
    pub fn development() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Some(Duration::from_secs(10)),
            ..Self::default()
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builder-style method to set the fallback message language
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Builder-style method to fail fast when no token is stored
    #[must_use]
    pub fn with_require_token(mut self, require: bool) -> Self {
        self.require_token = require;
        self
    }

    /// Builder-style method to persist the session in a file
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "base_url must start with http:// or https://: {}",
                self.base_url
            )));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
