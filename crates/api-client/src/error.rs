//! Error types for the API client

use crate::session::StoreError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Reading an upload from disk failed
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Token store failure
    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),

    /// Authenticated call attempted without a stored token
    #[error("Not authenticated: no session token stored")]
    NotAuthenticated,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// API returned an error response.
    ///
    /// Displays as the bare message: the backend `detail` when present, the
    /// JSON parse error for a non-JSON body, otherwise the operation's
    /// fallback text.
    #[error("{message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the failed response, if the backend answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// Check if the backend rejected the session (401/403) or none was held
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::NotAuthenticated => true,
            Self::ApiResponse { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }
}

/// Uniform result envelope handed to UI code.
///
/// Exactly one of `data` and `error` is set, and `success` says which.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Payload on success
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_data"
    )]
    pub data: Option<T>,
    /// Human-readable failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Convert back into a `Result`, trusting `success` over the payload fields
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("missing data in successful response".to_string()),
            (false, _) => Err(self.error.unwrap_or_default()),
        }
    }
}

/// Decode a `data` field that is present in the payload.
///
/// Unit-like payloads serialize as `null`, so a present `null` is kept as
/// `Some` whenever `T` itself accepts it. Otherwise it reads as `None`.
fn present_data<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(T::deserialize(serde_json::Value::Null).ok()),
        value => T::deserialize(value).map(Some).map_err(D::Error::custom),
    }
}

impl<T> From<ApiResult<T>> for ApiResponse<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}
