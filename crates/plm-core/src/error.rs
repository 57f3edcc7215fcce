use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MISSING_LICENSE_KEY: &str = "missing_license_key";
pub const REST_CONNECTION_ERROR: &str = "rest_connection_error";
pub const GENERIC_ERROR: &str = "generic_error";

/// Error object handed back to the host UI, which renders `message` as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Outcome of a license server call: the decoded payload or an error object.
pub type ApiResult = Result<serde_json::Value, ApiError>;

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn missing_license_key() -> Self {
        Self::new(
            MISSING_LICENSE_KEY,
            "Missing the license key. Please provide a valid license key and try again.",
        )
    }

    #[must_use]
    pub fn connection(api_url: &str) -> Self {
        Self::new(
            REST_CONNECTION_ERROR,
            format!("Couldn't connect to the license server ({api_url}). Try again later."),
        )
    }

    /// Wrap a server-reported failure, keeping its code when it sent one.
    pub fn server(code: Option<String>, message: impl Into<String>) -> Self {
        Self::new(
            code.unwrap_or_else(|| GENERIC_ERROR.to_string()),
            message,
        )
    }

    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        self.code == REST_CONNECTION_ERROR
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("license server request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("failed to read license server response: {0}")]
    Body(#[source] reqwest::Error),
    #[error("license server unavailable: {0}")]
    Unavailable(String),
}
