use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use crate::error::TransportError;

const USER_AGENT: &str = concat!("plm/", env!("CARGO_PKG_VERSION"));

/// REST API consumer key and secret, sent as HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Outbound HTTP used by the license client.
///
/// Implementations return the response body whatever the HTTP status, so the
/// server's own error payloads reach the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, credentials: &Credentials) -> Result<String, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with its own connection pool.
    ///
    /// # Errors
    /// Returns an error when the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, credentials: &Credentials) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .basic_auth(&credentials.key, Some(&credentials.secret))
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("License server answered {status} for {url}");
        }

        response.text().await.map_err(TransportError::Body)
    }
}
