use log::{debug, info, warn};
use plm_host::HostServices;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ApiError, ApiResult};
use crate::release::{RELEASE_INFO_TTL, is_truthy, release_cache_key, scalar_to_string};
use crate::transport::{Credentials, Transport};

/// Value stored in the activation option once a key has been activated.
pub const ACTIVATED_VALUE: &str = "yes";

const API_NAMESPACE: &str = "wp-json/lmfwc/v2";

/// Identity of the plugin and how to reach its license server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub plugin_file: PathBuf,
    pub product_id: String,
    pub api_url: String,
    pub credentials: Credentials,
    pub activate_option: String,
    pub license_key: Option<String>,
}

impl ClientConfig {
    pub fn new(
        plugin_file: impl Into<PathBuf>,
        product_id: impl Into<String>,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        activate_option: impl Into<String>,
        license_key: Option<String>,
    ) -> Self {
        Self {
            plugin_file: plugin_file.into(),
            product_id: product_id.into(),
            api_url: api_url.into(),
            credentials: Credentials::new(api_key, api_secret),
            activate_option: activate_option.into(),
            license_key,
        }
    }

    fn endpoint(&self, route: &str) -> String {
        let base = self.api_url.trim_end_matches(['/', '\\']);
        format!("{base}/{API_NAMESPACE}/{route}")
    }
}

/// Talks to the license server on behalf of one plugin.
///
/// A client is scoped to a single host request: the first forced release
/// lookup it performs sets a flag that turns later forced lookups into
/// ordinary cached ones.
pub struct LicenseClient {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) host: HostServices,
    pub(crate) api_update_called: AtomicBool,
}

impl LicenseClient {
    /// Create a client. No I/O happens until an operation is invoked.
    #[must_use]
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, host: HostServices) -> Self {
        Self {
            config,
            transport,
            host,
            api_update_called: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn plugin_file(&self) -> &Path {
        &self.config.plugin_file
    }

    /// Plugin identifier used for cache keys and update entries.
    #[must_use]
    pub fn slug(&self) -> String {
        self.host.registry.plugin_basename(&self.config.plugin_file)
    }

    /// Whether the release endpoint has already been called by this client.
    #[must_use]
    pub fn api_update_called(&self) -> bool {
        self.api_update_called.load(Ordering::SeqCst)
    }

    /// Latest release information, served from the host cache when possible.
    ///
    /// `force_check` bypasses the cache only while this client has not yet
    /// called the release endpoint. The decoded body is cached for a day even
    /// when it reports a failure; an empty or undecodable body is `null`.
    pub async fn get_release_info(&self, force_check: bool) -> Value {
        let force_check = force_check && !self.api_update_called();
        let cache_key = release_cache_key(&self.slug());

        if !force_check
            && let Some(cached) = self.host.cache.get(&cache_key)
        {
            debug!("Using cached release info for {cache_key}");
            return cached;
        }

        let url = self
            .config
            .endpoint(&format!("products/update/{}", self.config.product_id));
        debug!("Fetching release info (forced: {force_check})");
        let body = self.call_api(&url).await;
        let response = decode_body(&body);

        self.api_update_called.store(true, Ordering::SeqCst);

        if let Err(error) = self.host.cache.set(&cache_key, &response, RELEASE_INFO_TTL) {
            warn!("Failed to cache release info for {cache_key}: {error}");
        }

        response
    }

    /// License details from the server, or its error payload verbatim.
    ///
    /// # Errors
    /// Returns a connection error when the server sent nothing back.
    pub async fn get_info(&self, license_key: Option<&str>) -> ApiResult {
        let license_key = self.resolve_license_key(license_key).unwrap_or_default();
        self.lookup(&format!("licenses/{license_key}")).await
    }

    /// Server-side validation of a license key.
    ///
    /// # Errors
    /// Returns a connection error when the server sent nothing back.
    pub async fn validate(&self, license_key: Option<&str>) -> ApiResult {
        let license_key = self.resolve_license_key(license_key).unwrap_or_default();
        self.lookup(&format!("licenses/validate/{license_key}"))
            .await
    }

    /// Activate a license key and record the activation locally.
    ///
    /// # Errors
    /// Returns `missing_license_key` without contacting the server when no
    /// key is available, the server's code and message when it refused the
    /// activation, and a connection error otherwise.
    pub async fn activate(&self, license_key: Option<&str>) -> ApiResult {
        let Some(license_key) = self.resolve_license_key(license_key) else {
            return Err(ApiError::missing_license_key());
        };

        let url = self
            .config
            .endpoint(&format!("licenses/activate/{license_key}"));
        let body = self.call_api(&url).await;

        if !body.is_empty() {
            let data = decode_body(&body);

            if let Some(object) = data.as_object() {
                if object.get("success").is_some_and(is_truthy) {
                    if let Err(error) = self
                        .host
                        .options
                        .update_option(&self.config.activate_option, ACTIVATED_VALUE)
                    {
                        warn!(
                            "Failed to persist activation option {}: {error}",
                            self.config.activate_option
                        );
                    }
                    info!("License activated for {}", self.slug());
                    return Ok(data);
                }

                if let Some(message) = object
                    .get("message")
                    .filter(|message| is_truthy(message))
                {
                    let message = scalar_to_string(message).unwrap_or_else(|| message.to_string());
                    let code = object
                        .get("code")
                        .filter(|code| !code.is_null())
                        .map(|code| scalar_to_string(code).unwrap_or_else(|| code.to_string()));
                    debug!("License server refused activation: {message}");
                    return Err(ApiError::server(code, message));
                }
            }
        }

        Err(ApiError::connection(&self.config.api_url))
    }

    /// Whether the activation option records a successful activation.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.host
            .options
            .get_option(&self.config.activate_option)
            .is_some_and(|value| value == ACTIVATED_VALUE)
    }

    fn resolve_license_key(&self, license_key: Option<&str>) -> Option<String> {
        license_key
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.config
                    .license_key
                    .clone()
                    .filter(|key| !key.is_empty())
            })
    }

    async fn lookup(&self, route: &str) -> ApiResult {
        let body = self.call_api(&self.config.endpoint(route)).await;
        if body.is_empty() {
            return Err(ApiError::connection(&self.config.api_url));
        }
        Ok(decode_body(&body))
    }

    /// Transport failures collapse into an empty body; callers cannot tell
    /// them apart from a server that answered with nothing.
    async fn call_api(&self, url: &str) -> String {
        match self.transport.get(url, &self.config.credentials).await {
            Ok(body) => body,
            Err(error) => {
                warn!("License server call failed: {error}");
                String::new()
            }
        }
    }
}

fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|error| {
        debug!("License server sent undecodable JSON: {error}");
        Value::Null
    })
}
