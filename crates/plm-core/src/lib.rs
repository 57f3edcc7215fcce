//! License activation and self-hosted updates for a plugin sold through
//! License Manager for WooCommerce.
//!
//! This crate provides:
//! - [`LicenseClient`]: license lookup, validation and activation against the
//!   `lmfwc/v2` REST API, plus the cached latest-release lookup.
//! - [`UpdateHooks`]: the adapters the host's plugin-update pipeline calls.
//! - [`Transport`] with a `reqwest` implementation.
//! - Release payload helpers and version comparison.

mod client;
mod error;
mod hooks;
mod release;
mod transport;
mod version;

/// License client and its immutable configuration.
pub use client::{ACTIVATED_VALUE, ClientConfig, LicenseClient};
/// Error object returned to the host UI, and transport failures.
pub use error::{
    ApiError, ApiResult, GENERIC_ERROR, MISSING_LICENSE_KEY, REST_CONNECTION_ERROR,
    TransportError,
};
/// Host update-pipeline adapters and hook names.
pub use hooks::{
    FORCE_CHECK_PARAM, HOOK_PLUGINS_API, HOOK_POST_INSTALL, HOOK_UPDATE_TRANSIENT,
    HookRegistration, PLUGIN_INFORMATION_ACTION, RequestContext, UpdateHooks,
};
/// Views and constants for the cached release payload.
pub use release::{
    LICENSE_KEY_PLACEHOLDER, RELEASE_INFO_TTL, ReleaseData, is_truthy, release_cache_key,
};
pub use transport::{Credentials, ReqwestTransport, Transport};
pub use version::is_newer_version;
