//! Read-only view over the raw "latest release" payload.
//!
//! The payload is cached exactly as the server sent it, so it is kept as a
//! `serde_json::Value` and inspected through [`ReleaseData`] on demand.

use serde_json::{Map, Value};
use std::time::Duration;

/// How long a release-info response stays in the host cache.
pub const RELEASE_INFO_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Placeholder in the package URL template that receives the license key.
pub const LICENSE_KEY_PLACEHOLDER: &str = "{license_key}";

/// Cache key of the release-info entry for `slug`.
#[must_use]
pub fn release_cache_key(slug: &str) -> String {
    format!("{slug}_plugin_info")
}

/// Loose truthiness of a decoded JSON value.
///
/// `null`, `false`, `0`, `""`, `"0"` and `[]` are falsy; every object is
/// truthy, empty or not.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty() && text != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Render a scalar JSON value as text, as the host does for header fields.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        _ => None,
    }
}

/// The `data` object of a successful release-info response.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseData<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> ReleaseData<'a> {
    /// Returns `None` unless the response has a truthy `success` and an
    /// object-valued `data`.
    #[must_use]
    pub fn from_response(response: &'a Value) -> Option<Self> {
        let object = response.as_object()?;
        if !object.get("success").is_some_and(is_truthy) {
            return None;
        }
        let fields = object.get("data")?.as_object()?;
        Some(Self { fields })
    }

    #[must_use]
    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }

    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.fields.get("version").and_then(scalar_to_string)
    }

    #[must_use]
    pub fn tested(&self) -> Option<String> {
        self.fields.get("tested").and_then(scalar_to_string)
    }

    /// Download URL template, possibly containing [`LICENSE_KEY_PLACEHOLDER`].
    #[must_use]
    pub fn package_template(&self) -> Option<&'a str> {
        self.fields.get("package").and_then(Value::as_str)
    }

    /// Download URL with every license-key placeholder filled in.
    #[must_use]
    pub fn package_url(&self, license_key: &str) -> String {
        self.package_template()
            .unwrap_or_default()
            .replace(LICENSE_KEY_PLACEHOLDER, license_key)
    }

    /// A key-to-value map field such as `icons`, `banners` or `sections`,
    /// if present and non-empty.
    #[must_use]
    pub fn map(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.fields
            .get(key)
            .and_then(Value::as_object)
            .filter(|map| !map.is_empty())
    }
}
