use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Header fields the host reports for an installed plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    pub author: String,
    pub plugin_uri: String,
    pub version: String,
}

/// The host's record of which installed plugins have updates available.
///
/// `response` is `None` when the host's own update check failed; adapters
/// leave such a transient untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransient {
    #[serde(default)]
    pub last_checked: Option<i64>,
    #[serde(default)]
    pub checked: BTreeMap<String, String>,
    #[serde(default)]
    pub response: Option<BTreeMap<String, PluginUpdate>>,
}

impl UpdateTransient {
    /// A transient from a successful host check that found no updates yet.
    #[must_use]
    pub fn empty_response() -> Self {
        Self {
            response: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn update_for(&self, slug: &str) -> Option<&PluginUpdate> {
        self.response.as_ref()?.get(slug)
    }
}

/// Update descriptor inserted into [`UpdateTransient::response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginUpdate {
    pub slug: String,
    pub new_version: String,
    #[serde(default)]
    pub tested: Option<String>,
    #[serde(default)]
    pub url: String,
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Map<String, Value>>,
}

/// Loosely-typed "more details" object rendered by the host's plugin dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginInfo(Map<String, Value>);

impl PluginInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for PluginInfo {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Arguments of a host plugin-information request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginInfoArgs {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginInfoArgs {
    #[must_use]
    pub fn for_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            extra: Map::new(),
        }
    }
}

/// Extra metadata the host's installer attaches to post-install callbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookExtra {
    #[serde(default)]
    pub plugin: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Outcome of the host extracting a downloaded package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallResult {
    #[serde(default)]
    pub source: PathBuf,
    #[serde(default)]
    pub source_files: Vec<String>,
    pub destination: PathBuf,
    #[serde(default)]
    pub destination_name: String,
    #[serde(default)]
    pub clear_destination: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{InstallResult, PluginInfo, PluginInfoArgs, UpdateTransient};

    #[test]
    fn transient_without_response_deserializes_to_none() {
        let transient: UpdateTransient =
            serde_json::from_value(json!({ "last_checked": 1_700_000_000 }))
                .expect("transient should deserialize");
        assert!(transient.response.is_none());
        assert_eq!(transient.last_checked, Some(1_700_000_000));
    }

    #[test]
    fn empty_response_has_no_updates() {
        let transient = UpdateTransient::empty_response();
        assert!(transient.response.is_some());
        assert!(transient.update_for("my-plugin/my-plugin.php").is_none());
    }

    #[test]
    fn plugin_info_serializes_as_plain_object() {
        let mut info = PluginInfo::new();
        info.insert("slug", "my-plugin/my-plugin.php");
        info.insert("version", "1.2.0");

        let value = serde_json::to_value(&info).expect("plugin info should serialize");
        assert_eq!(
            value,
            json!({ "slug": "my-plugin/my-plugin.php", "version": "1.2.0" })
        );
        assert_eq!(info.get_str("version"), Some("1.2.0"));
    }

    #[test]
    fn plugin_info_args_keep_unknown_fields() {
        let args: PluginInfoArgs = serde_json::from_value(json!({
            "slug": "my-plugin/my-plugin.php",
            "locale": "en_US"
        }))
        .expect("args should deserialize");

        assert_eq!(args.slug.as_deref(), Some("my-plugin/my-plugin.php"));
        assert_eq!(args.extra.get("locale"), Some(&json!("en_US")));
    }

    #[test]
    fn install_result_only_requires_destination() {
        let result: InstallResult =
            serde_json::from_value(json!({ "destination": "/tmp/upgrade/pkg" }))
                .expect("install result should deserialize");
        assert_eq!(result.destination, std::path::PathBuf::from("/tmp/upgrade/pkg"));
        assert!(result.source_files.is_empty());
    }
}
