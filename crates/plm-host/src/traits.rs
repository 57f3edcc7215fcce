use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::HostError;
use crate::types::PluginMetadata;

/// Time-boxed key/value cache (the host's "transients").
///
/// A stored `Value::Null` is still a hit; only a missing or expired entry
/// yields `None`.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), HostError>;

    fn delete(&self, key: &str) -> Result<(), HostError>;
}

/// Durable string options.
pub trait OptionStore: Send + Sync {
    fn get_option(&self, name: &str) -> Option<String>;

    fn update_option(&self, name: &str, value: &str) -> Result<(), HostError>;

    fn delete_option(&self, name: &str) -> Result<(), HostError>;
}

pub trait PluginRegistry: Send + Sync {
    /// Path of `plugin_file` relative to the plugin directory, `/`-separated.
    fn plugin_basename(&self, plugin_file: &Path) -> String;

    fn plugin_data(&self, plugin_file: &Path) -> Option<PluginMetadata>;

    fn plugins_dir(&self) -> PathBuf;

    fn is_plugin_active(&self, slug: &str) -> bool;

    fn activate_plugin(&self, slug: &str) -> Result<(), HostError>;
}

pub trait FileMover: Send + Sync {
    /// Move the directory at `from` to `to`, replacing anything already there.
    fn move_dir(&self, from: &Path, to: &Path) -> Result<(), HostError>;
}

/// The host collaborators a license client works against.
#[derive(Clone)]
pub struct HostServices {
    pub cache: Arc<dyn CacheStore>,
    pub options: Arc<dyn OptionStore>,
    pub registry: Arc<dyn PluginRegistry>,
    pub files: Arc<dyn FileMover>,
}
