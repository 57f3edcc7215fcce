use plm_host::{HostError, OptionStore, PluginMetadata, PluginRegistry};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Option holding the JSON array of active plugin slugs.
pub const ACTIVE_PLUGINS_OPTION: &str = "active_plugins";

/// Headers are only looked for near the top of the main plugin file.
const HEADER_READ_LIMIT: u64 = 8 * 1024;

/// [`PluginRegistry`] over a plugin directory on disk.
pub struct FsPluginRegistry {
    plugins_dir: PathBuf,
    options: Arc<dyn OptionStore>,
}

impl FsPluginRegistry {
    pub fn new(plugins_dir: impl Into<PathBuf>, options: Arc<dyn OptionStore>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
            options,
        }
    }

    fn active_plugins(&self) -> Vec<String> {
        self.options
            .get_option(ACTIVE_PLUGINS_OPTION)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }
}

impl PluginRegistry for FsPluginRegistry {
    fn plugin_basename(&self, plugin_file: &Path) -> String {
        let relative = plugin_file
            .strip_prefix(&self.plugins_dir)
            .unwrap_or(plugin_file);
        relative
            .to_string_lossy()
            .replace('\\', "/")
            .trim_start_matches('/')
            .to_string()
    }

    fn plugin_data(&self, plugin_file: &Path) -> Option<PluginMetadata> {
        let path = if plugin_file.is_absolute() {
            plugin_file.to_path_buf()
        } else {
            self.plugins_dir.join(plugin_file)
        };

        let mut header = String::new();
        let file = std::fs::File::open(&path)
            .inspect_err(|error| log::debug!("Cannot read {}: {error}", path.display()))
            .ok()?;
        file.take(HEADER_READ_LIMIT)
            .read_to_string(&mut header)
            .ok()?;

        parse_plugin_header(&header)
    }

    fn plugins_dir(&self) -> PathBuf {
        self.plugins_dir.clone()
    }

    fn is_plugin_active(&self, slug: &str) -> bool {
        self.active_plugins().iter().any(|active| active == slug)
    }

    fn activate_plugin(&self, slug: &str) -> Result<(), HostError> {
        if !self.plugins_dir.join(slug).is_file() {
            return Err(HostError::PluginNotFound {
                slug: slug.to_string(),
            });
        }

        let mut active = self.active_plugins();
        if active.iter().any(|existing| existing == slug) {
            return Ok(());
        }
        active.push(slug.to_string());
        active.sort();

        let raw = serde_json::to_string(&active)
            .map_err(|error| HostError::serialization_from("active plugins", error))?;
        self.options.update_option(ACTIVE_PLUGINS_OPTION, &raw)
    }
}

/// Read `Name: value` header lines from a plugin's leading comment block.
///
/// Returns `None` when the file declares no plugin name.
pub fn parse_plugin_header(source: &str) -> Option<PluginMetadata> {
    let mut metadata = PluginMetadata::default();

    for line in source.lines() {
        let line = line.trim_start();
        let line = line.strip_prefix("<?php").unwrap_or(line);
        let line = line.trim_start_matches([' ', '\t', '/', '*', '#', '@']);
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_end_matches("*/").trim().to_string();

        let slot = match name.trim().to_ascii_lowercase().as_str() {
            "plugin name" => &mut metadata.name,
            "plugin uri" => &mut metadata.plugin_uri,
            "version" => &mut metadata.version,
            "author" => &mut metadata.author,
            _ => continue,
        };
        if slot.is_empty() {
            *slot = value;
        }
    }

    (!metadata.name.is_empty()).then_some(metadata)
}
