use plm_core::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub api_url: String,

    #[serde(default)]
    pub product_id: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_secret: String,

    #[serde(default)]
    pub license_key: Option<String>,

    #[serde(default)]
    pub plugin_file: PathBuf,

    #[serde(default)]
    pub plugins_dir: Option<PathBuf>,

    #[serde(default = "default_activate_option")]
    pub activate_option: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_activate_option() -> String {
    "plm_license_activated".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            product_id: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            license_key: None,
            plugin_file: PathBuf::new(),
            plugins_dir: None,
            activate_option: default_activate_option(),
            http_timeout_secs: default_http_timeout(),
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl AppSettings {
    /// Missing or unreadable settings fall back to defaults.
    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|error| {
                log::warn!("Ignoring invalid settings in {}: {error}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Names of required settings that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("api_url", self.api_url.is_empty()),
            ("product_id", self.product_id.is_empty()),
            ("api_key", self.api_key.is_empty()),
            ("api_secret", self.api_secret.is_empty()),
            ("plugin_file", self.plugin_file.as_os_str().is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }

    /// Configured plugin root, or the directory two levels above the main
    /// plugin file (`<plugins>/<plugin>/<plugin>.php`).
    pub fn plugins_dir(&self) -> PathBuf {
        if let Some(dir) = &self.plugins_dir {
            return dir.clone();
        }
        self.plugin_file
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.plugin_file.clone(),
            self.product_id.clone(),
            self.api_url.clone(),
            self.api_key.clone(),
            self.api_secret.clone(),
            self.activate_option.clone(),
            self.license_key.clone().filter(|key| !key.is_empty()),
        )
    }
}
