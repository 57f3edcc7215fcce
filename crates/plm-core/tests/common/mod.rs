//! In-memory host and transport fakes shared by the client tests.

#![allow(dead_code)]

use async_trait::async_trait;
use plm_core::{ClientConfig, Credentials, LicenseClient, Transport, TransportError};
use plm_host::{
    FileMover, HostError, HostServices, MemoryCacheStore, MemoryOptionStore, PluginMetadata,
    PluginRegistry,
};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const SLUG: &str = "my-plugin/my-plugin.php";
pub const API_URL: &str = "https://shop.example.com/";
pub const ACTIVATE_OPTION: &str = "my_plugin_license_activated";
pub const PLUGINS_DIR: &str = "/srv/site/plugins";

pub enum Reply {
    Body(String),
    Fail,
}

/// Replays queued replies and records every requested URL.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, Credentials)>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, body: serde_json::Value) {
        self.push_body(body.to_string());
    }

    pub fn push_body(&self, body: impl Into<String>) {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(Reply::Body(body.into()));
    }

    pub fn push_failure(&self) {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(Reply::Fail);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    pub fn last_credentials(&self) -> Option<Credentials> {
        self.calls
            .lock()
            .expect("calls lock")
            .last()
            .map(|(_, credentials)| credentials.clone())
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, credentials: &Credentials) -> Result<String, TransportError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((url.to_string(), credentials.clone()));

        match self.replies.lock().expect("replies lock").pop_front() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail) => Err(TransportError::Unavailable(
                "connection refused".to_string(),
            )),
            None => Ok(String::new()),
        }
    }
}

pub struct FakeRegistry {
    pub metadata: Mutex<Option<PluginMetadata>>,
    pub active: Mutex<HashSet<String>>,
    pub activations: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn with_version(version: &str) -> Arc<Self> {
        Arc::new(Self {
            metadata: Mutex::new(Some(PluginMetadata {
                name: "My Plugin".to_string(),
                author: "Fluidweb".to_string(),
                plugin_uri: "https://example.com/my-plugin".to_string(),
                version: version.to_string(),
            })),
            active: Mutex::new(HashSet::new()),
            activations: Mutex::new(Vec::new()),
        })
    }

    pub fn without_metadata() -> Arc<Self> {
        let registry = Self::with_version("1.0.0");
        *registry.metadata.lock().expect("metadata lock") = None;
        registry
    }

    pub fn mark_active(&self, slug: &str) {
        self.active
            .lock()
            .expect("active lock")
            .insert(slug.to_string());
    }

    pub fn activations(&self) -> Vec<String> {
        self.activations.lock().expect("activations lock").clone()
    }
}

impl PluginRegistry for FakeRegistry {
    fn plugin_basename(&self, plugin_file: &Path) -> String {
        plugin_file
            .strip_prefix(PLUGINS_DIR)
            .unwrap_or(plugin_file)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn plugin_data(&self, _plugin_file: &Path) -> Option<PluginMetadata> {
        self.metadata.lock().expect("metadata lock").clone()
    }

    fn plugins_dir(&self) -> PathBuf {
        PathBuf::from(PLUGINS_DIR)
    }

    fn is_plugin_active(&self, slug: &str) -> bool {
        self.active.lock().expect("active lock").contains(slug)
    }

    fn activate_plugin(&self, slug: &str) -> Result<(), HostError> {
        self.activations
            .lock()
            .expect("activations lock")
            .push(slug.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFileMover {
    pub moves: Mutex<Vec<(PathBuf, PathBuf)>>,
    pub fail: bool,
}

impl FileMover for FakeFileMover {
    fn move_dir(&self, from: &Path, to: &Path) -> Result<(), HostError> {
        if self.fail {
            return Err(HostError::move_failed(from, to, "permission denied"));
        }
        self.moves
            .lock()
            .expect("moves lock")
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }
}

pub struct Harness {
    pub client: LicenseClient,
    pub transport: Arc<FakeTransport>,
    pub cache: Arc<MemoryCacheStore>,
    pub options: Arc<MemoryOptionStore>,
    pub registry: Arc<FakeRegistry>,
    pub files: Arc<FakeFileMover>,
}

pub fn config(license_key: Option<&str>) -> ClientConfig {
    ClientConfig::new(
        Path::new(PLUGINS_DIR).join(SLUG),
        "42",
        API_URL,
        "ck_test",
        "cs_test",
        ACTIVATE_OPTION,
        license_key.map(str::to_string),
    )
}

pub fn harness(license_key: Option<&str>) -> Harness {
    harness_with(
        license_key,
        FakeRegistry::with_version("1.0.0"),
        FakeFileMover::default(),
    )
}

pub fn harness_with(
    license_key: Option<&str>,
    registry: Arc<FakeRegistry>,
    files: FakeFileMover,
) -> Harness {
    harness_for_config(config(license_key), registry, files)
}

pub fn harness_for_config(
    config: ClientConfig,
    registry: Arc<FakeRegistry>,
    files: FakeFileMover,
) -> Harness {
    let transport = FakeTransport::new();
    let cache = Arc::new(MemoryCacheStore::new());
    let options = Arc::new(MemoryOptionStore::new());
    let files = Arc::new(files);

    let host = HostServices {
        cache: cache.clone(),
        options: options.clone(),
        registry: registry.clone(),
        files: files.clone(),
    };
    let client = LicenseClient::new(config, transport.clone(), host);

    Harness {
        client,
        transport,
        cache,
        options,
        registry,
        files,
    }
}

pub fn release_json(version: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": {
            "version": version,
            "tested": "6.5",
            "package": "https://shop.example.com/download/{license_key}/my-plugin.zip",
            "requires": "6.0",
            "icons": { "1x": "https://cdn.example.com/icon-128.png" },
            "banners": { "low": "https://cdn.example.com/banner-772.png" },
            "sections": { "description": "<p>Does things.</p>", "changelog": "<p>Fixes.</p>" }
        }
    })
}
