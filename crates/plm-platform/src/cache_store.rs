use chrono::{DateTime, Utc};
use plm_host::{CacheStore, HostError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::atomic::write_atomic;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    value: Value,
    expires_at: DateTime<Utc>,
}

/// [`CacheStore`] keeping every entry in one JSON file.
///
/// Expired entries read as misses and are pruned on the next write.
pub struct FileCacheStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, CacheEntry> {
        let Ok(data) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&data).unwrap_or_else(|error| {
            log::warn!(
                "Ignoring corrupt cache file {}: {error}",
                self.path.display()
            );
            BTreeMap::new()
        })
    }

    fn save(&self, entries: &BTreeMap<String, CacheEntry>) -> Result<(), HostError> {
        let data = serde_json::to_vec(entries)
            .map_err(|error| HostError::serialization_from("cache entries", error))?;
        write_atomic(&self.path, &data)?;
        Ok(())
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Option<Value> {
        let entry = self.load().remove(key)?;
        (entry.expires_at > Utc::now()).then_some(entry.value)
    }

    fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), HostError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|error| HostError::storage("file cache", error.to_string()))?;
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| HostError::storage("file cache", "expiry out of range"))?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                expires_at,
            },
        );
        self.save(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), HostError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
