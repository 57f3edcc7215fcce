use plm_host::{HostError, OptionStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::atomic::write_atomic;

/// [`OptionStore`] backed by a JSON object of string values.
pub struct FileOptionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileOptionStore {
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

    fn load(&self) -> BTreeMap<String, String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    fn modify(
        &self,
        edit: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), HostError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut options = self.load();
        if !edit(&mut options) {
            return Ok(());
        }
        let data = serde_json::to_vec_pretty(&options)
            .map_err(|error| HostError::serialization_from("options", error))?;
        write_atomic(&self.path, &data)?;
        Ok(())
    }
}

impl OptionStore for FileOptionStore {
    fn get_option(&self, name: &str) -> Option<String> {
        self.load().remove(name)
    }

    fn update_option(&self, name: &str, value: &str) -> Result<(), HostError> {
        self.modify(|options| {
            options.insert(name.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn delete_option(&self, name: &str) -> Result<(), HostError> {
        self.modify(|options| options.remove(name).is_some())
    }
}
