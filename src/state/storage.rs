//! File-backed key/value store
//!
//! Values are opaque strings, like browser local storage. Every write goes
//! straight to disk; a failed write is logged and otherwise ignored. A missing
//! or unreadable file starts the store empty.

use super::slices::Persisted;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Wire shape of a persisted slice
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

pub struct LocalStore {
    path: Option<PathBuf>,
    entries: Mutex<IndexMap<String, String>>,
}

impl LocalStore {
    /// Open the store at `path`. Never fails; unreadable contents are dropped.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        debug!(path = %path.display(), entries = entries.len(), "Opened local store");

        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.into());
        self.flush(&entries);
    }

    pub fn remove_item(&self, key: &str) {
        let mut entries = self.lock();
        if entries.shift_remove(key).is_some() {
            self.flush(&entries);
        }
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.clear();
        self.flush(&entries);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every entry, in insertion order
    pub fn snapshot(&self) -> IndexMap<String, String> {
        self.lock().clone()
    }

    /// Read a slice; missing or corrupt data gives the default
    pub fn load<T: Persisted>(&self) -> T {
        let Some(raw) = self.get_item(T::KEY) else {
            return T::default();
        };

        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) => envelope.state,
            Err(e) => {
                warn!(key = T::KEY, error = %e, "Discarding unreadable persisted state");
                T::default()
            }
        }
    }

    /// Persist a slice under its key
    pub fn save<T: Persisted>(&self, state: &T) {
        let envelope = Envelope { state, version: 0 };
        match serde_json::to_string(&envelope) {
            Ok(raw) => self.set_item(T::KEY, raw),
            Err(e) => warn!(key = T::KEY, error = %e, "Failed to serialize state"),
        }
    }

    fn flush(&self, entries: &IndexMap<String, String>) {
        let Some(path) = &self.path else {
            return;
        };

        if let Err(e) = write_entries(path, entries) {
            warn!(path = %path.display(), error = %e, "Failed to write local store");
        }
    }
}

fn read_entries(path: &Path) -> IndexMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return IndexMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read local store");
            return IndexMap::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Local store is corrupt, starting empty");
        IndexMap::new()
    })
}

fn write_entries(path: &Path, entries: &IndexMap<String, String>) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
