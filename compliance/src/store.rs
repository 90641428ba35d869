//! Persistence port for the portfolio, policy and audit collections.
//!
//! Collections are stored as JSON text under a string key, mirroring the
//! browser storage layout the data was first kept in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ComplianceError, ComplianceResult};

/// Key of the passport collection.
pub const PORTFOLIO_KEY: &str = "spectral_portfolio_data";
/// Key of the policy collection.
pub const POLICIES_KEY: &str = "spectral_policies_data";
/// Key of the audit trail.
pub const AUDIT_KEY: &str = "spectral_audit_log";

/// Key/value text storage.
pub trait Store {
    /// Stored text for `key`, or `None` if nothing was ever saved.
    fn load(&self, key: &str) -> ComplianceResult<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> ComplianceResult<()>;
}

/// In-process store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> ComplianceResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> ComplianceResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per collection under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Store for FileStore {
    fn load(&self, key: &str) -> ComplianceResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ComplianceError::storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> ComplianceResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ComplianceError::storage(format!("failed to create {}: {}", self.dir.display(), e))
        })?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, value).map_err(|e| {
            ComplianceError::storage(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|e| {
            ComplianceError::storage(format!("failed to replace {}: {}", path.display(), e))
        })?;

        debug!(event = "collection_saved", key, path = %path.display(), bytes = value.len());
        Ok(())
    }
}

/// Load and decode a collection. `Ok(None)` when nothing is stored.
pub fn load_collection<T: DeserializeOwned>(
    store: &dyn Store,
    key: &str,
) -> ComplianceResult<Option<Vec<T>>> {
    match store.load(key)? {
        Some(text) => {
            let items = serde_json::from_str(&text).map_err(|e| {
                ComplianceError::serialization_error(format!("collection '{}' is corrupt: {}", key, e))
            })?;
            Ok(Some(items))
        }
        None => Ok(None),
    }
}

/// Encode and save a collection.
pub fn save_collection<T: Serialize>(
    store: &mut dyn Store,
    key: &str,
    items: &[T],
) -> ComplianceResult<()> {
    let text = serde_json::to_string(items)?;
    store.save(key, &text)
}
