//! Native file-backed store
//!
//! All keys live in one JSON object. Writes go to a sibling `.tmp` file that
//! is renamed over the real one, so a crash mid-write leaves the old values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// File name under the data directory
const FILE_NAME: &str = "progress.json";

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Default location: `<data dir>/star-collector/progress.json`
    pub fn default_path() -> Result<PathBuf, StoreError> {
        dirs::data_dir()
            .map(|d| d.join("star-collector").join(FILE_NAME))
            .ok_or_else(|| StoreError::Unavailable("no data directory".to_string()))
    }

    /// Open (or lazily create) a store at `path`. A file that is not a JSON
    /// object of strings is treated as empty so defaults apply.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let bytes = fs::read(&path)?;
            match serde_json::from_slice(&bytes) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring corrupt save at {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        log::info!("Progress store at {} ({} keys)", path.display(), values.len());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
