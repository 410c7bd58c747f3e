use crate::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// String-keyed JSON values, optionally mirrored to a file.
///
/// A file-backed store rewrites the whole file on every change. An unreadable
/// or corrupt file is logged and treated as empty.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    path: Option<PathBuf>,
    values: Map<String, Value>,
}

impl KeyValueStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading existing values
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Ignoring corrupt storage file {}: {}", path.display(), e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                warn!("Cannot read storage file {}: {}", path.display(), e);
                Map::new()
            }
        };

        debug!("Opened storage {} with {} keys", path.display(), values.len());
        Self {
            path: Some(path),
            values,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Decode the value under `key`; a value of the wrong shape reads as absent
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Stored value for {} has an unexpected shape: {}", key, e);
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        self.persist()
    }

    /// Remove `key`, returning its previous value
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        let previous = self.values.remove(key);
        if previous.is_some() {
            self.persist()?;
        }
        Ok(previous)
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}
