use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Integer key/value storage for user preferences.
///
/// A key that was never written reads as `0`.
pub trait ConfigStore {
    fn integer(&self, key: &str) -> Result<i64>;
    fn set_integer(&mut self, key: &str, value: i64) -> Result<()>;
}

/// Preferences kept as a flat JSON object on disk.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl JsonStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(data) if data.trim().is_empty() => BTreeMap::new(),
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                Error::msg(format!("invalid defaults file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(Error::msg(format!(
                    "failed to read defaults file {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        Ok(Self { path, values })
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(format!(
            "{}/.local/share/tomato-bar/defaults.json",
            std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        self.write_values().map_err(|e| {
            Error::msg(format!(
                "failed to write defaults file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_values(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl ConfigStore for JsonStore {
    fn integer(&self, key: &str) -> Result<i64> {
        Ok(self.values.get(key).copied().unwrap_or(0))
    }

    fn set_integer(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, i64>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: i64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
impl ConfigStore for MemoryStore {
    fn integer(&self, key: &str) -> Result<i64> {
        Ok(self.values.get(key).copied().unwrap_or(0))
    }

    fn set_integer(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
