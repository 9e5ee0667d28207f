use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Small string key/value store persisted as a YAML map.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("reading session storage {:?}", self.path))?;
        if s.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let map: BTreeMap<String, String> = serde_yaml::from_str(&s)
            .with_context(|| format!("parsing session storage {:?}", self.path))?;
        Ok(map)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {parent:?}"))?;
            }
        }
        let s = serde_yaml::to_string(map).context("serializing session storage")?;
        fs::write(&self.path, s).with_context(|| format!("writing {:?}", self.path))?;
        Ok(())
    }

    /// Missing or unreadable storage reads as absent; the error is logged.
    pub fn get_item(&self, key: &str) -> Option<String> {
        match self.read_map() {
            Ok(map) => map.get(key).cloned(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "session storage unreadable");
                None
            }
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        let mut map = self.read_map().unwrap_or_default();
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
