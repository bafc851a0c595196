use crate::domain::{DomainError, DomainResult, KeyValueStore};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// File-backed key-value storage, one JSON file per key.
///
/// Values are written to a temporary sibling and renamed into place so a
/// reader never observes a half-written key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Undecodable bytes are a data problem, not an I/O one.
            Err(e) if e.kind() == ErrorKind::InvalidData => Ok(Some(String::new())),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> DomainResult<()> {
        fs::create_dir_all(&self.root)?;
        let target = self.path_for(key);
        let staging = self.root.join(format!(".{}.json.tmp", key));

        fs::write(&staging, value)?;
        fs::rename(&staging, &target).map_err(|e| {
            let _ = fs::remove_file(&staging);
            DomainError::Storage(format!("{}: {}", target.display(), e))
        })
    }
}

/// In-process storage with an optional per-value size limit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    quota: Option<usize>,
    writes: usize,
}

impl MemoryStorage {
    /// Rejects any value longer than `bytes`, like a full browser store.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> DomainResult<()> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(DomainError::Storage(format!(
                    "quota exceeded: {} bytes requested, {} allowed",
                    value.len(),
                    quota
                )));
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
