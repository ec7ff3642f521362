use std::path::{Path, PathBuf};

use crate::error::{Result, RouteWiseError};

use super::{KeyValueStore, check_capacity, validate_key};

/// File-backed store: one file per key under a single directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    capacity: usize,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            dir: dir.into(),
            capacity,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read_text(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RouteWiseError::StorageError {
                operation: "read",
                key: key.to_string(),
                path,
                source: e,
            }),
        }
    }

    fn write_text(&self, key: &str, text: &str) -> Result<()> {
        let path = self.path_for(key)?;
        check_capacity(key, text, self.capacity)?;
        write_file_atomic(key, &path, text)
    }
}

/// Write via temp file and rename so readers never see a partial value.
fn write_file_atomic(key: &str, path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| RouteWiseError::StorageError {
            operation: "create directory for",
            key: key.to_string(),
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("json.tmp");

    std::fs::write(&temp_path, content).map_err(|e| RouteWiseError::StorageError {
        operation: "write",
        key: key.to_string(),
        path: temp_path.clone(),
        source: e,
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| RouteWiseError::StorageError {
        operation: "rename",
        key: key.to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}
