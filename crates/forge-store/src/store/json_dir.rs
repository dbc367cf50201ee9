use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use forge_model::{ContentRecord, RecordId};

use super::{ContentStore, ListFilter, SortOrder, select};
use crate::error::{Result, StoreError};
use crate::fs::write_atomic;

const RECORD_EXTENSION: &str = "json";

/// One pretty-printed `<id>.json` file per record inside a directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            operation: "create directory",
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &RecordId) -> Result<PathBuf> {
        let safe = id
            .as_str()
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !safe {
            return Err(StoreError::InvalidId(id.clone()));
        }
        Ok(self.root.join(format!("{id}.{RECORD_EXTENSION}")))
    }

    fn write_record(&self, path: &Path, record: &ContentRecord) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(record).map_err(|source| StoreError::Serialization {
                id: record.id().clone(),
                source,
            })?;
        write_atomic(path, &bytes).map_err(|error| StoreError::Io {
            operation: error.operation,
            path: error.path,
            source: error.source,
        })?;
        tracing::debug!(id = %record.id(), path = %path.display(), "stored record");
        Ok(())
    }

    fn load(path: &Path) -> Result<Option<ContentRecord>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl ContentStore for JsonDirStore {
    fn create(&mut self, record: &ContentRecord) -> Result<RecordId> {
        let path = self.path_for(record.id())?;
        if path.exists() {
            return Err(StoreError::AlreadyExists(record.id().clone()));
        }
        self.write_record(&path, record)?;
        Ok(record.id().clone())
    }

    fn read(&self, id: &RecordId) -> Result<Option<ContentRecord>> {
        Self::load(&self.path_for(id)?)
    }

    fn update(&mut self, record: &ContentRecord) -> Result<RecordId> {
        let path = self.path_for(record.id())?;
        if !path.exists() {
            return Err(StoreError::UnknownRecord(record.id().clone()));
        }
        self.write_record(&path, record)?;
        Ok(record.id().clone())
    }

    fn delete(&mut self, id: &RecordId) -> Result<bool> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                operation: "delete",
                path,
                source,
            }),
        }
    }

    fn list(&self, filter: &ListFilter, sort: SortOrder) -> Result<Vec<ContentRecord>> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            operation: "list",
            path: self.root.clone(),
            source,
        })?;
        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                operation: "list",
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(OsStr::to_str) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(record) = Self::load(&path)? {
                records.push(record);
            }
        }
        Ok(select(records, filter, sort))
    }
}
