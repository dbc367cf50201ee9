//! Filesystem helpers shared by the directory-backed store and export sinks.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Write `bytes` to `path` through a sibling temp file, fsync, then rename.
///
/// Readers never observe a partially written file. On failure the temp file
/// is removed and the error names the step that failed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AtomicWriteError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| AtomicWriteError {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = temp_path_for(path);
    let result = write_and_sync(&temp_path, bytes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|source| AtomicWriteError {
            operation: "rename",
            path: path.to_path_buf(),
            source,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_sync(temp_path: &Path, bytes: &[u8]) -> Result<(), AtomicWriteError> {
    let wrap = |operation: &'static str| {
        move |source: io::Error| AtomicWriteError {
            operation,
            path: temp_path.to_path_buf(),
            source,
        }
    };
    let mut file = File::create(temp_path).map_err(wrap("create"))?;
    file.write_all(bytes).map_err(wrap("write"))?;
    file.sync_all().map_err(wrap("sync"))?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Which step of an atomic write failed, and where.
#[derive(Debug, Error)]
#[error("failed to {operation} {path}")]
pub struct AtomicWriteError {
    pub operation: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_file_and_leaves_no_temp_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"{}");
        assert!(!dir.path().join("nested").join("out.json.tmp").exists());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.md");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
