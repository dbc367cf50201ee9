//! Destinations for rendered artifacts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use forge_store::fs::write_atomic;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{0}` is not a plain file name")]
    InvalidFilename(String),
    #[error("artifact sink is unavailable: {0}")]
    Unavailable(String),
}

/// Receives finished artifacts. Implementations must never expose a partly
/// written artifact.
pub trait ArtifactSink {
    fn write(&self, filename: &str, bytes: &[u8]) -> Result<(), SinkError>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &S {
    fn write(&self, filename: &str, bytes: &[u8]) -> Result<(), SinkError> {
        (**self).write(filename, bytes)
    }
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for Arc<S> {
    fn write(&self, filename: &str, bytes: &[u8]) -> Result<(), SinkError> {
        (**self).write(filename, bytes)
    }
}

fn check_filename(filename: &str) -> Result<(), SinkError> {
    let plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\', '\0']);
    if plain {
        Ok(())
    } else {
        Err(SinkError::InvalidFilename(filename.to_string()))
    }
}

/// Writes artifacts into one directory through a temp file and rename.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&self, filename: &str, bytes: &[u8]) -> Result<(), SinkError> {
        check_filename(filename)?;
        let path = self.dir.join(filename);
        write_atomic(&path, bytes).map_err(|error| SinkError::Io {
            operation: error.operation,
            path: error.path,
            source: error.source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
        Ok(())
    }
}

/// Keeps artifacts in memory, keyed by filename.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.artifacts
            .lock()
            .ok()
            .and_then(|artifacts| artifacts.get(filename).cloned())
    }

    pub fn filenames(&self) -> Vec<String> {
        self.artifacts
            .lock()
            .map(|artifacts| artifacts.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames().is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&self, filename: &str, bytes: &[u8]) -> Result<(), SinkError> {
        check_filename(filename)?;
        let mut artifacts = self
            .artifacts
            .lock()
            .map_err(|_| SinkError::Unavailable("memory sink lock poisoned".to_string()))?;
        artifacts.insert(filename.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn directory_sink_writes_into_its_directory() {
        let dir = tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("exports"));
        sink.write("dnd-race-elf.md", b"# Elf\n").unwrap();
        let written = std::fs::read(dir.path().join("exports").join("dnd-race-elf.md")).unwrap();
        assert_eq!(written, b"# Elf\n");
    }

    #[test]
    fn rejects_path_like_names() {
        let sink = MemorySink::new();
        for name in ["", "..", "../escape.md", "a/b.md", "a\\b.md"] {
            assert!(matches!(
                sink.write(name, b"x"),
                Err(SinkError::InvalidFilename(_))
            ));
        }
        assert!(sink.is_empty());
    }
}
