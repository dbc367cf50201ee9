//! Export coordination: render, name, check for cancellation, write.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};
use thiserror::Error;

use forge_model::ContentRecord;

use crate::document::RenderOptions;
use crate::error::RenderError;
use crate::filename::artifact_filename;
use crate::format::{ExportFormat, render};
use crate::sink::{ArtifactSink, SinkError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Encoding(#[from] RenderError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("export cancelled")]
    Cancelled,
    #[error("export task failed: {0}")]
    Task(String),
}

/// Shared flag an export checks before committing its write.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What to export and how to name it.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: ExportFormat,
    /// User-supplied stem; the default stem is used when absent or blank.
    pub stem: Option<String>,
    pub options: RenderOptions,
}

impl ExportRequest {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            stem: None,
            options: RenderOptions::default(),
        }
    }

    #[must_use]
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = Some(stem.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn filename(&self, record: &ContentRecord) -> String {
        artifact_filename(record, self.format, self.stem.as_deref())
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the artifact.
    pub sha256: String,
}

/// Renders records and hands the artifacts to a sink.
#[derive(Debug, Clone)]
pub struct ExportCoordinator<S> {
    sink: S,
}

impl<S: ArtifactSink> ExportCoordinator<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn export(
        &self,
        record: &ContentRecord,
        request: &ExportRequest,
    ) -> Result<ExportReport, ExportError> {
        self.export_with_cancel(record, request, &CancelFlag::new())
    }

    /// Export, giving up without writing anything if `cancel` is raised
    /// before the sink write starts.
    pub fn export_with_cancel(
        &self,
        record: &ContentRecord,
        request: &ExportRequest,
        cancel: &CancelFlag,
    ) -> Result<ExportReport, ExportError> {
        let result = self.run(record, request, cancel);
        match &result {
            Ok(report) => tracing::info!(
                id = %record.id(),
                file = %report.filename,
                format = %report.format,
                bytes = report.bytes,
                "export complete"
            ),
            Err(ExportError::Cancelled) => {
                tracing::info!(id = %record.id(), format = %request.format, "export cancelled");
            }
            Err(error) => tracing::warn!(
                id = %record.id(),
                format = %request.format,
                error = %error,
                "export failed"
            ),
        }
        result
    }

    fn run(
        &self,
        record: &ContentRecord,
        request: &ExportRequest,
        cancel: &CancelFlag,
    ) -> Result<ExportReport, ExportError> {
        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        let bytes = render(request.format, record, &request.options)?;
        let filename = request.filename(record);
        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        self.sink.write(&filename, &bytes)?;
        Ok(ExportReport {
            filename,
            format: request.format,
            bytes: bytes.len(),
            sha256: hex::encode(Sha256::digest(&bytes)),
        })
    }
}

impl<S> ExportCoordinator<S>
where
    S: ArtifactSink + Clone + Send + Sync + 'static,
{
    /// Run the export on the blocking pool. Rendering and the write both
    /// happen off the async executor.
    pub async fn export_async(
        &self,
        record: ContentRecord,
        request: ExportRequest,
        cancel: CancelFlag,
    ) -> Result<ExportReport, ExportError> {
        let coordinator = self.clone();
        tokio::task::spawn_blocking(move || {
            coordinator.export_with_cancel(&record, &request, &cancel)
        })
        .await
        .map_err(|error| ExportError::Task(error.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use forge_model::ContentKind;

    use super::*;
    use crate::sink::MemorySink;

    fn sorcerer() -> ContentRecord {
        ContentRecord::new(ContentKind::Class).with_name("Storm Sorcerer")
    }

    #[test]
    fn reports_digest_of_written_bytes() {
        let coordinator = ExportCoordinator::new(MemorySink::new());
        let report = coordinator
            .export(&sorcerer(), &ExportRequest::new(ExportFormat::Markup))
            .unwrap();
        assert_eq!(report.filename, "dnd-class-storm-sorcerer.md");
        let written = coordinator.sink().get(&report.filename).unwrap();
        assert_eq!(report.bytes, written.len());
        assert_eq!(report.sha256, hex::encode(Sha256::digest(&written)));
        assert_eq!(report.sha256.len(), 64);
    }

    #[test]
    fn cancelled_export_writes_nothing() {
        let coordinator = ExportCoordinator::new(MemorySink::new());
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = coordinator
            .export_with_cancel(
                &sorcerer(),
                &ExportRequest::new(ExportFormat::Document),
                &cancel,
            )
            .unwrap_err();
        assert!(matches!(err, ExportError::Cancelled));
        assert!(coordinator.sink().is_empty());
    }
}
