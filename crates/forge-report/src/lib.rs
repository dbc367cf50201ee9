//! Rendering and export of content records.
//!
//! A record is first laid out as a [`ContentDocument`] (fixed section order,
//! empty sections omitted), then written in one of four formats:
//!
//! - **structured**: pretty JSON, parses back to an equal record
//! - **markup**: CommonMark
//! - **hypertext**: standalone HTML with embedded styling
//! - **document**: paginated A4 PDF
//!
//! [`ExportCoordinator`] derives the filename, renders, and writes through an
//! [`ArtifactSink`]. Nothing is written when rendering fails or the export is
//! cancelled.

mod document;
mod error;
mod export;
mod filename;
mod format;
pub mod html;
pub mod json;
pub mod markdown;
pub mod pdf;
mod sink;

pub use document::{AbilityNames, Block, ContentDocument, NONE, RenderOptions, Section};
pub use error::{RenderError, Result};
pub use export::{CancelFlag, ExportCoordinator, ExportError, ExportReport, ExportRequest};
pub use filename::{STEM_PREFIX, UNTITLED, artifact_filename, default_stem, slug};
pub use format::{ExportFormat, UnknownFormat, render};
pub use json::parse_structured;
pub use sink::{ArtifactSink, DirectorySink, MemorySink, SinkError};
