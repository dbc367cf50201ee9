//! Export formats and the renderer dispatch.

use std::fmt;
use std::str::FromStr;

use forge_model::ContentRecord;
use thiserror::Error;

use crate::document::{ContentDocument, RenderOptions};
use crate::error::Result;
use crate::{html, json, markdown, pdf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportFormat {
    /// JSON, exactly invertible.
    Structured,
    /// CommonMark.
    Markup,
    /// Self-contained HTML.
    Hypertext,
    /// Paginated PDF.
    Document,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Structured,
        ExportFormat::Markup,
        ExportFormat::Hypertext,
        ExportFormat::Document,
    ];

    /// Identifier accepted on the command line and in settings.
    pub const fn id(self) -> &'static str {
        match self {
            ExportFormat::Structured => "structured",
            ExportFormat::Markup => "markup",
            ExportFormat::Hypertext => "hypertext",
            ExportFormat::Document => "document",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Structured => "json",
            ExportFormat::Markup => "md",
            ExportFormat::Hypertext => "html",
            ExportFormat::Document => "pdf",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Structured => "application/json",
            ExportFormat::Markup => "text/markdown; charset=utf-8",
            ExportFormat::Hypertext => "text/html; charset=utf-8",
            ExportFormat::Document => "application/pdf",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ExportFormat::Structured => "JSON data, re-importable",
            ExportFormat::Markup => "Markdown text",
            ExportFormat::Hypertext => "Standalone HTML page",
            ExportFormat::Document => "Printable A4 PDF",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Error)]
#[error("unknown export format `{0}` (expected structured, markup, hypertext, document or an extension)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('.');
        ExportFormat::ALL
            .into_iter()
            .find(|format| {
                format.id().eq_ignore_ascii_case(wanted)
                    || format.extension().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// Produce the bytes of one format. Every format rejects a record that lacks
/// a required field, including the structured one.
pub fn render(
    format: ExportFormat,
    record: &ContentRecord,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let document = ContentDocument::from_record(record, options)?;
    match format {
        ExportFormat::Structured => json::render(record),
        ExportFormat::Markup => Ok(markdown::render(&document)),
        ExportFormat::Hypertext => html::render(&document),
        ExportFormat::Document => pdf::render(&document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_extensions() {
        assert_eq!("markup".parse::<ExportFormat>().unwrap(), ExportFormat::Markup);
        assert_eq!(".PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Document);
        assert_eq!("html".parse::<ExportFormat>().unwrap(), ExportFormat::Hypertext);
        assert!("docx".parse::<ExportFormat>().is_err());
    }
}
