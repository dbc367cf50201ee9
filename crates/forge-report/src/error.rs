use std::fmt::Display;

use thiserror::Error;

use forge_model::ContentKind;

/// Failure to turn a record into an artifact.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The record lacks a field its kind cannot be rendered without.
    #[error("cannot render {}: required field `{field}` is missing", .kind.tag())]
    MissingField {
        kind: ContentKind,
        field: &'static str,
    },
    /// A character the format's fonts have no glyph for.
    #[error("{format} output cannot encode {ch:?} ({}) in {text:?}", code_point(.ch))]
    Unencodable {
        format: &'static str,
        ch: char,
        text: String,
    },
    #[error("failed to write {format} output: {message}")]
    Write {
        format: &'static str,
        message: String,
    },
}

impl RenderError {
    pub(crate) fn write(format: &'static str, error: impl Display) -> Self {
        RenderError::Write {
            format,
            message: error.to_string(),
        }
    }
}

fn code_point(ch: &char) -> String {
    format!("U+{:04X}", u32::from(*ch))
}

pub type Result<T> = std::result::Result<T, RenderError>;
