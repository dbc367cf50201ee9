//! Structured JSON output, the exact-round-trip format.

use forge_model::ContentRecord;

use crate::error::{RenderError, Result};

/// Pretty-printed JSON with two-space indentation and a trailing newline.
pub fn render(record: &ContentRecord) -> Result<Vec<u8>> {
    let mut out =
        serde_json::to_vec_pretty(record).map_err(|error| RenderError::write("json", error))?;
    out.push(b'\n');
    Ok(out)
}

/// Parse bytes produced by [`render`] back into a record.
pub fn parse_structured(bytes: &[u8]) -> serde_json::Result<ContentRecord> {
    serde_json::from_slice(bytes)
}
