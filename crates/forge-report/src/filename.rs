//! Artifact filename derivation.

use forge_model::ContentRecord;

use crate::format::ExportFormat;

/// Prefix shared by every default stem.
pub const STEM_PREFIX: &str = "dnd";

/// Stem used when a name yields nothing usable.
pub const UNTITLED: &str = "untitled";

/// Lowercase `name` and collapse whitespace runs into single hyphens.
/// Path separators and characters most filesystems reject are dropped.
pub fn slug(name: &str) -> String {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|ch| !matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();
    words.join("-").trim_matches(['-', '.']).to_string()
}

/// `dnd-<kind>-<slug>`, or `dnd-<kind>-untitled` for an unusable name.
pub fn default_stem(record: &ContentRecord) -> String {
    let slug = slug(&record.name);
    let slug = if slug.is_empty() { UNTITLED } else { &slug };
    format!("{STEM_PREFIX}-{}-{slug}", record.kind().tag())
}

/// Final filename for an export. A user stem is trimmed but otherwise kept
/// as typed; an extension the user already typed is not added twice.
pub fn artifact_filename(
    record: &ContentRecord,
    format: ExportFormat,
    stem: Option<&str>,
) -> String {
    let stem = stem
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .map_or_else(|| default_stem(record), str::to_string);
    let extension = format.extension();
    let has_extension = stem
        .rsplit_once('.')
        .is_some_and(|(base, ext)| !base.is_empty() && ext.eq_ignore_ascii_case(extension));
    if has_extension {
        stem
    } else {
        format!("{stem}.{extension}")
    }
}
