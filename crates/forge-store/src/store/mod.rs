//! Record storage keyed by id.

mod json_dir;
mod memory;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

use std::cmp::Ordering;

use forge_model::{ContentKind, ContentRecord, RecordId};

use crate::error::Result;

/// CRUD access to saved records.
///
/// `read` reports a missing record as `Ok(None)`; errors are reserved for
/// storage failures.
pub trait ContentStore {
    /// Persist a new record and return its id.
    fn create(&mut self, record: &ContentRecord) -> Result<RecordId>;

    fn read(&self, id: &RecordId) -> Result<Option<ContentRecord>>;

    /// Replace a stored record and return its id.
    fn update(&mut self, record: &ContentRecord) -> Result<RecordId>;

    /// Remove a record. Returns whether anything was removed.
    fn delete(&mut self, id: &RecordId) -> Result<bool>;

    fn list(&self, filter: &ListFilter, sort: SortOrder) -> Result<Vec<ContentRecord>>;
}

/// Restricts which records `list` returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub kind: Option<ContentKind>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
}

impl ListFilter {
    pub fn kind(kind: ContentKind) -> Self {
        Self {
            kind: Some(kind),
            name_contains: None,
        }
    }

    pub fn matches(&self, record: &ContentRecord) -> bool {
        if self.kind.is_some_and(|kind| kind != record.kind()) {
            return false;
        }
        match self.name_contains.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => record
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    NameAsc,
    NameDesc,
    #[default]
    UpdatedDesc,
    CreatedAsc,
}

impl SortOrder {
    /// Compare two records; ties fall back to the id so ordering is total.
    pub fn compare(self, a: &ContentRecord, b: &ContentRecord) -> Ordering {
        let primary = match self {
            SortOrder::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOrder::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
            SortOrder::UpdatedDesc => b.updated_at().cmp(&a.updated_at()),
            SortOrder::CreatedAsc => a.created_at().cmp(&b.created_at()),
        };
        primary.then_with(|| a.id().cmp(b.id()))
    }
}

/// Filter and sort an iterator of records.
pub(crate) fn select<I>(records: I, filter: &ListFilter, sort: SortOrder) -> Vec<ContentRecord>
where
    I: IntoIterator<Item = ContentRecord>,
{
    let mut selected: Vec<ContentRecord> = records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect();
    selected.sort_by(|a, b| sort.compare(a, b));
    selected
}
