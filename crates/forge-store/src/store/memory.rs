use std::collections::BTreeMap;

use forge_model::{ContentRecord, RecordId};

use super::{ContentStore, ListFilter, SortOrder, select};
use crate::error::{Result, StoreError};

/// In-process store, used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<RecordId, ContentRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn create(&mut self, record: &ContentRecord) -> Result<RecordId> {
        let id = record.id().clone();
        if self.records.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        self.records.insert(id.clone(), record.clone());
        Ok(id)
    }

    fn read(&self, id: &RecordId) -> Result<Option<ContentRecord>> {
        Ok(self.records.get(id).cloned())
    }

    fn update(&mut self, record: &ContentRecord) -> Result<RecordId> {
        let id = record.id().clone();
        match self.records.get_mut(&id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(id)
            }
            None => Err(StoreError::UnknownRecord(id)),
        }
    }

    fn delete(&mut self, id: &RecordId) -> Result<bool> {
        Ok(self.records.remove(id).is_some())
    }

    fn list(&self, filter: &ListFilter, sort: SortOrder) -> Result<Vec<ContentRecord>> {
        Ok(select(self.records.values().cloned(), filter, sort))
    }
}
