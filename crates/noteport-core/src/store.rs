//! Record store abstraction
//!
//! The import pipeline writes through [`RecordStore`], an async seam over
//! whatever structured store hosts the collection. [`MemoryRecordStore`] is
//! the in-process implementation used by the CLI and by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use noteport_parser::Block;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::coerce::FieldValue;
use crate::error::{StoreError, StoreResult};

/// Opaque record identifier assigned by the store
pub type RecordId = String;

/// Minimal view of an existing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub id: RecordId,
    pub title: String,
}

/// Structured record store
///
/// Implementations must be `Send + Sync`; the import session holds the store
/// across await points.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records currently in the collection
    async fn list_records(&self) -> StoreResult<Vec<RecordSummary>>;

    /// Create an empty record and return its id
    async fn create_record(&self, title: &str) -> StoreResult<RecordId>;

    /// Set one field, replacing any previous value
    async fn set_property(&self, record: &str, field_id: &str, value: FieldValue) -> StoreResult<()>;

    /// Append content blocks after the record's existing blocks
    async fn append_blocks(&self, record: &str, blocks: &[Block]) -> StoreResult<()>;

    /// Remove every content block of a record
    async fn clear_blocks(&self, record: &str) -> StoreResult<()>;
}

/// Blanket implementation of RecordStore for Arc<T>
#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for std::sync::Arc<T> {
    async fn list_records(&self) -> StoreResult<Vec<RecordSummary>> {
        (**self).list_records().await
    }

    async fn create_record(&self, title: &str) -> StoreResult<RecordId> {
        (**self).create_record(title).await
    }

    async fn set_property(&self, record: &str, field_id: &str, value: FieldValue) -> StoreResult<()> {
        (**self).set_property(record, field_id, value).await
    }

    async fn append_blocks(&self, record: &str, blocks: &[Block]) -> StoreResult<()> {
        (**self).append_blocks(record, blocks).await
    }

    async fn clear_blocks(&self, record: &str) -> StoreResult<()> {
        (**self).clear_blocks(record).await
    }
}

/// A record held by [`MemoryRecordStore`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub title: String,
    pub properties: BTreeMap<String, FieldValue>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<StoredRecord>,
    next_id: usize,
}

impl MemoryState {
    fn record_mut(&mut self, id: &str) -> StoreResult<&mut StoredRecord> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found(id))
    }
}

/// In-memory record store with sequential ids (`rec-0001`, `rec-0002`, ...)
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    state: Mutex<MemoryState>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in creation order
    pub async fn snapshot(&self) -> Vec<StoredRecord> {
        self.state.lock().await.records.clone()
    }

    pub async fn record(&self, id: &str) -> Option<StoredRecord> {
        self.state
            .lock()
            .await
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_records(&self) -> StoreResult<Vec<RecordSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .records
            .iter()
            .map(|r| RecordSummary {
                id: r.id.clone(),
                title: r.title.clone(),
            })
            .collect())
    }

    async fn create_record(&self, title: &str) -> StoreResult<RecordId> {
        if title.trim().is_empty() {
            return Err(StoreError::rejected("record title must not be empty"));
        }

        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = format!("rec-{:04}", state.next_id);
        state.records.push(StoredRecord {
            id: id.clone(),
            title: title.to_string(),
            properties: BTreeMap::new(),
            blocks: Vec::new(),
        });
        Ok(id)
    }

    async fn set_property(&self, record: &str, field_id: &str, value: FieldValue) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state
            .record_mut(record)?
            .properties
            .insert(field_id.to_string(), value);
        Ok(())
    }

    async fn append_blocks(&self, record: &str, blocks: &[Block]) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.record_mut(record)?.blocks.extend_from_slice(blocks);
        Ok(())
    }

    async fn clear_blocks(&self, record: &str) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.record_mut(record)?.blocks.clear();
        Ok(())
    }
}
