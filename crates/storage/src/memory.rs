//! MemoryRecordStore: in-process record store
//!
//! This module implements the RecordStore trait using:
//! - `BTreeMap<collection, BTreeMap<id, Document>>` for ordered storage
//! - `parking_lot::RwLock` for thread-safe access
//! - An append-only write log so callers can check exactly what was written
//! - An availability switch that makes every call fail as if the remote
//!   backend were unreachable
//!
//! # Design Notes
//!
//! - **Last write wins**: writes replace whatever is stored, no versions
//! - **Field updates need the record**: `update_field` on a missing record
//!   fails with `RecordNotFound`, matching hosted document stores
//! - **Failed calls are not logged**: the write log only holds writes that
//!   reached storage

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use prefsync_core::{Document, Error, RecordStore, Result};

/// Kind of a logged write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteKind {
    /// Whole record created or replaced
    Set(Document),
    /// Single field replaced
    UpdateField {
        /// Field name
        field: String,
        /// New field value
        value: serde_json::Value,
    },
}

/// A write that reached storage
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    /// Position in the log, starting at 1
    pub sequence: u64,
    /// Target collection
    pub collection: String,
    /// Target record id
    pub id: String,
    /// What was written
    pub kind: WriteKind,
}

impl WriteRecord {
    /// Value written to `field`, whether by a field update or a whole-record set
    pub fn field_value(&self, field: &str) -> Option<&serde_json::Value> {
        match &self.kind {
            WriteKind::Set(doc) => doc.get(field),
            WriteKind::UpdateField { field: f, value } if f == field => Some(value),
            WriteKind::UpdateField { .. } => None,
        }
    }
}

/// In-memory record store
///
/// Thread-safe through `parking_lot::RwLock` and atomics.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    /// collection → id → document
    data: RwLock<BTreeMap<String, BTreeMap<String, Document>>>,
    /// Every successful write, in order
    log: RwLock<Vec<WriteRecord>>,
    /// Monotonic write counter
    sequence: AtomicU64,
    /// When set, every call fails with `RemoteUnavailable`
    unavailable: AtomicBool,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing availability and the write log
    pub fn seed(&self, collection: &str, id: &str, doc: Document) {
        self.data
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
    }

    /// Simulate the backend going away (`true`) or coming back (`false`)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Release);
    }

    /// Whether calls currently fail
    pub fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::Acquire)
    }

    /// Snapshot of the write log
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.log.read().clone()
    }

    /// Logged writes against one record
    pub fn writes_to(&self, collection: &str, id: &str) -> Vec<WriteRecord> {
        self.log
            .read()
            .iter()
            .filter(|w| w.collection == collection && w.id == id)
            .cloned()
            .collect()
    }

    /// Number of logged writes
    pub fn write_count(&self) -> usize {
        self.log.read().len()
    }

    /// Number of records in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.data.read().get(collection).map_or(0, BTreeMap::len)
    }

    /// Whether a collection has no records
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn check_available(&self) -> Result<()> {
        if self.is_unavailable() {
            Err(Error::remote("record store is unreachable"))
        } else {
            Ok(())
        }
    }

    /// Callers hold the data write lock, so log order matches data order.
    fn append_log(&self, collection: &str, id: &str, kind: WriteKind) {
        let mut log = self.log.write();
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        log.push(WriteRecord {
            sequence,
            collection: collection.to_string(),
            id: id.to_string(),
            kind,
        });
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.check_available()?;
        let data = self.data.read();
        Ok(data.get(collection).and_then(|records| records.get(id)).cloned())
    }

    fn set(&self, collection: &str, id: &str, doc: Document) -> Result<()> {
        self.check_available()?;
        let mut data = self.data.write();
        data.entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc.clone());
        self.append_log(collection, id, WriteKind::Set(doc));
        drop(data);
        debug!(collection, id, "record set");
        Ok(())
    }

    fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        self.check_available()?;
        let mut data = self.data.write();
        let doc = data
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| Error::record_not_found(collection, id))?;
        doc.insert(field.to_string(), value.clone());
        self.append_log(
            collection,
            id,
            WriteKind::UpdateField {
                field: field.to_string(),
                value,
            },
        );
        drop(data);
        debug!(collection, id, field, "record field updated");
        Ok(())
    }

    fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<(String, Document)>> {
        self.check_available()?;
        let data = self.data.read();
        Ok(data
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|(_, doc)| doc.get(field) == Some(value))
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
