//! Remote record store abstraction
//!
//! This module defines the [`RecordStore`] trait: the contract the
//! synchronization layer expects from the remote document store. It lets
//! a hosted backend, a local file, or an in-memory fake sit behind the same
//! interface.
//!
//! Thread safety: all methods must be safe to call concurrently from
//! multiple threads (requires Send + Sync). Background writes run on their
//! own worker thread.

use crate::error::Result;
use crate::record::Document;

/// Per-collection document store keyed by string id
///
/// Transport failures are reported as
/// [`Error::RemoteUnavailable`](crate::Error::RemoteUnavailable).
pub trait RecordStore: Send + Sync {
    /// Read a record
    ///
    /// Returns `None` if no record exists under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create or replace a whole record
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn set(&self, collection: &str, id: &str, doc: Document) -> Result<()>;

    /// Replace a single field of an existing record, creating the field if absent
    ///
    /// Other fields are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`](crate::Error::RecordNotFound) if the
    /// record does not exist, or an error if the store cannot be reached.
    fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<()>;

    /// All records whose `field` equals `value`, with their ids
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<(String, Document)>>;
}
