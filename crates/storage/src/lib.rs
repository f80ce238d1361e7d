//! Record store backends for prefsync
//!
//! This crate implements the RecordStore trait from prefsync-core:
//! - MemoryRecordStore: in-process store with a write log and an
//!   availability switch, used by tests and by embedders without a
//!   hosted backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;

pub use memory::{MemoryRecordStore, WriteKind, WriteRecord};
