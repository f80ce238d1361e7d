//! Core types and traits for prefsync
//!
//! This crate defines the foundational types used throughout the system:
//! - PreferenceNode: Leaf(bool) or Group of named children
//! - PreferenceTree: One user's preference set (a root group)
//! - NodePath: Key sequence locating a node from the root
//! - apply_toggle: Path-addressed, cascading, copy-on-write mutation
//! - Rows: Flattened tri-state checkbox rows for a UI
//! - Records: Remote account record model (UserId, Role, Document)
//! - Error: Error type hierarchy
//! - Traits: RecordStore, the remote document store contract
//!
//! Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod defaults;
pub mod error;
pub mod node;
pub mod path;
pub mod record;
pub mod rows;
pub mod traits;
pub mod tree;

pub use error::{Error, Result, StructuralError};
pub use node::{Children, PreferenceNode, TriState, MAX_NESTING_DEPTH};
pub use path::{NodePath, PathParseError};
pub use record::{
    Document, PatientSummary, Role, UserAccountRecord, UserId, ACCOUNT_COLLECTION, ROLE_FIELD,
    TREE_FIELD,
};
pub use rows::{humanize_key, renderable_rows, visible_rows, RenderableRow};
pub use traits::RecordStore;
pub use tree::{apply_toggle, PreferenceTree};
