//! prefsync - hierarchical boolean preference trees with remote sync
//!
//! A preference tree is a nested map whose leaves are booleans. Toggling any
//! node sets every leaf beneath it; groups show checked, unchecked or mixed.
//! Each user's tree lives in one field of their remote account record.
//!
//! # Quick Start
//!
//! ```
//! use prefsync::{MemoryRecordStore, NodePath, PreferenceSession, PreferenceStore, UserId};
//! use std::sync::Arc;
//!
//! let records = Arc::new(MemoryRecordStore::new());
//! let store = Arc::new(PreferenceStore::with_defaults(records));
//!
//! let user = UserId::new("user-1").unwrap();
//! store.initialize_account(&user, None, Some("pat@example.com"), Some("Pat"));
//!
//! let mut session = PreferenceSession::open(Arc::clone(&store), Some(user));
//! let push: NodePath = "settings.notifications.push".parse().unwrap();
//! session.toggle(&push, true).unwrap();
//! session.flush();
//!
//! assert!(session.tree().resolve(&push).unwrap().is_checked());
//! ```
//!
//! # Architecture
//!
//! - `prefsync-core`: tree model, toggle, codec, rows, record model
//! - `prefsync-storage`: record store backends
//! - `prefsync-engine`: store, session, write queue, config

pub use prefsync_core::*;
pub use prefsync_engine::*;
pub use prefsync_storage::{MemoryRecordStore, WriteKind, WriteRecord};
