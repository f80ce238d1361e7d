//! Preference sync engine for prefsync
//!
//! This crate connects preference trees to a remote record store:
//! - PreferenceStore: load with fallback and repair, save, accounts, patients
//! - PreferenceSession: one user's live tree, the single toggle entry point
//! - WriteQueue: single-worker FIFO for background writes
//! - PrefsConfig: `prefsync.toml` settings
//!
//! The engine never decides who is signed in. Callers pass the identity.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod background;
pub mod config;
pub mod session;
pub mod store;

pub use background::{QueueError, QueueStats, WriteQueue};
pub use config::{PrefsConfig, CONFIG_FILE_NAME, DEFAULT_MAX_PENDING_WRITES};
pub use session::PreferenceSession;
pub use store::{LoadOutcome, PreferenceStore};
