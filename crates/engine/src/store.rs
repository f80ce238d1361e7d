//! PreferenceStore: mirrors preference trees into remote account records
//!
//! ## Design: EXPLICIT CONTEXT
//!
//! The store holds the record backend, the config, and the background write
//! queue. It has no notion of a "current user": every call takes the
//! identity it acts for, `None` meaning nobody is signed in.
//!
//! ## Failure Model
//!
//! - **Reads degrade**: `load` returns the default tree whenever the user's
//!   own tree cannot be produced, and reports why only in logs.
//! - **Writes are best effort**: `save` makes one attempt and reports
//!   success as a bool. Nothing is retried or rolled back.
//! - **Repair is fire-and-forget**: a record without the tree field gets
//!   the default tree written into it on the write queue. Its outcome is
//!   only logged.
//!
//! ## Concurrency
//!
//! No optimistic locking. Two sessions for one user overwrite each other and
//! the last write to land wins.

use crate::background::WriteQueue;
use crate::config::PrefsConfig;
use prefsync_core::{
    Document, Error, PatientSummary, PreferenceTree, RecordStore, Result, Role, UserAccountRecord,
    UserId, ROLE_FIELD,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Name shown when a patient record has no name.
const FALLBACK_PATIENT_NAME: &str = "Patient";

/// Name stored when an account is created without one.
const FALLBACK_ACCOUNT_NAME: &str = "User";

/// What was found in the remote record
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The record holds a tree
    Loaded(PreferenceTree),
    /// No record exists for the user
    RecordAbsent,
    /// The record exists but has no tree field (or it is null)
    FieldMissing,
}

/// Synchronizes preference trees with per-user remote records
pub struct PreferenceStore {
    records: Arc<dyn RecordStore>,
    config: PrefsConfig,
    queue: WriteQueue,
}

/// Everything a queued write needs, detached from the store
///
/// Background jobs own one of these instead of the store, so the store is
/// never dropped on the writer thread.
struct TreeWriter {
    records: Arc<dyn RecordStore>,
    collection: String,
    field: String,
    user: UserId,
}

impl TreeWriter {
    fn write(&self, value: serde_json::Value) -> Result<()> {
        self.records
            .update_field(&self.collection, self.user.as_str(), &self.field, value)?;
        debug!(user_id = %self.user, field = %self.field, "preference tree written");
        Ok(())
    }
}

impl PreferenceStore {
    /// Create a store over `records`
    ///
    /// # Errors
    ///
    /// Returns [`prefsync_core::Error::InvalidConfig`] if `config` does not
    /// validate.
    pub fn new(records: Arc<dyn RecordStore>, config: PrefsConfig) -> Result<Self> {
        config.validate()?;
        let queue = WriteQueue::new(config.max_pending_writes);
        Ok(Self {
            records,
            config,
            queue,
        })
    }

    /// Create a store with the default config
    pub fn with_defaults(records: Arc<dyn RecordStore>) -> Self {
        let config = PrefsConfig::default();
        let queue = WriteQueue::new(config.max_pending_writes);
        Self {
            records,
            config,
            queue,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &PrefsConfig {
        &self.config
    }

    /// The background write queue
    pub fn queue(&self) -> &WriteQueue {
        &self.queue
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Load the tree for `identity`, falling back to the default tree
    ///
    /// - not signed in: default tree, no remote access
    /// - no record: default tree, nothing written
    /// - record without the tree field: default tree, plus a background
    ///   repair write (unless disabled in config)
    /// - record with a tree: that tree, even if its shape differs from the
    ///   default
    /// - unreachable store or undecodable tree: default tree
    pub fn load(&self, identity: Option<&UserId>) -> PreferenceTree {
        let Some(user) = identity else {
            debug!("no authenticated identity, using default preferences");
            return PreferenceTree::default_tree();
        };

        match self.fetch(user) {
            Ok(LoadOutcome::Loaded(tree)) => {
                if !tree.same_shape(&PreferenceTree::default_tree()) {
                    debug!(user_id = %user, "stored preference tree differs in shape from the default");
                }
                tree
            }
            Ok(LoadOutcome::RecordAbsent) => {
                warn!(user_id = %user, collection = %self.config.collection, "user account record not found");
                PreferenceTree::default_tree()
            }
            Ok(LoadOutcome::FieldMissing) => {
                warn!(
                    user_id = %user,
                    field = %self.config.tree_field,
                    "preference field missing from user account"
                );
                if self.config.repair_missing_field {
                    self.spawn_repair(user);
                }
                PreferenceTree::default_tree()
            }
            Err(e) => {
                error!(user_id = %user, error = %e, "failed to load preferences");
                PreferenceTree::default_tree()
            }
        }
    }

    /// Read the remote record and classify it
    ///
    /// No fallback and no repair: this is the raw outcome `load` builds on.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or the stored tree
    /// cannot be decoded.
    pub fn fetch(&self, user: &UserId) -> Result<LoadOutcome> {
        let Some(mut doc) = self.records.get(&self.config.collection, user.as_str())? else {
            return Ok(LoadOutcome::RecordAbsent);
        };
        match doc.remove(&self.config.tree_field) {
            None | Some(serde_json::Value::Null) => Ok(LoadOutcome::FieldMissing),
            Some(value) => Ok(LoadOutcome::Loaded(PreferenceTree::decode(value)?)),
        }
    }

    /// Queue the default tree to be written into `user`'s record
    ///
    /// Runs once on the write queue. Failures, including a full queue, are
    /// logged and otherwise ignored.
    pub fn spawn_repair(&self, user: &UserId) {
        let writer = self.tree_writer(user);
        let submitted = self.queue.submit("repair", move || {
            match writer.write(PreferenceTree::default_tree().to_json_value()) {
                Ok(()) => debug!(user_id = %writer.user, "repaired missing preference field"),
                Err(e) => warn!(user_id = %writer.user, error = %e, "preference repair failed"),
            }
        });
        if let Err(e) = submitted {
            warn!(user_id = %user, error = %e, "preference repair not scheduled");
        }
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Write the whole tree into `identity`'s record
    ///
    /// Returns `false` if nobody is signed in or the write fails. One
    /// attempt, no retry.
    pub fn save(&self, identity: Option<&UserId>, tree: &PreferenceTree) -> bool {
        match self.persist(identity, tree) {
            Ok(()) => true,
            Err(Error::Unauthenticated) => {
                debug!("no authenticated identity, preferences not saved");
                false
            }
            Err(e) => {
                let user_id = identity.map(UserId::as_str).unwrap_or_default();
                error!(user_id, error = %e, "failed to save preferences");
                false
            }
        }
    }

    /// Fallible form of [`save`](Self::save)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] if `identity` is `None`,
    /// [`Error::RecordNotFound`] if the user has no record, or an error if
    /// the store cannot be reached.
    pub fn persist(&self, identity: Option<&UserId>, tree: &PreferenceTree) -> Result<()> {
        let user = identity.ok_or(Error::Unauthenticated)?;
        self.tree_writer(user).write(tree.to_json_value())
    }

    /// Queue a [`save`](Self::save) of `tree` on the write queue
    ///
    /// Returns immediately. Returns `false` only if the write could not be
    /// queued; the write's own outcome is logged.
    pub fn save_in_background(&self, identity: Option<&UserId>, tree: PreferenceTree) -> bool {
        let Some(user) = identity else {
            debug!("no authenticated identity, preferences not saved");
            return false;
        };
        let writer = self.tree_writer(user);
        match self.queue.submit("save", move || {
            if let Err(e) = writer.write(tree.to_json_value()) {
                error!(user_id = %writer.user, error = %e, "failed to save preferences");
            }
        }) {
            Ok(()) => true,
            Err(e) => {
                warn!(user_id = %user, error = %e, "preference save dropped");
                false
            }
        }
    }

    fn tree_writer(&self, user: &UserId) -> TreeWriter {
        TreeWriter {
            records: Arc::clone(&self.records),
            collection: self.config.collection.clone(),
            field: self.config.tree_field.clone(),
            user: user.clone(),
        }
    }

    /// Block until every queued background write has finished
    pub fn flush(&self) {
        self.queue.drain();
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Create (or replace) `user`'s record with the default tree
    ///
    /// `role` defaults to the configured role, `email` to empty and `name`
    /// to `"User"`. Returns `false` if the write fails.
    pub fn initialize_account(
        &self,
        user: &UserId,
        role: Option<Role>,
        email: Option<&str>,
        name: Option<&str>,
    ) -> bool {
        let record = UserAccountRecord::new(
            role.unwrap_or(self.config.default_role),
            email.unwrap_or_default(),
            name.unwrap_or(FALLBACK_ACCOUNT_NAME),
        );
        let result = record
            .into_document(&self.config.tree_field)
            .and_then(|doc| self.records.set(&self.config.collection, user.as_str(), doc));
        match result {
            Ok(()) => {
                info!(user_id = %user, "user account initialized");
                true
            }
            Err(e) => {
                error!(user_id = %user, error = %e, "failed to initialize user account");
                false
            }
        }
    }

    /// Role of `user`
    ///
    /// `Patient` if the record or its role field is missing. `None` if the
    /// store cannot be reached or the stored role is not recognized.
    pub fn user_role(&self, user: &UserId) -> Option<Role> {
        let doc = match self.records.get(&self.config.collection, user.as_str()) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                warn!(user_id = %user, "user account record not found");
                return Some(Role::Patient);
            }
            Err(e) => {
                error!(user_id = %user, error = %e, "failed to read user role");
                return None;
            }
        };
        match doc.get(ROLE_FIELD).and_then(serde_json::Value::as_str) {
            None | Some("") => Some(Role::Patient),
            Some(role) => match role.parse() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(user_id = %user, error = %e, "unrecognized user role");
                    None
                }
            },
        }
    }

    /// Every patient record, with fallbacks for missing fields
    ///
    /// Empty if the store cannot be reached.
    pub fn list_patients(&self) -> Vec<PatientSummary> {
        let role = serde_json::Value::String(Role::Patient.as_str().to_string());
        match self.records.query_eq(&self.config.collection, ROLE_FIELD, &role) {
            Ok(hits) => hits
                .into_iter()
                .map(|(id, doc)| self.patient_summary(id, doc))
                .collect(),
            Err(e) => {
                error!(error = %e, "failed to list patients");
                Vec::new()
            }
        }
    }

    fn patient_summary(&self, id: String, mut doc: Document) -> PatientSummary {
        let text = |doc: &Document, field: &str| {
            doc.get(field)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let name = text(&doc, "name").unwrap_or_else(|| FALLBACK_PATIENT_NAME.to_string());
        let email = text(&doc, "email").unwrap_or_else(|| id.clone());
        let created_at = text(&doc, "createdAt");
        let settings = match doc.remove(&self.config.tree_field) {
            None | Some(serde_json::Value::Null) => PreferenceTree::default_tree(),
            Some(value) => PreferenceTree::decode(value).unwrap_or_else(|e| {
                warn!(user_id = %id, error = %e, "unreadable patient preferences, using default");
                PreferenceTree::default_tree()
            }),
        };
        PatientSummary {
            id,
            name,
            email,
            settings,
            created_at,
        }
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("config", &self.config)
            .field("queue", &self.queue.stats())
            .finish()
    }
}
