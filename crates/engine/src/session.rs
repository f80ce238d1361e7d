//! PreferenceSession: one user's live preference tree
//!
//! A session loads the tree once and then owns it. Every change goes through
//! [`PreferenceSession::toggle`], which updates local state first and then
//! queues a save. Toggles take `&mut self`, so one session applies them one
//! at a time and queues their saves in the same order.

use crate::store::PreferenceStore;
use prefsync_core::{
    apply_toggle, renderable_rows, visible_rows, NodePath, PreferenceTree, RenderableRow, Result,
    UserId,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// In-memory tree for one session, mirrored to the store on every toggle
pub struct PreferenceSession {
    store: Arc<PreferenceStore>,
    identity: Option<UserId>,
    tree: PreferenceTree,
}

impl PreferenceSession {
    /// Open a session for `identity`, loading its tree from `store`
    pub fn open(store: Arc<PreferenceStore>, identity: Option<UserId>) -> Self {
        let tree = store.load(identity.as_ref());
        Self {
            store,
            identity,
            tree,
        }
    }

    /// Current tree
    pub fn tree(&self) -> &PreferenceTree {
        &self.tree
    }

    /// Identity the session acts for, if signed in
    pub fn identity(&self) -> Option<&UserId> {
        self.identity.as_ref()
    }

    /// Every row of the current tree
    pub fn rows(&self) -> Vec<RenderableRow> {
        renderable_rows(&self.tree)
    }

    /// Rows visible with the groups in `expanded` opened
    pub fn visible_rows(&self, expanded: &BTreeSet<NodePath>) -> Vec<RenderableRow> {
        visible_rows(&self.tree, expanded)
    }

    /// Set the node at `path` (and everything under it) to `value`
    ///
    /// On success the new tree replaces the session's tree and a save is
    /// queued. The save's outcome does not affect the session: a failed or
    /// dropped save still leaves the tree updated.
    ///
    /// # Errors
    ///
    /// Returns [`prefsync_core::Error::Structural`] if `path` does not
    /// resolve. The tree is left unchanged and nothing is written.
    pub fn toggle(&mut self, path: &NodePath, value: bool) -> Result<&PreferenceTree> {
        let next = apply_toggle(&self.tree, path, value)?;
        self.tree = next;
        debug!(path = %path, value, "preference toggled");
        self.store
            .save_in_background(self.identity.as_ref(), self.tree.clone());
        Ok(&self.tree)
    }

    /// Block until this session's queued saves have landed
    pub fn flush(&self) {
        self.store.flush();
    }
}

impl std::fmt::Debug for PreferenceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceSession")
            .field("identity", &self.identity)
            .field("leaves", &self.tree.leaves().len())
            .finish()
    }
}
