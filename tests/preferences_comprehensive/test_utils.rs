//! Test utilities for the preferences comprehensive tests

#![allow(dead_code)]

use prefsync::{
    Document, MemoryRecordStore, NodePath, PreferenceNode, PreferenceStore, PreferenceTree,
    UserId, ACCOUNT_COLLECTION, TREE_FIELD,
};
use proptest::prelude::*;
use std::sync::Arc;

/// Install a fmt subscriber that writes through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Parse a dotted path
pub fn path(s: &str) -> NodePath {
    s.parse().expect("valid test path")
}

/// Create a test UserId
pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid test user id")
}

/// Turn a JSON object literal into a record document
pub fn doc(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("test document must be an object, got {other}"),
    }
}

/// Fresh record store plus a preference store over it
pub fn setup() -> (Arc<MemoryRecordStore>, Arc<PreferenceStore>) {
    init_tracing();
    let records = Arc::new(MemoryRecordStore::new());
    let store = Arc::new(PreferenceStore::with_defaults(records.clone()));
    (records, store)
}

/// Seed an account record holding `tree`
pub fn seed_tree(records: &MemoryRecordStore, id: &str, tree: &PreferenceTree) {
    let mut record = Document::new();
    record.insert("role".to_string(), serde_json::json!("patient"));
    record.insert(TREE_FIELD.to_string(), tree.to_json_value());
    records.seed(ACCOUNT_COLLECTION, id, record);
}

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary node, up to 4 levels deep
pub fn arb_node() -> impl Strategy<Value = PreferenceNode> {
    let leaf = any::<bool>().prop_map(PreferenceNode::Leaf);
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop::collection::vec(("[a-z][a-zA-Z]{0,5}", inner), 0..5).prop_map(PreferenceNode::group)
    })
}

/// Arbitrary tree with at least one top-level node
pub fn arb_tree() -> impl Strategy<Value = PreferenceTree> {
    prop::collection::vec(("[a-z][a-zA-Z]{0,5}", arb_node()), 1..5).prop_map(|entries| {
        PreferenceTree::from_children(entries.into_iter().collect())
    })
}

/// Arbitrary tree together with one of its node paths
pub fn arb_tree_and_path() -> impl Strategy<Value = (PreferenceTree, NodePath)> {
    (arb_tree(), any::<prop::sample::Index>()).prop_map(|(tree, index)| {
        let paths = tree.paths();
        let chosen = index.get(&paths).clone();
        (tree, chosen)
    })
}
