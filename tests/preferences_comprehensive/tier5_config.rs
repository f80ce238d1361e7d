//! Config files drive the store

use crate::test_utils::{doc, init_tracing, user};
use prefsync::{MemoryRecordStore, PreferenceStore, PrefsConfig, Role, CONFIG_FILE_NAME};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn store_built_from_config_file() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &file,
        "collection = \"people\"\ntree_field = \"prefs\"\nrepair_missing_field = false\ndefault_role = \"expert\"\n",
    )
    .unwrap();

    let config = PrefsConfig::load_or_default(&file).unwrap();
    let records = Arc::new(MemoryRecordStore::new());
    let store = PreferenceStore::new(records.clone(), config).unwrap();

    records.seed("people", "u1", doc(json!({})));
    store.load(Some(&user("u1")));
    store.flush();
    assert_eq!(records.write_count(), 0);

    assert!(store.initialize_account(&user("u2"), None, None, None));
    assert_eq!(store.user_role(&user("u2")), Some(Role::Expert));
    let stored = prefsync::RecordStore::get(records.as_ref(), "people", "u2")
        .unwrap()
        .unwrap();
    assert!(stored.contains_key("prefs"));
}

#[test]
fn bad_config_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&file, "max_pending_writes = 0\n").unwrap();
    let err = PrefsConfig::from_file(&file).unwrap_err();
    assert!(matches!(err, prefsync::Error::InvalidConfig(_)));
}
