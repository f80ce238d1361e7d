//! Store load, save and repair against an in-memory record store

use crate::test_utils::{doc, path, seed_tree, setup, user};
use prefsync::{
    apply_toggle, LoadOutcome, PreferenceStore, PreferenceTree, PrefsConfig, RecordStore, Role,
    WriteKind, ACCOUNT_COLLECTION, TREE_FIELD,
};
use serde_json::json;
use std::sync::Arc;

#[test]
fn missing_field_yields_default_and_exactly_one_repair() {
    let (records, store) = setup();
    records.seed(
        ACCOUNT_COLLECTION,
        "u1",
        doc(json!({ "role": "patient", "email": "a@b.c", "name": "A" })),
    );

    let tree = store.load(Some(&user("u1")));
    assert_eq!(tree, PreferenceTree::default_tree());
    store.flush();

    let writes = records.writes_to(ACCOUNT_COLLECTION, "u1");
    assert_eq!(writes.len(), 1);
    match &writes[0].kind {
        WriteKind::UpdateField { field, value } => {
            assert_eq!(field, TREE_FIELD);
            assert_eq!(value, &PreferenceTree::default_tree().to_json_value());
        }
        other => panic!("expected a field update, got {other:?}"),
    }

    // The repaired record now loads without another write.
    assert_eq!(store.load(Some(&user("u1"))), PreferenceTree::default_tree());
    store.flush();
    assert_eq!(records.write_count(), 1);
    let stored = records.get(ACCOUNT_COLLECTION, "u1").unwrap().unwrap();
    assert_eq!(stored["name"], json!("A"));
}

#[test]
fn repair_goes_to_configured_field() {
    let records = Arc::new(prefsync::MemoryRecordStore::new());
    let config = PrefsConfig {
        collection: "accounts".to_string(),
        tree_field: "prefs".to_string(),
        ..PrefsConfig::default()
    };
    let store = PreferenceStore::new(records.clone(), config).unwrap();
    records.seed("accounts", "u1", doc(json!({})));

    store.load(Some(&user("u1")));
    store.flush();

    let writes = records.writes_to("accounts", "u1");
    assert_eq!(writes.len(), 1);
    assert!(writes[0].field_value("prefs").is_some());
}

#[test]
fn saved_tree_is_what_loads_back() {
    let (records, store) = setup();
    seed_tree(&records, "u1", &PreferenceTree::default_tree());

    let tree = apply_toggle(
        &PreferenceTree::default_tree(),
        &path("preferences.language.nested"),
        true,
    )
    .unwrap();
    assert!(store.save(Some(&user("u1")), &tree));
    assert_eq!(store.load(Some(&user("u1"))), tree);
    assert_eq!(
        store.fetch(&user("u1")).unwrap(),
        LoadOutcome::Loaded(tree.clone())
    );
}

#[test]
fn save_and_load_keep_key_order() {
    let (records, store) = setup();
    let stored = json!({ "zeta": true, "alpha": { "b": false, "a": true } });
    records.seed(ACCOUNT_COLLECTION, "u1", doc(json!({ "settingsData": stored })));

    let tree = store.load(Some(&user("u1")));
    let keys: Vec<&str> = tree.children().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);

    assert!(store.save(Some(&user("u1")), &tree));
    let written = records.get(ACCOUNT_COLLECTION, "u1").unwrap().unwrap();
    assert_eq!(
        serde_json::to_string(&written[TREE_FIELD]).unwrap(),
        r#"{"zeta":true,"alpha":{"b":false,"a":true}}"#
    );
}

#[test]
fn outage_degrades_reads_and_fails_writes() {
    let (records, store) = setup();
    let mine = apply_toggle(&PreferenceTree::default_tree(), &path("integrations"), false).unwrap();
    seed_tree(&records, "u1", &mine);

    records.set_unavailable(true);
    assert_eq!(store.load(Some(&user("u1"))), PreferenceTree::default_tree());
    assert!(!store.save(Some(&user("u1")), &mine));
    assert!(store.fetch(&user("u1")).unwrap_err().is_remote());

    records.set_unavailable(false);
    assert_eq!(store.load(Some(&user("u1"))), mine);
}

#[test]
fn new_account_round_trip() {
    let (records, store) = setup();
    assert!(store.initialize_account(&user("e1"), Some(Role::Expert), Some("e@x.io"), Some("Eve")));
    assert!(store.initialize_account(&user("p1"), None, None, None));

    assert_eq!(store.user_role(&user("e1")), Some(Role::Expert));
    assert_eq!(store.user_role(&user("p1")), Some(Role::Patient));
    assert_eq!(records.len(ACCOUNT_COLLECTION), 2);

    let patients = store.list_patients();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].id, "p1");
    assert_eq!(patients[0].name, "User");
    // Empty email falls back to the id.
    assert_eq!(patients[0].email, "p1");
    assert_eq!(patients[0].settings, PreferenceTree::default_tree());
    assert!(patients[0].created_at.is_some());
}

#[test]
fn reinitializing_resets_the_tree() {
    let (records, store) = setup();
    assert!(store.initialize_account(&user("u1"), None, None, None));
    let changed = apply_toggle(&PreferenceTree::default_tree(), &path("settings"), false).unwrap();
    assert!(store.save(Some(&user("u1")), &changed));

    assert!(store.initialize_account(&user("u1"), None, None, None));
    assert_eq!(store.load(Some(&user("u1"))), PreferenceTree::default_tree());
    assert_eq!(records.write_count(), 3);
}
