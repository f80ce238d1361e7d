//! Toggle semantics on the default tree

use crate::test_utils::path;
use prefsync::{apply_toggle, Error, PreferenceTree, StructuralError, TriState};
use serde_json::json;

#[test]
fn toggle_push_group_sets_both_platforms() {
    let tree = PreferenceTree::default_tree();
    let next = apply_toggle(&tree, &path("settings.notifications.push"), true).unwrap();

    let push = next.resolve(&path("settings.notifications.push")).unwrap();
    assert_eq!(push.tri_state(), TriState::Checked);
    assert_eq!(
        next.to_json_value()["settings"]["notifications"],
        json!({ "email": true, "sms": false, "push": { "android": true, "ios": true } })
    );
    // The rest of the tree is untouched.
    assert_eq!(
        next.to_json_value()["settings"]["privacy"],
        tree.to_json_value()["settings"]["privacy"]
    );
}

#[test]
fn notifications_group_becomes_mixed_then_checked() {
    let tree = PreferenceTree::default_tree();
    let notifications = path("settings.notifications");
    assert!(tree.resolve(&notifications).unwrap().is_mixed());

    let next = apply_toggle(&tree, &path("settings.notifications.sms"), true).unwrap();
    let next = apply_toggle(&next, &path("settings.notifications.push.ios"), true).unwrap();
    let node = next.resolve(&notifications).unwrap();
    assert!(node.is_checked());
    assert!(!node.is_mixed());
}

#[test]
fn toggling_whole_settings_sets_every_leaf_below() {
    let tree = PreferenceTree::default_tree();
    let settings = path("settings");
    for value in [true, false] {
        let next = apply_toggle(&tree, &settings, value).unwrap();
        let (inside, outside): (Vec<_>, Vec<_>) = next
            .leaves()
            .into_iter()
            .zip(tree.leaves())
            .partition(|((p, _), _)| p.is_descendant_of(&settings));
        assert_eq!(inside.len(), 9);
        assert!(inside.iter().all(|((_, v), _)| *v == value));
        assert_eq!(outside.len(), 12);
        assert!(outside.iter().all(|((_, after), (_, before))| after == before));
        assert!(next.same_shape(&tree));
    }
}

#[test]
fn nonexistent_path_is_a_structural_error() {
    let tree = PreferenceTree::default_tree();
    let err = apply_toggle(&tree, &path("settings.nonexistent"), true).unwrap_err();
    assert_eq!(
        err,
        StructuralError::MissingKey {
            path: path("settings.nonexistent")
        }
    );
    assert_eq!(tree, PreferenceTree::default_tree());

    let wrapped: Error = err.into();
    assert!(matches!(wrapped, Error::Structural(_)));
}

#[test]
fn path_through_a_leaf_is_rejected() {
    let tree = PreferenceTree::default_tree();
    let err = apply_toggle(&tree, &path("settings.notifications.email.work"), true).unwrap_err();
    assert_eq!(
        err,
        StructuralError::ThroughLeaf {
            path: path("settings.notifications.email")
        }
    );
}

#[test]
fn empty_path_is_rejected() {
    let tree = PreferenceTree::default_tree();
    assert_eq!(
        apply_toggle(&tree, &prefsync::NodePath::root(), true),
        Err(StructuralError::EmptyPath)
    );
}

#[test]
fn group_state_follows_nested_toggles() {
    let tree = PreferenceTree::default_tree();
    let next = apply_toggle(&tree, &path("integrations.jira.advanced"), true).unwrap();

    let jira = next.resolve(&path("integrations.jira")).unwrap();
    assert_eq!(jira.tri_state(), TriState::Mixed);

    let next = apply_toggle(&next, &path("integrations.jira.basic"), true).unwrap();
    let integrations = next.resolve(&path("integrations")).unwrap();
    assert_eq!(integrations.tri_state(), TriState::Checked);
}

#[test]
fn mixed_only_looks_at_direct_children() {
    let tree = PreferenceTree::default_tree();
    // english true, spanish false
    let language = tree.resolve(&path("preferences.language")).unwrap();
    assert!(language.is_mixed());

    let theme = tree.resolve(&path("preferences.theme")).unwrap();
    assert_eq!(theme.tri_state(), TriState::Unchecked);

    // A mixed child counts as unchecked.
    let preferences = tree.resolve(&path("preferences")).unwrap();
    assert!(!preferences.is_mixed());
    assert!(!preferences.is_checked());
}
