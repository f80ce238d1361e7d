//! Tree invariants over arbitrary trees
//!
//! Every toggle must cascade to exactly the addressed subtree, keep the key
//! set, and leave the input tree alone. The untagged encoding must decode
//! back to the same tree.

use crate::test_utils::{arb_tree, arb_tree_and_path};
use prefsync::{apply_toggle, renderable_rows, visible_rows, PreferenceTree};
use proptest::prelude::*;
use std::collections::BTreeSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn toggle_cascades_to_every_leaf_below((tree, path) in arb_tree_and_path(), value: bool) {
        let next = apply_toggle(&tree, &path, value).unwrap();
        for (leaf_path, leaf) in next.leaves() {
            if leaf_path == path || leaf_path.is_descendant_of(&path) {
                prop_assert_eq!(leaf, value, "leaf {} under {}", leaf_path, path);
            }
        }
    }

    #[test]
    fn toggle_leaves_other_leaves_untouched((tree, path) in arb_tree_and_path(), value: bool) {
        let next = apply_toggle(&tree, &path, value).unwrap();
        let before = tree.leaves();
        let after = next.leaves();
        prop_assert_eq!(before.len(), after.len());
        for ((p0, v0), (p1, v1)) in before.iter().zip(after.iter()) {
            prop_assert_eq!(p0, p1);
            if !(p0 == &path || p0.is_descendant_of(&path)) {
                prop_assert_eq!(v0, v1, "leaf {} outside {}", p0, path);
            }
        }
    }

    #[test]
    fn toggle_preserves_shape_and_input((tree, path) in arb_tree_and_path(), value: bool) {
        let snapshot = tree.clone();
        let next = apply_toggle(&tree, &path, value).unwrap();
        prop_assert!(next.same_shape(&tree));
        prop_assert_eq!(next.paths(), tree.paths());
        prop_assert_eq!(tree, snapshot);
    }

    #[test]
    fn toggle_is_idempotent((tree, path) in arb_tree_and_path(), value: bool) {
        let once = apply_toggle(&tree, &path, value).unwrap();
        let twice = apply_toggle(&once, &path, value).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn toggled_true_node_is_checked((tree, path) in arb_tree_and_path()) {
        let next = apply_toggle(&tree, &path, true).unwrap();
        let node = next.resolve(&path).unwrap();
        prop_assert!(node.is_checked());
        prop_assert!(!node.is_mixed());
    }

    #[test]
    fn missing_child_is_rejected_without_change((tree, path) in arb_tree_and_path()) {
        let missing = path.child("zzMissingKey");
        prop_assert!(apply_toggle(&tree, &missing, true).is_err());
    }

    #[test]
    fn mixed_group_is_not_checked(tree in arb_tree()) {
        for path in tree.paths() {
            let node = tree.resolve(&path).unwrap();
            if node.is_mixed() {
                prop_assert!(!node.is_checked());
                prop_assert!(node.is_group());
            }
        }
    }

    #[test]
    fn encoding_decodes_to_same_tree(tree in arb_tree()) {
        let decoded = PreferenceTree::decode(tree.to_json_value()).unwrap();
        prop_assert_eq!(&decoded, &tree);

        let text = serde_json::to_string(&tree).unwrap();
        let parsed: PreferenceTree = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(parsed.paths(), tree.paths());
    }

    #[test]
    fn fully_expanded_rows_match_all_rows(tree in arb_tree()) {
        let rows = renderable_rows(&tree);
        prop_assert_eq!(rows.len(), tree.paths().len());

        let expanded: BTreeSet<_> = tree.paths().into_iter().collect();
        prop_assert_eq!(visible_rows(&tree, &expanded), rows);

        let collapsed = visible_rows(&tree, &BTreeSet::new());
        prop_assert_eq!(collapsed.len(), tree.children().len());
    }
}
