//! Renderable checkbox rows
//!
//! Flattens a tree into the rows a checkbox UI draws. Rows are derived on
//! demand and never stored.

use crate::node::{PreferenceNode, TriState};
use crate::path::NodePath;
use crate::tree::PreferenceTree;
use std::collections::BTreeSet;

/// One checkbox row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableRow {
    /// Location of the node in the tree
    pub path: NodePath,
    /// Human-readable label derived from the key
    pub label: String,
    /// Indentation level, 0 for top-level nodes
    pub depth: usize,
    /// Leaf value, or whether every leaf beneath the group is true
    pub checked: bool,
    /// Direct children disagree (always false for leaves)
    pub mixed: bool,
    /// Groups can be expanded, leaves cannot
    pub expandable: bool,
}

impl RenderableRow {
    fn from_node(path: NodePath, node: &PreferenceNode) -> Self {
        let label = path.last_key().map(humanize_key).unwrap_or_default();
        RenderableRow {
            depth: path.len().saturating_sub(1),
            label,
            checked: node.is_checked(),
            mixed: node.is_mixed(),
            expandable: node.is_group(),
            path,
        }
    }

    /// Value a tap on this row requests
    pub fn toggle_value(&self) -> bool {
        !self.checked
    }

    /// Display state of the checkbox
    pub fn tri_state(&self) -> TriState {
        if self.mixed {
            TriState::Mixed
        } else if self.checked {
            TriState::Checked
        } else {
            TriState::Unchecked
        }
    }
}

/// Every node except the root, depth-first in insertion order
pub fn renderable_rows(tree: &PreferenceTree) -> Vec<RenderableRow> {
    collect_rows(tree, |_| true)
}

/// Rows of top-level nodes plus the children of every expanded group
///
/// A group's children are listed only if the group and all of its ancestors
/// are in `expanded`.
pub fn visible_rows(tree: &PreferenceTree, expanded: &BTreeSet<NodePath>) -> Vec<RenderableRow> {
    collect_rows(tree, |path| expanded.contains(path))
}

fn collect_rows(tree: &PreferenceTree, descend: impl Fn(&NodePath) -> bool) -> Vec<RenderableRow> {
    fn walk(
        node: &PreferenceNode,
        path: &NodePath,
        descend: &dyn Fn(&NodePath) -> bool,
        out: &mut Vec<RenderableRow>,
    ) {
        if let PreferenceNode::Group(children) = node {
            for (key, child) in children {
                let child_path = path.child(key.as_str());
                out.push(RenderableRow::from_node(child_path.clone(), child));
                if child.is_group() && descend(&child_path) {
                    walk(child, &child_path, descend, out);
                }
            }
        }
    }
    let mut out = Vec::new();
    walk(tree.root(), &NodePath::root(), &descend, &mut out);
    out
}

/// Turn a camelCase key into a label: `twoFactorAuth` becomes `Two Factor Auth`
pub fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    let mut chars = key.chars();
    if let Some(first) = chars.next() {
        label.extend(first.to_uppercase());
    }
    for c in chars {
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}
