//! PreferenceTree: one user's full preference set
//!
//! The tree is a root group. All algorithms here are pure: nothing touches
//! the network or the filesystem, and mutation is copy-on-write.
//!
//! - [`PreferenceTree::resolve`]: look up the node at a path
//! - [`apply_toggle`]: set a leaf, or cascade a value to every leaf of a group
//! - [`PreferenceTree::decode`] / [`PreferenceTree::to_json_value`]: untagged codec
//!
//! # Example
//!
//! ```
//! use prefsync_core::{apply_toggle, NodePath, PreferenceTree};
//!
//! let tree = PreferenceTree::default_tree();
//! let push: NodePath = "settings.notifications.push".parse().unwrap();
//!
//! let next = apply_toggle(&tree, &push, true).unwrap();
//! assert!(next.resolve(&push).unwrap().is_checked());
//!
//! let notifications = push.parent().unwrap();
//! assert!(next.resolve(&notifications).unwrap().is_mixed());
//! ```

use crate::error::{Error, Result, StructuralError};
use crate::node::{Children, PreferenceNode, MAX_NESTING_DEPTH};
use crate::path::NodePath;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A preference tree: a root [`PreferenceNode::Group`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceTree {
    root: PreferenceNode,
}

impl PreferenceTree {
    /// Create a tree from its top-level children
    pub fn from_children(children: Children) -> Self {
        PreferenceTree {
            root: PreferenceNode::Group(children),
        }
    }

    /// Create a tree from a root node
    ///
    /// Returns `None` if `root` is a leaf.
    pub fn from_root(root: PreferenceNode) -> Option<Self> {
        match root {
            PreferenceNode::Group(_) => Some(PreferenceTree { root }),
            PreferenceNode::Leaf(_) => None,
        }
    }

    /// Create a tree with no preferences
    pub fn empty() -> Self {
        Self::from_children(Children::new())
    }

    /// The root group
    pub fn root(&self) -> &PreferenceNode {
        &self.root
    }

    /// Top-level children
    pub fn children(&self) -> &Children {
        match &self.root {
            PreferenceNode::Group(children) => children,
            PreferenceNode::Leaf(_) => unreachable!("preference tree root is always a group"),
        }
    }

    /// Whether every leaf in the tree is true
    pub fn is_checked(&self) -> bool {
        self.root.is_checked()
    }

    /// Nesting depth of the root group
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Look up the node at `path`; the empty path resolves to the root
    pub fn resolve(&self, path: &NodePath) -> Option<&PreferenceNode> {
        let mut current = &self.root;
        for key in path.segments() {
            current = match current {
                PreferenceNode::Group(children) => children.get(key)?,
                PreferenceNode::Leaf(_) => return None,
            };
        }
        Some(current)
    }

    /// Mutable lookup that reports why a path does not resolve
    fn resolve_mut(&mut self, path: &NodePath) -> std::result::Result<&mut PreferenceNode, StructuralError> {
        let mut current = &mut self.root;
        for (i, key) in path.segments().iter().enumerate() {
            current = match current {
                PreferenceNode::Group(children) => {
                    children
                        .get_mut(key)
                        .ok_or_else(|| StructuralError::MissingKey {
                            path: path.prefix(i + 1),
                        })?
                }
                PreferenceNode::Leaf(_) => {
                    return Err(StructuralError::ThroughLeaf {
                        path: path.prefix(i),
                    })
                }
            };
        }
        Ok(current)
    }

    /// Every leaf with its path, depth-first in insertion order
    pub fn leaves(&self) -> Vec<(NodePath, bool)> {
        fn walk(node: &PreferenceNode, path: &NodePath, out: &mut Vec<(NodePath, bool)>) {
            match node {
                PreferenceNode::Leaf(v) => out.push((path.clone(), *v)),
                PreferenceNode::Group(children) => {
                    for (key, child) in children {
                        walk(child, &path.child(key.as_str()), out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &NodePath::root(), &mut out);
        out
    }

    /// Path of every node except the root, depth-first in insertion order
    pub fn paths(&self) -> Vec<NodePath> {
        fn walk(node: &PreferenceNode, path: &NodePath, out: &mut Vec<NodePath>) {
            if let PreferenceNode::Group(children) = node {
                for (key, child) in children {
                    let child_path = path.child(key.as_str());
                    out.push(child_path.clone());
                    walk(child, &child_path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &NodePath::root(), &mut out);
        out
    }

    /// Same key set and node kinds as `other` at every level
    pub fn same_shape(&self, other: &PreferenceTree) -> bool {
        self.root.same_shape(&other.root)
    }

    // ========================================================================
    // Codec
    // ========================================================================

    /// Encode as an untagged JSON value
    pub fn to_json_value(&self) -> serde_json::Value {
        fn encode(node: &PreferenceNode) -> serde_json::Value {
            match node {
                PreferenceNode::Leaf(v) => serde_json::Value::Bool(*v),
                PreferenceNode::Group(children) => serde_json::Value::Object(
                    children
                        .iter()
                        .map(|(key, child)| (key.clone(), encode(child)))
                        .collect(),
                ),
            }
        }
        encode(&self.root)
    }

    /// Decode an untagged JSON value
    ///
    /// Fails with [`Error::Serialization`] if the value is not an object of
    /// booleans and objects, and with [`Error::MalformedRecord`] if it nests
    /// deeper than [`MAX_NESTING_DEPTH`].
    pub fn decode(value: serde_json::Value) -> Result<Self> {
        let tree: PreferenceTree = serde_json::from_value(value)?;
        let depth = tree.depth();
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::malformed(format!(
                "preference tree nesting depth {} exceeds maximum of {} levels",
                depth, MAX_NESTING_DEPTH
            )));
        }
        Ok(tree)
    }
}

impl Default for PreferenceTree {
    fn default() -> Self {
        Self::default_tree()
    }
}

impl Serialize for PreferenceTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PreferenceTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let root = PreferenceNode::deserialize(deserializer)?;
        PreferenceTree::from_root(root)
            .ok_or_else(|| serde::de::Error::custom("preference tree root must be a map"))
    }
}

/// Set the node at `path` to `value`, returning a new tree
///
/// A leaf target changes only that leaf. A group target overwrites every
/// leaf beneath it at all depths; its key set does not change.
///
/// # Errors
///
/// - [`StructuralError::EmptyPath`] for the root path
/// - [`StructuralError::MissingKey`] if a segment names no child
/// - [`StructuralError::ThroughLeaf`] if a non-final segment is a leaf
///
/// On error the input tree is untouched. The returned tree is never
/// partially modified.
pub fn apply_toggle(
    tree: &PreferenceTree,
    path: &NodePath,
    value: bool,
) -> std::result::Result<PreferenceTree, StructuralError> {
    if path.is_root() {
        return Err(StructuralError::EmptyPath);
    }
    let mut next = tree.clone();
    next.resolve_mut(path)?.set_all(value);
    Ok(next)
}
