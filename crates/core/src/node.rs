//! Preference nodes and their wire encoding
//!
//! A preference tree is built from two kinds of node:
//! - [`PreferenceNode::Leaf`]: a terminal boolean setting
//! - [`PreferenceNode::Group`]: named children, each a leaf or a group
//!
//! # Wire Encoding
//!
//! Nodes are stored untagged. A leaf is a JSON boolean and a group is a JSON
//! object; the variant is recovered from the value type at read time:
//!
//! ```json
//! { "push": { "android": true, "ios": false }, "sms": false }
//! ```
//!
//! Any other JSON type (null, number, string, array) is rejected.
//! Duplicate keys within one object are rejected as well.

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Maximum nesting depth of a decoded tree (64 levels)
///
/// Checked by [`PreferenceTree::decode`](crate::PreferenceTree::decode)
/// once the value has been decoded. Deeper records are rejected as
/// malformed.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Children of a group, in insertion order
pub type Children = IndexMap<String, PreferenceNode>;

/// Display state of a checkbox row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState {
    /// Leaf is true, or every leaf beneath the group is true
    Checked,
    /// Leaf is false, or no direct child of the group is checked
    Unchecked,
    /// Direct children disagree
    Mixed,
}

/// A node in a preference tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceNode {
    /// Terminal boolean setting
    Leaf(bool),
    /// Named collection of child nodes
    Group(Children),
}

impl PreferenceNode {
    /// Create a leaf
    pub fn leaf(value: bool) -> Self {
        PreferenceNode::Leaf(value)
    }

    /// Create a group from `(key, node)` pairs, keeping their order
    pub fn group<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PreferenceNode)>,
    {
        PreferenceNode::Group(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create a group with no children
    pub fn empty_group() -> Self {
        PreferenceNode::Group(Children::new())
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, PreferenceNode::Leaf(_))
    }

    /// Check if this node is a group
    pub fn is_group(&self) -> bool {
        matches!(self, PreferenceNode::Group(_))
    }

    /// Leaf value, if this is a leaf
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PreferenceNode::Leaf(v) => Some(*v),
            PreferenceNode::Group(_) => None,
        }
    }

    /// Children, if this is a group
    pub fn children(&self) -> Option<&Children> {
        match self {
            PreferenceNode::Leaf(_) => None,
            PreferenceNode::Group(children) => Some(children),
        }
    }

    /// Mutable children, if this is a group
    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            PreferenceNode::Leaf(_) => None,
            PreferenceNode::Group(children) => Some(children),
        }
    }

    /// Fully checked: a true leaf, or a group whose children are all checked
    ///
    /// An empty group is vacuously checked.
    pub fn is_checked(&self) -> bool {
        match self {
            PreferenceNode::Leaf(v) => *v,
            PreferenceNode::Group(children) => children.values().all(PreferenceNode::is_checked),
        }
    }

    /// Mixed: the direct children's checked values disagree
    ///
    /// Only the direct children's [`is_checked`](Self::is_checked) values are
    /// compared. A child group that is itself mixed counts as unchecked.
    pub fn is_mixed(&self) -> bool {
        match self {
            PreferenceNode::Leaf(_) => false,
            PreferenceNode::Group(children) => {
                let mut any_checked = false;
                let mut any_unchecked = false;
                for child in children.values() {
                    if child.is_checked() {
                        any_checked = true;
                    } else {
                        any_unchecked = true;
                    }
                }
                any_checked && any_unchecked
            }
        }
    }

    /// Display state for a checkbox
    pub fn tri_state(&self) -> TriState {
        if self.is_mixed() {
            TriState::Mixed
        } else if self.is_checked() {
            TriState::Checked
        } else {
            TriState::Unchecked
        }
    }

    /// Overwrite this leaf, or every leaf beneath this group, with `value`
    ///
    /// The key set is left untouched.
    pub fn set_all(&mut self, value: bool) {
        match self {
            PreferenceNode::Leaf(v) => *v = value,
            PreferenceNode::Group(children) => {
                for child in children.values_mut() {
                    child.set_all(value);
                }
            }
        }
    }

    /// Nesting depth: 0 for a leaf, 1 plus the deepest child for a group
    pub fn depth(&self) -> usize {
        match self {
            PreferenceNode::Leaf(_) => 0,
            PreferenceNode::Group(children) => {
                1 + children.values().map(PreferenceNode::depth).max().unwrap_or(0)
            }
        }
    }

    /// Number of leaves at any depth beneath this node (1 for a leaf)
    pub fn leaf_count(&self) -> usize {
        match self {
            PreferenceNode::Leaf(_) => 1,
            PreferenceNode::Group(children) => children.values().map(PreferenceNode::leaf_count).sum(),
        }
    }

    /// Same key set at every level, with leaves and groups in the same places
    ///
    /// Leaf values are ignored.
    pub fn same_shape(&self, other: &PreferenceNode) -> bool {
        match (self, other) {
            (PreferenceNode::Leaf(_), PreferenceNode::Leaf(_)) => true,
            (PreferenceNode::Group(a), PreferenceNode::Group(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, child)| {
                        b.get(key).map_or(false, |other_child| child.same_shape(other_child))
                    })
            }
            _ => false,
        }
    }
}

impl From<bool> for PreferenceNode {
    fn from(v: bool) -> Self {
        PreferenceNode::Leaf(v)
    }
}

// =============================================================================
// Untagged codec
// =============================================================================

impl Serialize for PreferenceNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PreferenceNode::Leaf(v) => serializer.serialize_bool(*v),
            PreferenceNode::Group(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (key, child) in children {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = PreferenceNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean or a map of preferences")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(PreferenceNode::Leaf(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut children = Children::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, child)) = access.next_entry::<String, PreferenceNode>()? {
            if children.contains_key(&key) {
                return Err(de::Error::custom(format_args!("duplicate preference key '{}'", key)));
            }
            children.insert(key, child);
        }
        Ok(PreferenceNode::Group(children))
    }
}

impl<'de> Deserialize<'de> for PreferenceNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}
