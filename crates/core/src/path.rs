//! Paths into a preference tree
//!
//! A [`NodePath`] is an ordered sequence of keys locating a node from the
//! root. The empty path denotes the root group itself.
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Top-level node | `settings` |
//! | `key1.key2` | Nested node | `settings.notifications` |
//! | (empty) | Root | `` |
//!
//! The dotted form is a convenience for callers and tests. Keys read from a
//! remote record may contain any character, so structural code always works
//! on the segment list, never on the string form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dotted path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty key in path
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
}

/// A path into a preference tree
///
/// # Examples
///
/// ```
/// use prefsync_core::NodePath;
///
/// let push = NodePath::root().key("settings").key("notifications").key("push");
/// let parsed: NodePath = "settings.notifications.push".parse().unwrap();
/// assert_eq!(push, parsed);
///
/// let notifications = push.parent().unwrap();
/// assert!(notifications.is_ancestor_of(&push));
/// assert_eq!(push.last_key(), Some("push"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        NodePath {
            segments: Vec::new(),
        }
    }

    /// Create a path from any sequence of keys
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NodePath {
            segments: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root path (empty)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.push_key(key);
        self
    }

    /// Push a key segment (mutating)
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(key.into());
    }

    /// Path of a direct child
    pub fn child(&self, key: impl Into<String>) -> Self {
        self.clone().key(key)
    }

    /// Get the parent path (None if root)
    pub fn parent(&self) -> Option<NodePath> {
        if self.segments.is_empty() {
            None
        } else {
            let mut parent = self.clone();
            parent.segments.pop();
            Some(parent)
        }
    }

    /// Get the last key (None if root)
    pub fn last_key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path made of the first `len` segments
    pub(crate) fn prefix(&self, len: usize) -> NodePath {
        NodePath {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }

    /// Check if this path is an ancestor of another (or equal)
    ///
    /// The root path is an ancestor of all paths.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }

    /// Check if this path is a descendant of another (or equal)
    pub fn is_descendant_of(&self, other: &NodePath) -> bool {
        other.is_ancestor_of(self)
    }

    /// Convert to dotted notation
    pub fn to_path_string(&self) -> String {
        self.segments.join(".")
    }
}

impl FromStr for NodePath {
    type Err = PathParseError;

    /// Parse dotted notation; the empty string is the root
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(NodePath::root());
        }

        let mut segments = Vec::new();
        let mut position = 0;
        for key in s.split('.') {
            if key.is_empty() {
                return Err(PathParseError::EmptyKey(position));
            }
            position += key.len() + 1;
            segments.push(key.to_string());
        }
        Ok(NodePath { segments })
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}

impl From<Vec<String>> for NodePath {
    fn from(segments: Vec<String>) -> Self {
        NodePath { segments }
    }
}

impl From<&[&str]> for NodePath {
    fn from(keys: &[&str]) -> Self {
        NodePath::from_keys(keys.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for NodePath {
    fn from(keys: [&str; N]) -> Self {
        NodePath::from_keys(keys)
    }
}
