//! # Validator Module
//!
//! Validation issues produced by a schema run, and the builder that folds a flat
//! list of issues into a nested error object mirroring the shape of the input.
//!
//! ## Error tree shape
//!
//! Given the issues
//!
//! ```text
//! []            "Expected object, received string"
//! ["a", "b"]    "Required"
//! ["a", "b"]    "Too short"
//! ```
//!
//! the builder produces
//!
//! ```json
//! {
//!   "_errors": ["Expected object, received string"],
//!   "a": { "b": { "_errors": ["Required", "Too short"] } }
//! }
//! ```
//!
//! Every node (including the root) may carry an `_errors` list; intermediate
//! nodes exist only to reach the failing leaf.
//!
//! ## Reserved key
//!
//! An input field literally named `_errors` would collide with a node's own
//! message list. When serialized, a child key made of any number of leading
//! backslashes followed by `_errors` gains one more backslash, so the field
//! `_errors` appears as `\_errors` and `\_errors` as `\\_errors`. Lookups
//! through [`ErrorTree::get`] and [`ErrorTree::at`] use the unescaped field names.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Reserved key holding the messages attached to a node of an [`ErrorTree`].
pub const ERRORS_KEY: &str = "_errors";

/// One step in the path to a failing value: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(k) => write!(f, "{k}"),
            PathKey::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

impl Serialize for PathKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathKey::Key(k) => serializer.serialize_str(k),
            PathKey::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

/// A single validation failure reported by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Keys leading from the root of the input to the failing value (empty for the root)
    pub path: Vec<PathKey>,
    /// Human-readable failure message
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<PathKey>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path,
            message: message.into(),
        }
    }

    /// Issue attached to the root of the input.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }

    /// Dotted rendering of the path, used in log output (`a.b.0`).
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Nested validation errors mirroring the structure of the validated input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
    errors: Vec<String>,
    children: BTreeMap<String, ErrorTree>,
}

impl ErrorTree {
    /// Messages attached directly to this node.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Child node under `key`, if any issue reached it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ErrorTree> {
        self.children.get(key)
    }

    /// Follow a path of keys down the tree.
    #[must_use]
    pub fn at(&self, path: &[&str]) -> Option<&ErrorTree> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// `true` when neither this node nor any descendant carries a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.children.values().all(ErrorTree::is_empty)
    }

    fn child_mut(&mut self, key: &PathKey) -> &mut ErrorTree {
        self.children.entry(key.to_string()).or_default()
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.children.len() + usize::from(!self.errors.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        if !self.errors.is_empty() {
            map.serialize_entry(ERRORS_KEY, &self.errors)?;
        }
        for (key, child) in &self.children {
            map.serialize_entry(&escape_child_key(key), child)?;
        }
        map.end()
    }
}

fn escape_child_key(key: &str) -> Cow<'_, str> {
    if key.trim_start_matches('\\') == ERRORS_KEY {
        Cow::Owned(format!("\\{key}"))
    } else {
        Cow::Borrowed(key)
    }
}

/// Build the nested error object for a list of validation issues.
///
/// Issues are applied in order. An issue with an empty path appends to the
/// root's `_errors`. Otherwise intermediate nodes are created on demand, and the
/// message is appended to the `_errors` of the node at the full path; nodes that
/// already exist (and their other children) are left untouched, so `a._errors`
/// and `a.b._errors` accumulate independently. Messages are never deduplicated.
#[must_use]
pub fn build_validation_errors(issues: &[ValidationIssue]) -> ErrorTree {
    let mut root = ErrorTree::default();

    for issue in issues {
        let node = issue
            .path
            .iter()
            .fold(&mut root, |node, key| node.child_mut(key));
        node.errors.push(issue.message.clone());
    }

    root
}
