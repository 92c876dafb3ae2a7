//! Patch vocabulary shared by every [`Diffable`](crate::Diffable) state.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One segment of a patch path: a named field / map key, or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathKey {
    Index(usize),
    Key(String),
}

impl PathKey {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathKey::Key(key) => Some(key),
            PathKey::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathKey::Index(index) => Some(*index),
            PathKey::Key(_) => None,
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Index(index) => write!(f, "{}", index),
            PathKey::Key(key) => f.write_str(key),
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

impl From<&String> for PathKey {
    fn from(key: &String) -> Self {
        PathKey::Key(key.clone())
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

/// Build a `Vec<PathKey>` from mixed string keys and indices.
///
/// ```rust,ignore
/// let path = path!["pages", 0usize, "body", node_id];
/// ```
#[macro_export]
macro_rules! path {
    ($($key:expr),* $(,)?) => {
        vec![$($crate::PathKey::from($key)),*]
    };
}

/// Render a path as a slash-separated pointer (`/pages/0/body/x`).
pub fn format_path(path: &[PathKey]) -> String {
    let mut out = String::new();
    for key in path {
        out.push('/');
        out.push_str(&key.to_string());
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

/// A single structural edit at `path`.
///
/// `value` is present for `Add` and `Replace`, absent for `Remove`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch<V> {
    pub path: Vec<PathKey>,
    pub op: PatchOp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<V>,
}

impl<V> Patch<V> {
    pub fn add(path: Vec<PathKey>, value: V) -> Self {
        Self {
            path,
            op: PatchOp::Add,
            value: Some(value),
        }
    }

    pub fn remove(path: Vec<PathKey>) -> Self {
        Self {
            path,
            op: PatchOp::Remove,
            value: None,
        }
    }

    pub fn replace(path: Vec<PathKey>, value: V) -> Self {
        Self {
            path,
            op: PatchOp::Replace,
            value: Some(value),
        }
    }

    /// Take the value of an `Add`/`Replace` patch, or fail with `MissingValue`.
    pub fn value(&self) -> Result<&V, PatchError> {
        self.value
            .as_ref()
            .ok_or_else(|| PatchError::MissingValue(format_path(&self.path)))
    }
}

/// Forward and inverse patch lists produced by one diff.
///
/// Applying `forward` to the old state yields the new state; applying
/// `inverse` to the new state yields the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchPair<V> {
    pub forward: Vec<Patch<V>>,
    pub inverse: Vec<Patch<V>>,
}

impl<V> PatchPair<V> {
    pub fn new(forward: Vec<Patch<V>>, inverse: Vec<Patch<V>>) -> Self {
        Self { forward, inverse }
    }

    pub fn empty() -> Self {
        Self {
            forward: Vec::new(),
            inverse: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.inverse.is_empty()
    }

    /// Record one edit and its inverse.
    pub fn push(&mut self, forward: Patch<V>, inverse: Patch<V>) {
        self.forward.push(forward);
        self.inverse.push(inverse);
    }

    /// Append another pair, keeping forward/inverse order aligned.
    pub fn extend(&mut self, other: PatchPair<V>) {
        self.forward.extend(other.forward);
        self.inverse.extend(other.inverse);
    }
}

impl<V> Default for PatchPair<V> {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Index {index} out of range at {path}")]
    IndexOutOfRange { path: String, index: usize },

    #[error("Unsupported operation {op:?} at {path}")]
    UnsupportedOp { path: String, op: PatchOp },

    #[error("Patch at {0} carries no value")]
    MissingValue(String),

    #[error("Patch at {0} carries a value of the wrong kind")]
    UnexpectedValue(String),
}
