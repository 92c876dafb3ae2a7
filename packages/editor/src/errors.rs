//! Error types for the editor

use crate::tree::TreeError;
use pagewright_history::PatchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Patch error: {0}")]
    Patch(#[from] PatchError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type Result<T> = std::result::Result<T, EditorError>;

/// Why the store turned down an edit; a rejected edit is a no-op
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Page not found: {0}")]
    PageNotFound(usize),

    #[error("Cannot delete the last page")]
    LastPage,

    #[error("Page id {0} is already in use")]
    DuplicatePage(String),

    #[error("Invalid attributes for {node}: {reason}")]
    InvalidAttributes { node: String, reason: String },
}
