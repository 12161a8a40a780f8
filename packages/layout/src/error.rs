//! Error types for the layout tree store.

use thiserror::Error;

use crate::integrity::IntegrityError;
use crate::node::NodeId;
use crate::prop_path::PropPathError;

/// Reasons a rehydration input fails the shape check.
///
/// Any one of these rejects the whole input; no partial tree is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("layout items must be an object")]
    NotAnObject,

    #[error("layout items must be an object, not an array")]
    IsArray,

    #[error("layout items have no \"root\" entry")]
    MissingRoot,

    #[error("entry '{key}' is not a node object")]
    NotANode { key: String },

    #[error("entry '{key}' is missing a non-empty '{field}'")]
    MissingField { key: String, field: &'static str },

    #[error("entry '{key}' carries id '{id}'")]
    KeyMismatch { key: String, id: String },

    #[error("entry '{key}' is malformed: {message}")]
    Malformed { key: String, message: String },

    /// Entries are well formed but do not link up into one tree.
    #[error("entries do not form a tree: {0}")]
    Inconsistent(IntegrityError),
}

/// Errors produced by tree store operations.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Rehydration input failed the shape check.
    #[error("invalid layout shape: {0}")]
    ShapeInvalid(#[from] ShapeError),

    /// An insert or move targeted a parent that does not exist.
    #[error("parent not found: {0}")]
    ParentNotFound(NodeId),

    /// The operation referenced a node that does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The root node has no parent and cannot be moved.
    #[error("the root node cannot be moved")]
    RootImmovable,

    /// A move would place a node inside its own subtree.
    #[error("cannot move '{id}' under '{parent}': target is inside its subtree")]
    CycleDetected { id: NodeId, parent: NodeId },

    /// Key generation hit the retry ceiling.
    #[error("no unique key found after {attempts} attempts")]
    KeyExhausted { attempts: u32 },

    /// A prop path could not be applied.
    #[error("prop path error: {0}")]
    PropPath(#[from] PropPathError),

    /// A patch operation cannot be applied to the node.
    #[error("invalid patch for '{id}': {message}")]
    InvalidPatch { id: NodeId, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
