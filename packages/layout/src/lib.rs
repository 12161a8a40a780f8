//! Trellis layout tree store.
//!
//! The layout builder edits a tree of component descriptors. This crate holds
//! that tree as an immutable [`LayoutState`] snapshot:
//! - `Node`: one component descriptor (type, props, children, parent)
//! - `LayoutState`: the `id -> node` map plus the current selection
//! - `NodePatch`: field-level edits applied to a single node
//!
//! Every edit (`insert`, `move_item`, `update`, `remove`, `select`) returns a
//! new snapshot. Unedited nodes are shared between snapshots, so keeping old
//! snapshots around is cheap.
//!
//! # Example
//!
//! ```rust
//! use trellis_layout::{LayoutState, NodeDraft, ROOT_ID};
//!
//! let state = LayoutState::new("Column");
//! let edit = state
//!     .insert(ROOT_ID, 0, NodeDraft::new("Button").with_prop("label", "Save"))
//!     .unwrap();
//!
//! let button = edit.state.get_item(&edit.id).unwrap();
//! assert_eq!(button.parent.as_deref(), Some(ROOT_ID));
//! assert!(edit.state.get_dependencies().contains("Button"));
//! ```

mod error;
mod integrity;
pub mod key;
mod node;
mod patch;
pub mod prop_path;
mod shape;
mod state;

pub use error::{LayoutError, Result, ShapeError};
pub use integrity::IntegrityError;
pub use node::{ComponentType, Node, NodeDraft, NodeId, Placement, Props, ROOT_ID};
pub use patch::{NodePatch, PatchOp};
pub use prop_path::{PropPath, PropPathError};
pub use state::{Edit, LayoutConfig, LayoutState, BUILTIN_TYPES, MAX_ANCESTORS};
