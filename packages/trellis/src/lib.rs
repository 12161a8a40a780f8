//! Trellis: the state core of a visual layout builder.
//!
//! This crate ties the pieces together:
//! - [`Session`] holds the current [`LayoutState`] snapshot and applies
//!   [`EditCommand`]s to it
//! - [`Renderer`] walks a snapshot into [`Element`]s through a
//!   [`ComponentRegistry`]
//! - [`BuilderConfig`] and [`PluginCatalog`] turn a config file into a
//!   ready [`Builder`]
//!
//! # Example
//!
//! ```rust
//! use trellis::{Builder, BuilderConfig, Diagnostics, EditCommand, PluginCatalog};
//! use trellis::layout::{NodeDraft, ROOT_ID};
//!
//! let config = BuilderConfig::from_json_str(r#"{"plugins": ["outline"]}"#).unwrap();
//! let mut diagnostics = Diagnostics::new();
//! let mut builder =
//!     Builder::from_config(&config, &PluginCatalog::standard(), &mut diagnostics).unwrap();
//!
//! builder
//!     .apply(EditCommand::InsertOrMove {
//!         parent: ROOT_ID.to_string(),
//!         index: 0,
//!         item: NodeDraft::new("Row").into(),
//!     })
//!     .unwrap();
//!
//! let doc = builder.render().unwrap();
//! assert_eq!(doc.kind, "Column");
//! assert_eq!(doc.children[0].kind, "Row");
//! ```

mod builder;
mod catalog;
mod config;
mod error;
mod render;
mod session;

pub use trellis_layout as layout;
pub use trellis_plugins as plugins;

pub use builder::Builder;
pub use catalog::PluginCatalog;
pub use config::BuilderConfig;
pub use error::{ConfigError, Result, TrellisError};
pub use render::{render_document, ComponentRegistry, MapRegistry, Renderer, DATA_ID};
pub use session::{EditCommand, Session};

pub use trellis_layout::{LayoutError, LayoutState, Node, NodeDraft, NodeId, NodePatch};
pub use trellis_plugins::{
    Diagnostic, DiagnosticSink, Diagnostics, Element, PluginBundle, TracingSink,
};
