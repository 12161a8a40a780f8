//! Plugin aggregation for the Trellis builder.
//!
//! Plugins extend the builder with optional capabilities: a root provider
//! around the whole rendered tree, wrappers around every rendered node,
//! components, state reducers and action middleware. [`process_plugins`] runs
//! each factory once, in order, and folds the results into a
//! [`PluginBundle`]. Problems with individual entries are reported to a
//! [`DiagnosticSink`] and never abort the run.

mod aggregate;
mod diagnostics;
mod element;
mod error;
mod plugin;

pub use aggregate::{process_plugins, PluginBundle};
pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, Tee, TracingSink};
pub use element::Element;
pub use error::{PluginError, RenderError};
pub use plugin::{
    default_root_provider, Action, Component, Middleware, Plugin, PluginContext, PluginFactory,
    PluginSource, Provider, Reducer, RootProvider, Wrapper,
};
