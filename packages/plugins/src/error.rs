//! Error types for plugin creation and rendering.

use thiserror::Error;

/// A factory could not produce its plugin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error("plugin factory failed: {0}")]
    Failed(String),

    #[error("plugin factory requires prop '{0}'")]
    MissingProp(String),
}

/// Errors raised while producing the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The root provider renders exactly one child.
    #[error("root provider expects exactly one child, got {got}")]
    ProviderArity { got: usize },

    #[error("render failed: {0}")]
    Failed(String),
}
