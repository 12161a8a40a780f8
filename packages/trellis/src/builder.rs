//! A configured builder: editing session, plugin bundle and component registry.

use trellis_layout::{LayoutState, NodeId};
use trellis_plugins::{process_plugins, DiagnosticSink, Element, PluginBundle, PluginContext};

use crate::catalog::PluginCatalog;
use crate::config::BuilderConfig;
use crate::error::Result;
use crate::render::{render_document, MapRegistry};
use crate::session::{EditCommand, Session};

pub struct Builder {
    session: Session,
    bundle: PluginBundle,
    registry: MapRegistry,
}

impl Builder {
    /// Assemble a builder from parts. Plugin components are added to `registry`.
    pub fn new(state: LayoutState, bundle: PluginBundle, mut registry: MapRegistry) -> Self {
        registry.register_plugins(&bundle);
        Self {
            session: Session::new(state),
            bundle,
            registry,
        }
    }

    /// Build the initial tree and aggregate the configured plugins.
    ///
    /// Plugin problems go to `sink`; only tree and config errors fail.
    pub fn from_config(
        config: &BuilderConfig,
        catalog: &PluginCatalog,
        sink: &mut impl DiagnosticSink,
    ) -> Result<Self> {
        config.validate()?;
        let state = config.initial_state()?;
        let ctx = PluginContext::new(config.plugin_props.clone());
        let bundle = process_plugins(catalog.resolve(&config.plugins), &ctx, sink);
        tracing::info!(
            nodes = state.len(),
            plugins = bundle.plugins.len(),
            "builder ready"
        );
        Ok(Self::new(state, bundle, MapRegistry::with_builtins()))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn state(&self) -> &LayoutState {
        self.session.state()
    }

    pub fn bundle(&self) -> &PluginBundle {
        &self.bundle
    }

    pub fn registry(&self) -> &MapRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MapRegistry {
        &mut self.registry
    }

    pub fn apply(&mut self, command: EditCommand) -> Result<Option<NodeId>> {
        Ok(self.session.apply(command)?)
    }

    /// Render the current tree through the registry, wrappers and root provider.
    pub fn render(&self) -> Result<Element> {
        Ok(render_document(
            self.session.state(),
            &self.bundle,
            &self.registry,
        )?)
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("session", &self.session)
            .field("bundle", &self.bundle)
            .field("registry", &self.registry)
            .finish()
    }
}
