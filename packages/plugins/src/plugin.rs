//! Plugin descriptors and the factories that produce them.
//!
//! A plugin is a bundle of optional capabilities, each checked for presence
//! on its own. Factories receive the shared [`PluginContext`] and return one
//! descriptor; they run once, during aggregation.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_layout::Node;

use crate::element::Element;
use crate::error::{PluginError, RenderError};

/// Renders the final tree from the top-level elements.
pub type RootProvider = Arc<dyn Fn(Vec<Element>) -> Result<Element, RenderError> + Send + Sync>;

/// Wraps the root provider built so far into a new one.
pub type Provider = Arc<dyn Fn(RootProvider) -> RootProvider + Send + Sync>;

/// Decorates the element rendered for a node.
pub type Wrapper = Arc<dyn Fn(&Node, Element) -> Element + Send + Sync>;

/// Renders a node from its already-rendered children.
pub type Component = Arc<dyn Fn(&Node, Vec<Element>) -> Element + Send + Sync>;

/// Computes the next value of a plugin's state slice.
pub type Reducer = Arc<dyn Fn(&Value, &Action) -> Value + Send + Sync>;

/// Transforms an action on its way to the reducers; `None` swallows it.
pub type Middleware = Arc<dyn Fn(Action) -> Option<Action> + Send + Sync>;

/// The root provider used when no plugin supplies one.
///
/// Passes a single child through unchanged and fails on any other count.
pub fn default_root_provider() -> RootProvider {
    Arc::new(|mut children: Vec<Element>| {
        if children.len() != 1 {
            return Err(RenderError::ProviderArity {
                got: children.len(),
            });
        }
        Ok(children.remove(0))
    })
}

/// A state action routed through middlewares and reducers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// What a factory produced.
#[derive(Clone, Default)]
pub struct Plugin {
    pub name: String,
    pub provider: Option<Provider>,
    pub wrapper: Option<Wrapper>,
    pub component: Option<Component>,
    pub reducer: Option<Reducer>,
    pub middleware: Option<Middleware>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_provider(
        mut self,
        provider: impl Fn(RootProvider) -> RootProvider + Send + Sync + 'static,
    ) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    #[must_use]
    pub fn with_wrapper(
        mut self,
        wrapper: impl Fn(&Node, Element) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.wrapper = Some(Arc::new(wrapper));
        self
    }

    #[must_use]
    pub fn with_component(
        mut self,
        component: impl Fn(&Node, Vec<Element>) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.component = Some(Arc::new(component));
        self
    }

    #[must_use]
    pub fn with_reducer(
        mut self,
        reducer: impl Fn(&Value, &Action) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.reducer = Some(Arc::new(reducer));
        self
    }

    #[must_use]
    pub fn with_middleware(
        mut self,
        middleware: impl Fn(Action) -> Option<Action> + Send + Sync + 'static,
    ) -> Self {
        self.middleware = Some(Arc::new(middleware));
        self
    }

    /// Names of the capabilities this plugin carries.
    pub fn capabilities(&self) -> Vec<&'static str> {
        [
            ("provider", self.provider.is_some()),
            ("wrapper", self.wrapper.is_some()),
            ("component", self.component.is_some()),
            ("reducer", self.reducer.is_some()),
            ("middleware", self.middleware.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

/// Shared input handed to every factory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PluginContext {
    pub props: Value,
}

impl PluginContext {
    pub fn new(props: Value) -> Self {
        Self { props }
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }
}

/// Produces a plugin from the shared context.
pub trait PluginFactory: Send + Sync {
    fn create(&self, ctx: &PluginContext) -> Result<Plugin, PluginError>;
}

impl<F> PluginFactory for F
where
    F: Fn(&PluginContext) -> Plugin + Send + Sync,
{
    fn create(&self, ctx: &PluginContext) -> Result<Plugin, PluginError> {
        Ok(self(ctx))
    }
}

/// One entry of the ordered registration list.
pub enum PluginSource {
    Factory(Box<dyn PluginFactory>),
    /// An entry that is not a factory, described by `kind`.
    Invalid { kind: String },
}

impl PluginSource {
    pub fn factory(factory: impl PluginFactory + 'static) -> Self {
        PluginSource::Factory(Box::new(factory))
    }

    pub fn invalid(kind: impl Into<String>) -> Self {
        PluginSource::Invalid { kind: kind.into() }
    }
}

impl fmt::Debug for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginSource::Factory(_) => f.write_str("Factory(..)"),
            PluginSource::Invalid { kind } => write!(f, "Invalid({})", kind),
        }
    }
}
