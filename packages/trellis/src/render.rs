//! Walking a layout snapshot into rendered elements.

use std::collections::BTreeMap;
use std::sync::Arc;

use trellis_layout::{ComponentType, LayoutState, Node, ROOT_ID};
use trellis_plugins::{Component, Element, PluginBundle, RenderError, Wrapper};

/// Attribute carrying the id of the node an element was rendered from.
pub const DATA_ID: &str = "data-id";

/// Resolves a node type to something renderable.
pub trait ComponentRegistry {
    fn resolve(&self, kind: &ComponentType) -> Option<Component>;
}

/// Components registered by name.
///
/// Only named types resolve; descriptor types always render nothing.
#[derive(Clone, Default)]
pub struct MapRegistry {
    components: BTreeMap<String, Component>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry knowing the builder's own layout primitives.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for name in trellis_layout::BUILTIN_TYPES {
            registry.register_element(*name);
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, component: Component) {
        self.components.insert(name.into(), component);
    }

    /// Register `name` as a plain element carrying the node's props as attributes.
    pub fn register_element(&mut self, name: impl Into<String>) {
        let name = name.into();
        let kind = name.clone();
        self.register(
            name,
            Arc::new(move |node: &Node, children: Vec<Element>| {
                Element::new(kind.clone())
                    .with_attrs(node.props.clone())
                    .with_children(children)
            }),
        );
    }

    /// Register every component contributed by the bundle's plugins.
    pub fn register_plugins(&mut self, bundle: &PluginBundle) {
        for (name, component) in bundle.components() {
            self.register(name, component.clone());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}

impl ComponentRegistry for MapRegistry {
    fn resolve(&self, kind: &ComponentType) -> Option<Component> {
        kind.name().and_then(|name| self.components.get(name).cloned())
    }
}

impl std::fmt::Debug for MapRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.components.keys()).finish()
    }
}

/// Renders nodes through a registry, applying wrappers to each result.
pub struct Renderer<'a> {
    registry: &'a dyn ComponentRegistry,
    wrappers: &'a [Wrapper],
}

impl<'a> Renderer<'a> {
    pub fn new(registry: &'a dyn ComponentRegistry, wrappers: &'a [Wrapper]) -> Self {
        Self { registry, wrappers }
    }

    /// Render `id` and its subtree.
    ///
    /// Returns `None` when the node is absent or its type does not resolve;
    /// such a node and its whole subtree render nothing.
    pub fn render(&self, state: &LayoutState, id: &str) -> Option<Element> {
        let node = state.get_item(id)?;
        let Some(component) = self.registry.resolve(&node.kind) else {
            tracing::trace!(id, kind = %node.kind, "unresolved component type");
            return None;
        };
        let children = node
            .children
            .iter()
            .filter_map(|child| self.render(state, child))
            .collect();
        let element = component(node, children).with_attr(DATA_ID, node.id.clone());
        Some(
            self.wrappers
                .iter()
                .fold(element, |element, wrapper| wrapper(node, element)),
        )
    }
}

/// Render the whole tree and pass it through the bundle's root provider.
///
/// An unresolvable root hands the provider no children, which the default
/// provider rejects.
pub fn render_document(
    state: &LayoutState,
    bundle: &PluginBundle,
    registry: &dyn ComponentRegistry,
) -> Result<Element, RenderError> {
    let renderer = Renderer::new(registry, &bundle.wrappers);
    let top: Vec<Element> = renderer.render(state, ROOT_ID).into_iter().collect();
    bundle.render_root(top)
}
