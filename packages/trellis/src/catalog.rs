//! Named plugin factories.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use trellis_plugins::{
    Element, Plugin, PluginContext, PluginError, PluginFactory, PluginSource, RenderError,
    RootProvider,
};

/// Maps plugin names to factories so configuration can refer to plugins by name.
#[derive(Clone, Default)]
pub struct PluginCatalog {
    factories: BTreeMap<String, Arc<dyn PluginFactory>>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plugins that ship with the builder.
    ///
    /// - `outline`: tags every rendered node with a `data-type` attribute
    /// - `frame`: wraps the document in a `Frame` element
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.register("outline", |_: &PluginContext| {
            Plugin::new("outline").with_wrapper(|node, element: Element| {
                element.with_attr("data-type", node.kind.to_string())
            })
        });
        catalog.register("frame", |ctx: &PluginContext| {
            let title = ctx.prop("title").cloned();
            Plugin::new("frame").with_provider(move |inner: RootProvider| -> RootProvider {
                let title = title.clone();
                Arc::new(move |children: Vec<Element>| -> Result<Element, RenderError> {
                    let mut frame = Element::new("Frame");
                    if let Some(title) = &title {
                        frame = frame.with_attr("title", title.clone());
                    }
                    Ok(frame.with_child(inner(children)?))
                })
            })
        });
        catalog
    }

    pub fn register(&mut self, name: impl Into<String>, factory: impl PluginFactory + 'static) {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// The registration list for `names`, in order.
    ///
    /// Unknown names become invalid entries, reported during aggregation.
    pub fn resolve(&self, names: &[String]) -> Vec<PluginSource> {
        names
            .iter()
            .map(|name| match self.factories.get(name) {
                Some(factory) => PluginSource::factory(Shared(factory.clone())),
                None => PluginSource::invalid(format!("unknown plugin \"{}\"", name)),
            })
            .collect()
    }
}

impl fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

struct Shared(Arc<dyn PluginFactory>);

impl PluginFactory for Shared {
    fn create(&self, ctx: &PluginContext) -> Result<Plugin, PluginError> {
        self.0.create(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_plugins::{process_plugins, Diagnostic, Diagnostics};

    #[test]
    fn unknown_names_become_invalid_entries() {
        let catalog = PluginCatalog::standard();
        let sources = catalog.resolve(&["outline".to_string(), "nope".to_string()]);
        assert!(matches!(sources[0], PluginSource::Factory(_)));
        assert!(matches!(&sources[1], PluginSource::Invalid { kind } if kind.contains("nope")));

        let mut diagnostics = Diagnostics::new();
        let bundle = process_plugins(sources, &PluginContext::default(), &mut diagnostics);
        assert_eq!(bundle.plugins.len(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::NotAFactory { index: 1, .. })
        ));
    }

    #[test]
    fn frame_reads_title_from_context() {
        let catalog = PluginCatalog::standard();
        let ctx = PluginContext::new(json!({"title": "Home"}));
        let mut diagnostics = Diagnostics::new();
        let bundle = process_plugins(catalog.resolve(&["frame".to_string()]), &ctx, &mut diagnostics);
        let doc = bundle.render_root(vec![Element::new("Column")]).unwrap();
        assert_eq!(doc.kind, "Frame");
        assert_eq!(doc.attr("title"), Some(&json!("Home")));
        assert_eq!(doc.children[0].kind, "Column");
    }

    #[test]
    fn standard_names() {
        let names: Vec<_> = PluginCatalog::standard().names().map(str::to_string).collect();
        assert_eq!(names, vec!["frame", "outline"]);
    }
}
