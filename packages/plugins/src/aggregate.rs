//! Folding an ordered plugin list into one bundle.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::Value;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::element::Element;
use crate::error::RenderError;
use crate::plugin::{
    default_root_provider, Action, Component, Middleware, Plugin, PluginContext, PluginSource,
    Reducer, RootProvider, Wrapper,
};

/// Everything the plugins contributed, in registration order.
#[derive(Clone)]
pub struct PluginBundle {
    pub root_provider: RootProvider,
    pub wrappers: Vec<Wrapper>,
    /// One reducer per plugin name; a later plugin replaces an earlier one.
    pub reducers: BTreeMap<String, Reducer>,
    pub middlewares: Vec<Middleware>,
    /// Every plugin produced, name conflicts included.
    pub plugins: Vec<Plugin>,
}

impl Default for PluginBundle {
    fn default() -> Self {
        Self {
            root_provider: default_root_provider(),
            wrappers: Vec::new(),
            reducers: BTreeMap::new(),
            middlewares: Vec::new(),
            plugins: Vec::new(),
        }
    }
}

impl PluginBundle {
    /// Render the top-level elements through the composed root provider.
    pub fn render_root(&self, children: Vec<Element>) -> Result<Element, RenderError> {
        (self.root_provider)(children)
    }

    /// Run `action` through the middleware chain in order.
    ///
    /// Returns `None` if a middleware swallowed it.
    pub fn dispatch(&self, action: Action) -> Option<Action> {
        self.middlewares
            .iter()
            .try_fold(action, |action, middleware| middleware(action))
    }

    /// Apply every reducer to its own slice of `state`.
    ///
    /// Missing slices start as `null`. Slices without a reducer are kept.
    pub fn reduce(&self, state: &BTreeMap<String, Value>, action: &Action) -> BTreeMap<String, Value> {
        let mut next = state.clone();
        for (name, reducer) in &self.reducers {
            let slice = state.get(name).unwrap_or(&Value::Null);
            next.insert(name.clone(), reducer(slice, action));
        }
        next
    }

    /// Dispatch then reduce; the state is unchanged when the action is swallowed.
    pub fn handle(&self, state: &BTreeMap<String, Value>, action: Action) -> BTreeMap<String, Value> {
        match self.dispatch(action) {
            Some(action) => self.reduce(state, &action),
            None => state.clone(),
        }
    }

    /// Components contributed by plugins, keyed by plugin name.
    pub fn components(&self) -> impl Iterator<Item = (&str, &Component)> {
        self.plugins
            .iter()
            .filter_map(|p| p.component.as_ref().map(|c| (p.name.as_str(), c)))
    }
}

impl fmt::Debug for PluginBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginBundle")
            .field("wrappers", &self.wrappers.len())
            .field("reducers", &self.reducers.keys().collect::<Vec<_>>())
            .field("middlewares", &self.middlewares.len())
            .field("plugins", &self.plugins)
            .finish()
    }
}

/// Invoke every factory in order and fold the results into a bundle.
///
/// Entries that are not factories, or whose factory fails, are reported and
/// skipped. A repeated name is reported but the plugin is still folded in.
/// Providers compose so the first plugin's provider is innermost.
pub fn process_plugins(
    sources: impl IntoIterator<Item = PluginSource>,
    ctx: &PluginContext,
    sink: &mut impl DiagnosticSink,
) -> PluginBundle {
    let mut bundle = PluginBundle::default();
    let mut names = BTreeSet::new();

    for (index, source) in sources.into_iter().enumerate() {
        let factory = match source {
            PluginSource::Factory(factory) => factory,
            PluginSource::Invalid { kind } => {
                sink.report(Diagnostic::NotAFactory { index, kind });
                continue;
            }
        };
        let plugin = match factory.create(ctx) {
            Ok(plugin) => plugin,
            Err(error) => {
                sink.report(Diagnostic::FactoryFailed { index, error });
                continue;
            }
        };

        if !names.insert(plugin.name.clone()) {
            sink.report(Diagnostic::NameConflict {
                name: plugin.name.clone(),
            });
        }
        if let Some(wrapper) = &plugin.wrapper {
            bundle.wrappers.push(wrapper.clone());
        }
        if let Some(provider) = &plugin.provider {
            bundle.root_provider = provider(bundle.root_provider);
        }
        if let Some(reducer) = &plugin.reducer {
            bundle.reducers.insert(plugin.name.clone(), reducer.clone());
        }
        if let Some(middleware) = &plugin.middleware {
            bundle.middlewares.push(middleware.clone());
        }

        tracing::debug!(index, name = %plugin.name, capabilities = ?plugin.capabilities(), "registered plugin");
        bundle.plugins.push(plugin);
    }
    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::error::PluginError;
    use crate::plugin::PluginFactory;
    use serde_json::json;
    use std::sync::Arc;

    struct Broken;

    impl PluginFactory for Broken {
        fn create(&self, _ctx: &PluginContext) -> Result<Plugin, PluginError> {
            Err(PluginError::MissingProp("theme".to_string()))
        }
    }

    fn named(name: &'static str) -> PluginSource {
        PluginSource::factory(move |_: &PluginContext| Plugin::new(name))
    }

    #[test]
    fn empty_list_gives_default_bundle() {
        let mut diagnostics = Diagnostics::new();
        let bundle = process_plugins(Vec::new(), &PluginContext::default(), &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert!(bundle.plugins.is_empty());
        let el = bundle.render_root(vec![Element::new("Column")]).unwrap();
        assert_eq!(el.kind, "Column");
        assert!(bundle.render_root(vec![]).is_err());
    }

    #[test]
    fn invalid_and_failing_entries_are_skipped() {
        let mut diagnostics = Diagnostics::new();
        let bundle = process_plugins(
            vec![
                named("first"),
                PluginSource::invalid("string"),
                PluginSource::factory(Broken),
                named("last"),
            ],
            &PluginContext::default(),
            &mut diagnostics,
        );
        let names: Vec<_> = bundle.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["first", "last"]);
        assert_eq!(
            diagnostics.into_vec(),
            vec![
                Diagnostic::NotAFactory {
                    index: 1,
                    kind: "string".to_string()
                },
                Diagnostic::FactoryFailed {
                    index: 2,
                    error: PluginError::MissingProp("theme".to_string())
                },
            ]
        );
    }

    #[test]
    fn every_factory_sees_the_same_context() {
        let ctx = PluginContext::new(json!({"tenant": "acme"}));
        let echo = |ctx: &PluginContext| {
            Plugin::new(ctx.prop("tenant").and_then(Value::as_str).unwrap_or_default())
        };
        let mut diagnostics = Diagnostics::new();
        let bundle = process_plugins(
            vec![PluginSource::factory(echo), PluginSource::factory(echo)],
            &ctx,
            &mut diagnostics,
        );
        assert!(bundle.plugins.iter().all(|p| p.name == "acme"));
        assert_eq!(diagnostics.conflicts().collect::<Vec<_>>(), vec!["acme"]);
    }

    #[test]
    fn providers_nest_first_innermost() {
        let tag = |label: &'static str| {
            move |_: &PluginContext| {
                Plugin::new(label).with_provider(move |inner: RootProvider| -> RootProvider {
                    Arc::new(
                        move |children: Vec<Element>| -> Result<Element, RenderError> {
                            Ok(Element::new(label).with_child(inner(children)?))
                        },
                    )
                })
            }
        };
        let mut diagnostics = Diagnostics::new();
        let bundle = process_plugins(
            vec![
                PluginSource::factory(tag("inner")),
                PluginSource::factory(tag("outer")),
            ],
            &PluginContext::default(),
            &mut diagnostics,
        );
        let el = bundle.render_root(vec![Element::new("Column")]).unwrap();
        assert_eq!(el.kind, "outer");
        assert_eq!(el.children[0].kind, "inner");
        assert_eq!(el.children[0].children[0].kind, "Column");

        // Arity is still enforced at the core.
        assert_eq!(
            bundle.render_root(vec![]),
            Err(RenderError::ProviderArity { got: 0 })
        );
    }

    #[test]
    fn middlewares_run_in_order_and_can_swallow() {
        let mut diagnostics = Diagnostics::new();
        let bundle = process_plugins(
            vec![
                PluginSource::factory(|_: &PluginContext| {
                    Plugin::new("filter").with_middleware(|action: Action| {
                        (action.kind != "drop").then_some(action)
                    })
                }),
                PluginSource::factory(|_: &PluginContext| {
                    Plugin::new("stamp").with_middleware(|action: Action| {
                        Some(action.with_payload("stamped"))
                    })
                }),
            ],
            &PluginContext::default(),
            &mut diagnostics,
        );
        assert_eq!(bundle.middlewares.len(), 2);
        assert_eq!(bundle.dispatch(Action::new("drop")), None);
        assert_eq!(
            bundle.dispatch(Action::new("keep")),
            Some(Action::new("keep").with_payload("stamped"))
        );
    }
}
