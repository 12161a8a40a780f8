//! Aggregating realistic plugin lists.

use collection_literals::btree;
use serde_json::{json, Value};

use trellis_layout::{Node, ROOT_ID};
use trellis_plugins::{
    process_plugins, Action, Diagnostic, Diagnostics, Element, Plugin, PluginContext,
    PluginSource, Tee, TracingSink,
};

fn reducer_plugin(name: &'static str, marker: &'static str) -> PluginSource {
    PluginSource::factory(move |_: &PluginContext| {
        Plugin::new(name).with_reducer(move |_: &Value, _: &Action| json!(marker))
    })
}

#[test]
fn duplicate_names_conflict_but_last_reducer_wins() {
    let mut diagnostics = Diagnostics::new();
    let bundle = process_plugins(
        vec![reducer_plugin("A", "first"), reducer_plugin("A", "second")],
        &PluginContext::default(),
        &mut Tee(&mut diagnostics, TracingSink),
    );

    assert_eq!(bundle.plugins.len(), 2);
    assert_eq!(
        diagnostics.into_vec(),
        vec![Diagnostic::NameConflict {
            name: "A".to_string()
        }]
    );
    assert_eq!(bundle.reducers.len(), 1);
    let reducer = &bundle.reducers["A"];
    assert_eq!(reducer(&Value::Null, &Action::new("any")), json!("second"));
}

#[test]
fn reducers_own_their_slices() {
    let counter = PluginSource::factory(|_: &PluginContext| {
        Plugin::new("counter").with_reducer(|state: &Value, action: &Action| {
            let n = state.as_i64().unwrap_or(0);
            match action.kind.as_str() {
                "inc" => json!(n + 1),
                _ => json!(n),
            }
        })
    });
    let theme = PluginSource::factory(|_: &PluginContext| {
        Plugin::new("theme").with_reducer(|state: &Value, action: &Action| {
            match action.kind.as_str() {
                "theme/set" => action.payload.clone(),
                _ => state.clone(),
            }
        })
    });

    let mut diagnostics = Diagnostics::new();
    let bundle = process_plugins(
        vec![counter, theme],
        &PluginContext::default(),
        &mut diagnostics,
    );
    assert!(diagnostics.is_empty());

    let state = btree! {
        "counter".to_string() => json!(41),
        "unrelated".to_string() => json!("kept"),
    };
    let next = bundle.handle(&state, Action::new("inc"));
    assert_eq!(
        next,
        btree! {
            "counter".to_string() => json!(42),
            "theme".to_string() => Value::Null,
            "unrelated".to_string() => json!("kept"),
        }
    );

    let next = bundle.handle(&next, Action::new("theme/set").with_payload("dark"));
    assert_eq!(next["theme"], json!("dark"));
    assert_eq!(next["counter"], json!(42));
}

#[test]
fn wrappers_and_components_are_collected_in_order() {
    let outline = PluginSource::factory(|_: &PluginContext| {
        Plugin::new("outline").with_wrapper(|node: &Node, el: Element| {
            Element::new("Outline")
                .with_attr("for", node.id.clone())
                .with_child(el)
        })
    });
    let chart = PluginSource::factory(|_: &PluginContext| {
        Plugin::new("Chart").with_component(|_: &Node, children: Vec<Element>| {
            Element::new("svg").with_children(children)
        })
    });

    let mut diagnostics = Diagnostics::new();
    let bundle = process_plugins(
        vec![outline, PluginSource::invalid("number"), chart],
        &PluginContext::default(),
        &mut diagnostics,
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(bundle.wrappers.len(), 1);

    let node = Node::new(ROOT_ID, "Column");
    let wrapped = (bundle.wrappers[0])(&node, Element::new("Column"));
    assert_eq!(wrapped.kind, "Outline");
    assert_eq!(wrapped.attr("for"), Some(&json!("root")));

    let components: Vec<&str> = bundle.components().map(|(name, _)| name).collect();
    assert_eq!(components, vec!["Chart"]);
}
