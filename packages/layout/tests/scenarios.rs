//! End-to-end editing scenarios against the public API.

use std::collections::BTreeSet;

use serde_json::json;

use trellis_layout::{
    ComponentType, LayoutError, LayoutState, NodeDraft, NodePatch, PatchOp, PropPath, ShapeError,
    ROOT_ID,
};

#[test]
fn build_from_bare_root_type() {
    let state = LayoutState::new("Column");
    assert_eq!(state.len(), 1);
    let root = state.get_item(ROOT_ID).unwrap();
    assert_eq!(root.kind, ComponentType::from("Column"));
    assert!(root.children.is_empty());

    let edit = state.insert(ROOT_ID, 0, NodeDraft::new("Button")).unwrap();
    assert_eq!(edit.state.len(), 2);
    assert_eq!(edit.state.root().children, vec![edit.id.clone()]);
    assert_eq!(
        edit.state.get_item(&edit.id).unwrap().parent.as_deref(),
        Some("root")
    );
}

#[test]
fn rehydrate_edit_and_dump() {
    let raw = json!({
        "root": {"id": "root", "type": "Column", "props": {}, "children": ["hdr"], "style": {}},
        "hdr": {"id": "hdr", "type": "Row", "props": {"gap": 4}, "children": [], "parent": "root"}
    });
    let state = LayoutState::from_raw(raw.clone()).unwrap();
    assert_eq!(state.to_raw(), raw);

    let edit = state
        .insert("hdr", 0, NodeDraft::new("Logo").with_prop("src", "/logo.svg"))
        .unwrap();
    let patch = NodePatch::from(vec![
        PatchOp::SetProp {
            path: PropPath::parse("gap").unwrap(),
            value: json!(8),
        },
        PatchOp::SetProp {
            path: PropPath::parse("padding/top").unwrap(),
            value: json!(2),
        },
    ]);
    let next = edit.state.update("hdr", &patch).unwrap();

    let hdr = next.get_item("hdr").unwrap();
    assert_eq!(hdr.props["gap"], json!(8));
    assert_eq!(hdr.props["padding"], json!({"top": 2}));
    assert_eq!(hdr.children, vec![edit.id.clone()]);

    let dumped = next.to_raw();
    assert_eq!(dumped[&edit.id]["props"], json!({"src": "/logo.svg"}));
    assert_eq!(dumped[&edit.id]["parent"], json!("hdr"));

    // Every intermediate snapshot is still intact.
    assert_eq!(state.to_raw(), raw);
    assert_eq!(edit.state.get_item("hdr").unwrap().props["gap"], json!(4));
}

#[test]
fn rehydration_rejects_bad_shapes_whole() {
    let cases = [
        (json!([]), ShapeError::IsArray),
        (json!(42), ShapeError::NotAnObject),
        (
            json!({"a": {"id": "a", "type": "Row", "props": {}}}),
            ShapeError::MissingRoot,
        ),
        (
            json!({"root": {"id": "root", "type": "Column"}}),
            ShapeError::MissingField {
                key: "root".to_string(),
                field: "props",
            },
        ),
    ];
    for (raw, expected) in cases {
        match LayoutState::from_raw(raw) {
            Err(LayoutError::ShapeInvalid(err)) => assert_eq!(err, expected),
            other => panic!("expected shape error, got {other:?}"),
        }
    }
}

#[test]
fn from_json_str_reports_syntax_errors() {
    assert!(matches!(
        LayoutState::from_json_str("{not json"),
        Err(LayoutError::Json(_))
    ));
    let state = LayoutState::from_json_str(
        r#"{"root": {"id": "root", "type": "Column", "props": {}}}"#,
    )
    .unwrap();
    assert_eq!(state.len(), 1);
}

#[test]
fn dependencies_follow_first_letter() {
    let state = LayoutState::from_raw(json!({
        "root": {"id": "root", "type": "Column", "props": {}, "children": ["a", "b", "c", "d"]},
        "a": {"id": "a", "type": "Chart", "props": {}, "parent": "root"},
        "b": {"id": "b", "type": "span", "props": {}, "parent": "root"},
        "c": {"id": "c", "type": "3D", "props": {}, "parent": "root"},
        "d": {"id": "d", "type": {"module": "Map"}, "props": {}, "parent": "root"}
    }))
    .unwrap();
    assert_eq!(
        state.get_dependencies(),
        BTreeSet::from(["Chart".to_string()])
    );
}

#[test]
fn move_then_remove_keeps_tree_consistent() {
    let state = LayoutState::default();
    let a = state.insert(ROOT_ID, 0, NodeDraft::new("Row")).unwrap();
    let b = a.state.insert(ROOT_ID, 1, NodeDraft::new("Row")).unwrap();
    let leaf = b.state.insert(&a.id, 0, NodeDraft::new("text")).unwrap();

    let moved = leaf.state.move_item(&b.id, 0, &leaf.id).unwrap();
    moved.check_integrity().unwrap();
    assert!(moved.get_item(&a.id).unwrap().children.is_empty());
    assert_eq!(moved.get_item(&b.id).unwrap().children, vec![leaf.id.clone()]);

    let selected = moved.select(Some(leaf.id.as_str()));
    let pruned = selected.remove(&b.id).unwrap();
    pruned.check_integrity().unwrap();
    assert_eq!(pruned.len(), 2);
    assert_eq!(pruned.get_selected(), None);
    assert!(pruned
        .iter()
        .all(|n| n.children.iter().all(|c| pruned.contains(c))));
}

#[test]
fn hand_written_layouts_dump_back_unchanged() {
    let inputs = [
        json!({"root": {"id": "root", "type": "Column", "props": {}}}),
        json!({
            "root": {"id": "root", "type": "Column", "props": {}, "parent": null, "locked": true},
        }),
        json!({
            "root": {"id": "root", "type": "Column", "props": {}, "children": ["a"], "style": null},
            "a": {"id": "a", "type": {"module": "charts"}, "props": {"n": 1}, "parent": "root",
                  "meta": {"note": "kept"}}
        }),
    ];
    for raw in inputs {
        let state = LayoutState::from_raw(raw.clone()).unwrap();
        assert_eq!(state.to_raw(), raw);
    }
}

#[test]
fn edits_keep_untouched_fields_of_rehydrated_nodes() {
    let raw = json!({
        "root": {"id": "root", "type": "Column", "props": {}, "locked": true}
    });
    let edit = LayoutState::from_raw(raw)
        .unwrap()
        .insert("root", 0, NodeDraft::new("Row"))
        .unwrap();
    let dumped = edit.state.to_raw();
    assert_eq!(dumped["root"]["locked"], json!(true));
    assert_eq!(dumped["root"]["children"], json!([edit.id.clone()]));

    let back = edit.state.remove(&edit.id).unwrap().to_raw();
    assert!(back["root"].get("children").is_none());
}

#[test]
fn rehydration_rejects_entries_that_are_not_a_tree() {
    let cycle = json!({
        "root": {"id": "root", "type": "Column", "props": {}, "children": ["a"]},
        "a": {"id": "a", "type": "Row", "props": {}, "children": ["b"], "parent": "root"},
        "b": {"id": "b", "type": "Row", "props": {}, "children": ["a"], "parent": "a"}
    });
    let root_as_child = json!({
        "root": {"id": "root", "type": "Column", "props": {}, "children": ["a"]},
        "a": {"id": "a", "type": "Row", "props": {}, "children": ["root"], "parent": "root"}
    });
    let wrong_parent = json!({
        "root": {"id": "root", "type": "Column", "props": {}, "children": ["a"]},
        "a": {"id": "a", "type": "Row", "props": {}, "parent": "b"},
        "b": {"id": "b", "type": "Row", "props": {}, "parent": "root"}
    });
    for raw in [cycle, root_as_child, wrong_parent] {
        assert!(matches!(
            LayoutState::from_raw(raw),
            Err(LayoutError::ShapeInvalid(ShapeError::Inconsistent(_)))
        ));
    }
}
