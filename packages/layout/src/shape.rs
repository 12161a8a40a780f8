//! The minimal shape check for rehydration input.
//!
//! Input must be a JSON object keyed by node id, contain a `"root"` entry,
//! and every entry must carry a non-empty `id`, a non-empty `type` and a
//! `props` object. The check runs once, at the boundary; nothing past it
//! re-validates.

use serde_json::Value;

use crate::error::ShapeError;
use crate::node::{Node, ROOT_ID};

/// Validate `raw` and decode its entries into nodes.
pub fn nodes_from_raw(raw: Value) -> Result<Vec<Node>, ShapeError> {
    let entries = match raw {
        Value::Object(entries) => entries,
        Value::Array(_) => return Err(ShapeError::IsArray),
        _ => return Err(ShapeError::NotAnObject),
    };
    if !entries.contains_key(ROOT_ID) {
        return Err(ShapeError::MissingRoot);
    }

    let mut nodes = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        check_entry(&key, &entry)?;
        let node: Node = serde_json::from_value(entry).map_err(|e| ShapeError::Malformed {
            key: key.clone(),
            message: e.to_string(),
        })?;
        nodes.push(node);
    }
    Ok(nodes)
}

fn check_entry(key: &str, entry: &Value) -> Result<(), ShapeError> {
    let Value::Object(fields) = entry else {
        return Err(ShapeError::NotANode {
            key: key.to_string(),
        });
    };
    let missing = |field| ShapeError::MissingField {
        key: key.to_string(),
        field,
    };

    match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => {
            if id != key {
                return Err(ShapeError::KeyMismatch {
                    key: key.to_string(),
                    id: id.clone(),
                });
            }
        }
        _ => return Err(missing("id")),
    }

    match fields.get("type") {
        Some(Value::String(kind)) if !kind.is_empty() => {}
        Some(Value::Object(_)) | Some(Value::Array(_)) => {}
        _ => return Err(missing("type")),
    }

    match fields.get("props") {
        Some(Value::Object(_)) => Ok(()),
        _ => Err(missing("props")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_tree() {
        let nodes = nodes_from_raw(json!({
            "root": {"id": "root", "type": "Column", "props": {}, "children": []}
        }))
        .unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_root());
    }

    #[test]
    fn rejects_non_objects() {
        assert_eq!(nodes_from_raw(json!([])), Err(ShapeError::IsArray));
        assert_eq!(nodes_from_raw(json!("root")), Err(ShapeError::NotAnObject));
        assert_eq!(nodes_from_raw(json!(null)), Err(ShapeError::NotAnObject));
    }

    #[test]
    fn rejects_missing_root() {
        let raw = json!({"a": {"id": "a", "type": "Row", "props": {}}});
        assert_eq!(nodes_from_raw(raw), Err(ShapeError::MissingRoot));
    }

    #[test]
    fn rejects_missing_fields_anywhere() {
        let base = json!({
            "root": {"id": "root", "type": "Column", "props": {}, "children": ["a"]},
            "a": {"id": "a", "type": "Row", "props": {}, "parent": "root"}
        });

        for (field, replacement) in [
            ("id", json!("")),
            ("type", json!("")),
            ("type", json!(null)),
            ("props", json!(null)),
            ("props", json!("nope")),
        ] {
            let mut raw = base.clone();
            raw["a"][field] = replacement;
            assert_eq!(
                nodes_from_raw(raw),
                Err(ShapeError::MissingField {
                    key: "a".to_string(),
                    field,
                })
            );
        }

        let mut raw = base;
        raw["a"].as_object_mut().unwrap().remove("props");
        assert!(matches!(
            nodes_from_raw(raw),
            Err(ShapeError::MissingField { field: "props", .. })
        ));
    }

    #[test]
    fn rejects_entry_that_is_not_an_object() {
        let raw = json!({
            "root": {"id": "root", "type": "Column", "props": {}},
            "a": 5
        });
        assert_eq!(
            nodes_from_raw(raw),
            Err(ShapeError::NotANode {
                key: "a".to_string()
            })
        );
    }

    #[test]
    fn rejects_id_that_differs_from_key() {
        let raw = json!({"root": {"id": "other", "type": "Column", "props": {}}});
        assert!(matches!(
            nodes_from_raw(raw),
            Err(ShapeError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn malformed_children_are_reported() {
        let raw = json!({"root": {"id": "root", "type": "Column", "props": {}, "children": "a"}});
        assert!(matches!(
            nodes_from_raw(raw),
            Err(ShapeError::Malformed { .. })
        ));
    }
}
