//! Partial updates to a single node.
//!
//! A [`NodePatch`] is an ordered list of [`PatchOp`]s applied to one node in
//! sequence. Linkage fields (`children`, `parent`) are only touched by the
//! ops that name them; the tree store uses those ops to implement insert,
//! move and remove.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LayoutError, Result};
use crate::node::{ComponentType, Node, NodeId, Props};
use crate::prop_path::{self, PropPath};

/// One field-level edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOp {
    SetType {
        #[serde(rename = "type")]
        kind: ComponentType,
    },
    SetProp {
        path: PropPath,
        value: Value,
    },
    RemoveProp {
        path: PropPath,
    },
    /// Shallow-merge keys into props, overwriting existing keys.
    MergeProps {
        props: Props,
    },
    SetStyle {
        style: Option<Props>,
    },
    /// Remove `remove` ids starting at `index` and insert `insert` there.
    /// `index` is clamped to the list length.
    SpliceChildren {
        index: usize,
        #[serde(default)]
        remove: usize,
        #[serde(default)]
        insert: Vec<NodeId>,
    },
    /// Drop every occurrence of `id` from children.
    RemoveChild {
        id: NodeId,
    },
    SetParent {
        parent: Option<NodeId>,
    },
}

/// An ordered set of edits for one node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePatch {
    ops: Vec<PatchOp>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn push(mut self, op: PatchOp) -> Self {
        self.ops.push(op);
        self
    }

    #[must_use]
    pub fn set_type(self, kind: impl Into<ComponentType>) -> Self {
        self.push(PatchOp::SetType { kind: kind.into() })
    }

    #[must_use]
    pub fn set_prop(self, path: PropPath, value: impl Into<Value>) -> Self {
        self.push(PatchOp::SetProp {
            path,
            value: value.into(),
        })
    }

    #[must_use]
    pub fn remove_prop(self, path: PropPath) -> Self {
        self.push(PatchOp::RemoveProp { path })
    }

    #[must_use]
    pub fn merge_props(self, props: Props) -> Self {
        self.push(PatchOp::MergeProps { props })
    }

    #[must_use]
    pub fn set_style(self, style: Option<Props>) -> Self {
        self.push(PatchOp::SetStyle { style })
    }

    #[must_use]
    pub fn splice_children(self, index: usize, remove: usize, insert: Vec<NodeId>) -> Self {
        self.push(PatchOp::SpliceChildren {
            index,
            remove,
            insert,
        })
    }

    #[must_use]
    pub fn remove_child(self, id: impl Into<NodeId>) -> Self {
        self.push(PatchOp::RemoveChild { id: id.into() })
    }

    #[must_use]
    pub fn set_parent(self, parent: Option<NodeId>) -> Self {
        self.push(PatchOp::SetParent { parent })
    }

    /// Apply every op to `node` in order.
    ///
    /// Stops at the first failing op; callers apply patches to a private copy
    /// of the node, so a failure never leaks a half-patched node into a snapshot.
    pub fn apply(&self, node: &mut Node) -> Result<()> {
        for op in &self.ops {
            apply_op(node, op)?;
        }
        Ok(())
    }
}

impl From<Vec<PatchOp>> for NodePatch {
    fn from(ops: Vec<PatchOp>) -> Self {
        Self { ops }
    }
}

fn apply_op(node: &mut Node, op: &PatchOp) -> Result<()> {
    match op {
        PatchOp::SetType { kind } => {
            if !kind.is_present() {
                return Err(LayoutError::InvalidPatch {
                    id: node.id.clone(),
                    message: "type must not be empty".to_string(),
                });
            }
            node.kind = kind.clone();
        }
        PatchOp::SetProp { path, value } => {
            prop_path::set(&mut node.props, path, value.clone())?;
        }
        PatchOp::RemoveProp { path } => {
            prop_path::remove(&mut node.props, path)?;
        }
        PatchOp::MergeProps { props } => {
            for (key, value) in props {
                node.props.insert(key.clone(), value.clone());
            }
        }
        PatchOp::SetStyle { style } => {
            node.style = style.clone();
        }
        PatchOp::SpliceChildren {
            index,
            remove,
            insert,
        } => {
            let start = (*index).min(node.children.len());
            let end = start.saturating_add(*remove).min(node.children.len());
            node.children.splice(start..end, insert.iter().cloned());
        }
        PatchOp::RemoveChild { id } => {
            node.children.retain(|child| child != id);
        }
        PatchOp::SetParent { parent } => {
            if node.is_root() && parent.is_some() {
                return Err(LayoutError::InvalidPatch {
                    id: node.id.clone(),
                    message: "the root node cannot have a parent".to_string(),
                });
            }
            node.parent = parent.clone();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node_with_children(children: &[&str]) -> Node {
        let mut node = Node::new("n", "Row");
        node.children = children.iter().map(|c| c.to_string()).collect();
        node
    }

    #[test]
    fn splice_inserts_at_index() {
        let mut node = node_with_children(&["a", "b", "c"]);
        NodePatch::new()
            .splice_children(1, 0, vec!["x".to_string()])
            .apply(&mut node)
            .unwrap();
        assert_eq!(node.children, vec!["a", "x", "b", "c"]);
    }

    #[test]
    fn splice_clamps_index_past_end() {
        let mut node = node_with_children(&["a"]);
        NodePatch::new()
            .splice_children(42, 3, vec!["z".to_string()])
            .apply(&mut node)
            .unwrap();
        assert_eq!(node.children, vec!["a", "z"]);
    }

    #[test]
    fn splice_replaces_range() {
        let mut node = node_with_children(&["a", "b", "c"]);
        NodePatch::new()
            .splice_children(0, 2, vec!["q".to_string()])
            .apply(&mut node)
            .unwrap();
        assert_eq!(node.children, vec!["q", "c"]);
    }

    #[test]
    fn remove_child_filters() {
        let mut node = node_with_children(&["a", "b", "a"]);
        NodePatch::new().remove_child("a").apply(&mut node).unwrap();
        assert_eq!(node.children, vec!["b"]);
    }

    #[test]
    fn prop_ops_apply_in_order() {
        let mut node = Node::new("n", "Text");
        let patch = NodePatch::new()
            .set_prop(PropPath::parse("text").unwrap(), "Hello")
            .set_prop(PropPath::parse("font.size").unwrap(), 14)
            .remove_prop(PropPath::parse("text").unwrap());
        patch.apply(&mut node).unwrap();
        assert_eq!(Value::Object(node.props), json!({"font": {"size": 14}}));
    }

    #[test]
    fn empty_type_is_rejected() {
        let mut node = Node::new("n", "Text");
        let err = NodePatch::new().set_type("").apply(&mut node).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPatch { .. }));
        assert_eq!(node.kind, ComponentType::from("Text"));
    }

    #[test]
    fn root_cannot_gain_parent() {
        let mut node = Node::new("root", "Column");
        let err = NodePatch::new()
            .set_parent(Some("x".to_string()))
            .apply(&mut node)
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPatch { .. }));
    }

    #[test]
    fn patch_from_json() {
        let patch: NodePatch = serde_json::from_value(json!([
            {"op": "set_prop", "path": "label", "value": "Go"},
            {"op": "set_type", "type": "Button"},
            {"op": "splice_children", "index": 0, "insert": ["k"]}
        ]))
        .unwrap();
        assert_eq!(patch.ops().len(), 3);

        let mut node = Node::new("n", "Text");
        patch.apply(&mut node).unwrap();
        assert_eq!(node.kind, ComponentType::from("Button"));
        assert_eq!(node.props.get("label"), Some(&json!("Go")));
        assert_eq!(node.children, vec!["k"]);
    }
}
