//! Full structural check of a layout tree.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::node::{NodeId, ROOT_ID};
use crate::state::LayoutState;

/// A broken tree invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("tree has no root node")]
    MissingRoot,

    #[error("root node has parent '{0}'")]
    RootHasParent(NodeId),

    #[error("node '{0}' has no parent")]
    Orphan(NodeId),

    #[error("node '{node}' lists missing child '{child}'")]
    DanglingChild { node: NodeId, child: NodeId },

    #[error("node '{node}' points at missing parent '{parent}'")]
    DanglingParent { node: NodeId, parent: NodeId },

    #[error("node '{child}' is listed under '{first}' and '{second}'")]
    SharedChild {
        child: NodeId,
        first: NodeId,
        second: NodeId,
    },

    #[error("node '{child}' is listed under '{listed_by}' but points at '{parent}'")]
    ParentMismatch {
        child: NodeId,
        listed_by: NodeId,
        parent: NodeId,
    },

    #[error("node '{0}' is not reachable from the root")]
    Unreachable(NodeId),
}

/// Check every structural invariant of `state`.
pub fn check(state: &LayoutState) -> Result<(), IntegrityError> {
    let root = state.get_item(ROOT_ID).ok_or(IntegrityError::MissingRoot)?;
    if let Some(parent) = &root.parent {
        return Err(IntegrityError::RootHasParent(parent.clone()));
    }

    let mut listed_by: BTreeMap<&str, &str> = BTreeMap::new();
    for node in state.iter() {
        for child in &node.children {
            let Some(child_node) = state.get_item(child) else {
                return Err(IntegrityError::DanglingChild {
                    node: node.id.clone(),
                    child: child.clone(),
                });
            };
            if let Some(first) = listed_by.insert(child, &node.id) {
                return Err(IntegrityError::SharedChild {
                    child: child.clone(),
                    first: first.to_string(),
                    second: node.id.clone(),
                });
            }
            if child_node.parent.as_deref() != Some(node.id.as_str()) {
                return Err(IntegrityError::ParentMismatch {
                    child: child.clone(),
                    listed_by: node.id.clone(),
                    parent: child_node.parent.clone().unwrap_or_default(),
                });
            }
        }
    }

    for node in state.iter().filter(|node| !node.is_root()) {
        match &node.parent {
            None => return Err(IntegrityError::Orphan(node.id.clone())),
            Some(parent) if !state.contains(parent) => {
                return Err(IntegrityError::DanglingParent {
                    node: node.id.clone(),
                    parent: parent.clone(),
                })
            }
            // A parent that exists but does not list the node is caught as
            // unreachable below.
            Some(_) => {}
        }
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !seen.insert(&node.id) {
            continue;
        }
        stack.extend(node.children.iter().filter_map(|c| state.get_item(c)));
    }
    if let Some(stray) = state.iter().find(|node| !seen.contains(node.id.as_str())) {
        return Err(IntegrityError::Unreachable(stray.id.clone()));
    }
    Ok(())
}
