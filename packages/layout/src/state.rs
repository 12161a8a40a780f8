//! The layout tree snapshot and its transitions.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LayoutError, Result, ShapeError};
use crate::integrity::{self, IntegrityError};
use crate::key;
use crate::node::{ComponentType, Node, NodeDraft, NodeId, Placement, Props, ROOT_ID};
use crate::patch::NodePatch;
use crate::shape;

/// Nearest ancestors returned by [`LayoutState::get_ancestors`], node included.
pub const MAX_ANCESTORS: usize = 4;

/// Capitalized types supplied by the builder itself rather than by users.
pub const BUILTIN_TYPES: &[&str] = &["Column", "Row"];

/// Tunables carried by every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// How many candidates key generation draws before giving up.
    pub key_attempts: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { key_attempts: 1024 }
    }
}

/// Result of placing a node: the new snapshot and the id that was placed.
#[derive(Debug, Clone)]
pub struct Edit {
    pub state: LayoutState,
    pub id: NodeId,
}

/// An immutable snapshot of the layout tree.
///
/// Every write returns a new snapshot and leaves the receiver untouched.
/// Nodes live in a persistent map, so a new snapshot shares every row it did
/// not edit with its predecessor; cloning a snapshot is O(1).
///
/// # Example
///
/// ```rust
/// use trellis_layout::{LayoutState, NodeDraft, ROOT_ID};
///
/// let state = LayoutState::new("Column");
/// let edit = state.insert(ROOT_ID, 0, NodeDraft::new("Button")).unwrap();
///
/// assert_eq!(edit.state.len(), 2);
/// assert_eq!(edit.state.root().children, vec![edit.id.clone()]);
/// assert_eq!(state.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    items: im::OrdMap<NodeId, Arc<Node>>,
    selected: Option<NodeId>,
    revision: u64,
    config: LayoutConfig,
}

impl LayoutState {
    /// A tree holding only a root node of the given type.
    pub fn new(kind: impl Into<ComponentType>) -> Self {
        let root = Node::new(ROOT_ID, kind);
        Self::from_nodes(std::iter::once(root))
    }

    /// Rehydrate a tree from its raw form (the output of [`to_raw`](Self::to_raw)).
    ///
    /// The input must pass the shape check and form a consistent tree; any
    /// violation rejects it whole. [`to_raw`](Self::to_raw) on the result gives
    /// back `raw` unchanged.
    pub fn from_raw(raw: Value) -> Result<Self> {
        let state = Self::from_nodes(shape::nodes_from_raw(raw)?);
        integrity::check(&state).map_err(ShapeError::Inconsistent)?;
        Ok(state)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Build a snapshot without checking the tree.
    pub(crate) fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            items: nodes
                .into_iter()
                .map(|node| (node.id.clone(), Arc::new(node)))
                .collect(),
            selected: None,
            revision: 0,
            config: LayoutConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Counter bumped by every transition that changes the snapshot.
    ///
    /// No-op transitions hand back a snapshot with the same revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ====================================================================
    // Reads
    // ====================================================================

    pub fn get_item(&self, id: &str) -> Option<&Node> {
        self.items.get(id).map(Arc::as_ref)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// The root node.
    ///
    /// # Panics
    ///
    /// Never for snapshots built by this crate: every constructor guarantees a
    /// root and `remove` refuses to delete it.
    pub fn root(&self) -> &Node {
        self.get_item(ROOT_ID)
            .expect("layout snapshots always contain a root node")
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: a snapshot holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.values().map(Arc::as_ref)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn get_selected(&self) -> Option<&Node> {
        self.selected.as_deref().and_then(|id| self.get_item(id))
    }

    /// Up to [`MAX_ANCESTORS`] nodes ending at `id`, root-most first.
    ///
    /// The cap is a display limit, not a depth limit: deeper lineages are cut
    /// at the top. Returns an empty list when `id` is absent.
    pub fn get_ancestors(&self, id: &str) -> Vec<&Node> {
        let mut result = Vec::with_capacity(MAX_ANCESTORS);
        let mut cursor = self.get_item(id);
        while let Some(node) = cursor {
            result.push(node);
            if result.len() == MAX_ANCESTORS {
                break;
            }
            cursor = node.parent.as_deref().and_then(|p| self.get_item(p));
        }
        result.reverse();
        result
    }

    /// Every descendant of `id` in depth-first pre-order, `id` excluded.
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(node) = self.get_item(id) else {
            return out;
        };
        let mut seen: BTreeSet<&str> = BTreeSet::from([id]);
        let mut stack: Vec<&NodeId> = node.children.iter().rev().collect();
        while let Some(child) = stack.pop() {
            if !seen.insert(child) {
                continue;
            }
            out.push(child.clone());
            if let Some(node) = self.get_item(child) {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Names of every custom component type used in the tree.
    ///
    /// A type is custom when its name starts with an uppercase letter, with one
    /// exception: the builder's own layout primitives ([`BUILTIN_TYPES`]) are
    /// capitalized but never reported, so a tree of `Column`, `Row` and
    /// `MyWidget` depends on `MyWidget` alone.
    pub fn get_dependencies(&self) -> BTreeSet<String> {
        self.iter()
            .filter(|node| node.kind.is_custom())
            .filter_map(|node| node.kind.name())
            .filter(|name| !BUILTIN_TYPES.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// The full `id -> node` map as plain JSON, accepted back by [`from_raw`](Self::from_raw).
    pub fn to_raw(&self) -> Value {
        Value::Object(
            self.items
                .iter()
                .map(|(id, node)| (id.clone(), node.to_value()))
                .collect(),
        )
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_raw())?)
    }

    /// Check every structural invariant of the tree.
    pub fn check_integrity(&self) -> std::result::Result<(), IntegrityError> {
        integrity::check(self)
    }

    // ====================================================================
    // Keys
    // ====================================================================

    /// A fresh node id: not in use and not numeric-looking.
    pub fn generate_unique_key(&self) -> Result<NodeId> {
        self.generate_unique_key_with(&mut rand::thread_rng())
    }

    pub fn generate_unique_key_with(&self, rng: &mut impl Rng) -> Result<NodeId> {
        let attempts = self.config.key_attempts;
        key::unique_key(rng, attempts, |candidate| self.contains(candidate))
            .ok_or(LayoutError::KeyExhausted { attempts })
    }

    // ====================================================================
    // Writes
    // ====================================================================

    /// Insert a draft, or move an existing node, under `parent_id` at `index`.
    pub fn insert_or_move(
        &self,
        parent_id: &str,
        index: usize,
        item: impl Into<Placement>,
    ) -> Result<Edit> {
        match item.into() {
            Placement::Insert(draft) => self.insert(parent_id, index, draft),
            Placement::Move { id } => Ok(Edit {
                state: self.move_item(parent_id, index, &id)?,
                id,
            }),
        }
    }

    /// Give `draft` a fresh id and splice it into `parent_id`'s children.
    ///
    /// `index` past the end appends.
    pub fn insert(&self, parent_id: &str, index: usize, draft: NodeDraft) -> Result<Edit> {
        self.insert_with(parent_id, index, draft, &mut rand::thread_rng())
    }

    /// [`insert`](Self::insert) drawing the new id from `rng`.
    pub fn insert_with(
        &self,
        parent_id: &str,
        index: usize,
        draft: NodeDraft,
        rng: &mut impl Rng,
    ) -> Result<Edit> {
        if !self.contains(parent_id) {
            return Err(LayoutError::ParentNotFound(parent_id.to_string()));
        }
        let id = self.generate_unique_key_with(rng)?;
        let node = draft.into_node(id.clone(), parent_id.to_string());

        let mut next = self.clone();
        next.items.insert(id.clone(), Arc::new(node));
        next.patch_in_place(
            parent_id,
            &NodePatch::new().splice_children(index, 0, vec![id.clone()]),
        )?;
        next.revision += 1;

        tracing::debug!(id = %id, parent = %parent_id, index, "inserted node");
        Ok(Edit { state: next, id })
    }

    /// Detach `id` from its parent and splice it into `parent_id` at `index`.
    ///
    /// `index` is a position in the destination list *after* `id` has been
    /// taken out of its old list, so within one parent it is the node's final
    /// position, and moving a node to its current parent and position changes
    /// nothing.
    pub fn move_item(&self, parent_id: &str, index: usize, id: &str) -> Result<LayoutState> {
        let node = self
            .get_item(id)
            .ok_or_else(|| LayoutError::NodeNotFound(id.to_string()))?;
        let Some(old_parent) = node.parent.clone() else {
            return Err(LayoutError::RootImmovable);
        };
        if !self.contains(parent_id) {
            return Err(LayoutError::ParentNotFound(parent_id.to_string()));
        }
        if parent_id == id || self.is_ancestor(id, parent_id) {
            return Err(LayoutError::CycleDetected {
                id: id.to_string(),
                parent: parent_id.to_string(),
            });
        }

        let mut next = self.clone();
        next.patch_in_place(&old_parent, &NodePatch::new().remove_child(id))?;
        next.patch_in_place(
            parent_id,
            &NodePatch::new().splice_children(index, 0, vec![id.to_string()]),
        )?;
        next.patch_in_place(id, &NodePatch::new().set_parent(Some(parent_id.to_string())))?;
        next.revision += 1;

        tracing::debug!(id, from = %old_parent, to = %parent_id, index, "moved node");
        Ok(next)
    }

    /// Apply `patch` to node `id`.
    pub fn update(&self, id: &str, patch: &NodePatch) -> Result<LayoutState> {
        let mut next = self.clone();
        next.patch_in_place(id, patch)?;
        next.revision += 1;
        tracing::debug!(id, ops = patch.ops().len(), "updated node");
        Ok(next)
    }

    /// Set a single prop on node `id`.
    pub fn set_prop(&self, id: &str, key: impl Into<String>, value: Value) -> Result<LayoutState> {
        let mut props = Props::new();
        props.insert(key.into(), value);
        self.update(id, &NodePatch::new().merge_props(props))
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Removing the root is a no-op and returns an identical snapshot. A
    /// selection inside the removed subtree is cleared.
    pub fn remove(&self, id: &str) -> Result<LayoutState> {
        if id == ROOT_ID {
            return Ok(self.clone());
        }
        let node = self
            .get_item(id)
            .ok_or_else(|| LayoutError::NodeNotFound(id.to_string()))?;

        let mut next = self.clone();
        if let Some(parent) = &node.parent {
            if next.contains(parent) {
                next.patch_in_place(parent, &NodePatch::new().remove_child(id))?;
            }
        }

        let mut doomed = self.descendants(id);
        doomed.push(id.to_string());
        for gone in &doomed {
            next.items.remove(gone.as_str());
        }
        if next
            .selected
            .as_ref()
            .is_some_and(|selected| doomed.contains(selected))
        {
            next.selected = None;
        }
        next.revision += 1;

        tracing::debug!(id, removed = doomed.len(), "removed subtree");
        Ok(next)
    }

    /// Select `id`, or clear the selection with `None`.
    ///
    /// Re-selecting the current selection returns an identical snapshot.
    pub fn select(&self, id: Option<&str>) -> LayoutState {
        if self.selected.as_deref() == id {
            return self.clone();
        }
        let mut next = self.clone();
        next.selected = id.map(str::to_string);
        next.revision += 1;
        next
    }

    // ====================================================================
    // Internals
    // ====================================================================

    /// Whether `ancestor` lies on the parent chain above `id`.
    fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut cursor = self.get_item(id).and_then(|n| n.parent.as_deref());
        let mut steps = 0;
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.items.len() {
                return false;
            }
            cursor = self.get_item(parent).and_then(|n| n.parent.as_deref());
        }
        false
    }

    /// Copy-on-write edit of one row of a snapshot that is still being built.
    fn patch_in_place(&mut self, id: &str, patch: &NodePatch) -> Result<()> {
        let current = self
            .items
            .get(id)
            .ok_or_else(|| LayoutError::NodeNotFound(id.to_string()))?;
        let mut node = Node::clone(current);
        patch.apply(&mut node)?;
        self.items.insert(id.to_string(), Arc::new(node));
        Ok(())
    }
}

impl Default for LayoutState {
    /// A `Column` root with empty props and style.
    fn default() -> Self {
        let mut root = Node::new(ROOT_ID, "Column");
        root.style = Some(Props::new());
        Self::from_nodes(std::iter::once(root))
    }
}
