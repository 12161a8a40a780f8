//! The editing session: the one writer holding the current snapshot.

use serde::{Deserialize, Serialize};
use trellis_layout::{LayoutError, LayoutState, NodeId, NodePatch, Placement};

/// One editing command, as sent by the builder UI.
///
/// Serialized with a `command` tag:
///
/// ```json
/// {"command": "insert_or_move", "parent": "root", "index": 0, "item": {"type": "Button"}}
/// {"command": "select", "id": null}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditCommand {
    InsertOrMove {
        parent: NodeId,
        index: usize,
        item: Placement,
    },
    Update {
        id: NodeId,
        patch: NodePatch,
    },
    Remove {
        id: NodeId,
    },
    Select {
        #[serde(default)]
        id: Option<NodeId>,
    },
}

/// Holds the current snapshot and swaps it after each successful command.
#[derive(Clone, Debug, Default)]
pub struct Session {
    current: LayoutState,
}

impl Session {
    pub fn new(state: LayoutState) -> Self {
        Self { current: state }
    }

    pub fn state(&self) -> &LayoutState {
        &self.current
    }

    /// Replace the current snapshot, returning the old one.
    pub fn replace(&mut self, state: LayoutState) -> LayoutState {
        std::mem::replace(&mut self.current, state)
    }

    pub fn into_state(self) -> LayoutState {
        self.current
    }

    /// Apply one command. On failure the current snapshot is untouched.
    ///
    /// Returns the placed id for `InsertOrMove`.
    pub fn apply(&mut self, command: EditCommand) -> Result<Option<NodeId>, LayoutError> {
        let (next, placed) = transition(&self.current, command)?;
        if next.revision() != self.current.revision() {
            tracing::debug!(revision = next.revision(), nodes = next.len(), "applied command");
        }
        self.current = next;
        Ok(placed)
    }

    /// Apply every command, or none of them.
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = EditCommand>,
    ) -> Result<Vec<Option<NodeId>>, LayoutError> {
        let mut state = self.current.clone();
        let mut placed = Vec::new();
        for command in commands {
            let (next, id) = transition(&state, command)?;
            state = next;
            placed.push(id);
        }
        tracing::debug!(revision = state.revision(), commands = placed.len(), "applied batch");
        self.current = state;
        Ok(placed)
    }
}

fn transition(
    state: &LayoutState,
    command: EditCommand,
) -> Result<(LayoutState, Option<NodeId>), LayoutError> {
    Ok(match command {
        EditCommand::InsertOrMove {
            parent,
            index,
            item,
        } => {
            let edit = state.insert_or_move(&parent, index, item)?;
            (edit.state, Some(edit.id))
        }
        EditCommand::Update { id, patch } => (state.update(&id, &patch)?, None),
        EditCommand::Remove { id } => (state.remove(&id)?, None),
        EditCommand::Select { id } => (state.select(id.as_deref()), None),
    })
}
