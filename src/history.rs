//! Undo/redo history for board mutations
//!
//! Commands are recorded after their effect is already live in the scene.
//! The history is one bounded stack with a cursor: entries below the cursor
//! are done, entries above it are undone. Pushing while undone entries exist
//! discards them.

use crate::constants::MAX_HISTORY_COMMANDS;
use crate::geometry::Point;
use crate::scene::Scene;
use crate::types::ItemId;
use std::collections::VecDeque;
use tracing::debug;

/// One item's position before and after a move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemMove {
    pub id: ItemId,
    pub from: Point,
    pub to: Point,
}

/// Moved items, with exact endpoints so undo and redo restore bit-identical
/// positions.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveCommand {
    pub moves: Vec<ItemMove>,
}

impl MoveCommand {
    pub fn new(moves: Vec<ItemMove>) -> Self {
        Self { moves }
    }

    /// Describe translating `ids` by `offset` from their current positions.
    /// Unknown ids are skipped.
    pub fn from_offset(scene: &Scene, ids: &[ItemId], offset: Point) -> Self {
        let moves = ids
            .iter()
            .filter_map(|&id| scene.get(id))
            .map(|item| ItemMove {
                id: item.id,
                from: item.position(),
                to: item.position() + offset,
            })
            .collect();
        Self { moves }
    }

    /// True when nothing actually changes position.
    pub fn is_noop(&self) -> bool {
        self.moves.iter().all(|m| m.from == m.to)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.moves.iter().map(|m| m.id).collect()
    }
}

/// Horizontally mirrored items. Flip is its own inverse.
#[derive(Clone, Debug, PartialEq)]
pub struct FlipCommand {
    pub ids: Vec<ItemId>,
}

/// Soft-deleted items.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteCommand {
    pub ids: Vec<ItemId>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Move(MoveCommand),
    Flip(FlipCommand),
    Delete(DeleteCommand),
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Command::Move(_) => "Move",
            Command::Flip(_) => "Flip",
            Command::Delete(_) => "Delete",
        }
    }

    pub fn undo(&self, scene: &mut Scene) {
        match self {
            Command::Move(cmd) => {
                for m in &cmd.moves {
                    scene.set_position(m.id, m.from);
                }
            }
            Command::Flip(cmd) => {
                for &id in &cmd.ids {
                    scene.update_item(id, |item| item.flip());
                }
            }
            Command::Delete(cmd) => scene.restore(&cmd.ids),
        }
    }

    pub fn redo(&self, scene: &mut Scene) {
        match self {
            Command::Move(cmd) => {
                for m in &cmd.moves {
                    scene.set_position(m.id, m.to);
                }
            }
            Command::Flip(cmd) => {
                for &id in &cmd.ids {
                    scene.update_item(id, |item| item.flip());
                }
            }
            Command::Delete(cmd) => scene.soft_delete(&cmd.ids),
        }
    }

    /// Items this command keeps alive in soft-deleted form.
    pub fn deleted_ids(&self) -> &[ItemId] {
        match self {
            Command::Delete(cmd) => &cmd.ids,
            _ => &[],
        }
    }
}

/// Bounded linear undo stack with clean-state tracking
pub struct History {
    commands: VecDeque<Command>,
    /// Number of commands currently applied
    index: usize,
    capacity: usize,
    /// Cursor position at the last save, `None` when unreachable
    clean_index: Option<usize>,
}

impl History {
    /// Create a history with the default capacity (50)
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_COMMANDS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: VecDeque::with_capacity(capacity.min(MAX_HISTORY_COMMANDS)),
            index: 0,
            capacity: capacity.max(1),
            clean_index: Some(0),
        }
    }

    /// Record a command whose effect is already applied.
    ///
    /// Returns every command that became unreachable: the truncated redo
    /// chain and, if over capacity, the evicted oldest entry.
    pub fn push(&mut self, command: Command) -> Vec<Command> {
        let mut dropped: Vec<Command> = self.commands.drain(self.index..).collect();
        if self.clean_index.is_some_and(|clean| clean > self.index) {
            self.clean_index = None;
        }

        self.commands.push_back(command);
        self.index += 1;

        while self.commands.len() > self.capacity {
            if let Some(oldest) = self.commands.pop_front() {
                debug!(label = oldest.label(), "evicted oldest history entry");
                dropped.push(oldest);
            }
            self.index -= 1;
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(clean) => Some(clean - 1),
            };
        }

        dropped
    }

    /// Undo the most recent command. No-op at the bottom of the stack.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.commands[self.index].undo(scene);
        true
    }

    /// Redo the next undone command. No-op at the top of the stack.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        if self.index >= self.commands.len() {
            return false;
        }
        self.commands[self.index].redo(scene);
        self.index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.commands.len()
    }

    /// Label of the command `undo` would revert
    pub fn undo_label(&self) -> Option<&'static str> {
        self.index.checked_sub(1).map(|i| self.commands[i].label())
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.commands.get(self.index).map(Command::label)
    }

    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.index)
    }

    /// Mark the current position as saved
    pub fn set_clean(&mut self) {
        self.clean_index = Some(self.index);
    }

    /// Forget the saved position; the history stays dirty until the next save
    pub fn reset_clean(&mut self) {
        self.clean_index = None;
    }

    /// Drop every command and start clean
    pub fn clear(&mut self) {
        self.commands.clear();
        self.index = 0;
        self.clean_index = Some(0);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Cursor position: how many commands are currently applied
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
