//! Selection-level edits, packing and undo/redo.

use super::Board;
use crate::error::BoardResult;
use crate::geometry::Point;
use crate::history::{Command, DeleteCommand, FlipCommand, ItemMove, MoveCommand};
use crate::packing::{pack_rects, packing_size};
use crate::render::RenderOptions;
use crate::types::{Item, ItemConfig, ItemId};
use tracing::{debug, info};

impl Board {
    /// Insert an already decoded item. Not undoable, like imports.
    pub fn add_item(&mut self, config: ItemConfig) -> BoardResult<ItemId> {
        let id = config.id;
        self.scene.insert(Item::new(config))?;
        self.refresh_scene_rect();
        Ok(id)
    }

    /// Lowest free item id, claimed for the caller.
    pub fn allocate_item_id(&mut self) -> ItemId {
        self.scene.allocate_id()
    }

    pub fn select_items(&mut self, ids: &[ItemId]) {
        self.scene.select_only(ids);
        self.notify();
    }

    pub fn select_all(&mut self) {
        self.scene.select_all();
        self.notify();
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
        self.notify();
    }

    /// Mirror every selected item. Returns false with an empty selection.
    pub fn flip_selection(&mut self) -> bool {
        let ids = self.scene.selected_ids();
        if ids.is_empty() {
            return false;
        }
        for &id in &ids {
            self.scene.update_item(id, |item| item.flip());
        }
        self.record(Command::Flip(FlipCommand { ids }));
        self.notify();
        true
    }

    /// Soft-delete the selection. Items survive until no history entry can
    /// restore them.
    pub fn delete_selection(&mut self) -> bool {
        let ids = self.scene.selected_ids();
        if ids.is_empty() {
            return false;
        }
        self.scene.soft_delete(&ids);
        info!(count = ids.len(), "deleted selection");
        self.record(Command::Delete(DeleteCommand { ids }));
        self.refresh_scene_rect();
        self.notify();
        true
    }

    /// Rearrange the selection so no two bounding boxes overlap, as one
    /// undoable move. Returns false if nothing moved; a single item is
    /// already packed.
    pub fn pack_selection(&mut self, origin: Point) -> bool {
        let ids = self.scene.selected_ids();
        if ids.len() < 2 {
            return false;
        }
        let command = self.pack_command(&ids, origin);
        if command.is_noop() {
            return false;
        }
        let command = Command::Move(command);
        command.redo(&mut self.scene);
        self.record(command);
        self.refresh_scene_rect();
        self.notify();
        true
    }

    /// Moves that pack `ids` at `origin` with the configured strategy.
    pub(super) fn pack_command(&self, ids: &[ItemId], origin: Point) -> MoveCommand {
        let items: Vec<_> = ids.iter().filter_map(|&id| self.scene.get(id)).collect();
        let sizes: Vec<_> = items
            .iter()
            .map(|item| packing_size(&item.scene_rect()))
            .collect();
        let targets = pack_rects(self.config.packing, &sizes, origin);

        let moves = items
            .iter()
            .zip(targets)
            .map(|(item, target)| {
                let from = item.position();
                // Position and bounding-box corner differ under rotation and centering
                let to = from + (target - item.scene_rect().top_left());
                ItemMove { id: item.id, from, to }
            })
            .collect();
        debug!(count = ids.len(), strategy = ?self.config.packing, "packed");
        MoveCommand::new(moves)
    }

    /// Scale 1 and rotation 0 for the selection, centers kept. Like the
    /// rotate and scale gestures this is not recorded.
    pub fn reset_selection_transform(&mut self) {
        for id in self.scene.selected_ids() {
            self.scene.update_item(id, |item| item.reset_transform());
        }
        self.refresh_scene_rect();
    }

    /// Zoom 1, centered on the scene origin.
    pub fn reset_view(&mut self) {
        self.viewport.reset(None);
        self.refresh_scene_rect();
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let applied = self.history.undo(&mut self.scene);
        if applied {
            self.refresh_scene_rect();
        }
        self.notify();
        applied
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let applied = self.history.redo(&mut self.scene);
        if applied {
            self.refresh_scene_rect();
        }
        self.notify();
        applied
    }

    pub fn set_grayscale(&mut self, grayscale: bool) {
        self.set_render_options(RenderOptions {
            grayscale,
            ..self.render_options
        });
    }

    pub fn set_smooth_filtering(&mut self, smooth_filtering: bool) {
        self.set_render_options(RenderOptions {
            smooth_filtering,
            ..self.render_options
        });
    }
}
