//! The scene: authoritative owner of every item on the board.
//!
//! Items are keyed by id. Live (not soft-deleted) items are mirrored in a
//! [`SpatialIndex`] so point, band and overlap queries do not walk the whole
//! board. Any geometry change must go through [`Scene::update_item`] (or one of
//! the helpers built on it) so the index stays in sync.

use crate::constants::BACKDROP_COLOR;
use crate::error::{BoardError, BoardResult};
use crate::geometry::{Point, Rect};
use crate::render::{Painter, RenderOptions};
use crate::spatial_index::SpatialIndex;
use crate::types::{Item, ItemId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Hands out the smallest id not currently held.
///
/// Ids stay claimed while an item is soft-deleted and are released only when
/// the item is destroyed.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    used: BTreeSet<ItemId>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim and return the lowest free id.
    pub fn allocate(&mut self) -> ItemId {
        let mut candidate: ItemId = 0;
        for &id in &self.used {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        self.used.insert(candidate);
        candidate
    }

    /// Mark a specific id as used. Returns false if it already was.
    pub fn claim(&mut self, id: ItemId) -> bool {
        self.used.insert(id)
    }

    pub fn release(&mut self, id: ItemId) -> bool {
        self.used.remove(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.used.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn clear(&mut self) {
        self.used.clear();
    }
}

#[derive(Default)]
pub struct Scene {
    items: BTreeMap<ItemId, Item>,
    index: SpatialIndex,
    ids: IdAllocator,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    pub fn allocate_id(&mut self) -> ItemId {
        self.ids.allocate()
    }

    /// Release an id that was allocated but never turned into an item.
    pub fn release_id(&mut self, id: ItemId) {
        if !self.items.contains_key(&id) {
            self.ids.release(id);
        }
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    // ------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------

    /// Add an item. Its id is claimed if it was not allocated here.
    pub fn insert(&mut self, item: Item) -> BoardResult<()> {
        let id = item.id;
        if self.items.contains_key(&id) {
            return Err(BoardError::DuplicateItem(id));
        }
        self.ids.claim(id);
        if !item.is_deleted() {
            self.index.insert(id, item.scene_rect());
        }
        self.items.insert(id, item);
        Ok(())
    }

    /// Destroy an item and release its id.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let item = self.items.remove(&id)?;
        self.index.remove(id);
        self.ids.release(id);
        Some(item)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Mutate an item and refresh its index entry.
    pub fn update_item<R>(&mut self, id: ItemId, f: impl FnOnce(&mut Item) -> R) -> Option<R> {
        let item = self.items.get_mut(&id)?;
        let result = f(item);
        if !item.is_deleted() {
            self.index.update(id, item.scene_rect());
        }
        Some(result)
    }

    pub fn set_position(&mut self, id: ItemId, position: Point) -> bool {
        self.update_item(id, |item| item.set_position(position)).is_some()
    }

    /// Every item, soft-deleted ones included, in id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Items that are not soft-deleted, in id order.
    pub fn live_items(&self) -> impl Iterator<Item = &Item> {
        self.items.values().filter(|item| !item.is_deleted())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn live_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.ids.clear();
    }

    /// Bulk-load the index from the live items, replacing incremental
    /// inserts with a balanced tree.
    pub fn reindex(&mut self) {
        self.index.rebuild(
            self.items
                .values()
                .filter(|item| !item.is_deleted())
                .map(|item| (item.id, item.scene_rect())),
        );
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selected ids in id order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.live_items()
            .filter(|item| item.is_selected())
            .map(|item| item.id)
            .collect()
    }

    pub fn selection_count(&self) -> usize {
        self.live_items().filter(|item| item.is_selected()).count()
    }

    /// Returns true when the flag changed. Deleted items cannot be selected.
    pub fn set_selected(&mut self, id: ItemId, selected: bool) -> bool {
        match self.items.get_mut(&id) {
            Some(item) if !item.is_deleted() && item.is_selected() != selected => {
                item.set_selected_flag(selected);
                true
            }
            _ => false,
        }
    }

    pub fn toggle_selected(&mut self, id: ItemId) -> bool {
        let selected = self.get(id).is_some_and(|item| item.is_selected());
        self.set_selected(id, !selected)
    }

    pub fn clear_selection(&mut self) {
        for item in self.items.values_mut() {
            item.set_selected_flag(false);
        }
    }

    pub fn select_only(&mut self, ids: &[ItemId]) {
        self.clear_selection();
        for &id in ids {
            self.set_selected(id, true);
        }
    }

    pub fn select_all(&mut self) {
        for item in self.items.values_mut() {
            if !item.is_deleted() {
                item.set_selected_flag(true);
            }
        }
    }

    /// Live items whose bounds intersect `rect`, in id order.
    pub fn items_in_rect(&self, rect: Rect) -> Vec<ItemId> {
        let mut ids = self.index.query_rect(rect);
        ids.sort_unstable();
        ids
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Topmost live item under `p`, using the exact rotated outline.
    pub fn item_at(&self, p: Point) -> Option<ItemId> {
        self.index
            .query_point(p)
            .into_iter()
            .filter_map(|id| self.items.get(&id))
            .filter(|item| item.contains_scene_point(p))
            .max_by(|a, b| a.z().total_cmp(&b.z()).then(a.id.cmp(&b.id)))
            .map(|item| item.id)
    }

    /// Raise `id` above every live item whose bounds overlap it.
    pub fn send_to_front(&mut self, id: ItemId) {
        let Some(item) = self.items.get(&id) else {
            return;
        };
        let max_z = self
            .index
            .query_rect(item.scene_rect())
            .into_iter()
            .filter(|other| *other != id)
            .filter_map(|other| self.items.get(&other))
            .map(Item::z)
            .fold(0.0_f64, f64::max);
        if let Some(item) = self.items.get_mut(&id) {
            item.set_z(max_z + 1.0);
        }
    }

    /// Union of the scene bounds of every live item.
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.live_items()
            .map(Item::scene_rect)
            .reduce(|acc, rect| acc.united(&rect))
    }

    /// Union of the scene bounds of the given items.
    pub fn bounds_of(&self, ids: &[ItemId]) -> Option<Rect> {
        ids.iter()
            .filter_map(|id| self.items.get(id))
            .map(Item::scene_rect)
            .reduce(|acc, rect| acc.united(&rect))
    }

    // ------------------------------------------------------------------
    // Soft delete
    // ------------------------------------------------------------------

    /// Hide items without destroying them. Their ids stay claimed.
    pub fn soft_delete(&mut self, ids: &[ItemId]) {
        for &id in ids {
            if let Some(item) = self.items.get_mut(&id) {
                item.set_deleted_flag(true);
                self.index.remove(id);
            }
        }
    }

    /// Undo a soft delete. Items come back unselected at their old geometry.
    pub fn restore(&mut self, ids: &[ItemId]) {
        for &id in ids {
            if let Some(item) = self.items.get_mut(&id) {
                item.set_deleted_flag(false);
                self.index.insert(id, item.scene_rect());
            }
        }
    }

    /// Destroy those of `ids` that are still soft-deleted.
    pub fn purge_deleted(&mut self, ids: &[ItemId]) -> usize {
        let doomed: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| self.items.get(id).is_some_and(Item::is_deleted))
            .collect();
        for &id in &doomed {
            self.remove(id);
        }
        if !doomed.is_empty() {
            debug!(count = doomed.len(), "purged deleted items");
        }
        doomed.len()
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    /// Paint the backdrop, then every live item intersecting `visible`, lowest
    /// z first.
    pub fn paint(&self, painter: &mut dyn Painter, visible: Rect, options: &RenderOptions) {
        crate::profile_scope!("scene_paint");

        if let Some(bounds) = self.bounding_rect() {
            painter.fill_rect(bounds, BACKDROP_COLOR);
        }

        let mut visible_items: Vec<&Item> = self
            .index
            .query_rect(visible)
            .into_iter()
            .filter_map(|id| self.items.get(&id))
            .collect();
        visible_items.sort_by(|a, b| a.z().total_cmp(&b.z()).then(a.id.cmp(&b.id)));

        for item in visible_items {
            item.paint(painter, options);
        }
    }
}
