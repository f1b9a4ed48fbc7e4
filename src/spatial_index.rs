//! Spatial Index Module
//!
//! R-tree mirror of item scene bounds for hit testing, marquee selection,
//! overlap queries and paint culling. Point and range queries are O(log n).

use crate::geometry::{Point, Rect};
use crate::types::ItemId;
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// An item's axis-aligned scene bounds.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub item_id: ItemId,
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl SpatialEntry {
    pub fn new(item_id: ItemId, rect: Rect) -> Self {
        Self {
            item_id,
            min: [rect.left(), rect.top()],
            max: [rect.right(), rect.bottom()],
        }
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min[0] && p.x <= self.max[0] && p.y >= self.min[1] && p.y <= self.max[1]
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.item_id == other.item_id
    }
}

/// Spatial index over item bounds.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<ItemId, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            entries: HashMap::new(),
        }
    }

    /// Insert or replace the bounds of `item_id`.
    pub fn insert(&mut self, item_id: ItemId, rect: Rect) {
        if let Some(old_entry) = self.entries.remove(&item_id) {
            self.tree.remove(&old_entry);
        }

        let entry = SpatialEntry::new(item_id, rect);
        self.tree.insert(entry);
        self.entries.insert(item_id, entry);
    }

    pub fn remove(&mut self, item_id: ItemId) -> bool {
        if let Some(entry) = self.entries.remove(&item_id) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    pub fn update(&mut self, item_id: ItemId, rect: Rect) {
        self.insert(item_id, rect);
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.entries.contains_key(&item_id)
    }

    /// All items whose bounds contain `p`, in no particular order.
    pub fn query_point(&self, p: Point) -> Vec<ItemId> {
        let point_envelope = AABB::from_point([p.x, p.y]);

        self.tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.contains_point(p))
            .map(|entry| entry.item_id)
            .collect()
    }

    /// All items whose bounds intersect `rect`, touching edges included.
    pub fn query_rect(&self, rect: Rect) -> Vec<ItemId> {
        let envelope = AABB::from_corners([rect.left(), rect.top()], [rect.right(), rect.bottom()]);

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.item_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rebuild<I>(&mut self, items: I)
    where
        I: Iterator<Item = (ItemId, Rect)>,
    {
        let entries: Vec<SpatialEntry> = items.map(|(id, rect)| SpatialEntry::new(id, rect)).collect();

        self.entries = entries.iter().map(|e| (e.item_id, *e)).collect();
        self.tree = RTree::bulk_load(entries);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
