//! Rectangle packing for the pack-selection operation.
//!
//! A packer takes the sizes of a set of axis-aligned rectangles and returns
//! one top-left offset per rectangle, in input order, such that no two
//! placed rectangles overlap. Packers are pure and deterministic for a given
//! input order. Rectangles with a zero or negative side are left at the
//! origin and ignored when placing the others.

mod row;
mod skyline;

pub use row::RowPacker;
pub use skyline::SkylinePacker;

use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Which packer the board uses for pack-selection and drops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingStrategy {
    /// Rows sorted by height with a width budget of twice the widest item.
    Row,
    /// Bottom-left skyline trying several bin widths, smallest bounds wins.
    #[default]
    Skyline,
}

pub trait Packer {
    /// Offsets relative to the block's top-left, one per input size.
    fn pack(&self, sizes: &[Size]) -> Vec<Point>;

    /// Scene point where the block's offset (0, 0) lands for a pack requested
    /// at `origin`.
    fn anchor(&self, origin: Point, _sizes: &[Size]) -> Point {
        origin
    }
}

impl PackingStrategy {
    pub fn packer(self) -> Box<dyn Packer> {
        match self {
            PackingStrategy::Row => Box::new(RowPacker),
            PackingStrategy::Skyline => Box::new(SkylinePacker::default()),
        }
    }
}

/// Pack `sizes` with `strategy`, returning final top-left positions for a
/// block requested at `origin`.
pub fn pack_rects(strategy: PackingStrategy, sizes: &[Size], origin: Point) -> Vec<Point> {
    crate::profile_scope!("pack_rects");

    let packer = strategy.packer();
    let anchor = packer.anchor(origin, sizes);
    packer
        .pack(sizes)
        .into_iter()
        .map(|offset| anchor + offset)
        .collect()
}

/// Packing size for a scene rectangle: both sides rounded up so fractional
/// extents can never produce overlap.
pub fn packing_size(rect: &Rect) -> Size {
    Size::new(rect.width.ceil(), rect.height.ceil())
}

/// True when no two non-empty placed rectangles share interior area.
pub fn is_overlap_free(sizes: &[Size], offsets: &[Point]) -> bool {
    let rects: Vec<Rect> = sizes
        .iter()
        .zip(offsets)
        .filter(|(size, _)| !size.is_empty())
        .map(|(size, offset)| Rect::from_origin_size(*offset, *size))
        .collect();
    rects.iter().enumerate().all(|(i, a)| {
        rects[i + 1..]
            .iter()
            .all(|b| a.intersection_area(b) == 0.0)
    })
}
