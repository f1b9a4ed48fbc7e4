use super::Packer;
use crate::geometry::{Point, Size};

/// Greedy row packer.
///
/// Rectangles are sorted by height (shortest first, input order breaks ties)
/// and laid left to right. A new row starts when the next rectangle would
/// push the row past twice the widest rectangle; the next row begins below
/// the tallest rectangle of the current one.
#[derive(Clone, Copy, Debug, Default)]
pub struct RowPacker;

impl RowPacker {
    /// Row width budget: twice the widest non-empty rectangle.
    pub fn budget(sizes: &[Size]) -> f64 {
        sizes
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.width)
            .fold(0.0, f64::max)
            * 2.0
    }
}

impl Packer for RowPacker {
    fn pack(&self, sizes: &[Size]) -> Vec<Point> {
        let mut offsets = vec![Point::ZERO; sizes.len()];
        let budget = Self::budget(sizes);

        let mut order: Vec<usize> = (0..sizes.len()).filter(|&i| !sizes[i].is_empty()).collect();
        order.sort_by(|&a, &b| sizes[a].height.total_cmp(&sizes[b].height));

        let mut x = 0.0;
        let mut y = 0.0;
        let mut row_height: f64 = 0.0;

        for i in order {
            let Size { width, height } = sizes[i];
            if x > 0.0 && x + width > budget {
                x = 0.0;
                y += row_height;
                row_height = 0.0;
            }
            offsets[i] = Point::new(x, y);
            x += width;
            row_height = row_height.max(height);
        }

        offsets
    }

    /// The block grows toward the requested origin.
    fn anchor(&self, origin: Point, sizes: &[Size]) -> Point {
        let budget = Self::budget(sizes);
        origin - Point::new(budget, budget)
    }
}
