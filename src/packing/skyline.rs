use super::Packer;
use crate::geometry::{Point, Size};

/// Bin widths tried, as multiples of the square root of the total area.
const AREA_WIDTH_FACTORS: [f64; 4] = [1.0, 1.25, 1.5, 2.0];

#[derive(Clone, Copy, Debug)]
struct Segment {
    x: f64,
    y: f64,
    width: f64,
}

/// One run of the skyline for a fixed bin width.
struct Layout {
    offsets: Vec<Point>,
    width: f64,
    height: f64,
}

impl Layout {
    fn area(&self) -> f64 {
        self.width * self.height
    }

    fn squareness(&self) -> f64 {
        (self.width - self.height).abs()
    }
}

/// Bottom-left skyline packer.
///
/// Rectangles are placed tallest first into a bin of fixed width, each at
/// the lowest point of the skyline where it fits (leftmost on ties). Several
/// bin widths are tried and the layout with the smallest bounding area is
/// kept; ties go to the squarer layout, then to the earlier candidate.
#[derive(Clone, Debug, Default)]
pub struct SkylinePacker {
    /// Extra bin widths to try in addition to the built-in candidates.
    pub extra_widths: Vec<f64>,
}

impl SkylinePacker {
    fn candidate_widths(&self, sizes: &[Size], order: &[usize]) -> Vec<f64> {
        let max_width = order.iter().map(|&i| sizes[i].width).fold(0.0, f64::max);
        let sum_width: f64 = order.iter().map(|&i| sizes[i].width).sum();
        let area: f64 = order.iter().map(|&i| sizes[i].area()).sum();
        let side = area.sqrt();

        let mut widths = vec![max_width];
        widths.extend(AREA_WIDTH_FACTORS.iter().map(|f| (side * f).ceil()));
        widths.extend(self.extra_widths.iter().copied());
        widths.push(sum_width);

        let mut candidates: Vec<f64> = Vec::with_capacity(widths.len());
        for w in widths {
            let w = w.max(max_width);
            if !candidates.contains(&w) {
                candidates.push(w);
            }
        }
        candidates
    }

    fn layout(sizes: &[Size], order: &[usize], bin_width: f64) -> Layout {
        let mut skyline = vec![Segment {
            x: 0.0,
            y: 0.0,
            width: bin_width,
        }];
        let mut offsets = vec![Point::ZERO; sizes.len()];
        let mut width: f64 = 0.0;
        let mut height: f64 = 0.0;

        for &i in order {
            let size = sizes[i];
            let mut best: Option<(usize, f64, f64)> = None;
            for start in 0..skyline.len() {
                if let Some(y) = fit(&skyline, start, size.width, bin_width) {
                    let x = skyline[start].x;
                    let better = match best {
                        None => true,
                        Some((_, bx, by)) => y < by || (y == by && x < bx),
                    };
                    if better {
                        best = Some((start, x, y));
                    }
                }
            }

            // Candidate widths are never narrower than the widest rectangle,
            // so the leftmost segment always fits.
            let (start, x, y) = best.unwrap_or((0, 0.0, max_height(&skyline)));
            place(&mut skyline, start, x, y + size.height, size.width);

            offsets[i] = Point::new(x, y);
            width = width.max(x + size.width);
            height = height.max(y + size.height);
        }

        Layout {
            offsets,
            width,
            height,
        }
    }
}

/// Height the rectangle would rest at when its left edge is at segment
/// `start`, or `None` if it would cross the bin's right edge.
fn fit(skyline: &[Segment], start: usize, width: f64, bin_width: f64) -> Option<f64> {
    let x = skyline[start].x;
    if x + width > bin_width {
        return None;
    }
    let mut y: f64 = 0.0;
    let mut remaining = width;
    for segment in &skyline[start..] {
        y = y.max(segment.y);
        if segment.width >= remaining {
            return Some(y);
        }
        remaining -= segment.width;
    }
    None
}

fn max_height(skyline: &[Segment]) -> f64 {
    skyline.iter().map(|s| s.y).fold(0.0, f64::max)
}

/// Raise the skyline over `[x, x + width)` to `top`.
fn place(skyline: &mut Vec<Segment>, start: usize, x: f64, top: f64, width: f64) {
    skyline.insert(start, Segment { x, y: top, width });

    let right = x + width;
    let i = start + 1;
    while i < skyline.len() {
        let seg = skyline[i];
        if seg.x >= right {
            break;
        }
        let overlap = right - seg.x;
        if seg.width <= overlap {
            skyline.remove(i);
        } else {
            skyline[i].x += overlap;
            skyline[i].width -= overlap;
            break;
        }
    }

    let mut i = 0;
    while i + 1 < skyline.len() {
        if skyline[i].y == skyline[i + 1].y {
            skyline[i].width += skyline[i + 1].width;
            skyline.remove(i + 1);
        } else {
            i += 1;
        }
    }
}

impl Packer for SkylinePacker {
    fn pack(&self, sizes: &[Size]) -> Vec<Point> {
        let mut order: Vec<usize> = (0..sizes.len()).filter(|&i| !sizes[i].is_empty()).collect();
        if order.is_empty() {
            return vec![Point::ZERO; sizes.len()];
        }
        order.sort_by(|&a, &b| {
            sizes[b]
                .height
                .total_cmp(&sizes[a].height)
                .then(sizes[b].width.total_cmp(&sizes[a].width))
                .then(a.cmp(&b))
        });

        let mut best: Option<Layout> = None;
        for bin_width in self.candidate_widths(sizes, &order) {
            let layout = Self::layout(sizes, &order, bin_width);
            let better = match &best {
                None => true,
                Some(b) => {
                    layout.area() < b.area()
                        || (layout.area() == b.area() && layout.squareness() < b.squareness())
                }
            };
            if better {
                best = Some(layout);
            }
        }

        best.map(|layout| layout.offsets)
            .unwrap_or_else(|| vec![Point::ZERO; sizes.len()])
    }
}
