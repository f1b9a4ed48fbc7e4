//! Rendering contract.
//!
//! The board never touches a graphics API directly. Hosts implement [`Painter`]
//! over whatever surface they draw to; the scene walks its items bottom-up and
//! issues draw calls through it. Pen widths are cosmetic: they are device pixels
//! and must not be scaled by the view transform.

use crate::geometry::{Rect, Transform};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Toggles exposed by the host's view menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Draw images desaturated.
    pub grayscale: bool,
    /// Use smooth (bilinear) filtering when images are scaled.
    pub smooth_filtering: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            grayscale: false,
            smooth_filtering: true,
        }
    }
}

/// Outline style. `width` is in device pixels regardless of zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: [u8; 4],
    pub width: f64,
}

impl Pen {
    pub const fn cosmetic(color: [u8; 4], width: f64) -> Self {
        Self { color, width }
    }
}

/// Drawing surface implemented by the host.
///
/// Every geometric argument is in scene coordinates. `begin_frame` hands the
/// painter the scene-to-device transform for the frame.
pub trait Painter {
    fn begin_frame(&mut self, view: &Transform);

    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]);

    /// Draw `image` with its top-left at the local origin of `transform`.
    fn draw_image(&mut self, transform: &Transform, image: &RgbaImage, options: &RenderOptions);

    /// Stroke `rect` (in the local space of `transform`) with a cosmetic pen.
    fn stroke_rect(&mut self, transform: &Transform, rect: Rect, pen: Pen);
}

/// A recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    BeginFrame(Transform),
    FillRect {
        rect: Rect,
        color: [u8; 4],
    },
    DrawImage {
        transform: Transform,
        width: u32,
        height: u32,
        options: RenderOptions,
    },
    StrokeRect {
        transform: Transform,
        rect: Rect,
        pen: Pen,
    },
}

/// Painter that records calls instead of drawing. Handy for headless hosts
/// and for asserting paint order.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub ops: Vec<PaintOp>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of images drawn so far.
    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::DrawImage { .. }))
            .count()
    }

    /// Pens used for outlines, in draw order.
    pub fn outline_pens(&self) -> Vec<Pen> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::StrokeRect { pen, .. } => Some(*pen),
                _ => None,
            })
            .collect()
    }
}

impl Painter for RecordingPainter {
    fn begin_frame(&mut self, view: &Transform) {
        self.ops.clear();
        self.ops.push(PaintOp::BeginFrame(*view));
    }

    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        self.ops.push(PaintOp::FillRect { rect, color });
    }

    fn draw_image(&mut self, transform: &Transform, image: &RgbaImage, options: &RenderOptions) {
        self.ops.push(PaintOp::DrawImage {
            transform: *transform,
            width: image.width(),
            height: image.height(),
            options: *options,
        });
    }

    fn stroke_rect(&mut self, transform: &Transform, rect: Rect, pen: Pen) {
        self.ops.push(PaintOp::StrokeRect {
            transform: *transform,
            rect,
            pen,
        });
    }
}
