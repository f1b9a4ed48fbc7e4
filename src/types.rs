//! Core types for the board canvas.
//!
//! An [`Item`] is one placed image. Its geometry is a local rectangle (the
//! pixmap, optionally offset so the origin sits at its center) mapped into the
//! scene by uniform scale, then rotation, then translation to `position`.

use crate::constants::{BORDER_COLOR, BORDER_WIDTH, SELECTED_BORDER_COLOR, SELECTED_BORDER_WIDTH};
use crate::geometry::{Point, Rect, Transform, normalize_degrees};
use crate::render::{Painter, Pen, RenderOptions};
use image::RgbaImage;
use image::imageops;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-unique item identifier, see [`crate::scene::IdAllocator`].
pub type ItemId = u64;

/// Current wall-clock time as unix seconds.
pub fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Everything needed to construct an [`Item`].
///
/// Only `id` and `pixels` are required; the rest default to an unrotated,
/// unscaled, unflipped item at the scene origin.
#[derive(Clone, Debug)]
pub struct ItemConfig {
    pub id: ItemId,
    /// Display name or original file name
    pub path: String,
    /// Normalized format tag (`"png"`, `"jpg"`, ...)
    pub format: String,
    pub position: Point,
    pub scale: f64,
    /// Degrees
    pub rotation: f64,
    pub z: f64,
    /// When set, the decoded pixels are mirrored on construction.
    pub flipped: bool,
    /// Put the local origin at the visual center instead of the top-left.
    pub centered: bool,
    pub created: f64,
    pub modified: f64,
    /// Decoded pixels, unflipped
    pub pixels: RgbaImage,
    /// Original encoded bytes
    pub source: Arc<[u8]>,
}

impl ItemConfig {
    pub fn new(id: ItemId, pixels: RgbaImage) -> Self {
        let now = now_seconds();
        Self {
            id,
            path: String::new(),
            format: String::new(),
            position: Point::ZERO,
            scale: 1.0,
            rotation: 0.0,
            z: 0.0,
            flipped: false,
            centered: false,
            created: now,
            modified: now,
            pixels,
            source: Arc::from(Vec::new()),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    pub fn with_times(mut self, created: f64, modified: f64) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }

    pub fn with_source(mut self, source: impl Into<Arc<[u8]>>) -> Self {
        self.source = source.into();
        self
    }
}

/// One placed image on the board.
#[derive(Clone, Debug)]
pub struct Item {
    pub id: ItemId,
    pub path: String,
    pub format: String,
    pub created: f64,
    pub modified: f64,
    /// Original encoded bytes; never mirrored, the flip flag is stored instead.
    pub source: Arc<[u8]>,
    pixels: RgbaImage,
    position: Point,
    offset: Point,
    scale: f64,
    rotation: f64,
    flipped: bool,
    z: f64,
    selected: bool,
    deleted: bool,
}

impl Item {
    pub fn new(config: ItemConfig) -> Self {
        let (w, h) = config.pixels.dimensions();
        let offset = if config.centered {
            Point::new(-(w as f64) / 2.0, -(h as f64) / 2.0)
        } else {
            Point::ZERO
        };
        debug_assert!(config.scale > 0.0, "item scale must be positive");

        let mut item = Self {
            id: config.id,
            path: config.path,
            format: config.format,
            created: config.created,
            modified: config.modified,
            source: config.source,
            pixels: config.pixels,
            position: config.position,
            offset,
            scale: config.scale,
            rotation: normalize_degrees(config.rotation),
            flipped: false,
            z: config.z,
            selected: false,
            deleted: false,
        };
        if config.flipped {
            item.flip();
        }
        item
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// True when the local origin is the pixmap center.
    pub fn is_centered(&self) -> bool {
        self.offset != Point::ZERO
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// No range check beyond positivity; gestures clamp before calling.
    pub fn set_scale(&mut self, scale: f64) {
        debug_assert!(scale > 0.0, "item scale must be positive");
        self.scale = scale;
    }

    /// Degrees in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn set_z(&mut self, z: f64) {
        self.z = z;
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The pixmap rectangle in item-local coordinates.
    pub fn local_rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.pixels.width() as f64,
            self.pixels.height() as f64,
        )
    }

    /// Local to scene: scale, then rotate, then translate.
    pub fn transform(&self) -> Transform {
        Transform::scaling(self.scale, self.scale)
            .then(&Transform::rotation(self.rotation))
            .then(&Transform::translation(self.position.x, self.position.y))
    }

    /// Axis-aligned bounds of the item in scene coordinates.
    pub fn scene_rect(&self) -> Rect {
        self.transform().map_rect(&self.local_rect())
    }

    /// Scene-space center of the pixmap.
    pub fn center(&self) -> Point {
        self.transform().map_point(self.local_rect().center())
    }

    /// Exact hit test against the rotated pixmap rectangle.
    pub fn contains_scene_point(&self, p: Point) -> bool {
        self.transform()
            .inverse()
            .is_some_and(|inv| self.local_rect().contains(inv.map_point(p)))
    }

    /// Scale 1 and rotation 0 while keeping the visual center in place.
    pub fn reset_transform(&mut self) {
        let center = self.center();
        self.scale = 1.0;
        self.rotation = 0.0;
        self.position = center - self.local_rect().center();
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Mirror the pixels horizontally and toggle the flip flag.
    pub fn flip(&mut self) {
        imageops::flip_horizontal_in_place(&mut self.pixels);
        self.flipped = !self.flipped;
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Pixels as they were before any flip.
    pub fn unflipped_pixels(&self) -> RgbaImage {
        if self.flipped {
            imageops::flip_horizontal(&self.pixels)
        } else {
            self.pixels.clone()
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Prefer [`crate::scene::Scene::set_selected`], which keeps the
    /// selection count observable.
    pub(crate) fn set_selected_flag(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn set_deleted_flag(&mut self, deleted: bool) {
        self.deleted = deleted;
        if deleted {
            self.selected = false;
        }
    }

    /// Draw the pixmap and a cosmetic outline.
    pub fn paint(&self, painter: &mut dyn Painter, options: &RenderOptions) {
        let transform = self.transform();
        let image_transform = Transform::translation(self.offset.x, self.offset.y).then(&transform);
        painter.draw_image(&image_transform, &self.pixels, options);

        let pen = if self.selected {
            Pen::cosmetic(SELECTED_BORDER_COLOR, SELECTED_BORDER_WIDTH)
        } else {
            Pen::cosmetic(BORDER_COLOR, BORDER_WIDTH)
        };
        painter.stroke_rect(&transform, self.local_rect(), pen);
    }
}
