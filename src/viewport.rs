//! Viewport and coordinate mapping for the infinite canvas.
//!
//! Maps between device pixels (the host widget, (0,0) at its top-left) and
//! scene coordinates. Also tracks the scrollable scene rectangle, which grows
//! while the user pans and zooms so the view is never clipped.

use crate::config::BoardConfig;
use crate::geometry::{Point, Rect, Size, Transform};

/// Zoom and pan state.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Device pixels per scene unit.
    zoom: f64,
    /// Scene point shown at device (0, 0).
    origin: Point,
    /// Device size of the view.
    size: Size,
    /// Scrollable region in scene coordinates.
    scene_rect: Option<Rect>,
    zoom_min: f64,
    zoom_max: f64,
    zoom_step: f64,
    padding: f64,
}

impl Viewport {
    pub fn new(size: Size, config: &BoardConfig) -> Self {
        let mut viewport = Self {
            zoom: 1.0,
            origin: Point::ZERO,
            size,
            scene_rect: None,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
            zoom_step: config.zoom_step,
            padding: config.scene_padding,
        };
        viewport.center_on(Point::ZERO);
        viewport
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom keeping the view center fixed. Clamped to the limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        let center = self.center();
        self.zoom = zoom.clamp(self.zoom_min, self.zoom_max);
        self.center_on(center);
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize keeping the scene point at the view center fixed.
    pub fn set_size(&mut self, size: Size) {
        let center = self.center();
        self.size = size;
        self.center_on(center);
        self.ensure_scene_covers_view();
    }

    pub fn scene_rect(&self) -> Option<Rect> {
        self.scene_rect
    }

    // ------------------------------------------------------------------
    // Mapping
    // ------------------------------------------------------------------

    #[inline]
    pub fn map_to_scene(&self, device: Point) -> Point {
        self.origin + device * (1.0 / self.zoom)
    }

    #[inline]
    pub fn map_from_scene(&self, scene: Point) -> Point {
        (scene - self.origin) * self.zoom
    }

    /// Device-space delta as a scene-space delta.
    #[inline]
    pub fn delta_to_scene(&self, delta: Point) -> Point {
        delta * (1.0 / self.zoom)
    }

    /// Scene to device transform, handed to painters.
    pub fn transform(&self) -> Transform {
        Transform::translation(-self.origin.x, -self.origin.y)
            .then(&Transform::scaling(self.zoom, self.zoom))
    }

    /// The scene area currently on screen.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(
            self.origin,
            Size::new(self.size.width / self.zoom, self.size.height / self.zoom),
        )
    }

    /// Scene point at the middle of the view.
    pub fn center(&self) -> Point {
        self.map_to_scene(Point::new(self.size.width / 2.0, self.size.height / 2.0))
    }

    pub fn center_on(&mut self, scene: Point) {
        self.origin = scene - Point::new(self.size.width, self.size.height) * (0.5 / self.zoom);
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Pan so the scene follows the pointer from `last` to `current` (device).
    pub fn pan(&mut self, last: Point, current: Point) {
        self.ensure_scene_covers_view();
        self.origin = self.origin - self.delta_to_scene(current - last);
        self.ensure_scene_covers_view();
    }

    /// Zoom one step in or out keeping the scene point under `pointer` fixed.
    ///
    /// Returns false, leaving the view untouched, if the new zoom would leave
    /// the configured range.
    pub fn zoom_at(&mut self, pointer: Point, zoom_in: bool) -> bool {
        let factor = if zoom_in {
            self.zoom_step
        } else {
            1.0 / self.zoom_step
        };
        let new_zoom = self.zoom * factor;
        if new_zoom < self.zoom_min || new_zoom > self.zoom_max {
            return false;
        }

        self.ensure_scene_covers_view();
        let anchor = self.map_to_scene(pointer);
        self.zoom = new_zoom;
        self.origin = anchor - pointer * (1.0 / new_zoom);
        self.ensure_scene_covers_view();
        true
    }

    /// View plus padding on every side, in scene coordinates.
    fn padded_view(&self) -> Rect {
        let pad = self.padding;
        Rect::from_corners(
            self.map_to_scene(Point::new(-pad, -pad)),
            self.map_to_scene(Point::new(self.size.width + pad, self.size.height + pad)),
        )
    }

    /// Grow the scrollable region to cover the padded view. Never shrinks.
    pub fn ensure_scene_covers_view(&mut self) {
        let needed = self.padded_view();
        self.scene_rect = Some(match self.scene_rect {
            Some(current) => current.united(&needed),
            None => needed,
        });
    }

    /// Recompute the scrollable region from scratch: the padded view plus
    /// `items_bounds`. May shrink.
    pub fn fit_scene_rect(&mut self, items_bounds: Option<Rect>) {
        let view = self.padded_view();
        self.scene_rect = Some(match items_bounds {
            Some(bounds) => view.united(&bounds),
            None => view,
        });
    }

    /// Zoom 1, centered on `bounds` (or the scene origin).
    pub fn reset(&mut self, bounds: Option<Rect>) {
        self.zoom = 1.0;
        self.center_on(bounds.map(|b| b.center()).unwrap_or(Point::ZERO));
        self.fit_scene_rect(bounds);
    }
}
