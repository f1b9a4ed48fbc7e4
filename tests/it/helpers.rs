//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestBoardBuilder` - Builder for boards with solid-color items
//! - Gesture helpers (`drag`, `click`) working in scene coordinates
//! - File fixtures (`write_png`) and assertion helpers

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use rivboard::board::{Board, BoardEvent};
use rivboard::codec::{ImageCodec, ImageCrateCodec};
use rivboard::config::BoardConfig;
use rivboard::geometry::{Point, Size};
use rivboard::input::{Modifiers, PointerButton, PointerEvent};
use rivboard::types::{ItemConfig, ItemId};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// ============================================================================
// TestBoardBuilder
// ============================================================================

/// Builder for boards with items at known scene positions.
///
/// # Example
/// ```ignore
/// let board = TestBoardBuilder::new()
///     .with_item((0.0, 0.0), (100, 50))
///     .with_item((200.0, 0.0), (40, 40))
///     .with_zoom(2.0)
///     .build();
/// ```
pub struct TestBoardBuilder {
    items: Vec<(Point, (u32, u32))>,
    viewport: Size,
    zoom: f64,
    config: BoardConfig,
    select_all: bool,
}

impl Default for TestBoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBoardBuilder {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            viewport: Size::new(800.0, 600.0),
            zoom: 1.0,
            config: BoardConfig::default(),
            select_all: false,
        }
    }

    /// Add an item with its top-left at `pos` and the given pixel size.
    pub fn with_item(mut self, pos: (f64, f64), size: (u32, u32)) -> Self {
        self.items.push((Point::new(pos.0, pos.1), size));
        self
    }

    /// Add `count` items of one size in a row, `spacing` apart.
    pub fn with_row(mut self, count: usize, size: (u32, u32), spacing: f64) -> Self {
        for i in 0..count {
            self.items.push((Point::new(i as f64 * spacing, 0.0), size));
        }
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn selected(mut self) -> Self {
        self.select_all = true;
        self
    }

    pub fn build(self) -> Board {
        let mut board = Board::new(self.viewport, self.config);
        for (pos, (w, h)) in self.items {
            let id = board.allocate_item_id();
            board
                .add_item(ItemConfig::new(id, solid_image(w, h, id)).at(pos))
                .expect("fresh id");
        }
        if self.zoom != 1.0 {
            board.set_zoom(self.zoom);
        }
        if self.select_all {
            board.select_all();
        }
        board.take_events();
        board
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Image whose left column differs from the rest, so flips are observable.
pub fn solid_image(w: u32, h: u32, seed: ItemId) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, _| {
        if x == 0 {
            Rgba([255, 0, seed as u8, 255])
        } else {
            Rgba([0, 0, seed as u8, 255])
        }
    })
}

pub fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    ImageCrateCodec
        .encode(&solid_image(w, h, 0), "png")
        .expect("png encode")
}

pub fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(w, h)).expect("write fixture");
    path
}

// ============================================================================
// Gestures in scene coordinates
// ============================================================================

pub fn device(board: &Board, scene: (f64, f64)) -> Point {
    board.viewport().map_from_scene(Point::new(scene.0, scene.1))
}

/// Press at `from`, move to `to`, release, all in scene coordinates.
pub fn drag(board: &mut Board, from: (f64, f64), to: (f64, f64), modifiers: Modifiers) {
    let start = device(board, from);
    let end = device(board, to);
    board.mouse_down(&PointerEvent::new(start, PointerButton::Left, modifiers));
    board.mouse_move(end);
    board.mouse_up(&PointerEvent::new(end, PointerButton::Left, modifiers));
}

pub fn click(board: &mut Board, at: (f64, f64), modifiers: Modifiers) {
    let p = device(board, at);
    board.mouse_down(&PointerEvent::new(p, PointerButton::Left, modifiers));
    board.mouse_up(&PointerEvent::new(p, PointerButton::Left, modifiers));
}

// ============================================================================
// Background work
// ============================================================================

/// Poll the board until an event matching `done` arrives, collecting every
/// inserted id and event on the way. Panics after five seconds.
pub fn poll_until(
    board: &mut Board,
    done: impl Fn(&BoardEvent) -> bool,
) -> (Vec<ItemId>, Vec<BoardEvent>) {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut inserted = Vec::new();
    let mut events = Vec::new();
    loop {
        inserted.extend(board.poll_background().inserted);
        let fresh = board.take_events();
        let finished = fresh.iter().any(&done);
        events.extend(fresh);
        if finished {
            return (inserted, events);
        }
        assert!(Instant::now() < deadline, "background work timed out: {events:?}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

pub fn is_load_finished(event: &BoardEvent) -> bool {
    matches!(event, BoardEvent::LoadFinished { .. })
}

pub fn is_import_finished(event: &BoardEvent) -> bool {
    matches!(event, BoardEvent::ImportFinished { .. })
}

// ============================================================================
// Assertions
// ============================================================================

pub fn position(board: &Board, id: ItemId) -> Point {
    board
        .scene()
        .get(id)
        .unwrap_or_else(|| panic!("item {id} not found"))
        .position()
}

pub fn assert_live_count(board: &Board, expected: usize) {
    assert_eq!(
        board.scene().live_count(),
        expected,
        "Expected {} live items, found {}",
        expected,
        board.scene().live_count()
    );
}

pub fn assert_close(a: Point, b: Point) {
    let tolerance = 1e-9 * a.length().max(b.length()).max(1.0);
    assert!(
        (a - b).length() <= tolerance,
        "points differ: {a:?} vs {b:?}"
    );
}
