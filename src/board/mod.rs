//! Board context - the single owner of canvas state.
//!
//! ## Architecture
//!
//! [`Board`] owns the scene, undo history, viewport and gesture controller.
//! Hosts forward input, call operations from their menus, and drain
//! [`BoardEvent`]s to keep action enablement and progress UI in sync.
//! Background work (project loading, dropped files) is polled from the UI
//! thread; only the board inserts into the scene.
//!
//! ## Modules
//!
//! - `editing` - Selection-level edits, packing, undo/redo
//! - `project` - New/open/save, import, drops, export, background polling

mod editing;
mod project;

pub use project::{ImportReport, PollReport};

use crate::codec::{ImageCodec, ImageCrateCodec};
use crate::config::BoardConfig;
use crate::constants::{MARQUEE_BORDER_COLOR, MARQUEE_FILL_COLOR};
use crate::fetch::{Fetcher, OfflineFetcher};
use crate::geometry::{Point, Rect, Size, Transform};
use crate::history::{Command, History};
use crate::input::{Controller, GestureContext, GestureOutcome, Key, PointerEvent, WheelEvent};
use crate::loader::{BackgroundTask, DroppedImage};
use crate::render::{Painter, Pen, RenderOptions};
use crate::scene::Scene;
use crate::types::ItemConfig;
use crate::viewport::Viewport;
use std::sync::Arc;
use tracing::debug;

/// Notifications for the host UI, drained with [`Board::take_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    SelectionChanged { count: usize },
    CleanChanged { clean: bool },
    LoadProgress { done: usize, total: usize },
    LoadFinished { loaded: usize, total: usize },
    ImportFinished { imported: usize, total: usize },
}

/// Enablement of the host's actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionState {
    pub has_selection: bool,
    pub is_dirty: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

struct PendingLoad {
    task: BackgroundTask<ItemConfig>,
    loaded: usize,
}

struct PendingDrop {
    task: BackgroundTask<DroppedImage>,
    at: Point,
    images: Vec<DroppedImage>,
    failures: usize,
}

pub struct Board {
    scene: Scene,
    history: History,
    viewport: Viewport,
    controller: Controller,
    config: BoardConfig,
    codec: Arc<dyn ImageCodec>,
    fetcher: Arc<dyn Fetcher>,
    render_options: RenderOptions,
    load: Option<PendingLoad>,
    drops: Vec<PendingDrop>,
    events: Vec<BoardEvent>,
    /// Last values reported through events
    reported_selection: usize,
    reported_clean: bool,
}

impl Board {
    /// An empty, clean board with the default codec and no network access.
    pub fn new(viewport_size: Size, config: BoardConfig) -> Self {
        let viewport = Viewport::new(viewport_size, &config);
        let history = History::with_capacity(config.history_capacity);
        let mut board = Self {
            scene: Scene::new(),
            history,
            viewport,
            controller: Controller::new(),
            config,
            codec: Arc::new(ImageCrateCodec),
            fetcher: Arc::new(OfflineFetcher),
            render_options: RenderOptions::default(),
            load: None,
            drops: Vec::new(),
            events: Vec::new(),
            reported_selection: 0,
            reported_clean: true,
        };
        board.refresh_scene_rect();
        board
    }

    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn render_options(&self) -> RenderOptions {
        self.render_options
    }

    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.render_options = options;
    }

    /// Zoom about the view center, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
        self.viewport.ensure_scene_covers_view();
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport.set_size(size);
        self.viewport.ensure_scene_covers_view();
    }

    /// Drain pending notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn action_state(&self) -> ActionState {
        ActionState {
            has_selection: self.scene.selection_count() > 0,
            is_dirty: !self.history.is_clean(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn mouse_down(&mut self, event: &PointerEvent) -> GestureOutcome {
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.viewport, &self.config);
        let outcome = self.controller.handle_mouse_down(&mut ctx, event);
        self.notify();
        outcome
    }

    pub fn mouse_move(&mut self, position: Point) -> GestureOutcome {
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.viewport, &self.config);
        self.controller.handle_mouse_move(&mut ctx, position)
    }

    /// Finish the gesture. A completed move is recorded in the history.
    pub fn mouse_up(&mut self, event: &PointerEvent) -> GestureOutcome {
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.viewport, &self.config);
        let outcome = self.controller.handle_mouse_up(&mut ctx, event);
        if let Some(command) = outcome.command.clone() {
            self.record(command);
        }
        if outcome.geometry_changed {
            self.refresh_scene_rect();
        }
        self.notify();
        outcome
    }

    pub fn wheel(&mut self, event: &WheelEvent) -> GestureOutcome {
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.viewport, &self.config);
        self.controller.handle_wheel(&mut ctx, event)
    }

    pub fn key_down(&mut self, key: Key) -> GestureOutcome {
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.viewport, &self.config);
        let outcome = self.controller.handle_key_down(&mut ctx, key);
        if outcome.geometry_changed {
            self.refresh_scene_rect();
        }
        outcome
    }

    pub fn key_up(&mut self, key: Key) {
        self.controller.handle_key_up(key);
    }

    /// Abandon any gesture in progress, as if Escape was pressed.
    pub(crate) fn cancel_gesture(&mut self) {
        let mut ctx = GestureContext::new(&mut self.scene, &mut self.viewport, &self.config);
        self.controller.cancel(&mut ctx);
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    /// Paint one frame: backdrop, visible items, then the marquee band.
    pub fn paint(&self, painter: &mut dyn Painter) {
        crate::profile_scope!("board_paint");

        painter.begin_frame(&self.viewport.transform());
        self.scene
            .paint(painter, self.viewport.visible_rect(), &self.render_options);

        if let Some(band) = self.controller.state().marquee_band() {
            let scene_band = Rect::from_corners(
                self.viewport.map_to_scene(band.top_left()),
                self.viewport.map_to_scene(band.bottom_right()),
            );
            painter.fill_rect(scene_band, MARQUEE_FILL_COLOR);
            painter.stroke_rect(
                &Transform::IDENTITY,
                scene_band,
                Pen::cosmetic(MARQUEE_BORDER_COLOR, 1.0),
            );
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Push an applied command and destroy items no command can bring back.
    fn record(&mut self, command: Command) {
        debug!(label = command.label(), "command recorded");
        for dropped in self.history.push(command) {
            self.scene.purge_deleted(dropped.deleted_ids());
        }
    }

    fn refresh_scene_rect(&mut self) {
        self.viewport.fit_scene_rect(self.scene.bounding_rect());
    }

    /// Queue events for whatever changed since the last call.
    fn notify(&mut self) {
        let count = self.scene.selection_count();
        if count != self.reported_selection {
            self.reported_selection = count;
            self.events.push(BoardEvent::SelectionChanged { count });
        }
        let clean = self.history.is_clean();
        if clean != self.reported_clean {
            self.reported_clean = clean;
            self.events.push(BoardEvent::CleanChanged { clean });
        }
    }
}
