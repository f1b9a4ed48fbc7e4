use super::{GestureState, Key, WheelEvent};
use crate::config::BoardConfig;
use crate::history::Command;
use crate::scene::Scene;
use crate::viewport::Viewport;
use tracing::trace;

/// Everything a gesture may touch.
pub struct GestureContext<'a> {
    pub scene: &'a mut Scene,
    pub viewport: &'a mut Viewport,
    pub config: &'a BoardConfig,
}

impl<'a> GestureContext<'a> {
    #[inline]
    pub fn new(scene: &'a mut Scene, viewport: &'a mut Viewport, config: &'a BoardConfig) -> Self {
        Self {
            scene,
            viewport,
            config,
        }
    }
}

/// What an event changed.
#[derive(Debug, Default, PartialEq)]
pub struct GestureOutcome {
    /// Undoable command for a completed gesture. Already applied.
    pub command: Option<Command>,
    pub selection_changed: bool,
    pub geometry_changed: bool,
    pub view_changed: bool,
}

impl GestureOutcome {
    pub fn is_empty(&self) -> bool {
        self.command.is_none() && !self.selection_changed && !self.geometry_changed && !self.view_changed
    }
}

/// Canvas gesture controller.
///
/// Bindings for the left button: no modifier moves (or selects), `Shift`
/// toggles selection, `Alt` rotates, `Control` scales. The middle button,
/// or the left button while `Space` is held, pans. The wheel zooms around
/// the pointer.
#[derive(Debug, Default)]
pub struct Controller {
    pub(super) state: GestureState,
    pub(super) space_held: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    pub fn handle_wheel(&mut self, ctx: &mut GestureContext<'_>, event: &WheelEvent) -> GestureOutcome {
        crate::profile_scope!("handle_wheel");

        if event.delta_y == 0.0 {
            return GestureOutcome::default();
        }
        let applied = ctx.viewport.zoom_at(event.position, event.delta_y > 0.0);
        trace!(zoom = ctx.viewport.zoom(), applied, "wheel zoom");
        GestureOutcome {
            view_changed: applied,
            ..Default::default()
        }
    }

    pub fn handle_key_down(&mut self, ctx: &mut GestureContext<'_>, key: Key) -> GestureOutcome {
        match key {
            Key::Space => {
                self.space_held = true;
                GestureOutcome::default()
            }
            Key::Escape => self.cancel(ctx),
        }
    }

    pub fn handle_key_up(&mut self, key: Key) {
        if key == Key::Space {
            self.space_held = false;
            if self.state.is_panning() {
                self.state.reset();
            }
        }
    }

    /// Abort the current gesture. An unfinished move snaps back to where it
    /// started; rotate and scale keep what was applied.
    pub fn cancel(&mut self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        let mut outcome = GestureOutcome::default();
        if let GestureState::Moving { origins, .. } = std::mem::take(&mut self.state) {
            for (id, origin) in origins {
                ctx.scene.set_position(id, origin);
            }
            outcome.geometry_changed = true;
        }
        outcome
    }
}
