//! Release handling - finalizes the gesture.
//!
//! A move produces one command for the whole drag. Rotate and scale are
//! applied live and are not recorded.

use super::{Controller, GestureContext, GestureOutcome, GestureState, PointerEvent};
use crate::geometry::{Point, Rect};
use crate::history::{Command, ItemMove, MoveCommand};
use crate::profile_scope;
use tracing::debug;

impl Controller {
    pub fn handle_mouse_up(&mut self, ctx: &mut GestureContext<'_>, event: &PointerEvent) -> GestureOutcome {
        profile_scope!("handle_mouse_up");

        let mut outcome = GestureOutcome::default();
        match std::mem::take(&mut self.state) {
            GestureState::Idle => {}

            GestureState::Panning { last_device } => {
                if last_device != event.position {
                    ctx.viewport.pan(last_device, event.position);
                }
                outcome.view_changed = true;
            }

            GestureState::Moving {
                origins, offset, ..
            } => {
                if offset != Point::ZERO {
                    let moves = origins
                        .into_iter()
                        .map(|(id, from)| ItemMove {
                            id,
                            from,
                            to: from + offset,
                        })
                        .collect();
                    debug!(dx = offset.x, dy = offset.y, "move finished");
                    outcome.command = Some(Command::Move(MoveCommand::new(moves)));
                    outcome.geometry_changed = true;
                }
            }

            GestureState::Rotating { .. } | GestureState::Scaling { .. } => {
                outcome.geometry_changed = true;
            }

            GestureState::Marquee {
                start_device,
                current_device,
                toggle,
            } => {
                let band = Rect::from_corners(start_device, current_device);
                let threshold = ctx.config.drag_threshold;
                if band.width < threshold && band.height < threshold {
                    return outcome;
                }

                let scene_band = Rect::from_corners(
                    ctx.viewport.map_to_scene(start_device),
                    ctx.viewport.map_to_scene(current_device),
                );
                let hits = ctx.scene.items_in_rect(scene_band);
                if toggle {
                    for &id in &hits {
                        ctx.scene.toggle_selected(id);
                    }
                    outcome.selection_changed = !hits.is_empty();
                } else {
                    ctx.scene.select_only(&hits);
                    outcome.selection_changed = true;
                }
                debug!(hits = hits.len(), toggle, "marquee selection");
            }
        }
        outcome
    }
}
