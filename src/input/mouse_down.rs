//! Press handling - hit testing, selection and gesture start.
//!
//! Hit testing goes through the scene's R-tree, then an exact check against
//! each candidate's rotated outline.

use super::{Controller, GestureContext, GestureOutcome, GestureState, PointerButton, PointerEvent};
use crate::profile_scope;
use tracing::trace;

impl Controller {
    pub fn handle_mouse_down(&mut self, ctx: &mut GestureContext<'_>, event: &PointerEvent) -> GestureOutcome {
        profile_scope!("handle_mouse_down");

        let mut outcome = GestureOutcome::default();
        // A second button during a gesture is ignored
        if !self.state.is_idle() {
            return outcome;
        }

        let pos = event.position;
        let pan = event.button == PointerButton::Middle
            || (event.button == PointerButton::Left && self.space_held);
        if pan {
            ctx.viewport.ensure_scene_covers_view();
            self.state = GestureState::Panning { last_device: pos };
            return outcome;
        }
        if event.button != PointerButton::Left {
            return outcome;
        }

        let scene_pos = ctx.viewport.map_to_scene(pos);
        let hit = ctx.scene.item_at(scene_pos);
        let modifiers = event.modifiers;

        if modifiers.shift {
            match hit {
                Some(id) => {
                    outcome.selection_changed = ctx.scene.toggle_selected(id);
                }
                None => {
                    self.state = GestureState::Marquee {
                        start_device: pos,
                        current_device: pos,
                        toggle: true,
                    };
                }
            }
            return outcome;
        }

        // Pressing an unselected item makes it the selection
        if let Some(id) = hit {
            if !ctx.scene.get(id).is_some_and(|item| item.is_selected()) {
                ctx.scene.select_only(&[id]);
                outcome.selection_changed = true;
            }
        }

        if modifiers.alt || modifiers.control {
            let ids = ctx.scene.selected_ids();
            let Some(bounds) = ctx.scene.bounds_of(&ids) else {
                return outcome;
            };
            self.state = if modifiers.alt {
                GestureState::Rotating {
                    ids,
                    pivot: bounds.center(),
                    last: scene_pos,
                }
            } else {
                GestureState::Scaling {
                    ids,
                    last_device: pos,
                }
            };
            trace!(state = self.state.name(), "gesture started");
            return outcome;
        }

        if hit.is_some() {
            let ids = ctx.scene.selected_ids();
            for &id in &ids {
                ctx.scene.send_to_front(id);
            }
            let origins = ids
                .iter()
                .filter_map(|&id| ctx.scene.get(id).map(|item| (id, item.position())))
                .collect();
            self.state = GestureState::Moving {
                origins,
                press: scene_pos,
                offset: crate::geometry::Point::ZERO,
            };
        } else {
            if ctx.scene.selection_count() > 0 {
                ctx.scene.clear_selection();
                outcome.selection_changed = true;
            }
            self.state = GestureState::Marquee {
                start_device: pos,
                current_device: pos,
                toggle: false,
            };
        }

        trace!(state = self.state.name(), "gesture started");
        outcome
    }
}
