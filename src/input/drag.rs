//! Move handling - runs on every pointer move while a button is held.
//!
//! Moves are computed from the press position rather than accumulated, so the
//! selection tracks the cursor exactly at any zoom level.

use super::{Controller, GestureContext, GestureOutcome, GestureState};
use crate::geometry::{Point, rotate_around, signed_angle_degrees};
use crate::profile_scope;

impl Controller {
    pub fn handle_mouse_move(&mut self, ctx: &mut GestureContext<'_>, position: Point) -> GestureOutcome {
        profile_scope!("handle_mouse_move");

        let mut outcome = GestureOutcome::default();
        match &mut self.state {
            GestureState::Idle => {}

            GestureState::Panning { last_device } => {
                ctx.viewport.pan(*last_device, position);
                *last_device = position;
                outcome.view_changed = true;
            }

            GestureState::Moving {
                origins,
                press,
                offset,
            } => {
                *offset = ctx.viewport.map_to_scene(position) - *press;
                for &(id, origin) in origins.iter() {
                    ctx.scene.set_position(id, origin + *offset);
                    ctx.scene.send_to_front(id);
                }
                outcome.geometry_changed = true;
            }

            GestureState::Rotating { ids, pivot, last } => {
                let current = ctx.viewport.map_to_scene(position);
                let angle = signed_angle_degrees(*pivot, *last, current);
                if angle != 0.0 {
                    let pivot = *pivot;
                    for &id in ids.iter() {
                        ctx.scene.update_item(id, |item| {
                            item.set_position(rotate_around(item.position(), pivot, angle));
                            item.set_rotation(item.rotation() + angle);
                        });
                    }
                    outcome.geometry_changed = true;
                }
                *last = current;
            }

            GestureState::Scaling { ids, last_device } => {
                let delta = (position.x - last_device.x) * ctx.config.scale_sensitivity;
                if delta != 0.0 {
                    let min_scale = ctx.config.min_scale;
                    for &id in ids.iter() {
                        ctx.scene.update_item(id, |item| {
                            let center = item.center();
                            item.set_scale((item.scale() + delta).max(min_scale));
                            item.set_position(item.position() + (center - item.center()));
                        });
                    }
                    outcome.geometry_changed = true;
                }
                *last_device = position;
            }

            GestureState::Marquee { current_device, .. } => {
                *current_device = position;
            }
        }
        outcome
    }
}
