//! Viewport tests: zoom anchoring and limits.

use crate::helpers::assert_close;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rivboard::config::BoardConfig;
use rivboard::geometry::{Point, Size};
use rivboard::viewport::Viewport;

fn viewport() -> Viewport {
    Viewport::new(Size::new(800.0, 600.0), &BoardConfig::default())
}

#[test]
fn test_zoom_keeps_scene_point_under_pointer() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut view = viewport();

    for _ in 0..200 {
        let pointer = Point::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        let before = view.map_to_scene(pointer);
        let zoom_in = rng.gen_bool(0.5);
        if view.zoom_at(pointer, zoom_in) {
            assert_close(view.map_to_scene(pointer), before);
        }
    }
}

#[test]
fn test_zoom_in_then_out_restores_zoom() {
    let mut view = viewport();
    let pointer = Point::new(123.0, 456.0);
    assert!(view.zoom_at(pointer, true));
    assert!((view.zoom() - 1.2).abs() < 1e-12);
    assert!(view.zoom_at(pointer, false));
    assert!((view.zoom() - 1.0).abs() < 1e-12);
}

#[test]
fn test_zoom_beyond_limits_is_refused() {
    let config = BoardConfig {
        zoom_min: 0.5,
        zoom_max: 2.0,
        ..BoardConfig::default()
    };
    let mut view = Viewport::new(Size::new(400.0, 300.0), &config);
    let pointer = Point::new(10.0, 10.0);

    let mut steps = 0;
    while view.zoom_at(pointer, true) {
        steps += 1;
    }
    // 1.2^3 = 1.728, the next step would pass 2.0
    assert_eq!(steps, 3);
    let zoom = view.zoom();
    let origin = view.origin();
    assert!(!view.zoom_at(pointer, true));
    assert_eq!(view.zoom(), zoom);
    assert_eq!(view.origin(), origin);

    while view.zoom_at(pointer, false) {}
    assert!(view.zoom() >= 0.5);
    assert!(view.zoom() / 1.2 < 0.5);
}

#[test]
fn test_device_scene_mapping_is_consistent() {
    let mut view = viewport();
    view.set_zoom(2.5);
    view.center_on(Point::new(-300.0, 40.0));

    assert_close(view.center(), Point::new(-300.0, 40.0));
    let p = Point::new(17.0, 599.0);
    assert_close(view.map_from_scene(view.map_to_scene(p)), p);
    assert_close(view.transform().map_point(view.map_to_scene(p)), p);
}

#[test]
fn test_visible_rect_matches_device_size() {
    let mut view = viewport();
    view.set_zoom(2.0);
    let visible = view.visible_rect();
    assert!((visible.width - 400.0).abs() < 1e-9);
    assert!((visible.height - 300.0).abs() < 1e-9);
}
