//! Item model tests: flip, transforms and hit testing.

use crate::helpers::{assert_close, solid_image};
use rivboard::geometry::{Point, Rect};
use rivboard::types::{Item, ItemConfig};

#[test]
fn test_double_flip_is_identity() {
    let mut item = Item::new(ItemConfig::new(0, solid_image(7, 3, 1)));
    let pixels = item.pixels().clone();

    item.flip();
    assert!(item.is_flipped());
    assert_ne!(item.pixels(), &pixels);

    item.flip();
    assert!(!item.is_flipped());
    assert_eq!(item.pixels(), &pixels);
}

#[test]
fn test_flipped_config_mirrors_on_construction() {
    let plain = Item::new(ItemConfig::new(0, solid_image(4, 1, 0)));
    let flipped = Item::new(ItemConfig::new(1, solid_image(4, 1, 0)).flipped(true));
    assert!(flipped.is_flipped());
    assert_eq!(flipped.pixels().get_pixel(3, 0), plain.pixels().get_pixel(0, 0));
}

#[test]
fn test_scene_rect_follows_scale_and_rotation() {
    let item = Item::new(
        ItemConfig::new(0, solid_image(100, 50, 0))
            .at(Point::new(10.0, 20.0))
            .with_scale(2.0),
    );
    assert_eq!(item.scene_rect(), Rect::new(10.0, 20.0, 200.0, 100.0));

    let rotated = Item::new(
        ItemConfig::new(1, solid_image(100, 50, 0))
            .centered(true)
            .with_rotation(90.0),
    );
    let rect = rotated.scene_rect();
    assert!((rect.width - 50.0).abs() < 1e-9);
    assert!((rect.height - 100.0).abs() < 1e-9);
    assert_close(rotated.center(), Point::ZERO);
}

#[test]
fn test_rotation_is_normalized() {
    let mut item = Item::new(ItemConfig::new(0, solid_image(1, 1, 0)).with_rotation(-90.0));
    assert_eq!(item.rotation(), 270.0);
    item.set_rotation(720.0 + 45.0);
    assert_eq!(item.rotation(), 45.0);
}

#[test]
fn test_hit_test_uses_rotated_outline() {
    let item = Item::new(
        ItemConfig::new(0, solid_image(100, 10, 0))
            .centered(true)
            .with_rotation(45.0),
    );
    // Inside the bounding box but off the rotated bar
    assert!(item.scene_rect().contains(Point::new(30.0, -30.0)));
    assert!(!item.contains_scene_point(Point::new(30.0, -30.0)));
    assert!(item.contains_scene_point(Point::new(20.0, 20.0)));
}

#[test]
fn test_reset_transform_keeps_center() {
    let mut item = Item::new(
        ItemConfig::new(0, solid_image(40, 20, 0))
            .at(Point::new(100.0, 100.0))
            .with_scale(3.0)
            .with_rotation(30.0),
    );
    let center = item.center();
    item.reset_transform();
    assert_eq!(item.scale(), 1.0);
    assert_eq!(item.rotation(), 0.0);
    assert_close(item.center(), center);
}
