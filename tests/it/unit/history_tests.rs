//! History tests: capacity, redo truncation and exact move round trips.

use crate::helpers::solid_image;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rivboard::geometry::Point;
use rivboard::history::{Command, FlipCommand, History, MoveCommand};
use rivboard::scene::Scene;
use rivboard::types::{Item, ItemConfig};

fn scene_with(count: u64) -> Scene {
    let mut scene = Scene::new();
    for id in 0..count {
        scene
            .insert(Item::new(
                ItemConfig::new(id, solid_image(4, 4, id)).at(Point::new(id as f64 * 7.5, 1.0)),
            ))
            .unwrap();
    }
    scene
}

fn apply_move(scene: &mut Scene, history: &mut History, offset: Point) {
    let ids: Vec<_> = scene.live_items().map(|i| i.id).collect();
    let command = Command::Move(MoveCommand::from_offset(scene, &ids, offset));
    command.redo(scene);
    history.push(command);
}

#[test]
fn test_move_round_trip_is_bit_exact() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let mut scene = scene_with(3);
        let mut history = History::new();
        let original: Vec<_> = scene.live_items().map(|i| i.position()).collect();
        let offset = Point::new(rng.gen_range(-1e4..1e4), rng.gen_range(-1e4..1e4));

        apply_move(&mut scene, &mut history, offset);
        assert!(history.undo(&mut scene));
        let undone: Vec<_> = scene.live_items().map(|i| i.position()).collect();
        assert_eq!(undone, original);

        assert!(history.redo(&mut scene));
        let redone: Vec<_> = scene.live_items().map(|i| i.position()).collect();
        let expected: Vec<_> = original.iter().map(|&p| p + offset).collect();
        assert_eq!(redone, expected);
    }
}

#[test]
fn test_capacity_evicts_oldest_for_good() {
    let mut scene = scene_with(1);
    let mut history = History::with_capacity(50);

    for _ in 0..60 {
        apply_move(&mut scene, &mut history, Point::new(1.0, 0.0));
    }
    assert_eq!(history.len(), 50);

    let mut undone = 0;
    while history.undo(&mut scene) {
        undone += 1;
    }
    assert_eq!(undone, 50);
    // The first ten moves cannot be reverted
    assert_eq!(scene.get(0).unwrap().position(), Point::new(10.0, 1.0));
}

#[test]
fn test_push_after_undo_drops_redo_chain() {
    let mut scene = scene_with(2);
    let mut history = History::new();
    apply_move(&mut scene, &mut history, Point::new(5.0, 0.0));
    apply_move(&mut scene, &mut history, Point::new(0.0, 5.0));
    apply_move(&mut scene, &mut history, Point::new(5.0, 5.0));

    assert!(history.undo(&mut scene));
    assert!(history.undo(&mut scene));
    let flip = Command::Flip(FlipCommand { ids: vec![1] });
    flip.redo(&mut scene);
    let dropped = history.push(flip);

    assert_eq!(dropped.len(), 2);
    assert!(!history.can_redo());
    let before = scene.get(0).unwrap().position();
    assert!(!history.redo(&mut scene));
    assert_eq!(scene.get(0).unwrap().position(), before);
    assert_eq!(history.undo_label(), Some("Flip"));
}

#[test]
fn test_clean_state_follows_cursor() {
    let mut scene = scene_with(1);
    let mut history = History::new();
    assert!(history.is_clean());

    apply_move(&mut scene, &mut history, Point::new(1.0, 1.0));
    assert!(!history.is_clean());
    history.set_clean();
    apply_move(&mut scene, &mut history, Point::new(1.0, 1.0));
    assert!(!history.is_clean());
    history.undo(&mut scene);
    assert!(history.is_clean());

    history.reset_clean();
    assert!(!history.is_clean());
}
