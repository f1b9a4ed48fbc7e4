//! Undo/redo through real gestures and menu edits.

use crate::helpers::{assert_live_count, drag, position, TestBoardBuilder};
use rivboard::board::BoardEvent;
use rivboard::geometry::Point;
use rivboard::input::Modifiers;

#[test]
fn test_drag_move_undo_redo_is_exact() {
    let mut board = TestBoardBuilder::new()
        .with_row(3, (40, 30), 100.0)
        .with_zoom(1.7)
        .selected()
        .build();
    let original: Vec<_> = (0..3).map(|id| position(&board, id)).collect();

    drag(&mut board, (10.0, 10.0), (73.3, -41.9), Modifiers::NONE);
    let moved: Vec<_> = (0..3).map(|id| position(&board, id)).collect();
    let offset = moved[0] - original[0];
    assert!((offset.x - 63.3).abs() < 1e-6);
    assert!((offset.y + 51.9).abs() < 1e-6);
    assert_eq!(board.history().len(), 1);

    assert!(board.undo());
    let undone: Vec<_> = (0..3).map(|id| position(&board, id)).collect();
    assert_eq!(undone, original);

    assert!(board.redo());
    let redone: Vec<_> = (0..3).map(|id| position(&board, id)).collect();
    assert_eq!(redone, moved);
    for (before, after) in original.iter().zip(&redone) {
        assert_eq!(*after, *before + offset);
    }
}

#[test]
fn test_click_without_motion_records_nothing() {
    let mut board = TestBoardBuilder::new().with_item((0.0, 0.0), (50, 50)).build();
    drag(&mut board, (25.0, 25.0), (25.0, 25.0), Modifiers::NONE);
    assert!(board.history().is_empty());
    assert_eq!(board.scene().selected_ids(), vec![0]);
}

#[test]
fn test_delete_undo_restores_same_items() {
    let mut board = TestBoardBuilder::new()
        .with_item((5.0, 5.0), (20, 20))
        .with_item((60.0, 5.0), (20, 30))
        .with_item((120.0, 5.0), (10, 10))
        .build();
    board.select_items(&[0, 2]);
    let before: Vec<_> = [0, 2]
        .iter()
        .map(|&id| {
            let item = board.scene().get(id).unwrap();
            (item.id, item.position(), item.scale(), item.rotation(), item.z())
        })
        .collect();

    assert!(board.delete_selection());
    assert_live_count(&board, 1);
    assert!(board.scene().item_at(Point::new(10.0, 10.0)).is_none());

    assert!(board.undo());
    assert_live_count(&board, 3);
    let after: Vec<_> = [0, 2]
        .iter()
        .map(|&id| {
            let item = board.scene().get(id).unwrap();
            assert!(!item.is_deleted());
            (item.id, item.position(), item.scale(), item.rotation(), item.z())
        })
        .collect();
    assert_eq!(after, before);
    assert_eq!(board.scene().item_at(Point::new(10.0, 10.0)), Some(0));

    assert!(board.redo());
    assert_live_count(&board, 1);
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    let mut board = TestBoardBuilder::new()
        .with_row(2, (30, 30), 50.0)
        .selected()
        .build();
    drag(&mut board, (10.0, 10.0), (10.0, 110.0), Modifiers::NONE);
    assert!(board.flip_selection());
    assert!(board.undo());
    assert!(board.undo());
    assert!(board.action_state().can_redo);

    drag(&mut board, (10.0, 10.0), (-40.0, 10.0), Modifiers::NONE);
    let state = board.action_state();
    assert!(!state.can_redo);
    assert!(state.can_undo);
    assert!(!board.redo());
    assert_eq!(position(&board, 0), Point::new(-50.0, 0.0));
}

#[test]
fn test_history_capacity_from_config() {
    let config = rivboard::BoardConfig {
        history_capacity: 3,
        ..Default::default()
    };
    let mut board = TestBoardBuilder::new()
        .with_item((0.0, 0.0), (10, 10))
        .with_config(config)
        .selected()
        .build();

    for _ in 0..5 {
        assert!(board.flip_selection());
    }
    let mut undone = 0;
    while board.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    // Two of the five flips can no longer be undone
    assert!(!board.scene().get(0).unwrap().is_flipped());
    assert_eq!(board.history().index(), 0);
}

#[test]
fn test_clean_events_follow_save_point() {
    let mut board = TestBoardBuilder::new()
        .with_item((0.0, 0.0), (10, 10))
        .selected()
        .build();
    assert!(!board.action_state().is_dirty);

    board.flip_selection();
    assert_eq!(
        board.take_events(),
        vec![BoardEvent::CleanChanged { clean: false }]
    );
    board.undo();
    assert_eq!(
        board.take_events(),
        vec![BoardEvent::CleanChanged { clean: true }]
    );
}
