//! Drops and project loads running on worker threads.

use crate::helpers::{
    is_import_finished, is_load_finished, png_bytes, poll_until, solid_image, write_png,
    TestBoardBuilder,
};
use rivboard::board::{Board, BoardEvent};
use rivboard::fetch::{DropSource, FetchedBytes, Fetcher};
use rivboard::geometry::{Point, Size};
use rivboard::persistence::{ItemRecord, MemoryProject};
use rivboard::types::{Item, ItemConfig};
use rivboard::BoardConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

/// Serves a small PNG for every URL ending in `.png`, fails the rest.
#[derive(Default)]
struct StubFetcher {
    calls: AtomicUsize,
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<FetchedBytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.ends_with(".png") {
            Ok(FetchedBytes {
                bytes: png_bytes(16, 8),
                temp_path: None,
            })
        } else {
            anyhow::bail!("404 for {url}")
        }
    }
}

/// Takes its time over every URL.
struct SlowFetcher;

impl Fetcher for SlowFetcher {
    fn fetch(&self, _url: &str) -> anyhow::Result<FetchedBytes> {
        std::thread::sleep(Duration::from_secs(2));
        Ok(FetchedBytes {
            bytes: png_bytes(4, 4),
            temp_path: None,
        })
    }
}

fn board_with_fetcher(fetcher: Arc<StubFetcher>) -> Board {
    Board::new(Size::new(800.0, 600.0), BoardConfig::default()).with_fetcher(fetcher)
}

fn project_with(count: u64) -> MemoryProject {
    let mut project = MemoryProject::default();
    for id in 0..count {
        let item = Item::new(
            ItemConfig::new(id, solid_image(6, 6, id))
                .with_path(format!("img{id}.png"))
                .with_format("png")
                .at(Point::new(id as f64 * 10.0, 0.0))
                .with_source(png_bytes(6, 6)),
        );
        project.items.push(ItemRecord::from_item(&item));
    }
    project
}

#[test]
fn test_url_drop_uses_fetcher() {
    let fetcher = Arc::new(StubFetcher::default());
    let mut board = board_with_fetcher(fetcher.clone());

    let sources = vec![
        DropSource::parse("https://example.com/a.png?size=large"),
        DropSource::parse("https://example.com/missing"),
    ];
    board.drop_sources(sources, Point::new(40.0, 40.0)).unwrap();
    let (inserted, events) = poll_until(&mut board, is_import_finished);

    assert_eq!(inserted, vec![0]);
    assert!(events.contains(&BoardEvent::ImportFinished {
        imported: 1,
        total: 2
    }));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

    let item = board.scene().get(0).unwrap();
    assert_eq!(item.path, "https://example.com/a.png?size=large");
    assert_eq!((item.width(), item.height()), (16, 8));
    assert!(item.is_selected());
    assert!(board.action_state().is_dirty);
}

#[test]
fn test_single_drop_is_centered_on_drop_point() {
    let mut board = board_with_fetcher(Arc::new(StubFetcher::default()));
    let at = Point::new(-35.0, 12.0);
    board
        .drop_sources(vec![DropSource::parse("https://example.com/b.png")], at)
        .unwrap();
    let (inserted, _) = poll_until(&mut board, is_import_finished);

    assert_eq!(inserted, vec![0]);
    let item = board.scene().get(0).unwrap();
    assert!(item.is_centered());
    assert_eq!(item.center(), at);
    assert_eq!(item.scene_rect().top_left(), Point::new(-43.0, 8.0));
}

#[test]
fn test_mixed_drop_is_packed_at_drop_point() {
    let dir = tempdir().unwrap();
    let fetcher = Arc::new(StubFetcher::default());
    let mut board = board_with_fetcher(fetcher);

    let sources = vec![
        DropSource::Path(write_png(dir.path(), "one.png", 30, 30)),
        DropSource::parse("http://example.com/two.png"),
        DropSource::parse(&format!("file://{}", write_png(dir.path(), "three.png", 20, 40).display())),
    ];
    let at = Point::new(-100.0, 250.0);
    board.drop_sources(sources, at).unwrap();
    let (inserted, _) = poll_until(&mut board, is_import_finished);

    assert_eq!(inserted.len(), 3);
    let rects: Vec<_> = inserted
        .iter()
        .map(|&id| board.scene().get(id).unwrap().scene_rect())
        .collect();
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert_eq!(a.intersection_area(b), 0.0);
        }
    }
    let bounds = board.scene().bounds_of(&inserted).unwrap();
    assert_eq!(bounds.top_left(), at);
    assert_eq!(board.scene().selected_ids(), inserted);
}

#[test]
fn test_drop_replaces_selection() {
    let dir = tempdir().unwrap();
    let mut board = TestBoardBuilder::new()
        .with_item((0.0, 0.0), (10, 10))
        .selected()
        .build();

    board
        .drop_sources(
            vec![DropSource::Path(write_png(dir.path(), "x.png", 5, 5))],
            Point::new(500.0, 500.0),
        )
        .unwrap();
    let (inserted, _) = poll_until(&mut board, is_import_finished);
    assert_eq!(inserted, vec![1]);
    assert_eq!(board.scene().selected_ids(), vec![1]);
}

#[test]
fn test_offline_board_rejects_urls() {
    let mut board = TestBoardBuilder::new().build();
    board
        .drop_sources(
            vec![DropSource::parse("https://example.com/a.png")],
            Point::ZERO,
        )
        .unwrap();
    let (inserted, events) = poll_until(&mut board, is_import_finished);
    assert!(inserted.is_empty());
    assert!(events.contains(&BoardEvent::ImportFinished {
        imported: 0,
        total: 1
    }));
    // Nothing changed, so the board stays clean
    assert!(!board.action_state().is_dirty);
}

#[test]
fn test_empty_drop_is_ignored() {
    let mut board = TestBoardBuilder::new().build();
    board.drop_sources(Vec::new(), Point::ZERO).unwrap();
    assert!(board.poll_background().is_empty());
    assert!(board.take_events().is_empty());
}

#[test]
fn test_load_delivers_items_in_id_order() {
    let mut board = TestBoardBuilder::new().build();
    let mut project = project_with(5);
    project.items.reverse();

    board.open_project(Box::new(project)).unwrap();
    let (inserted, events) = poll_until(&mut board, is_load_finished);
    assert_eq!(inserted, vec![0, 1, 2, 3, 4]);

    let progress: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BoardEvent::LoadProgress { done, .. } => Some(*done),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![1, 2, 3, 4, 5]);
    assert_eq!(board.scene().get(3).unwrap().position(), Point::new(30.0, 0.0));
}

#[test]
fn test_corrupt_record_is_skipped() {
    let mut board = TestBoardBuilder::new().build();
    let mut project = project_with(3);
    project.items[1].image = b"garbage".to_vec();

    board.open_project(Box::new(project)).unwrap();
    let (inserted, events) = poll_until(&mut board, is_load_finished);
    assert_eq!(inserted, vec![0, 2]);
    assert!(events.contains(&BoardEvent::LoadFinished { loaded: 2, total: 3 }));
}

#[test]
fn test_drop_during_load_does_not_collide() {
    let dir = tempdir().unwrap();
    let mut board = TestBoardBuilder::new().build();
    board.open_project(Box::new(project_with(2))).unwrap();
    board
        .drop_sources(
            vec![DropSource::Path(write_png(dir.path(), "late.png", 4, 4))],
            Point::new(900.0, 0.0),
        )
        .unwrap();

    let mut seen_load = false;
    let mut seen_import = false;
    let mut inserted = Vec::new();
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while !(seen_load && seen_import) {
        assert!(std::time::Instant::now() < deadline, "timed out");
        inserted.extend(board.poll_background().inserted);
        for event in board.take_events() {
            seen_load |= is_load_finished(&event);
            seen_import |= is_import_finished(&event);
        }
        std::thread::yield_now();
    }

    inserted.sort_unstable();
    assert_eq!(inserted, vec![0, 1, 2]);
    assert_eq!(board.scene().live_count(), 3);
}

#[test]
fn test_new_project_discards_pending_work() {
    let dir = tempdir().unwrap();
    let mut board = TestBoardBuilder::new().build();
    board.open_project(Box::new(project_with(20))).unwrap();
    board
        .drop_sources(
            vec![DropSource::Path(write_png(dir.path(), "d.png", 4, 4))],
            Point::ZERO,
        )
        .unwrap();

    board.new_project();
    assert!(!board.is_loading());
    std::thread::sleep(std::time::Duration::from_millis(20));
    let report = board.poll_background();
    assert!(report.is_empty());
    assert!(board.scene().is_empty());
}

#[test]
fn test_new_project_does_not_wait_for_slow_fetch() {
    let mut board = Board::new(Size::new(800.0, 600.0), BoardConfig::default())
        .with_fetcher(Arc::new(SlowFetcher));
    board
        .drop_sources(vec![DropSource::parse("https://example.com/slow.png")], Point::ZERO)
        .unwrap();
    // Let the worker get into the fetch
    std::thread::sleep(Duration::from_millis(50));

    let started = Instant::now();
    board.new_project();
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(board.poll_background().is_empty());
    assert!(board.scene().is_empty());
}
