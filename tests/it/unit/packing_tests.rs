//! Packing tests: overlap freedom for random inputs, both strategies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rivboard::geometry::{Point, Rect, Size};
use rivboard::packing::{is_overlap_free, pack_rects, PackingStrategy};

const STRATEGIES: [PackingStrategy; 2] = [PackingStrategy::Row, PackingStrategy::Skyline];

fn random_sizes(rng: &mut StdRng, count: usize) -> Vec<Size> {
    (0..count)
        .map(|_| {
            Size::new(
                rng.gen_range(1..400) as f64,
                rng.gen_range(1..400) as f64,
            )
        })
        .collect()
}

fn bounds(sizes: &[Size], positions: &[Point]) -> Rect {
    sizes
        .iter()
        .zip(positions)
        .map(|(s, p)| Rect::from_origin_size(*p, *s))
        .reduce(|a, b| a.united(&b))
        .unwrap()
}

#[test]
fn test_example_sizes_do_not_overlap() {
    let sizes = [
        Size::new(100.0, 100.0),
        Size::new(50.0, 50.0),
        Size::new(100.0, 50.0),
    ];
    for strategy in STRATEGIES {
        let positions = pack_rects(strategy, &sizes, Point::ZERO);
        assert_eq!(positions.len(), 3);
        assert!(is_overlap_free(&sizes, &positions), "{strategy:?}");
    }
}

#[test]
fn test_row_layout_for_example_sizes() {
    let sizes = [
        Size::new(100.0, 100.0),
        Size::new(50.0, 50.0),
        Size::new(100.0, 50.0),
    ];
    // Budget 200, so the row block is anchored 200 up and left of the origin
    let positions = pack_rects(PackingStrategy::Row, &sizes, Point::new(200.0, 200.0));
    assert_eq!(
        positions,
        vec![
            Point::new(0.0, 50.0),
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
        ]
    );
}

#[test]
fn test_random_inputs_never_overlap() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..50 {
        let count = rng.gen_range(1..40);
        let sizes = random_sizes(&mut rng, count);
        let origin = Point::new(
            rng.gen_range(-1000..1000) as f64,
            rng.gen_range(-1000..1000) as f64,
        );
        for strategy in STRATEGIES {
            let positions = pack_rects(strategy, &sizes, origin);
            assert_eq!(positions.len(), sizes.len());
            assert!(
                is_overlap_free(&sizes, &positions),
                "round {round}: {strategy:?} overlapped {sizes:?}"
            );
        }
    }
}

#[test]
fn test_skyline_starts_at_origin() {
    let mut rng = StdRng::seed_from_u64(11);
    let sizes = random_sizes(&mut rng, 12);
    let origin = Point::new(-30.0, 75.0);
    let positions = pack_rects(PackingStrategy::Skyline, &sizes, origin);
    assert_eq!(bounds(&sizes, &positions).top_left(), origin);
}

#[test]
fn test_packing_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(99);
    let sizes = random_sizes(&mut rng, 25);
    for strategy in STRATEGIES {
        let a = pack_rects(strategy, &sizes, Point::ZERO);
        let b = pack_rects(strategy, &sizes, Point::ZERO);
        assert_eq!(a, b);
    }
}

#[test]
fn test_empty_sizes_are_ignored() {
    let sizes = [
        Size::new(0.0, 10.0),
        Size::new(20.0, 20.0),
        Size::new(20.0, 20.0),
    ];
    for strategy in STRATEGIES {
        let positions = pack_rects(strategy, &sizes, Point::ZERO);
        assert!(is_overlap_free(&sizes, &positions));
    }
    assert!(pack_rects(PackingStrategy::Skyline, &[], Point::ZERO).is_empty());
}
