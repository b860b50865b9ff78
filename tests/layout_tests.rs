use std::f32::consts::TAU;

use circular_gallery::gallery::model::Gallery;
use circular_gallery::layout::circle::{self, DEFAULT_PHOTO_SIZE};
use eframe::egui::{Pos2, Vec2};

const EPS: f32 = 1e-3;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

// Angle of a tile's center around the container center, in [0, TAU)
fn center_angle(p: &circle::LayoutPosition, container: Vec2) -> f32 {
    let c = p.center();
    let a = (c.y - container.y * 0.5).atan2(c.x - container.x * 0.5);
    if a < -EPS { a + TAU } else { a.max(0.0) }
}

#[test]
fn size_is_max_bound_for_five_or_fewer() {
    for count in 1..=5 {
        assert_eq!(circle::photo_size(count, 600.0), 100.0);
        // Upper bound follows the container: min(100, 300 / 6)
        assert_eq!(circle::photo_size(count, 300.0), 50.0);
    }
}

#[test]
fn size_is_min_bound_for_twenty_or_more() {
    for count in [20, 21, 50, 500] {
        assert_eq!(circle::photo_size(count, 600.0), 30.0);
        // Lower bound follows the container: max(30, 1000 / 20)
        assert_eq!(circle::photo_size(count, 1000.0), 50.0);
    }
}

#[test]
fn size_shrinks_linearly_between_bounds() {
    let sizes: Vec<f32> = (5..=20).map(|n| circle::photo_size(n, 1000.0)).collect();
    for pair in sizes.windows(2) {
        assert!(pair[1] < pair[0], "size should decrease: {:?}", pair);
    }
    // One step is (100 - 50) / 15
    assert!(approx(circle::photo_size(6, 1000.0), 100.0 - 50.0 / 15.0));
    assert!(approx(circle::photo_size(11, 1000.0), 80.0));
}

#[test]
fn size_defaults_when_nothing_to_measure() {
    assert_eq!(circle::photo_size(0, 600.0), DEFAULT_PHOTO_SIZE);
    assert_eq!(circle::photo_size(4, 0.0), DEFAULT_PHOTO_SIZE);
    assert_eq!(circle::photo_size(4, f32::NAN), DEFAULT_PHOTO_SIZE);
}

#[test]
fn size_bounds_never_cross_in_small_containers() {
    let (lower, upper) = circle::size_bounds(120.0);
    assert_eq!(upper, 20.0);
    assert_eq!(lower, 20.0);
    assert_eq!(circle::photo_size(3, 120.0), 20.0);
    assert_eq!(circle::photo_size(30, 120.0), 20.0);
}

#[test]
fn three_photos_in_square_container() {
    let container = Vec2::new(600.0, 600.0);
    let pos = circle::circle_positions(3, container);
    assert_eq!(pos.len(), 3);
    assert!(pos.iter().all(|p| p.size == 100.0));
    // First tile sits on the positive x axis, radius = 300 - 100
    assert!(approx(pos[0].x, 450.0));
    assert!(approx(pos[0].y, 250.0));
    for p in &pos {
        let d = p.center().distance(Pos2::new(300.0, 300.0));
        assert!(approx(d, 200.0), "radius was {}", d);
    }
    for (i, p) in pos.iter().enumerate() {
        assert!(approx(center_angle(p, container), TAU * i as f32 / 3.0));
    }
}

#[test]
fn angles_are_uniformly_spaced() {
    let container = Vec2::new(900.0, 700.0);
    for n in [1usize, 2, 4, 7, 12, 19] {
        let pos = circle::circle_positions(n, container);
        assert_eq!(pos.len(), n);
        for (i, p) in pos.iter().enumerate() {
            assert!(approx(circle::item_angle(i, n), TAU * i as f32 / n as f32));
            assert!(
                approx(center_angle(p, container), circle::item_angle(i, n)),
                "n={} i={}",
                n,
                i
            );
        }
    }
}

#[test]
fn crowded_ring_shrinks_tiles_to_keep_spacing() {
    let container = Vec2::new(400.0, 400.0);
    let n = 40;
    let pos = circle::circle_positions(n, container);
    assert_eq!(pos.len(), n);
    let size = pos[0].size;
    assert!(size < circle::photo_size(n, 400.0));
    let radius = pos[0].center().distance(Pos2::new(200.0, 200.0));
    // Ring stays one tile inside the container
    assert!(approx(radius, 200.0 - size));
    assert!(TAU * radius / n as f32 >= 1.2 * size - EPS);
    for p in &pos {
        assert!(p.x >= 0.0 && p.y >= 0.0);
        assert!(p.x + p.size <= 400.0 && p.y + p.size <= 400.0);
    }
}

#[test]
fn no_positions_without_photos_or_container() {
    assert!(circle::circle_positions(0, Vec2::new(500.0, 500.0)).is_empty());
    assert!(circle::circle_positions(5, Vec2::ZERO).is_empty());
    assert!(circle::circle_positions(5, Vec2::new(500.0, -1.0)).is_empty());
}

#[test]
fn keyed_layout_and_hit_testing() {
    let mut g = Gallery::new();
    let ids: Vec<_> = (0..4).map(|i| g.add_photo(format!("{}.png", i), String::new())).collect();
    let container = Vec2::new(600.0, 400.0);
    let positions = circle::layout_photos(&ids, container);
    assert_eq!(positions.len(), 4);
    let flat = circle::circle_positions(4, container);
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(positions[id], flat[i]);
    }

    let on_second = positions[&ids[1]].center();
    assert_eq!(circle::hit_test(&ids, &positions, on_second), Some(ids[1]));
    assert_eq!(circle::hit_test(&ids, &positions, Pos2::new(300.0, 200.0)), None);
    assert!(circle::layout_photos(&[], container).is_empty());
}

#[test]
fn cover_uv_crops_center_square() {
    let wide = circle::cover_uv([200, 100]);
    assert!(approx(wide.min.x, 0.25) && approx(wide.max.x, 0.75));
    assert!(approx(wide.min.y, 0.0) && approx(wide.max.y, 1.0));

    let tall = circle::cover_uv([100, 400]);
    assert!(approx(tall.min.y, 0.375) && approx(tall.max.y, 0.625));

    let square = circle::cover_uv([64, 64]);
    assert!(approx(square.width(), 1.0) && approx(square.height(), 1.0));
}
