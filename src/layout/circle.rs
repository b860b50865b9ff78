use std::collections::HashMap;
use std::f32::consts::TAU;

use egui::{Pos2, Rect, Vec2};

use crate::gallery::model::PhotoId;

/// Size used before the canvas can be measured or when there is nothing to lay out.
pub const DEFAULT_PHOTO_SIZE: f32 = 80.0;

const MAX_PHOTO_SIZE: f32 = 100.0;
const MIN_PHOTO_SIZE: f32 = 30.0;
// Photo counts where interpolation starts and stops
const FEW_PHOTOS: usize = 5;
const MANY_PHOTOS: usize = 20;
// Adjacent tiles keep at least this many tile widths between their centers
const SPACING_FACTOR: f32 = 1.2;

/// Top-left corner of a tile relative to the container, plus its edge length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutPosition {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl LayoutPosition {
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.x + self.size * 0.5, self.y + self.size * 0.5)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::splat(self.size))
    }
}

fn measurable(dim: f32) -> bool {
    dim.is_finite() && dim > 0.0
}

/// Lower and upper tile size for a container whose shorter side is `min_dim`.
///
/// Small containers can push the lower bound past the upper one; the lower
/// bound is capped so callers always get `lower <= upper`.
pub fn size_bounds(min_dim: f32) -> (f32, f32) {
    let upper = MAX_PHOTO_SIZE.min(min_dim / 6.0);
    let lower = MIN_PHOTO_SIZE.max(min_dim / 20.0).min(upper);
    (lower, upper)
}

/// Uniform tile size for `count` photos.
///
/// Up to five photos get the upper bound, twenty or more get the lower bound,
/// and counts in between shrink linearly.
pub fn photo_size(count: usize, min_dim: f32) -> f32 {
    if count == 0 || !measurable(min_dim) {
        return DEFAULT_PHOTO_SIZE;
    }
    let (lower, upper) = size_bounds(min_dim);
    if count <= FEW_PHOTOS {
        return upper;
    }
    if count >= MANY_PHOTOS {
        return lower;
    }
    let steps = (MANY_PHOTOS - FEW_PHOTOS) as f32;
    upper - (count - FEW_PHOTOS) as f32 * ((upper - lower) / steps)
}

pub fn item_angle(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    TAU * index as f32 / count as f32
}

/// Evenly spaced tile positions on a circle centered in `container`.
///
/// The ring sits one tile size inside the shorter half-extent. When that ring
/// is too tight for `SPACING_FACTOR` spacing the tile size is reduced until
/// the spacing holds at the padded radius.
pub fn circle_positions(count: usize, container: Vec2) -> Vec<LayoutPosition> {
    if count == 0 || !measurable(container.x) || !measurable(container.y) {
        return Vec::new();
    }
    let center = Pos2::new(container.x * 0.5, container.y * 0.5);
    let half = center.x.min(center.y);
    let n = count as f32;

    let mut size = photo_size(count, container.min_elem());
    let mut radius = half - size;
    if TAU * radius / n < SPACING_FACTOR * size {
        size = TAU * half / (SPACING_FACTOR * n + TAU);
        radius = half - size;
    }

    (0..count)
        .map(|i| {
            let angle = item_angle(i, count);
            LayoutPosition {
                x: center.x + radius * angle.cos() - size * 0.5,
                y: center.y + radius * angle.sin() - size * 0.5,
                size,
            }
        })
        .collect()
}

/// Keyed form of [`circle_positions`], following the order of `ids`.
pub fn layout_photos(ids: &[PhotoId], container: Vec2) -> HashMap<PhotoId, LayoutPosition> {
    ids.iter()
        .copied()
        .zip(circle_positions(ids.len(), container))
        .collect()
}

// Later tiles paint on top, so search from the end
pub fn hit_test(ids: &[PhotoId], positions: &HashMap<PhotoId, LayoutPosition>, point: Pos2) -> Option<PhotoId> {
    ids.iter()
        .rev()
        .find(|id| positions.get(*id).is_some_and(|p| p.rect().contains(point)))
        .copied()
}

/// UV rect that crops the centered square out of a `[width, height]` image.
pub fn cover_uv(size: [usize; 2]) -> Rect {
    let (w, h) = (size[0] as f32, size[1] as f32);
    if w <= 0.0 || h <= 0.0 {
        return Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    }
    if w > h {
        let inset = (1.0 - h / w) * 0.5;
        Rect::from_min_max(Pos2::new(inset, 0.0), Pos2::new(1.0 - inset, 1.0))
    } else {
        let inset = (1.0 - w / h) * 0.5;
        Rect::from_min_max(Pos2::new(0.0, inset), Pos2::new(1.0, 1.0 - inset))
    }
}
