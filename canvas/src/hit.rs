#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::HIT_SLOP_PX;
use crate::doc::{Drawable, DrawableId, DrawingLayer, Shape};
use crate::icon::{IconControl, IconLayer};

/// Which part of an icon was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconPart {
    Body,
    Control(IconControl),
}

/// Result of an icon hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHit {
    pub id: String,
    pub part: IconPart,
}

/// Top-most icon under `world_pt`, checking visible controls before bodies.
#[must_use]
pub fn hit_icon(world_pt: Point, icons: &IconLayer) -> Option<IconHit> {
    let control = icons.iter().rev().find_map(|icon| {
        icon.control_at(world_pt)
            .map(|c| IconHit { id: icon.meta.id.clone(), part: IconPart::Control(c) })
    });
    control.or_else(|| {
        icons
            .iter()
            .rev()
            .find(|icon| icon.body_contains(world_pt))
            .map(|icon| IconHit { id: icon.meta.id.clone(), part: IconPart::Body })
    })
}

/// Top-most drawable under `world_pt`.
///
/// Shapes are unfilled, so only their painted outline counts: a hit is within
/// half the stroke width plus a few screen pixels of slop.
#[must_use]
pub fn hit_drawable(world_pt: Point, layer: &DrawingLayer, camera: &Camera) -> Option<DrawableId> {
    let slop = camera.screen_dist_to_world(HIT_SLOP_PX);
    layer
        .iter()
        .rev()
        .find(|d| drawable_distance(world_pt, d) <= d.style.width / 2.0 + slop)
        .map(|d| d.id)
}

/// Distance from `pt` to the painted outline of a drawable.
#[must_use]
pub fn drawable_distance(pt: Point, drawable: &Drawable) -> f64 {
    match &drawable.shape {
        Shape::Stroke { points } => polyline_distance(pt, points),
        Shape::Segment { a, b } => segment_distance(pt, *a, *b),
        Shape::Circle { x, y, radius } => (pt.distance(Point::new(*x, *y)) - radius).abs(),
        Shape::Rect { x, y, width, height } => {
            let (x0, x1) = ordered(*x, x + width);
            let (y0, y1) = ordered(*y, y + height);
            let corners = [Point::new(x0, y0), Point::new(x1, y0), Point::new(x1, y1), Point::new(x0, y1)];
            (0..4)
                .map(|i| segment_distance(pt, corners[i], corners[(i + 1) % 4]))
                .fold(f64::INFINITY, f64::min)
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn polyline_distance(pt: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => pt.distance(*only),
        _ => points
            .windows(2)
            .map(|w| segment_distance(pt, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

fn segment_distance(pt: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return pt.distance(a);
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    pt.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
