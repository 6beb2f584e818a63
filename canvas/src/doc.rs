//! Drawing-layer model: freehand strokes, shape primitives, and their store.
//!
//! Drawables are closed over [`Shape`] so adding a new primitive forces every
//! renderer, hit test, and codec match to handle it. Erasing is not deletion:
//! an eraser stroke is an ordinary [`Drawable`] whose [`BlendMode::Erase`]
//! subtracts whatever lies beneath it in the drawing layer.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;

/// Identifier of a drawable inside one drawing layer. Not persisted.
pub type DrawableId = Uuid;

/// Compositing rule for a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Paint over what is beneath (`source-over`).
    #[default]
    #[serde(rename = "source-over")]
    Normal,
    /// Subtract from what is beneath (`destination-out`).
    #[serde(rename = "destination-out")]
    Erase,
}

impl BlendMode {
    /// The Canvas2D composite operation name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "source-over",
            Self::Erase => "destination-out",
        }
    }

    /// Parse a composite operation name. Anything other than
    /// `destination-out` composites normally.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "destination-out" { Self::Erase } else { Self::Normal }
    }
}

/// Visual attributes shared by every drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// CSS color string.
    pub color: String,
    /// Stroke width in scene units.
    pub width: f64,
    pub blend: BlendMode,
}

/// Geometry of a drawable.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Freehand polyline, one point per pointer sample.
    Stroke { points: Vec<Point> },
    /// Unfilled rectangle. `width`/`height` are negative when dragged up or left.
    Rect { x: f64, y: f64, width: f64, height: f64 },
    /// Unfilled circle around `(x, y)`.
    Circle { x: f64, y: f64, radius: f64 },
    /// Straight two-point segment.
    Segment { a: Point, b: Point },
}

impl Shape {
    /// Short kind name used in logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Stroke { .. } => "stroke",
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Segment { .. } => "segment",
        }
    }

    /// Rectangle spanned from `anchor` to `current`.
    #[must_use]
    pub fn rect_from(anchor: Point, current: Point) -> Self {
        Self::Rect { x: anchor.x, y: anchor.y, width: current.x - anchor.x, height: current.y - anchor.y }
    }

    /// Circle centred on `anchor` passing through `current`.
    #[must_use]
    pub fn circle_from(anchor: Point, current: Point) -> Self {
        Self::Circle { x: anchor.x, y: anchor.y, radius: anchor.distance(current) }
    }

    /// Segment from `anchor` to `current`.
    #[must_use]
    pub fn segment_from(anchor: Point, current: Point) -> Self {
        Self::Segment { a: anchor, b: current }
    }
}

/// A stroke or primitive living in the drawing layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub id: DrawableId,
    pub shape: Shape,
    pub style: StrokeStyle,
}

impl Drawable {
    /// Create a drawable with a fresh id.
    #[must_use]
    pub fn new(shape: Shape, style: StrokeStyle) -> Self {
        Self { id: Uuid::new_v4(), shape, style }
    }

    /// Whether two drawables look the same, ignoring identity.
    #[must_use]
    pub fn same_content(&self, other: &Drawable) -> bool {
        self.shape == other.shape && self.style == other.style
    }
}

/// Ordered store of drawables. Insertion order is paint order.
#[derive(Debug, Clone, Default)]
pub struct DrawingLayer {
    items: Vec<Drawable>,
}

impl DrawingLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a drawable on top of everything else.
    pub fn push(&mut self, drawable: Drawable) -> DrawableId {
        let id = drawable.id;
        self.items.push(drawable);
        id
    }

    /// Remove a drawable by id, returning it if it was present.
    pub fn remove(&mut self, id: &DrawableId) -> Option<Drawable> {
        let idx = self.items.iter().position(|d| d.id == *id)?;
        Some(self.items.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &DrawableId) -> Option<&Drawable> {
        self.items.iter().find(|d| d.id == *id)
    }

    /// Drawables bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Drawable> {
        self.items.iter()
    }

    /// Replace the whole layer.
    pub fn replace(&mut self, drawables: Vec<Drawable>) {
        self.items = drawables;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
