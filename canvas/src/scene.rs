//! Scene: the four compositing layers of one map.
//!
//! Layers are composited strictly bottom to top in [`LayerKind::ORDER`]. The
//! order is fixed for the life of a scene; only the layers' contents change.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use tracing::warn;

use crate::camera::Point;
use crate::consts::{DEFAULT_GRID_COLOR, MAX_GRID_LINES};
use crate::doc::DrawingLayer;
use crate::icon::IconLayer;

/// A compositing layer of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Background,
    Grid,
    Drawing,
    Icon,
}

impl LayerKind {
    /// Bottom-to-top compositing order.
    pub const ORDER: [LayerKind; 4] = [Self::Background, Self::Grid, Self::Drawing, Self::Icon];
}

/// A decoded image the host has made available, keyed by filename.
///
/// The engine never touches pixels; the host keeps the real image and the
/// renderer looks it up by `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub key: String,
    /// Natural size in pixels.
    pub width: f64,
    pub height: f64,
}

impl ImageHandle {
    #[must_use]
    pub fn new(key: impl Into<String>, width: f64, height: f64) -> Self {
        Self { key: key.into(), width, height }
    }
}

/// The single image shown beneath everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub image: ImageHandle,
    pub opacity: f64,
    /// Uniform scale applied to the natural size.
    pub scale: f64,
    /// Top-left corner in scene coordinates.
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Parameters the grid was last drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub cell_size: f64,
    pub color: String,
    pub visible: bool,
}

/// One generated grid line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone)]
pub struct GridLayer {
    pub spec: GridSpec,
    pub lines: Vec<GridLine>,
    /// Layer visibility, flipped by `toggle` without regenerating lines.
    pub visible: bool,
}

impl GridLayer {
    fn new(cell_size: f64) -> Self {
        Self {
            spec: GridSpec { cell_size, color: DEFAULT_GRID_COLOR.to_owned(), visible: false },
            lines: Vec::new(),
            visible: true,
        }
    }

    /// Regenerate the grid for a `viewport_w` × `viewport_h` stage.
    ///
    /// Lines cover `extension` times the viewport in each axis, centred on
    /// it, so moderate panning and zooming never reveal an edge. A hidden
    /// grid keeps its spec but has no lines.
    pub fn regenerate(&mut self, spec: GridSpec, viewport_w: f64, viewport_h: f64, extension: f64) {
        self.lines.clear();
        if spec.visible {
            if spec.cell_size > 0.0 && spec.cell_size.is_finite() {
                self.lines = grid_lines(spec.cell_size, viewport_w, viewport_h, extension);
            } else {
                warn!(cell_size = spec.cell_size, "ignoring grid with non-positive cell size");
            }
        }
        self.spec = spec;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn grid_lines(cell: f64, viewport_w: f64, viewport_h: f64, extension: f64) -> Vec<GridLine> {
    let ext_w = viewport_w * extension;
    let ext_h = viewport_h * extension;
    let cols = (ext_w / cell).floor();
    let rows = (ext_h / cell).floor();
    let count = cols + rows + 2.0;
    if !(count <= MAX_GRID_LINES as f64) {
        warn!(cell_size = cell, extension, count, "grid too dense; drawing no lines");
        return Vec::new();
    }
    let (cols, rows) = (cols as usize, rows as usize);
    let off_x = -(ext_w - viewport_w) / 2.0;
    let off_y = -(ext_h - viewport_h) / 2.0;

    let mut lines = Vec::with_capacity(cols.saturating_add(rows).saturating_add(2));
    for i in 0..=cols {
        let x = off_x + i as f64 * cell;
        lines.push(GridLine { from: Point::new(x, off_y), to: Point::new(x, off_y + ext_h) });
    }
    for i in 0..=rows {
        let y = off_y + i as f64 * cell;
        lines.push(GridLine { from: Point::new(off_x, y), to: Point::new(off_x + ext_w, y) });
    }
    lines
}

/// The full visual state of one map.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Option<BackgroundImage>,
    pub grid: GridLayer,
    pub drawing: DrawingLayer,
    pub icons: IconLayer,
}

impl Scene {
    #[must_use]
    pub fn new(default_cell_size: f64) -> Self {
        Self {
            background: None,
            grid: GridLayer::new(default_cell_size),
            drawing: DrawingLayer::new(),
            icons: IconLayer::new(),
        }
    }

    /// Replace the background. `None` clears it.
    pub fn set_background(&mut self, background: Option<BackgroundImage>) {
        self.background = background;
    }

    /// Cell size icons are sized against.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.grid.spec.cell_size
    }

    /// Drop every drawable and icon; background and grid are kept.
    pub fn clear_content(&mut self) {
        self.drawing.clear();
        self.icons.clear();
    }
}
