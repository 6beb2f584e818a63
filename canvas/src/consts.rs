//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Multiplicative zoom change per wheel tick.
pub const ZOOM_STEP: f64 = 1.1;

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.25;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Stage size used when the host container reports no size of its own.
pub const DEFAULT_STAGE_WIDTH: f64 = 1200.0;
pub const DEFAULT_STAGE_HEIGHT: f64 = 900.0;

// ── Grid ────────────────────────────────────────────────────────

/// Grid lines cover this multiple of the viewport in each axis.
pub const GRID_EXTENSION: f64 = 3.0;

/// Cell size assumed before the host draws a grid.
pub const DEFAULT_GRID_SIZE: f64 = 50.0;

pub const DEFAULT_GRID_COLOR: &str = "#cccccc";

/// Most lines one grid may generate. Denser grids are logged and not drawn.
pub const MAX_GRID_LINES: usize = 20_000;

// ── Strokes ─────────────────────────────────────────────────────

pub const DEFAULT_STROKE_COLOR: &str = "#000000";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_ERASER_WIDTH: f64 = 10.0;

/// Eraser strokes paint white and subtract.
pub const ERASER_COLOR: &str = "#ffffff";

// ── Icons ───────────────────────────────────────────────────────

/// Icon edge length as a fraction of one grid cell.
pub const ICON_CELL_RATIO: f64 = 0.8;

/// Radius of the rotate/delete control circles, in scene units.
pub const CONTROL_RADIUS: f64 = 12.0;

/// Gap between the icon square and a control's center.
pub const CONTROL_OFFSET: f64 = 8.0;

/// Padding between the icon square and its selection outline.
pub const SELECTION_PAD: f64 = 4.0;

/// Body opacity of the selected icon.
pub const SELECTED_ICON_OPACITY: f64 = 0.9;

/// Rotation applied by one click on the rotate control, in degrees.
pub const ROTATE_STEP_DEG: f64 = 90.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around thin outlines.
pub const HIT_SLOP_PX: f64 = 4.0;

// ── History ─────────────────────────────────────────────────────

/// Default number of drawing-layer snapshots kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
