//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `UiState` are the persistent interpretation mode for pointer
//! input. `InputState` is the gesture in flight between pointer-down and
//! pointer-up; it carries everything needed to finish or cancel the gesture.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::{DEFAULT_ERASER_WIDTH, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH};
use crate::doc::Shape;
use crate::icon::IconControl;

/// Which tool is currently active. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Freehand stroke in the current color (default).
    #[default]
    Pen,
    /// Freehand subtracting stroke.
    Eraser,
    Rectangle,
    Circle,
    Line,
    /// Click a drawable to delete it.
    Select,
    /// Drag to move the viewport.
    Pan,
    /// Icon palette mode; placement itself is armed separately.
    Icon,
}

impl Tool {
    pub const ALL: [Tool; 8] = [
        Self::Pen,
        Self::Eraser,
        Self::Rectangle,
        Self::Circle,
        Self::Line,
        Self::Select,
        Self::Pan,
        Self::Icon,
    ];

    /// Parse a host tool name such as `"rectangle"`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Eraser => "eraser",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Select => "select",
            Self::Pan => "pan",
            Self::Icon => "icon",
        }
    }

    /// Whether this tool lays down freehand strokes.
    #[must_use]
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pen | Self::Eraser)
    }

    /// Whether this tool drags out a shape primitive.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle | Self::Line)
    }

    /// The preview shape spanned from `anchor` to `current`, for shape tools.
    #[must_use]
    pub fn shape_between(self, anchor: Point, current: Point) -> Option<Shape> {
        match self {
            Self::Rectangle => Some(Shape::rect_from(anchor, current)),
            Self::Circle => Some(Shape::circle_from(anchor, current)),
            Self::Line => Some(Shape::segment_from(anchor, current)),
            Self::Pen | Self::Eraser | Self::Select | Self::Pan | Self::Icon => None,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier. Touch input arrives as `Primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (`"z"`, `" "`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_space(&self) -> bool {
        self.0 == " " || self.0 == "Space" || self.0 == "Spacebar"
    }

    /// Case-insensitive letter comparison.
    #[must_use]
    pub fn is_letter(&self, letter: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Vertical scroll amount (positive = down = zoom out).
    pub dy: f64,
}

/// Persistent tool and style selection, owned by one canvas instance.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: Tool,
    /// CSS color for pen strokes and shapes.
    pub stroke_color: String,
    pub stroke_width: f64,
    pub eraser_width: f64,
    /// At most one icon is selected; this is a relation, not ownership.
    pub selected_icon: Option<String>,
    /// The next primary pointer-down requests an icon placement.
    pub placement_armed: bool,
    /// Spacebar is held: pointer drags pan regardless of tool.
    pub space_held: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            stroke_color: DEFAULT_STROKE_COLOR.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            eraser_width: DEFAULT_ERASER_WIDTH,
            selected_icon: None,
            placement_armed: false,
            space_held: false,
        }
    }
}

impl UiState {
    /// Whether a primary drag should move the viewport.
    #[must_use]
    pub fn pans(&self) -> bool {
        !self.placement_armed && (self.tool == Tool::Pan || self.space_held)
    }

    /// CSS cursor for the current mode.
    #[must_use]
    pub fn cursor(&self) -> String {
        if self.placement_armed {
            return "crosshair".to_owned();
        }
        if self.pans() {
            return "grab".to_owned();
        }
        match self.tool {
            Tool::Eraser => eraser_cursor(self.eraser_width),
            _ => "crosshair".to_owned(),
        }
    }
}

/// A circle outline cursor sized after the eraser, clamped to stay visible.
fn eraser_cursor(eraser_width: f64) -> String {
    let size = (eraser_width * 2.0).clamp(16.0, 40.0);
    let half = size / 2.0;
    let r = half - 1.0;
    format!(
        "url(\"data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}'%3E\
         %3Ccircle cx='{half}' cy='{half}' r='{r}' fill='rgba(255,255,255,0.3)' stroke='black' stroke-width='1.5'/%3E\
         %3C/svg%3E\") {half} {half}, auto"
    )
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the viewport.
    Panning { last_screen: Point },
    /// Laying down a freehand stroke; committed on pointer-up.
    DrawingStroke { points: Vec<Point> },
    /// Dragging out a shape from `anchor`; `preview` is replaced on every move.
    DrawingShape { anchor: Point, preview: Option<Shape> },
    /// Moving an icon; the change is reported once, on release.
    DraggingIcon { id: String, last_world: Point, moved: bool },
    /// Pressed on an icon control; it fires if released over the same control.
    PressingControl { id: String, control: IconControl },
}
