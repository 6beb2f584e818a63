#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn default_tool_is_pen() {
    assert_eq!(Tool::default(), Tool::Pen);
}

#[test]
fn tool_names_round_trip() {
    for tool in Tool::ALL {
        assert_eq!(Tool::parse(tool.as_str()), Some(tool));
    }
}

#[test]
fn tool_parse_rejects_unknown() {
    assert_eq!(Tool::parse("lasso"), None);
    assert_eq!(Tool::parse("Pen"), None);
}

#[test]
fn freehand_and_shape_tools_are_disjoint() {
    for tool in Tool::ALL {
        assert!(!(tool.is_freehand() && tool.is_shape()), "{tool:?}");
    }
    assert!(Tool::Eraser.is_freehand());
    assert!(Tool::Line.is_shape());
    assert!(!Tool::Select.is_shape());
}

#[test]
fn shape_between_only_for_shape_tools() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert_eq!(Tool::Circle.shape_between(a, b), Some(Shape::Circle { x: 0.0, y: 0.0, radius: 5.0 }));
    assert_eq!(Tool::Line.shape_between(a, b), Some(Shape::Segment { a, b }));
    assert!(matches!(Tool::Rectangle.shape_between(a, b), Some(Shape::Rect { .. })));
    assert_eq!(Tool::Pen.shape_between(a, b), None);
    assert_eq!(Tool::Pan.shape_between(a, b), None);
}

// =============================================================
// Keys and modifiers
// =============================================================

#[test]
fn command_modifier_accepts_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Default::default() }.command());
    assert!(Modifiers { meta: true, ..Default::default() }.command());
    assert!(!Modifiers { shift: true, ..Default::default() }.command());
}

#[test]
fn key_letter_is_case_insensitive() {
    assert!(Key("Z".to_owned()).is_letter('z'));
    assert!(Key("y".to_owned()).is_letter('y'));
    assert!(!Key("zz".to_owned()).is_letter('z'));
    assert!(!Key("Escape".to_owned()).is_letter('e'));
}

#[test]
fn key_space_variants() {
    assert!(Key(" ".to_owned()).is_space());
    assert!(Key("Space".to_owned()).is_space());
    assert!(!Key("s".to_owned()).is_space());
}

// =============================================================
// UiState
// =============================================================

#[test]
fn ui_defaults() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Pen);
    assert_eq!(ui.stroke_color, "#000000");
    assert_eq!(ui.stroke_width, 2.0);
    assert_eq!(ui.eraser_width, 10.0);
    assert!(ui.selected_icon.is_none());
    assert!(!ui.placement_armed);
}

#[test]
fn pans_with_pan_tool_or_space() {
    let mut ui = UiState::default();
    assert!(!ui.pans());
    ui.space_held = true;
    assert!(ui.pans());
    ui.space_held = false;
    ui.tool = Tool::Pan;
    assert!(ui.pans());
}

#[test]
fn armed_placement_disables_panning() {
    let ui = UiState { tool: Tool::Pan, placement_armed: true, ..UiState::default() };
    assert!(!ui.pans());
    assert_eq!(ui.cursor(), "crosshair");
}

#[test]
fn cursor_per_tool() {
    let mut ui = UiState::default();
    assert_eq!(ui.cursor(), "crosshair");
    ui.tool = Tool::Pan;
    assert_eq!(ui.cursor(), "grab");
    ui.tool = Tool::Eraser;
    assert!(ui.cursor().starts_with("url("));
}

#[test]
fn eraser_cursor_size_is_clamped() {
    assert!(eraser_cursor(2.0).contains("width='16'"));
    assert!(eraser_cursor(12.0).contains("width='24'"));
    assert!(eraser_cursor(100.0).contains("width='40'"));
}

#[test]
fn input_state_defaults_to_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}
