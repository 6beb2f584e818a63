#![allow(clippy::float_cmp)]

use super::*;

fn spec(cell: f64, visible: bool) -> GridSpec {
    GridSpec { cell_size: cell, color: "#cccccc".to_owned(), visible }
}

#[test]
fn layer_order_is_bottom_to_top() {
    assert_eq!(LayerKind::ORDER, [LayerKind::Background, LayerKind::Grid, LayerKind::Drawing, LayerKind::Icon]);
}

#[test]
fn new_scene_is_empty_with_default_cell() {
    let scene = Scene::new(50.0);
    assert!(scene.background.is_none());
    assert!(scene.grid.lines.is_empty());
    assert!(scene.drawing.is_empty());
    assert!(scene.icons.is_empty());
    assert_eq!(scene.cell_size(), 50.0);
}

#[test]
fn grid_covers_three_viewports_centred() {
    let mut grid = GridLayer::new(50.0);
    grid.regenerate(spec(100.0, true), 1200.0, 900.0, 3.0);
    // 3600 / 100 -> 37 vertical, 2700 / 100 -> 28 horizontal
    assert_eq!(grid.lines.len(), 37 + 28);
    let first = grid.lines[0];
    assert_eq!(first.from, Point::new(-1200.0, -900.0));
    assert_eq!(first.to, Point::new(-1200.0, 1800.0));
    let last_vertical = grid.lines[36];
    assert_eq!(last_vertical.from.x, 2400.0);
    let first_horizontal = grid.lines[37];
    assert_eq!(first_horizontal.to, Point::new(2400.0, -900.0));
}

#[test]
fn grid_lines_are_one_cell_apart() {
    let mut grid = GridLayer::new(50.0);
    grid.regenerate(spec(40.0, true), 400.0, 400.0, 3.0);
    let xs: Vec<f64> = grid.lines.iter().take(5).map(|l| l.from.x).collect();
    for pair in xs.windows(2) {
        assert_eq!(pair[1] - pair[0], 40.0);
    }
}

#[test]
fn hidden_grid_has_no_lines_but_keeps_spec() {
    let mut grid = GridLayer::new(50.0);
    grid.regenerate(spec(25.0, true), 100.0, 100.0, 3.0);
    assert!(!grid.lines.is_empty());
    grid.regenerate(spec(30.0, false), 100.0, 100.0, 3.0);
    assert!(grid.lines.is_empty());
    assert_eq!(grid.spec.cell_size, 30.0);
}

#[test]
fn non_positive_cell_size_draws_nothing() {
    let mut grid = GridLayer::new(50.0);
    grid.regenerate(spec(0.0, true), 100.0, 100.0, 3.0);
    assert!(grid.lines.is_empty());
    grid.regenerate(spec(-5.0, true), 100.0, 100.0, 3.0);
    assert!(grid.lines.is_empty());
}

#[test]
fn tiny_cell_size_draws_nothing() {
    let mut grid = GridLayer::new(50.0);
    grid.regenerate(spec(1e-300, true), 1200.0, 900.0, 3.0);
    assert!(grid.lines.is_empty());
    grid.regenerate(spec(1e-4, true), 1200.0, 900.0, 3.0);
    assert!(grid.lines.is_empty());
    assert_eq!(grid.spec.cell_size, 1e-4);
}

#[test]
fn huge_extension_draws_nothing() {
    let mut grid = GridLayer::new(50.0);
    grid.regenerate(spec(50.0, true), 1200.0, 900.0, 1e300);
    assert!(grid.lines.is_empty());
    grid.regenerate(spec(50.0, true), 1200.0, 900.0, f64::MAX);
    assert!(grid.lines.is_empty());
}

#[test]
fn one_pixel_cells_stay_under_line_cap() {
    let mut grid = GridLayer::new(50.0);
    grid.regenerate(spec(1.0, true), 1200.0, 900.0, 3.0);
    assert_eq!(grid.lines.len(), 3601 + 2701);
    assert!(grid.lines.len() <= MAX_GRID_LINES);
}

#[test]
fn toggle_flips_visibility_without_regenerating() {
    let mut grid = GridLayer::new(50.0);
    grid.regenerate(spec(50.0, true), 200.0, 200.0, 3.0);
    let count = grid.lines.len();
    assert!(grid.visible);
    grid.toggle();
    assert!(!grid.visible);
    assert_eq!(grid.lines.len(), count);
    grid.toggle();
    assert!(grid.visible);
}

#[test]
fn set_background_replaces_previous() {
    let mut scene = Scene::new(50.0);
    let bg = |key: &str| BackgroundImage {
        image: ImageHandle::new(key, 800.0, 600.0),
        opacity: 0.5,
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };
    scene.set_background(Some(bg("a.png")));
    scene.set_background(Some(bg("b.png")));
    assert_eq!(scene.background.as_ref().unwrap().image.key, "b.png");
    scene.set_background(None);
    assert!(scene.background.is_none());
}
