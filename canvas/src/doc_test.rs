#![allow(clippy::float_cmp)]

use super::*;

fn style(color: &str) -> StrokeStyle {
    StrokeStyle { color: color.to_owned(), width: 3.0, blend: BlendMode::Normal }
}

fn stroke(color: &str) -> Drawable {
    Drawable::new(Shape::Stroke { points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)] }, style(color))
}

// =============================================================
// BlendMode
// =============================================================

#[test]
fn blend_mode_names_match_canvas_composite_ops() {
    assert_eq!(BlendMode::Normal.as_str(), "source-over");
    assert_eq!(BlendMode::Erase.as_str(), "destination-out");
}

#[test]
fn blend_mode_parse_recognizes_erase() {
    assert_eq!(BlendMode::parse("destination-out"), BlendMode::Erase);
    assert_eq!(BlendMode::parse("source-over"), BlendMode::Normal);
}

#[test]
fn blend_mode_parse_falls_back_to_normal() {
    assert_eq!(BlendMode::parse("multiply"), BlendMode::Normal);
    assert_eq!(BlendMode::parse(""), BlendMode::Normal);
}

#[test]
fn blend_mode_serde_uses_composite_names() {
    assert_eq!(serde_json::to_string(&BlendMode::Erase).unwrap(), "\"destination-out\"");
    let back: BlendMode = serde_json::from_str("\"source-over\"").unwrap();
    assert_eq!(back, BlendMode::Normal);
}

// =============================================================
// Shape constructors
// =============================================================

#[test]
fn rect_from_keeps_signed_extent() {
    let shape = Shape::rect_from(Point::new(10.0, 10.0), Point::new(4.0, 30.0));
    assert_eq!(shape, Shape::Rect { x: 10.0, y: 10.0, width: -6.0, height: 20.0 });
}

#[test]
fn circle_from_uses_euclidean_radius() {
    let shape = Shape::circle_from(Point::new(1.0, 1.0), Point::new(4.0, 5.0));
    assert_eq!(shape, Shape::Circle { x: 1.0, y: 1.0, radius: 5.0 });
}

#[test]
fn segment_from_keeps_both_endpoints() {
    let a = Point::new(-1.0, 2.0);
    let b = Point::new(8.0, 9.0);
    assert_eq!(Shape::segment_from(a, b), Shape::Segment { a, b });
}

#[test]
fn kind_names_are_distinct() {
    let names = [
        Shape::Stroke { points: vec![] }.kind_name(),
        Shape::Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 }.kind_name(),
        Shape::Circle { x: 0.0, y: 0.0, radius: 0.0 }.kind_name(),
        Shape::Segment { a: Point::new(0.0, 0.0), b: Point::new(0.0, 0.0) }.kind_name(),
    ];
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

// =============================================================
// Drawable
// =============================================================

#[test]
fn new_drawables_get_distinct_ids() {
    assert_ne!(stroke("red").id, stroke("red").id);
}

#[test]
fn same_content_ignores_id() {
    let a = stroke("red");
    let b = stroke("red");
    assert!(a.same_content(&b));
    assert!(!a.same_content(&stroke("blue")));
}

// =============================================================
// DrawingLayer
// =============================================================

#[test]
fn layer_starts_empty() {
    let layer = DrawingLayer::new();
    assert!(layer.is_empty());
    assert_eq!(layer.len(), 0);
}

#[test]
fn push_preserves_paint_order() {
    let mut layer = DrawingLayer::new();
    let a = layer.push(stroke("red"));
    let b = layer.push(stroke("blue"));
    let ids: Vec<_> = layer.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn remove_returns_drawable_and_keeps_order_of_rest() {
    let mut layer = DrawingLayer::new();
    let a = layer.push(stroke("red"));
    let b = layer.push(stroke("green"));
    let c = layer.push(stroke("blue"));
    let removed = layer.remove(&b).unwrap();
    assert_eq!(removed.style.color, "green");
    let ids: Vec<_> = layer.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn remove_missing_is_none() {
    let mut layer = DrawingLayer::new();
    layer.push(stroke("red"));
    assert!(layer.remove(&Uuid::new_v4()).is_none());
    assert_eq!(layer.len(), 1);
}

#[test]
fn get_finds_by_id() {
    let mut layer = DrawingLayer::new();
    let id = layer.push(stroke("red"));
    assert_eq!(layer.get(&id).unwrap().style.color, "red");
    assert!(layer.get(&Uuid::new_v4()).is_none());
}

#[test]
fn replace_and_clear() {
    let mut layer = DrawingLayer::new();
    layer.push(stroke("red"));
    layer.replace(vec![stroke("a"), stroke("b"), stroke("c")]);
    assert_eq!(layer.len(), 3);
    layer.clear();
    assert!(layer.is_empty());
}
