#![allow(clippy::float_cmp)]

use super::*;

fn meta(id: &str) -> IconMeta {
    IconMeta { id: id.to_owned(), filename: "door.png".to_owned(), category: "doors".to_owned() }
}

fn icon_at(id: &str, x: f64, y: f64) -> IconEntity {
    IconEntity::new(meta(id), ImageHandle::new("door.png", 64.0, 64.0), Point::new(x, y), 0.0, 40.0)
}

// =============================================================
// Rotation
// =============================================================

#[test]
fn rotate_adds_ninety_degrees() {
    let mut icon = icon_at("a", 0.0, 0.0);
    icon.rotate();
    assert_eq!(icon.rotation, 90.0);
}

#[test]
fn rotation_accumulates_without_normalizing() {
    let mut icon = icon_at("a", 0.0, 0.0);
    for _ in 0..5 {
        icon.rotate();
    }
    assert_eq!(icon.rotation, 450.0);
}

// =============================================================
// Controls and selection geometry
// =============================================================

#[test]
fn controls_sit_outside_top_corners() {
    let icon = icon_at("a", 100.0, 100.0);
    // half size 20 + offset 8
    assert_eq!(icon.control_center(IconControl::Rotate), Point::new(128.0, 72.0));
    assert_eq!(icon.control_center(IconControl::Delete), Point::new(72.0, 72.0));
}

#[test]
fn controls_do_not_follow_body_rotation() {
    let mut icon = icon_at("a", 100.0, 100.0);
    let before = icon.control_center(IconControl::Rotate);
    icon.rotate();
    assert_eq!(icon.control_center(IconControl::Rotate), before);
}

#[test]
fn controls_hidden_until_selected() {
    let mut icon = icon_at("a", 100.0, 100.0);
    let rotate_pt = icon.control_center(IconControl::Rotate);
    assert_eq!(icon.control_at(rotate_pt), None);
    icon.selected = true;
    assert_eq!(icon.control_at(rotate_pt), Some(IconControl::Rotate));
    assert_eq!(icon.control_at(icon.control_center(IconControl::Delete)), Some(IconControl::Delete));
}

#[test]
fn control_hit_respects_radius() {
    let mut icon = icon_at("a", 0.0, 0.0);
    icon.selected = true;
    let c = icon.control_center(IconControl::Delete);
    assert_eq!(icon.control_at(Point::new(c.x + 11.9, c.y)), Some(IconControl::Delete));
    assert_eq!(icon.control_at(Point::new(c.x + 12.5, c.y)), None);
}

#[test]
fn selection_bounds_pad_the_icon_square() {
    let icon = icon_at("a", 50.0, 50.0);
    let b = icon.selection_bounds();
    assert_eq!(b, Bounds { x: 26.0, y: 26.0, width: 48.0, height: 48.0 });
}

#[test]
fn selection_dims_body() {
    let mut icon = icon_at("a", 0.0, 0.0);
    assert_eq!(icon.body_opacity(), 1.0);
    icon.selected = true;
    assert_eq!(icon.body_opacity(), 0.9);
}

// =============================================================
// Body hit-testing
// =============================================================

#[test]
fn body_contains_center_and_edges() {
    let icon = icon_at("a", 10.0, 10.0);
    assert!(icon.body_contains(Point::new(10.0, 10.0)));
    assert!(icon.body_contains(Point::new(29.9, -9.9)));
    assert!(!icon.body_contains(Point::new(30.5, 10.0)));
}

#[test]
fn body_contains_follows_arbitrary_rotation() {
    let mut icon = icon_at("a", 0.0, 0.0);
    icon.rotation = 45.0;
    // Corner of the unrotated square is now outside the diamond.
    assert!(!icon.body_contains(Point::new(19.0, 19.0)));
    // The rotated corner reaches along the axis to half-diagonal.
    assert!(icon.body_contains(Point::new(27.0, 0.0)));
}

#[test]
fn move_by_translates_position() {
    let mut icon = icon_at("a", 1.0, 2.0);
    icon.move_by(10.0, -4.0);
    assert_eq!(icon.position(), Point::new(11.0, -2.0));
}

// =============================================================
// IconLayer
// =============================================================

#[test]
fn layer_rejects_duplicate_ids() {
    let mut layer = IconLayer::new();
    assert!(layer.add(icon_at("a", 0.0, 0.0)));
    assert!(!layer.add(icon_at("a", 5.0, 5.0)));
    assert_eq!(layer.len(), 1);
    assert_eq!(layer.get("a").unwrap().x, 0.0);
}

#[test]
fn layer_remove_and_lookup() {
    let mut layer = IconLayer::new();
    layer.add(icon_at("a", 0.0, 0.0));
    layer.add(icon_at("b", 0.0, 0.0));
    assert!(layer.remove("a").is_some());
    assert!(layer.remove("a").is_none());
    assert!(!layer.contains("a"));
    assert!(layer.contains("b"));
}

#[test]
fn layer_get_mut_mutates_in_place() {
    let mut layer = IconLayer::new();
    layer.add(icon_at("a", 0.0, 0.0));
    layer.get_mut("a").unwrap().rotate();
    assert_eq!(layer.get("a").unwrap().rotation, 90.0);
}

#[test]
fn layer_iterates_in_placement_order() {
    let mut layer = IconLayer::new();
    layer.add(icon_at("z", 0.0, 0.0));
    layer.add(icon_at("a", 0.0, 0.0));
    let ids: Vec<_> = layer.iter().map(|i| i.meta.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a"]);
    layer.clear();
    assert!(layer.is_empty());
}
