#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_distance_is_euclidean() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_distance_is_symmetric() {
    let a = Point::new(-2.0, 7.5);
    let b = Point::new(11.0, -1.0);
    assert!(approx_eq(a.distance(b), b.distance(a)));
}

// --- Transforms ---

#[test]
fn default_camera_is_identity() {
    let cam = Camera::default();
    let p = Point::new(50.0, 75.0);
    assert!(point_approx_eq(cam.screen_to_world(p), p));
    assert!(point_approx_eq(cam.world_to_screen(p), p));
}

#[test]
fn screen_to_world_undoes_pan_then_zoom() {
    let cam = Camera { pan_x: 50.0, pan_y: 30.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(0.0, 0.0));
    assert!(point_approx_eq(world, Point::new(-25.0, -15.0)));
}

#[test]
fn world_to_screen_applies_zoom_then_pan() {
    let cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 3.0 };
    let screen = cam.world_to_screen(Point::new(5.0, 5.0));
    assert!(point_approx_eq(screen, Point::new(35.0, 25.0)));
}

#[test]
fn transforms_round_trip_at_fractional_zoom() {
    let cam = Camera { pan_x: 13.7, pan_y: -42.3, zoom: 0.75 };
    let world = Point::new(333.3, -999.9);
    assert!(point_approx_eq(cam.screen_to_world(cam.world_to_screen(world)), world));
}

#[test]
fn screen_dist_to_world_ignores_pan() {
    let cam = Camera { pan_x: 999.0, pan_y: -999.0, zoom: 4.0 };
    assert!(approx_eq(cam.screen_dist_to_world(8.0), 2.0));
}

// --- pan_by ---

#[test]
fn pan_by_moves_viewport_not_scale() {
    let mut cam = Camera::default();
    cam.pan_by(10.0, -5.0);
    cam.pan_by(2.5, 2.5);
    assert_eq!(cam, Camera { pan_x: 12.5, pan_y: -2.5, zoom: 1.0 });
}

#[test]
fn pan_by_shifts_world_under_fixed_screen_point() {
    let mut cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    cam.pan_by(20.0, 0.0);
    let world = cam.screen_to_world(Point::new(20.0, 0.0));
    assert!(point_approx_eq(world, Point::new(0.0, 0.0)));
}

// --- zoom_at ---

#[test]
fn zoom_at_keeps_anchor_world_point_fixed() {
    let mut cam = Camera { pan_x: 37.0, pan_y: -12.0, zoom: 1.3 };
    let anchor = Point::new(412.0, 287.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 1.1, 0.25, 5.0);
    let after = cam.screen_to_world(anchor);
    assert!(point_approx_eq(before, after));
    assert!(approx_eq(cam.zoom, 1.43));
}

#[test]
fn zoom_out_keeps_anchor_world_point_fixed() {
    let mut cam = Camera::default();
    let anchor = Point::new(600.0, 450.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 1.0 / 1.1, 0.25, 5.0);
    assert!(point_approx_eq(before, cam.screen_to_world(anchor)));
    assert!(cam.zoom < 1.0);
}

#[test]
fn repeated_zoom_steps_stay_anchored() {
    let mut cam = Camera { pan_x: -80.0, pan_y: 15.0, zoom: 0.8 };
    let anchor = Point::new(100.0, 640.0);
    let before = cam.screen_to_world(anchor);
    for _ in 0..7 {
        cam.zoom_at(anchor, 1.1, 0.25, 5.0);
    }
    let after = cam.screen_to_world(anchor);
    assert!((before.x - after.x).abs() < 1e-6);
    assert!((before.y - after.y).abs() < 1e-6);
}

#[test]
fn zoom_at_clamps_to_max() {
    let mut cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.8 };
    cam.zoom_at(Point::new(10.0, 10.0), 1.1, 0.25, 5.0);
    assert_eq!(cam.zoom, 5.0);
}

#[test]
fn zoom_at_clamps_to_min() {
    let mut cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.26 };
    cam.zoom_at(Point::new(10.0, 10.0), 1.0 / 1.1, 0.25, 5.0);
    assert_eq!(cam.zoom, 0.25);
}

#[test]
fn clamped_zoom_still_anchors() {
    let mut cam = Camera { pan_x: 5.0, pan_y: 5.0, zoom: 4.9 };
    let anchor = Point::new(300.0, 200.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 1.1, 0.25, 5.0);
    assert!(point_approx_eq(before, cam.screen_to_world(anchor)));
}
