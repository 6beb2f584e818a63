//! Rendering: draws the full map scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads engine state and produces pixels; it never mutates anything.
//!
//! Layers are painted bottom to top: background, grid, drawing, icons. The
//! drawing layer is painted to its own offscreen surface first so that eraser
//! strokes (`destination-out`) only remove drawing content, then that surface
//! is composited over the grid.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::collections::HashMap;
use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::Camera;
use crate::consts::{CONTROL_RADIUS, SELECTION_PAD};
use crate::doc::{Shape, StrokeStyle};
use crate::engine::EngineCore;
use crate::icon::{IconControl, IconEntity};
use crate::scene::{BackgroundImage, GridLayer, LayerKind};

/// Selection outline colour.
const SELECTION_COLOR: &str = "#4a90e2";
const SELECTION_LINE_WIDTH: f64 = 3.0;
const SELECTION_DASH: f64 = 5.0;

const ROTATE_FILL: &str = "#4a90e2";
const DELETE_FILL: &str = "#e74c3c";

/// The pair of browser surfaces a frame is painted onto.
pub struct Surface<'a> {
    pub ctx: &'a CanvasRenderingContext2d,
    pub layer_canvas: &'a HtmlCanvasElement,
    pub layer_ctx: &'a CanvasRenderingContext2d,
    /// Device pixel ratio the backing stores were sized with.
    pub dpr: f64,
}

/// Draw one frame.
///
/// `images` maps image keys (filenames) to decoded images; entities whose
/// image is missing are not drawn.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(surface: &Surface<'_>, core: &EngineCore, images: &HashMap<String, HtmlImageElement>) -> Result<(), JsValue> {
    let Surface { ctx, layer_canvas, layer_ctx, dpr } = *surface;
    let (w, h) = (core.viewport_width, core.viewport_height);
    let camera = core.camera();

    clear(ctx, w, h, dpr)?;
    for layer in LayerKind::ORDER {
        apply_camera(ctx, &camera, dpr)?;
        match layer {
            LayerKind::Background => {
                if let Some(bg) = &core.scene.background {
                    draw_background(ctx, bg, images)?;
                }
            }
            LayerKind::Grid => {
                if core.scene.grid.visible {
                    draw_grid(ctx, &core.scene.grid, camera.zoom);
                }
            }
            LayerKind::Drawing => {
                clear(layer_ctx, w, h, dpr)?;
                apply_camera(layer_ctx, &camera, dpr)?;
                for drawable in core.scene.drawing.iter() {
                    draw_drawable(layer_ctx, &drawable.shape, &drawable.style)?;
                }
                if let Some(shape) = core.pending_shape() {
                    draw_drawable(layer_ctx, &shape, &core.active_style())?;
                }
                ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
                ctx.draw_image_with_html_canvas_element(layer_canvas, 0.0, 0.0)?;
            }
            LayerKind::Icon => {
                for icon in core.scene.icons.iter() {
                    if let Some(img) = images.get(&icon.image.key) {
                        draw_icon(ctx, icon, img)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn clear(ctx: &CanvasRenderingContext2d, w: f64, h: f64, dpr: f64) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, w, h);
    Ok(())
}

fn apply_camera(ctx: &CanvasRenderingContext2d, camera: &Camera, dpr: f64) -> Result<(), JsValue> {
    let scale = dpr * camera.zoom;
    ctx.set_transform(scale, 0.0, 0.0, scale, dpr * camera.pan_x, dpr * camera.pan_y)
}

fn draw_background(
    ctx: &CanvasRenderingContext2d,
    bg: &BackgroundImage,
    images: &HashMap<String, HtmlImageElement>,
) -> Result<(), JsValue> {
    let Some(img) = images.get(&bg.image.key) else {
        return Ok(());
    };
    ctx.save();
    ctx.set_global_alpha(bg.opacity);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        img,
        bg.offset_x,
        bg.offset_y,
        bg.image.width * bg.scale,
        bg.image.height * bg.scale,
    )?;
    ctx.restore();
    Ok(())
}

fn draw_grid(ctx: &CanvasRenderingContext2d, grid: &GridLayer, zoom: f64) {
    if grid.lines.is_empty() {
        return;
    }
    ctx.set_stroke_style_str(&grid.spec.color);
    // One screen pixel regardless of zoom.
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    for line in &grid.lines {
        ctx.move_to(line.from.x, line.from.y);
        ctx.line_to(line.to.x, line.to.y);
    }
    ctx.stroke();
}

fn draw_drawable(ctx: &CanvasRenderingContext2d, shape: &Shape, style: &StrokeStyle) -> Result<(), JsValue> {
    ctx.set_global_composite_operation(style.blend.as_str())?;
    ctx.set_stroke_style_str(&style.color);
    ctx.set_line_width(style.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.begin_path();
    match shape {
        Shape::Stroke { points } => {
            let mut iter = points.iter();
            if let Some(first) = iter.next() {
                ctx.move_to(first.x, first.y);
                for p in iter {
                    ctx.line_to(p.x, p.y);
                }
                if points.len() == 1 {
                    // A dot: zero-length segments still get round caps.
                    ctx.line_to(first.x, first.y);
                }
            }
        }
        Shape::Rect { x, y, width, height } => ctx.rect(*x, *y, *width, *height),
        Shape::Circle { x, y, radius } => ctx.arc(*x, *y, *radius, 0.0, TAU)?,
        Shape::Segment { a, b } => {
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
        }
    }
    ctx.stroke();
    ctx.set_global_composite_operation("source-over")
}

fn draw_icon(ctx: &CanvasRenderingContext2d, icon: &IconEntity, img: &HtmlImageElement) -> Result<(), JsValue> {
    let half = icon.size / 2.0;
    ctx.save();
    ctx.translate(icon.x, icon.y)?;
    ctx.rotate(icon.rotation.to_radians())?;
    ctx.set_global_alpha(icon.body_opacity());
    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -half, -half, icon.size, icon.size)?;
    ctx.restore();

    if icon.selected {
        draw_selection(ctx, icon)?;
    }
    Ok(())
}

/// Dashed outline plus the rotate and delete controls. Not rotated with the body.
fn draw_selection(ctx: &CanvasRenderingContext2d, icon: &IconEntity) -> Result<(), JsValue> {
    let bounds = icon.selection_bounds();
    let dash = js_sys::Array::of2(&JsValue::from_f64(SELECTION_DASH), &JsValue::from_f64(SELECTION_DASH));
    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(SELECTION_LINE_WIDTH);
    ctx.set_line_dash(&dash)?;
    ctx.stroke_rect(bounds.x, bounds.y, bounds.width, bounds.height);
    ctx.set_line_dash(&js_sys::Array::new())?;

    draw_control(ctx, icon, IconControl::Rotate, ROTATE_FILL, "\u{21bb}")?;
    draw_control(ctx, icon, IconControl::Delete, DELETE_FILL, "\u{00d7}")?;
    ctx.restore();
    Ok(())
}

fn draw_control(
    ctx: &CanvasRenderingContext2d,
    icon: &IconEntity,
    control: IconControl,
    fill: &str,
    glyph: &str,
) -> Result<(), JsValue> {
    let c = icon.control_center(control);
    ctx.begin_path();
    ctx.arc(c.x, c.y, CONTROL_RADIUS, 0.0, TAU)?;
    ctx.set_fill_style_str(fill);
    ctx.fill();
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(2.0);
    ctx.stroke();

    ctx.set_fill_style_str("#fff");
    ctx.set_font(&format!("bold {}px sans-serif", CONTROL_RADIUS + SELECTION_PAD));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(glyph, c.x, c.y)
}
