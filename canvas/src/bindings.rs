//! JavaScript entry points.
//!
//! [`MapCanvas`] is the object the map editor page holds. It forwards DOM
//! events and editor commands to [`Engine`], calls the page's save callback
//! on every committed change, and speaks JSON text for scene data so the page
//! can persist it untouched.
//!
//! Pointer events pass the DOM `MouseEvent.button` code and a modifier
//! bitmask built from the event: [`MOD_SHIFT`] | [`MOD_CTRL`] | [`MOD_ALT`] |
//! [`MOD_META`].

use serde_json::Value;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use crate::camera::Point;
use crate::config::CanvasConfig;
use crate::engine::{Action, Engine};
use crate::icon::IconMeta;
use crate::input::{Button, Key, Modifiers, WheelDelta};

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

pub const MOD_SHIFT: u8 = 1;
pub const MOD_CTRL: u8 = 1 << 1;
pub const MOD_ALT: u8 = 1 << 2;
pub const MOD_META: u8 = 1 << 3;

/// Decode a modifier bitmask.
#[must_use]
pub fn modifiers_from_bits(bits: u8) -> Modifiers {
    Modifiers {
        shift: bits & MOD_SHIFT != 0,
        ctrl: bits & MOD_CTRL != 0,
        alt: bits & MOD_ALT != 0,
        meta: bits & MOD_META != 0,
    }
}

/// Map a DOM `MouseEvent.button` code. Back/forward buttons map to `None`.
#[must_use]
pub fn button_from_dom(code: i16) -> Option<Button> {
    match code {
        0 => Some(Button::Primary),
        1 => Some(Button::Middle),
        2 => Some(Button::Secondary),
        _ => None,
    }
}

/// Parse host config JSON. Missing or invalid config falls back to defaults.
#[must_use]
pub fn config_from_json(raw: Option<&str>) -> CanvasConfig {
    let Some(raw) = raw else {
        return CanvasConfig::default();
    };
    match CanvasConfig::from_json(raw) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "invalid canvas config; using defaults");
            CanvasConfig::default()
        }
    }
}

/// Wrap a JSON text payload for the codec. Blank text means "nothing saved".
#[must_use]
pub fn text_payload(raw: &str) -> Value {
    if raw.trim().is_empty() { Value::Null } else { Value::String(raw.to_owned()) }
}

/// One map canvas bound to a host container.
#[wasm_bindgen]
pub struct MapCanvas {
    engine: Engine,
    /// Armed one-shot placement; called with scene `(x, y)`.
    on_place: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl MapCanvas {
    /// Bind to the element `host_container_id`. Returns `undefined` (after
    /// logging) when the element does not exist.
    pub fn initialize(
        host_container_id: &str,
        on_save: Option<js_sys::Function>,
        config_json: Option<String>,
    ) -> Option<MapCanvas> {
        let config = config_from_json(config_json.as_deref());
        let engine = Engine::initialize(host_container_id, on_save, config)?;
        Some(Self { engine, on_place: None })
    }

    /// Make a loaded image available under its filename.
    #[wasm_bindgen(js_name = registerImage)]
    pub fn register_image(&mut self, filename: &str, image: HtmlImageElement) {
        self.engine.register_image(filename, image);
    }

    // --- Tool / style ---

    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, name: &str) {
        let rest = self.engine.set_tool(name);
        self.forward(rest);
    }

    #[wasm_bindgen(js_name = setStrokeColor)]
    pub fn set_stroke_color(&mut self, color: &str) {
        self.engine.set_stroke_color(color);
    }

    #[wasm_bindgen(js_name = setStrokeWidth)]
    pub fn set_stroke_width(&mut self, width: f64) {
        self.engine.set_stroke_width(width);
    }

    #[wasm_bindgen(js_name = setEraserWidth)]
    pub fn set_eraser_width(&mut self, width: f64) {
        let rest = self.engine.set_eraser_width(width);
        self.forward(rest);
    }

    /// Arm one-shot placement with `callback`, or disarm with `null`.
    #[wasm_bindgen(js_name = setIconPlacementCallback)]
    pub fn set_icon_placement_callback(&mut self, callback: Option<js_sys::Function>) {
        let armed = callback.is_some();
        self.on_place = callback;
        let rest = self.engine.set_icon_placement(armed);
        self.forward(rest);
    }

    // --- Scene ---

    #[wasm_bindgen(js_name = drawGrid)]
    pub fn draw_grid(&mut self, cell_size: f64, color: &str, visible: bool) {
        let rest = self.engine.draw_grid(cell_size, color, visible);
        self.forward(rest);
    }

    #[wasm_bindgen(js_name = toggleGrid)]
    pub fn toggle_grid(&mut self) {
        let rest = self.engine.toggle_grid();
        self.forward(rest);
    }

    /// Show the registered image `filename` beneath the map; `null` clears it.
    #[wasm_bindgen(js_name = setBackgroundImage)]
    pub fn set_background_image(
        &mut self,
        filename: Option<String>,
        opacity: f64,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    ) {
        let rest = self.engine.set_background_image(filename.as_deref(), opacity, scale, offset_x, offset_y);
        self.forward(rest);
    }

    /// Place the registered image `filename` centred at scene `(x, y)`.
    #[wasm_bindgen(js_name = addIcon)]
    pub fn add_icon(&mut self, x: f64, y: f64, id: String, filename: String, category: String) {
        let rest = self.engine.add_icon(x, y, IconMeta { id, filename, category });
        self.forward(rest);
    }

    #[wasm_bindgen(js_name = clearDrawing)]
    pub fn clear_drawing(&mut self) {
        let rest = self.engine.clear_drawing();
        self.forward(rest);
    }

    // --- Persistence ---

    /// `{"strokes": <drawing document>, "icons": [<icon record>...]}` as JSON text.
    ///
    /// # Errors
    ///
    /// Returns the serialization error message.
    #[wasm_bindgen(js_name = exportScene)]
    pub fn export_scene(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.export_scene()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace the scene with saved content, both given as JSON text, and
    /// return the load report as JSON text.
    ///
    /// Icon images must be registered first; records whose image is not are
    /// skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns the serialization error message for the report.
    #[wasm_bindgen(js_name = loadScene)]
    pub fn load_scene(&mut self, strokes_json: &str, icons_json: &str) -> Result<String, JsValue> {
        let report = self.engine.load_scene(&text_payload(strokes_json), &text_payload(icons_json));
        serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // --- History ---

    #[wasm_bindgen(js_name = initializeHistory)]
    pub fn initialize_history(&mut self) {
        self.engine.initialize_history();
    }

    pub fn undo(&mut self) {
        let rest = self.engine.undo();
        self.forward(rest);
    }

    pub fn redo(&mut self) {
        let rest = self.engine.redo();
        self.forward(rest);
    }

    // --- DOM events (offset coordinates in CSS pixels) ---

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, modifiers: u8) {
        let Some(button) = button_from_dom(button) else {
            return;
        };
        let rest = self.engine.on_pointer_down(Point::new(x, y), button, modifiers_from_bits(modifiers));
        self.forward(rest);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: u8) {
        let rest = self.engine.on_pointer_move(Point::new(x, y), modifiers_from_bits(modifiers));
        self.forward(rest);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16, modifiers: u8) {
        let Some(button) = button_from_dom(button) else {
            return;
        };
        let rest = self.engine.on_pointer_up(Point::new(x, y), button, modifiers_from_bits(modifiers));
        self.forward(rest);
    }

    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, modifiers: u8) {
        let rest = self.engine.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers_from_bits(modifiers));
        self.forward(rest);
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, modifiers: u8) {
        let rest = self.engine.on_key_down(&Key(key.to_owned()), modifiers_from_bits(modifiers));
        self.forward(rest);
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str, modifiers: u8) {
        let rest = self.engine.on_key_up(&Key(key.to_owned()), modifiers_from_bits(modifiers));
        self.forward(rest);
    }

    // --- Teardown ---

    /// Remove the canvas and drop all state. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.on_place = None;
        self.engine.destroy();
    }
}

impl MapCanvas {
    /// Hand placement requests to the armed callback, which is then spent.
    fn forward(&mut self, rest: Vec<Action>) {
        for action in rest {
            let Action::IconPlacementRequested { x, y } = action else {
                continue;
            };
            let Some(callback) = self.on_place.take() else {
                debug!(x, y, "placement requested with no callback");
                continue;
            };
            if let Err(e) = callback.call2(&JsValue::NULL, &JsValue::from_f64(x), &JsValue::from_f64(y)) {
                warn!(error = ?e, "icon placement callback failed");
            }
        }
    }
}
