use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlImageElement};

use crate::camera::{Camera, Point};
use crate::codec::{self, IconRecord, LoadReport, SceneExport};
use crate::config::CanvasConfig;
use crate::consts::ERASER_COLOR;
use crate::doc::{BlendMode, Drawable, Shape, StrokeStyle};
use crate::hit::{self, IconPart};
use crate::history::History;
use crate::icon::{IconControl, IconEntity, IconMeta};
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::render;
use crate::scene::{BackgroundImage, GridSpec, ImageHandle, Scene};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Notifications returned from engine operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A committed mutation: the host should export and persist the scene.
    SceneChanged,
    /// An armed placement click landed at this scene position. Placement is
    /// one-shot and has already disarmed itself.
    IconPlacementRequested { x: f64, y: f64 },
    SetCursor(String),
    RenderNeeded,
}

/// Lookup of host containers the engine can bind to.
pub trait SurfaceHost {
    /// CSS pixel size of the container `host_id`, or `None` if it does not exist.
    fn surface_size(&self, host_id: &str) -> Option<(f64, f64)>;
}

/// Core engine state: all logic that doesn't depend on the browser.
///
/// Separated from [`Engine`] so it can be tested without WASM/browser
/// dependencies. Every operation is best-effort: malformed input is logged
/// and skipped, never fatal.
pub struct EngineCore {
    pub config: CanvasConfig,
    pub scene: Scene,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub history: History,
    pub viewport_width: f64,
    pub viewport_height: f64,
    destroyed: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl EngineCore {
    /// Create a headless engine sized to the configured default stage.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            scene: Scene::new(config.default_grid_size),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            history: History::new(config.history_limit),
            viewport_width: config.stage_width,
            viewport_height: config.stage_height,
            destroyed: false,
            config,
        }
    }

    /// Bind to the host container `host_id`.
    ///
    /// Returns `None` (after logging) when the container does not exist. An
    /// invalid config is logged and replaced by the defaults.
    pub fn attach(host: &impl SurfaceHost, host_id: &str, config: CanvasConfig) -> Option<Self> {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "invalid canvas config; using defaults");
                CanvasConfig::default()
            }
        };
        let Some((width, height)) = host.surface_size(host_id) else {
            error!(%host_id, "canvas host container not found");
            return None;
        };
        let mut core = Self::new(config);
        if width > 0.0 && height > 0.0 {
            core.viewport_width = width;
            core.viewport_height = height;
        }
        info!(%host_id, width = core.viewport_width, height = core.viewport_height, "map canvas initialized");
        Some(core)
    }

    // --- Tool / style ---

    /// Switch the active tool, cancelling any in-progress draw.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        debug!(tool = tool.as_str(), "set tool");
        let mut actions = Vec::new();
        if self.cancel_draw() {
            actions.push(Action::RenderNeeded);
        }
        self.ui.tool = tool;
        actions.push(Action::SetCursor(self.ui.cursor()));
        actions
    }

    /// Switch tool by host name; unknown names are logged and ignored.
    pub fn set_tool_name(&mut self, name: &str) -> Vec<Action> {
        match Tool::parse(name) {
            Some(tool) => self.set_tool(tool),
            None => {
                warn!(%name, "ignoring unknown tool");
                Vec::new()
            }
        }
    }

    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.ui.stroke_color = color.into();
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        if width > 0.0 && width.is_finite() {
            self.ui.stroke_width = width;
        } else {
            warn!(width, "ignoring non-positive stroke width");
        }
    }

    /// Set the eraser width; the eraser cursor is sized after it.
    pub fn set_eraser_width(&mut self, width: f64) -> Vec<Action> {
        if !(width > 0.0 && width.is_finite()) {
            warn!(width, "ignoring non-positive eraser width");
            return Vec::new();
        }
        self.ui.eraser_width = width;
        vec![Action::SetCursor(self.ui.cursor())]
    }

    /// Arm or disarm one-shot icon placement.
    pub fn set_icon_placement(&mut self, armed: bool) -> Vec<Action> {
        self.ui.placement_armed = armed;
        vec![Action::SetCursor(self.ui.cursor())]
    }

    // --- Scene mutation ---

    /// Regenerate the grid. The cell size also sizes icons placed afterwards.
    pub fn draw_grid(&mut self, cell_size: f64, color: impl Into<String>, visible: bool) -> Vec<Action> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            warn!(cell_size, "ignoring grid with non-positive cell size");
            return Vec::new();
        }
        let spec = GridSpec { cell_size, color: color.into(), visible };
        self.scene
            .grid
            .regenerate(spec, self.viewport_width, self.viewport_height, self.config.grid_extension);
        vec![Action::RenderNeeded]
    }

    pub fn toggle_grid(&mut self) -> Vec<Action> {
        self.scene.grid.toggle();
        vec![Action::RenderNeeded]
    }

    /// Replace the background image; `None` clears it.
    pub fn set_background_image(
        &mut self,
        image: Option<ImageHandle>,
        opacity: f64,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Vec<Action> {
        let background = image.map(|image| BackgroundImage { image, opacity: opacity.clamp(0.0, 1.0), scale, offset_x, offset_y });
        self.scene.set_background(background);
        vec![Action::RenderNeeded]
    }

    /// Place a new icon centred at scene position `(x, y)`.
    pub fn add_icon(&mut self, image: ImageHandle, x: f64, y: f64, meta: IconMeta) -> Vec<Action> {
        if !self.place_icon(image, Point::new(x, y), meta, 0.0) {
            return Vec::new();
        }
        vec![Action::RenderNeeded, Action::SceneChanged]
    }

    fn place_icon(&mut self, image: ImageHandle, at: Point, meta: IconMeta, rotation: f64) -> bool {
        let size = self.scene.cell_size() * self.config.icon_cell_ratio;
        let id = meta.id.clone();
        let added = self.scene.icons.add(IconEntity::new(meta, image, at, rotation, size));
        if !added {
            warn!(%id, "ignoring icon with duplicate id");
        }
        added
    }

    /// Select an icon, deselecting whichever icon was selected before.
    pub fn select_icon(&mut self, id: &str) -> Vec<Action> {
        if !self.scene.icons.contains(id) {
            return Vec::new();
        }
        for icon in self.scene.icons.iter_mut() {
            icon.selected = icon.meta.id == id;
        }
        self.ui.selected_icon = Some(id.to_owned());
        vec![Action::RenderNeeded]
    }

    pub fn deselect_icon(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_icon.take() else {
            return Vec::new();
        };
        if let Some(icon) = self.scene.icons.get_mut(&id) {
            icon.selected = false;
        }
        vec![Action::RenderNeeded]
    }

    /// Add 90° to an icon's rotation. Not recorded in undo history.
    pub fn rotate_icon(&mut self, id: &str) -> Vec<Action> {
        let Some(icon) = self.scene.icons.get_mut(id) else {
            return Vec::new();
        };
        icon.rotate();
        vec![Action::RenderNeeded, Action::SceneChanged]
    }

    /// Remove an icon. Not recorded in undo history.
    pub fn delete_icon(&mut self, id: &str) -> Vec<Action> {
        if self.scene.icons.remove(id).is_none() {
            return Vec::new();
        }
        if self.ui.selected_icon.as_deref() == Some(id) {
            self.ui.selected_icon = None;
        }
        vec![Action::RenderNeeded, Action::SceneChanged]
    }

    /// Remove every drawable. Undoable.
    pub fn clear_drawing(&mut self) -> Vec<Action> {
        self.cancel_draw();
        self.scene.drawing.clear();
        self.commit()
    }

    // --- Persistence ---

    /// Snapshot the drawing document and the icon records.
    #[must_use]
    pub fn export_scene(&self) -> SceneExport {
        let icons = self
            .scene
            .icons
            .iter()
            .map(|icon| IconRecord {
                id: icon.meta.id.clone(),
                filename: icon.meta.filename.clone(),
                category: icon.meta.category.clone(),
                x: icon.x,
                y: icon.y,
                rotation: icon.rotation,
                is_active: true,
            })
            .collect();
        SceneExport { strokes: codec::encode_layer(&self.scene.drawing), icons }
    }

    /// Replace the drawing and icon layers with persisted content.
    ///
    /// Never merges: both layers are emptied first. Bad drawables, inactive
    /// records, and records whose image is not in `images` are skipped; the
    /// returned report says how many of each.
    pub fn load_scene(
        &mut self,
        strokes: &Value,
        icons: &[IconRecord],
        images: &HashMap<String, ImageHandle>,
    ) -> LoadReport {
        self.input = InputState::Idle;
        self.ui.selected_icon = None;
        self.scene.clear_content();

        let mut report = LoadReport::default();
        match codec::document_children(strokes) {
            Ok(children) => {
                let (drawables, skipped) = codec::decode_children(&children);
                report.drawables_loaded = drawables.len();
                report.drawables_skipped = skipped;
                self.scene.drawing.replace(drawables);
            }
            Err(e) => {
                error!(error = %e, "could not read drawing document; loading without strokes");
                report.document_rejected = true;
            }
        }

        for record in icons {
            if !record.is_active {
                report.icons_inactive += 1;
                continue;
            }
            let Some(image) = images.get(&record.filename) else {
                debug!(id = %record.id, filename = %record.filename, "icon image not available; skipping");
                report.icons_missing_image += 1;
                continue;
            };
            let meta = IconMeta {
                id: record.id.clone(),
                filename: record.filename.clone(),
                category: record.category.clone(),
            };
            if self.place_icon(image.clone(), Point::new(record.x, record.y), meta, record.rotation) {
                report.icons_loaded += 1;
            } else {
                report.icons_duplicate += 1;
            }
        }

        info!(drawables = report.drawables_loaded, icons = report.icons_loaded, "scene loaded");
        if !report.is_complete() {
            warn!(
                drawables_skipped = report.drawables_skipped,
                document_rejected = report.document_rejected,
                icons_missing_image = report.icons_missing_image,
                icons_duplicate = report.icons_duplicate,
                "scene loaded incompletely"
            );
        }
        report
    }

    /// [`EngineCore::load_scene`] with the icon list still in raw JSON form.
    pub fn load_scene_json(&mut self, strokes: &Value, icons: &Value, images: &HashMap<String, ImageHandle>) -> LoadReport {
        let (records, malformed) = codec::parse_icon_records(icons);
        let mut report = self.load_scene(strokes, &records, images);
        report.icons_malformed = malformed;
        report
    }

    // --- History ---

    /// Reset history to the current drawing layer, which becomes entry zero.
    pub fn initialize_history(&mut self) {
        self.history.clear();
        self.history.push(self.snapshot());
    }

    /// Step back one history entry.
    pub fn undo(&mut self) -> Vec<Action> {
        let Some(snapshot) = self.history.undo().map(str::to_owned) else {
            return Vec::new();
        };
        self.restore(&snapshot);
        vec![Action::RenderNeeded, Action::SceneChanged]
    }

    /// Step forward one history entry.
    pub fn redo(&mut self) -> Vec<Action> {
        let Some(snapshot) = self.history.redo().map(str::to_owned) else {
            return Vec::new();
        };
        self.restore(&snapshot);
        vec![Action::RenderNeeded, Action::SceneChanged]
    }

    /// Rebuild the drawing layer from a history snapshot.
    ///
    /// Touches neither the history nor the host; restoring the same snapshot
    /// twice yields the same layer. Returns the number of drawables rebuilt.
    pub fn restore(&mut self, snapshot: &str) -> usize {
        self.cancel_draw();
        self.scene.drawing.clear();
        match codec::document_children(&Value::String(snapshot.to_owned())) {
            Ok(children) => {
                let (drawables, _skipped) = codec::decode_children(&children);
                self.scene.drawing.replace(drawables);
            }
            Err(e) => error!(error = %e, "could not restore history entry"),
        }
        self.scene.drawing.len()
    }

    fn snapshot(&self) -> String {
        codec::encode_layer(&self.scene.drawing).to_string()
    }

    /// Record a committed drawing mutation and tell the host.
    fn commit(&mut self) -> Vec<Action> {
        self.history.push(self.snapshot());
        vec![Action::RenderNeeded, Action::SceneChanged]
    }

    // --- Teardown ---

    /// Drop all retained state. Safe to call repeatedly; later events are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.scene = Scene::new(self.config.default_grid_size);
        self.history.clear();
        self.input = InputState::Idle;
        self.ui = UiState::default();
        self.destroyed = true;
        info!("map canvas destroyed");
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.destroyed || !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        match button {
            Button::Primary => {}
            Button::Middle => return self.begin_pan(screen_pt),
            Button::Secondary => return Vec::new(),
        }

        let world = self.camera.screen_to_world(screen_pt);

        if self.ui.placement_armed {
            self.ui.placement_armed = false;
            return vec![
                Action::IconPlacementRequested { x: world.x, y: world.y },
                Action::SetCursor(self.ui.cursor()),
            ];
        }

        if self.ui.pans() {
            return self.begin_pan(screen_pt);
        }

        if let Some(hit) = hit::hit_icon(world, &self.scene.icons) {
            return match hit.part {
                IconPart::Control(control) => {
                    self.input = InputState::PressingControl { id: hit.id, control };
                    Vec::new()
                }
                IconPart::Body => {
                    let actions = self.select_icon(&hit.id);
                    self.input = InputState::DraggingIcon { id: hit.id, last_world: world, moved: false };
                    actions
                }
            };
        }

        let under = hit::hit_drawable(world, &self.scene.drawing, &self.camera);
        let mut actions = if under.is_none() { self.deselect_icon() } else { Vec::new() };

        match self.ui.tool {
            Tool::Pen | Tool::Eraser => {
                self.input = InputState::DrawingStroke { points: vec![world] };
                actions.push(Action::RenderNeeded);
            }
            Tool::Rectangle | Tool::Circle | Tool::Line => {
                self.input = InputState::DrawingShape { anchor: world, preview: None };
            }
            Tool::Select => {
                if let Some(id) = under {
                    self.scene.drawing.remove(&id);
                    actions.extend(self.commit());
                }
            }
            Tool::Pan | Tool::Icon => {}
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.destroyed {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        match &mut self.input {
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
            }
            InputState::DrawingStroke { points } => points.push(world),
            InputState::DrawingShape { anchor, preview } => *preview = self.ui.tool.shape_between(*anchor, world),
            InputState::DraggingIcon { id, last_world, moved } => {
                if let Some(icon) = self.scene.icons.get_mut(id) {
                    icon.move_by(world.x - last_world.x, world.y - last_world.y);
                }
                *last_world = world;
                *moved = true;
            }
            InputState::PressingControl { .. } | InputState::Idle => return Vec::new(),
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.destroyed {
            return Vec::new();
        }
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Panning { .. } => vec![Action::SetCursor(self.ui.cursor())],
            InputState::DrawingStroke { points } => {
                let style = self.active_style();
                self.scene.drawing.push(Drawable::new(Shape::Stroke { points }, style));
                self.commit()
            }
            InputState::DrawingShape { preview: Some(shape), .. } => {
                let style = self.active_style();
                self.scene.drawing.push(Drawable::new(shape, style));
                self.commit()
            }
            InputState::DrawingShape { preview: None, .. } => Vec::new(),
            InputState::DraggingIcon { moved, .. } => {
                if moved { vec![Action::SceneChanged] } else { Vec::new() }
            }
            InputState::PressingControl { id, control } => {
                let world = self.camera.screen_to_world(screen_pt);
                let released_on = hit::hit_icon(world, &self.scene.icons);
                let same = released_on.is_some_and(|h| h.id == id && h.part == IconPart::Control(control));
                match (same, control) {
                    (false, _) => Vec::new(),
                    (true, IconControl::Rotate) => self.rotate_icon(&id),
                    (true, IconControl::Delete) => self.delete_icon(&id),
                }
            }
        }
    }

    /// Zoom one step about the pointer: wheel down zooms out, up zooms in.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if self.destroyed || delta.dy == 0.0 {
            return Vec::new();
        }
        let factor = if delta.dy > 0.0 { 1.0 / self.config.zoom_step } else { self.config.zoom_step };
        self.camera.zoom_at(screen_pt, factor, self.config.min_zoom, self.config.max_zoom);
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.destroyed {
            return Vec::new();
        }
        if modifiers.command() {
            if key.is_letter('z') && !modifiers.shift {
                return self.undo();
            }
            if key.is_letter('y') || (key.is_letter('z') && modifiers.shift) {
                return self.redo();
            }
        }
        if key.is_space() && !self.ui.space_held {
            self.ui.space_held = true;
            return vec![Action::SetCursor(self.ui.cursor())];
        }
        Vec::new()
    }

    pub fn on_key_up(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if self.destroyed || !key.is_space() || !self.ui.space_held {
            return Vec::new();
        }
        self.ui.space_held = false;
        vec![Action::SetCursor(self.ui.cursor())]
    }

    fn begin_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        self.input = InputState::Panning { last_screen: screen_pt };
        vec![Action::SetCursor("grabbing".to_owned())]
    }

    /// Drop an in-progress stroke or shape. Returns whether one was dropped.
    fn cancel_draw(&mut self) -> bool {
        if matches!(self.input, InputState::DrawingStroke { .. } | InputState::DrawingShape { .. }) {
            self.input = InputState::Idle;
            return true;
        }
        false
    }

    /// Style new drawables get under the current tool.
    #[must_use]
    pub fn active_style(&self) -> StrokeStyle {
        if self.ui.tool == Tool::Eraser {
            StrokeStyle { color: ERASER_COLOR.to_owned(), width: self.ui.eraser_width, blend: BlendMode::Erase }
        } else {
            StrokeStyle { color: self.ui.stroke_color.clone(), width: self.ui.stroke_width, blend: BlendMode::Normal }
        }
    }

    // --- Queries ---

    /// The stroke or shape being drawn, if any.
    #[must_use]
    pub fn pending_shape(&self) -> Option<Shape> {
        match &self.input {
            InputState::DrawingStroke { points } => Some(Shape::Stroke { points: points.clone() }),
            InputState::DrawingShape { preview, .. } => preview.clone(),
            _ => None,
        }
    }

    /// The currently selected icon, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_icon.as_deref()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn icon(&self, id: &str) -> Option<&IconEntity> {
        self.scene.icons.get(id)
    }
}

// =============================================================
// Browser engine
// =============================================================

/// Host containers looked up in the browser document.
pub struct DomHost {
    document: Document,
}

impl SurfaceHost for DomHost {
    fn surface_size(&self, host_id: &str) -> Option<(f64, f64)> {
        let element = self.document.get_element_by_id(host_id)?;
        Some((f64::from(element.client_width()), f64::from(element.client_height())))
    }
}

/// The full canvas engine. Wraps [`EngineCore`] and owns the browser surface.
pub struct Engine {
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
    /// Offscreen surface for the drawing layer, so erase blending only
    /// subtracts drawing content.
    layer_canvas: Option<HtmlCanvasElement>,
    layer_ctx: Option<CanvasRenderingContext2d>,
    images: HashMap<String, HtmlImageElement>,
    on_save: Option<js_sys::Function>,
    dpr: f64,
    pub core: EngineCore,
}

impl Engine {
    /// Bind to the container `host_id`, replacing its content with the canvas.
    ///
    /// `on_save` is called with no arguments after every committed mutation.
    /// Returns `None` (after logging) when there is no document, no such
    /// container, or the canvas cannot be created.
    pub fn initialize(host_id: &str, on_save: Option<js_sys::Function>, config: CanvasConfig) -> Option<Self> {
        let Some(window) = web_sys::window() else {
            error!("no browser window; canvas not initialized");
            return None;
        };
        let Some(document) = window.document() else {
            error!("no browser document; canvas not initialized");
            return None;
        };
        let host = DomHost { document: document.clone() };
        let core = EngineCore::attach(&host, host_id, config)?;
        let container = document.get_element_by_id(host_id)?;
        container.set_inner_html("");
        if let Some(el) = container.dyn_ref::<HtmlElement>() {
            if let Err(e) = el.style().set_property("background-color", "#ffffff") {
                warn!(error = ?e, "could not set container background");
            }
        }

        let dpr = window.device_pixel_ratio().max(1.0);
        let (canvas, ctx) = create_surface(&document, core.viewport_width, core.viewport_height, dpr)?;
        let (layer_canvas, layer_ctx) = create_surface(&document, core.viewport_width, core.viewport_height, dpr)?;
        if let Err(e) = container.append_child(&canvas) {
            error!(error = ?e, "could not attach canvas to host container");
            return None;
        }

        let engine = Self {
            canvas: Some(canvas),
            ctx: Some(ctx),
            layer_canvas: Some(layer_canvas),
            layer_ctx: Some(layer_ctx),
            images: HashMap::new(),
            on_save,
            dpr,
            core,
        };
        let cursor = engine.core.ui.cursor();
        engine.apply_cursor(&cursor);
        Some(engine)
    }

    // --- Images ---

    /// Make a decoded image available under `key` (its filename).
    pub fn register_image(&mut self, key: &str, image: HtmlImageElement) -> ImageHandle {
        let handle = ImageHandle::new(key, f64::from(image.natural_width()), f64::from(image.natural_height()));
        self.images.insert(key.to_owned(), image);
        handle
    }

    #[must_use]
    pub fn image_lookup(&self) -> HashMap<String, ImageHandle> {
        self.images
            .iter()
            .map(|(key, img)| {
                let handle = ImageHandle::new(key.as_str(), f64::from(img.natural_width()), f64::from(img.natural_height()));
                (key.clone(), handle)
            })
            .collect()
    }

    fn handle(&self, key: &str) -> Option<ImageHandle> {
        self.images
            .get(key)
            .map(|img| ImageHandle::new(key, f64::from(img.natural_width()), f64::from(img.natural_height())))
    }

    // --- Delegated configuration and mutation ---

    pub fn set_tool(&mut self, name: &str) -> Vec<Action> {
        let actions = self.core.set_tool_name(name);
        self.dispatch(actions)
    }

    pub fn set_stroke_color(&mut self, color: &str) {
        self.core.set_stroke_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.core.set_stroke_width(width);
    }

    pub fn set_eraser_width(&mut self, width: f64) -> Vec<Action> {
        let actions = self.core.set_eraser_width(width);
        self.dispatch(actions)
    }

    pub fn set_icon_placement(&mut self, armed: bool) -> Vec<Action> {
        let actions = self.core.set_icon_placement(armed);
        self.dispatch(actions)
    }

    pub fn draw_grid(&mut self, cell_size: f64, color: &str, visible: bool) -> Vec<Action> {
        let actions = self.core.draw_grid(cell_size, color, visible);
        self.dispatch(actions)
    }

    pub fn toggle_grid(&mut self) -> Vec<Action> {
        let actions = self.core.toggle_grid();
        self.dispatch(actions)
    }

    /// Show the registered image `key` as background; `None` clears it.
    pub fn set_background_image(
        &mut self,
        key: Option<&str>,
        opacity: f64,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Vec<Action> {
        let image = key.and_then(|k| self.handle(k));
        if key.is_some() && image.is_none() {
            warn!(key = ?key, "background image not registered; clearing background");
        }
        let actions = self.core.set_background_image(image, opacity, scale, offset_x, offset_y);
        self.dispatch(actions)
    }

    /// Place the registered image `meta.filename` at scene position `(x, y)`.
    pub fn add_icon(&mut self, x: f64, y: f64, meta: IconMeta) -> Vec<Action> {
        let Some(image) = self.handle(&meta.filename) else {
            warn!(filename = %meta.filename, "icon image not registered");
            return Vec::new();
        };
        let actions = self.core.add_icon(image, x, y, meta);
        self.dispatch(actions)
    }

    pub fn clear_drawing(&mut self) -> Vec<Action> {
        let actions = self.core.clear_drawing();
        self.dispatch(actions)
    }

    // --- Persistence and history ---

    #[must_use]
    pub fn export_scene(&self) -> SceneExport {
        self.core.export_scene()
    }

    pub fn load_scene(&mut self, strokes: &Value, icons: &Value) -> LoadReport {
        let images = self.image_lookup();
        let report = self.core.load_scene_json(strokes, icons, &images);
        self.render();
        report
    }

    pub fn initialize_history(&mut self) {
        self.core.initialize_history();
    }

    pub fn undo(&mut self) -> Vec<Action> {
        let actions = self.core.undo();
        self.dispatch(actions)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let actions = self.core.redo();
        self.dispatch(actions)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen_pt, button, modifiers);
        self.dispatch(actions)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_move(screen_pt, modifiers);
        self.dispatch(actions)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_up(screen_pt, button, modifiers);
        self.dispatch(actions)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_wheel(screen_pt, delta, modifiers);
        self.dispatch(actions)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.dispatch(actions)
    }

    pub fn on_key_up(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_up(key, modifiers);
        self.dispatch(actions)
    }

    /// Handle the actions the engine can carry out itself and hand back the
    /// rest (placement requests) to the host.
    fn dispatch(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut rest = Vec::new();
        let mut render = false;
        for action in actions {
            match action {
                Action::RenderNeeded => render = true,
                Action::SetCursor(cursor) => self.apply_cursor(&cursor),
                Action::SceneChanged => self.notify_save(),
                other @ Action::IconPlacementRequested { .. } => rest.push(other),
            }
        }
        if render {
            self.render();
        }
        rest
    }

    /// Fire-and-forget: a failing host callback is logged, never retried.
    fn notify_save(&self) {
        let Some(callback) = &self.on_save else {
            return;
        };
        if let Err(e) = callback.call0(&JsValue::NULL) {
            warn!(error = ?e, "save callback failed");
        }
    }

    fn apply_cursor(&self, cursor: &str) {
        let Some(canvas) = &self.canvas else {
            return;
        };
        if let Err(e) = canvas.style().set_property("cursor", cursor) {
            debug!(error = ?e, "could not set cursor");
        }
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    pub fn render(&self) {
        let (Some(ctx), Some(layer_canvas), Some(layer_ctx)) = (&self.ctx, &self.layer_canvas, &self.layer_ctx) else {
            return;
        };
        let surface = render::Surface { ctx, layer_canvas, layer_ctx, dpr: self.dpr };
        if let Err(e) = render::draw(&surface, &self.core, &self.images) {
            error!(error = ?e, "render failed");
        }
    }

    // --- Teardown ---

    /// Remove the canvas from the page and drop all state. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
        self.ctx = None;
        self.layer_canvas = None;
        self.layer_ctx = None;
        self.images.clear();
        self.on_save = None;
        self.core.destroy();
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn create_surface(
    document: &Document,
    width: f64,
    height: f64,
    dpr: f64,
) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let element: Element = match document.create_element("canvas") {
        Ok(el) => el,
        Err(e) => {
            error!(error = ?e, "could not create canvas element");
            return None;
        }
    };
    let Ok(canvas) = element.dyn_into::<HtmlCanvasElement>() else {
        error!("created element is not a canvas");
        return None;
    };
    canvas.set_width((width * dpr).round() as u32);
    canvas.set_height((height * dpr).round() as u32);
    let style = canvas.style();
    for (prop, value) in [("width", format!("{width}px")), ("height", format!("{height}px"))] {
        if let Err(e) = style.set_property(prop, &value) {
            warn!(error = ?e, prop, "could not size canvas");
        }
    }
    let ctx = match canvas.get_context("2d") {
        Ok(Some(obj)) => obj.dyn_into::<CanvasRenderingContext2d>(),
        Ok(None) => {
            error!("canvas has no 2d context");
            return None;
        }
        Err(e) => {
            error!(error = ?e, "could not get 2d context");
            return None;
        }
    };
    match ctx {
        Ok(ctx) => Some((canvas, ctx)),
        Err(_) => {
            error!("2d context has unexpected type");
            None
        }
    }
}
