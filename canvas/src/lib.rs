//! Canvas engine for the map editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of a map canvas: the layered scene (background, grid,
//! freehand drawing, placed icons), the tool state machine that turns raw DOM
//! input into scene mutations, pan/zoom, bounded undo/redo, and the JSON
//! format maps are saved in. The page drives it through
//! [`bindings::MapCanvas`]: it forwards DOM events, registers decoded images,
//! and persists the scene from its save callback, which fires whenever the
//! engine reports [`engine::Action::SceneChanged`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`bindings`] | `#[wasm_bindgen]` surface the page calls |
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`scene`] | Layer stack, background and grid |
//! | [`doc`] | Drawables and the drawing layer |
//! | [`icon`] | Placed icons, their controls and the icon layer |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Tools, input event types and the gesture state machine |
//! | [`hit`] | Hit-testing icons and drawables |
//! | [`history`] | Bounded undo/redo over drawing snapshots |
//! | [`codec`] | Persisted scene format |
//! | [`config`] | Engine tunables |
//! | [`render`] | Scene rendering |
//! | [`consts`] | Shared numeric constants (zoom limits, control geometry, etc.) |

pub mod bindings;
pub mod camera;
pub mod codec;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod history;
pub mod icon;
pub mod input;
pub mod render;
pub mod scene;
