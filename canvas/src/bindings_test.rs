#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::codec::{self, parse_icon_records};

// =============================================================
// Event decoding
// =============================================================

#[test]
fn modifier_bits_decode_independently() {
    let none = modifiers_from_bits(0);
    assert!(!none.shift && !none.ctrl && !none.alt && !none.meta);

    let ctrl_shift = modifiers_from_bits(MOD_CTRL | MOD_SHIFT);
    assert!(ctrl_shift.ctrl && ctrl_shift.shift);
    assert!(!ctrl_shift.alt && !ctrl_shift.meta);
    assert!(ctrl_shift.command());

    let meta = modifiers_from_bits(MOD_META);
    assert!(meta.meta && meta.command());
    assert!(modifiers_from_bits(MOD_ALT).alt);
}

#[test]
fn dom_button_codes() {
    assert_eq!(button_from_dom(0), Some(Button::Primary));
    assert_eq!(button_from_dom(1), Some(Button::Middle));
    assert_eq!(button_from_dom(2), Some(Button::Secondary));
    assert_eq!(button_from_dom(3), None);
    assert_eq!(button_from_dom(-1), None);
}

// =============================================================
// Config and payloads
// =============================================================

#[test]
fn config_json_falls_back_to_defaults() {
    assert_eq!(config_from_json(None), CanvasConfig::default());
    assert_eq!(config_from_json(Some("not json")), CanvasConfig::default());
    assert_eq!(config_from_json(Some(r#"{"history_limit": 0}"#)), CanvasConfig::default());
    assert_eq!(config_from_json(Some(r#"{"history_limit": 7}"#)).history_limit, 7);
}

#[test]
fn blank_payload_text_loads_as_nothing_saved() {
    assert_eq!(text_payload(""), Value::Null);
    assert_eq!(text_payload("  \n"), Value::Null);
    assert!(codec::document_children(&text_payload("")).unwrap().is_empty());
    assert_eq!(parse_icon_records(&text_payload("")), (Vec::new(), 0));
}

#[test]
fn payload_text_reaches_the_codec_unchanged() {
    let icons = json!([{ "id": "a", "filename": "door.png", "x": 1, "y": 2, "rotation": 90, "isActive": true }]);
    let (records, malformed) = parse_icon_records(&text_payload(&icons.to_string()));
    assert_eq!(malformed, 0);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rotation, 90.0);

    let doc = json!({ "attrs": {}, "className": "Layer", "children": [] });
    assert!(codec::document_children(&text_payload(&doc.to_string())).unwrap().is_empty());
}
