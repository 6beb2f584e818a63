//! Persisted format: the drawing document and the icon record list.
//!
//! The drawing document is layer-shaped JSON, one child per drawable:
//!
//! ```json
//! {"attrs":{},"className":"Layer","children":[
//!   {"attrs":{"points":[0,0,10,10],"stroke":"red","strokeWidth":3,
//!             "globalCompositeOperation":"source-over","lineCap":"round","lineJoin":"round"},
//!    "className":"Line"}
//! ]}
//! ```
//!
//! Decoding is tolerant by contract: a malformed child is skipped and
//! reported, never fatal to the rest of the document. Every empty or
//! placeholder form (`null`, `""`, `"{}"`, `{}`) means "no strokes".

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::camera::Point;
use crate::consts::{DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH};
use crate::doc::{BlendMode, Drawable, DrawingLayer, Shape, StrokeStyle};

const LAYER_CLASS: &str = "Layer";
const LINE_CLASS: &str = "Line";
const RECT_CLASS: &str = "Rect";
const CIRCLE_CLASS: &str = "Circle";
const SEGMENT_NAME: &str = "segment";

/// Nested string encodings are unwrapped at most this many times.
const MAX_STRING_NESTING: usize = 2;

/// Error produced while decoding persisted scene data.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("drawing document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("drawing document must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("drawing document `children` must be an array")]
    ChildrenNotArray,
    #[error("drawable entry has no className")]
    MissingClass,
    #[error("unknown drawable kind `{0}`")]
    UnknownKind(String),
    #[error("malformed {class} attributes: {reason}")]
    BadAttrs { class: &'static str, reason: String },
}

/// One placed icon as persisted alongside the drawing document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRecord {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub category: String,
    pub x: f64,
    pub y: f64,
    /// Raw accumulated degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Present icons always export `true`; records missing the field load as inactive.
    #[serde(default)]
    pub is_active: bool,
}

/// Complete snapshot handed to the host for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneExport {
    /// Drawing document.
    pub strokes: Value,
    pub icons: Vec<IconRecord>,
}

/// What a load actually rebuilt, so a partial load is visible to the host.
#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub drawables_loaded: usize,
    /// Children skipped as unknown or malformed.
    pub drawables_skipped: usize,
    /// The document itself could not be read; no drawables were loaded.
    pub document_rejected: bool,
    pub icons_loaded: usize,
    /// Records flagged inactive. Skipping these is intended.
    pub icons_inactive: usize,
    /// Records whose image was not in the lookup.
    pub icons_missing_image: usize,
    /// Records reusing an id already placed.
    pub icons_duplicate: usize,
    /// Entries in the icon list that were not valid records.
    pub icons_malformed: usize,
}

impl LoadReport {
    /// Whether everything that should have loaded did.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.document_rejected
            && self.drawables_skipped == 0
            && self.icons_missing_image == 0
            && self.icons_duplicate == 0
            && self.icons_malformed == 0
    }
}

// =============================================================
// Encoding
// =============================================================

/// Serialize a drawing layer to its document form.
#[must_use]
pub fn encode_layer(layer: &DrawingLayer) -> Value {
    let children: Vec<Value> = layer.iter().map(encode_drawable).collect();
    json!({
        "attrs": {},
        "className": LAYER_CLASS,
        "children": children,
    })
}

/// Serialize one drawable to a `{attrs, className}` node.
#[must_use]
pub fn encode_drawable(drawable: &Drawable) -> Value {
    let style = &drawable.style;
    let mut attrs = Map::new();
    let class = match &drawable.shape {
        Shape::Stroke { points } => {
            attrs.insert("points".into(), flatten(points));
            attrs.insert("lineCap".into(), json!("round"));
            attrs.insert("lineJoin".into(), json!("round"));
            LINE_CLASS
        }
        Shape::Segment { a, b } => {
            attrs.insert("points".into(), flatten(&[*a, *b]));
            attrs.insert("lineCap".into(), json!("round"));
            attrs.insert("name".into(), json!(SEGMENT_NAME));
            LINE_CLASS
        }
        Shape::Rect { x, y, width, height } => {
            attrs.insert("x".into(), json!(x));
            attrs.insert("y".into(), json!(y));
            attrs.insert("width".into(), json!(width));
            attrs.insert("height".into(), json!(height));
            RECT_CLASS
        }
        Shape::Circle { x, y, radius } => {
            attrs.insert("x".into(), json!(x));
            attrs.insert("y".into(), json!(y));
            attrs.insert("radius".into(), json!(radius));
            CIRCLE_CLASS
        }
    };
    attrs.insert("stroke".into(), json!(style.color));
    attrs.insert("strokeWidth".into(), json!(style.width));
    attrs.insert("globalCompositeOperation".into(), json!(style.blend.as_str()));
    json!({ "attrs": attrs, "className": class })
}

fn flatten(points: &[Point]) -> Value {
    Value::Array(points.iter().flat_map(|p| [json!(p.x), json!(p.y)]).collect())
}

// =============================================================
// Decoding
// =============================================================

/// Extract the child entries of a drawing document.
///
/// Accepts an already-parsed object, JSON text, or JSON text nested inside a
/// JSON string. Placeholder forms yield no children.
///
/// # Errors
///
/// Returns [`CodecError`] when the document is not JSON, not an object, or
/// its `children` is not an array.
pub fn document_children(input: &Value) -> Result<Vec<Value>, CodecError> {
    document_children_at(input, 0)
}

fn document_children_at(input: &Value, depth: usize) -> Result<Vec<Value>, CodecError> {
    match input {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed == "{}" {
                return Ok(Vec::new());
            }
            if depth >= MAX_STRING_NESTING {
                return Err(CodecError::NotAnObject("string"));
            }
            let parsed: Value = serde_json::from_str(trimmed)?;
            document_children_at(&parsed, depth + 1)
        }
        Value::Object(obj) => match obj.get("children") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(children)) => Ok(children.clone()),
            Some(_) => Err(CodecError::ChildrenNotArray),
        },
        Value::Bool(_) => Err(CodecError::NotAnObject("boolean")),
        Value::Number(_) => Err(CodecError::NotAnObject("number")),
        Value::Array(_) => Err(CodecError::NotAnObject("array")),
    }
}

/// Decode child entries, skipping (and logging) every entry that fails.
///
/// Returns the drawables in document order and the number skipped.
#[must_use]
pub fn decode_children(children: &[Value]) -> (Vec<Drawable>, usize) {
    let mut drawables = Vec::with_capacity(children.len());
    let mut skipped = 0;
    for (index, child) in children.iter().enumerate() {
        match decode_drawable(child) {
            Ok(d) => drawables.push(d),
            Err(e) => {
                warn!(index, error = %e, "skipping drawable");
                skipped += 1;
            }
        }
    }
    (drawables, skipped)
}

/// Decode one `{attrs, className}` node.
///
/// # Errors
///
/// Returns [`CodecError::UnknownKind`] for class names other than `Line`,
/// `Rect` and `Circle`, and [`CodecError::BadAttrs`] for unusable attributes.
pub fn decode_drawable(node: &Value) -> Result<Drawable, CodecError> {
    let class = node.get("className").and_then(Value::as_str).ok_or(CodecError::MissingClass)?;
    let empty = Map::new();
    let attrs = node.get("attrs").and_then(Value::as_object).unwrap_or(&empty);

    let style = StrokeStyle {
        color: attrs.get("stroke").and_then(Value::as_str).unwrap_or(DEFAULT_STROKE_COLOR).to_owned(),
        width: num_or(attrs, "strokeWidth", DEFAULT_STROKE_WIDTH),
        blend: attrs
            .get("globalCompositeOperation")
            .and_then(Value::as_str)
            .map_or(BlendMode::Normal, BlendMode::parse),
    };

    let shape = match class {
        LINE_CLASS => decode_line(attrs)?,
        RECT_CLASS => Shape::Rect {
            x: num_or(attrs, "x", 0.0),
            y: num_or(attrs, "y", 0.0),
            width: num_or(attrs, "width", 0.0),
            height: num_or(attrs, "height", 0.0),
        },
        CIRCLE_CLASS => Shape::Circle {
            x: num_or(attrs, "x", 0.0),
            y: num_or(attrs, "y", 0.0),
            radius: num_or(attrs, "radius", 0.0),
        },
        other => return Err(CodecError::UnknownKind(other.to_owned())),
    };
    Ok(Drawable::new(shape, style))
}

fn decode_line(attrs: &Map<String, Value>) -> Result<Shape, CodecError> {
    let bad = |reason: &str| CodecError::BadAttrs { class: LINE_CLASS, reason: reason.to_owned() };

    let raw = attrs.get("points").and_then(Value::as_array).ok_or_else(|| bad("missing points"))?;
    if raw.is_empty() || raw.len() % 2 != 0 {
        return Err(bad("points must be a non-empty list of x,y pairs"));
    }
    let coords = raw.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>().ok_or_else(|| bad("non-numeric point"))?;
    let points: Vec<Point> = coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect();

    let named_segment = attrs.get("name").and_then(Value::as_str) == Some(SEGMENT_NAME);
    // Older documents carry no name; their straight lines are the only lines without a join.
    let legacy_segment = !attrs.contains_key("name") && !attrs.contains_key("lineJoin") && points.len() == 2;

    if named_segment || legacy_segment {
        match points.as_slice() {
            [a, b] => Ok(Shape::Segment { a: *a, b: *b }),
            _ => Err(bad("segment needs exactly two points")),
        }
    } else {
        Ok(Shape::Stroke { points })
    }
}

fn num_or(attrs: &Map<String, Value>, key: &str, default: f64) -> f64 {
    attrs.get(key).and_then(Value::as_f64).unwrap_or(default)
}

/// Read an icon record list, skipping entries that are not valid records.
///
/// Accepts an array or JSON text holding one. Returns the records and the
/// number of malformed entries.
#[must_use]
pub fn parse_icon_records(input: &Value) -> (Vec<IconRecord>, usize) {
    let owned;
    let items = match input {
        Value::Array(items) => items,
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => {
                owned = items;
                &owned
            }
            Ok(_) | Err(_) => {
                warn!("icon list text is not a JSON array");
                return (Vec::new(), 1);
            }
        },
        Value::Null => return (Vec::new(), 0),
        _ => {
            warn!("icon list is not an array");
            return (Vec::new(), 1);
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut malformed = 0;
    for (index, item) in items.iter().enumerate() {
        match IconRecord::deserialize(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed icon record");
                malformed += 1;
            }
        }
    }
    (records, malformed)
}
