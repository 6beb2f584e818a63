//! Icon entity: a placed, rotatable, deletable image marker on the icon layer.
//!
//! An icon is a composite: the image body (rotated about its center), a rotate
//! control, a delete control, and a dashed selection outline. Only the body
//! rotates; controls and outline stay axis-aligned around the icon position.
//! Controls are derived geometry rather than stored children, so they can
//! never drift out of sync with the body.

#[cfg(test)]
#[path = "icon_test.rs"]
mod icon_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{CONTROL_OFFSET, CONTROL_RADIUS, ROTATE_STEP_DEG, SELECTED_ICON_OPACITY, SELECTION_PAD};
use crate::scene::ImageHandle;

/// Host-supplied identity of a placed icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconMeta {
    /// Stable id, unique within one icon layer.
    pub id: String,
    /// Image filename the icon was placed from; the image-lookup key on load.
    pub filename: String,
    /// Palette category, e.g. `"doors"`.
    pub category: String,
}

/// One of the two click targets shown on a selected icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconControl {
    Rotate,
    Delete,
}

/// Axis-aligned rectangle in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A placed icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconEntity {
    pub meta: IconMeta,
    pub image: ImageHandle,
    /// Center of the icon in scene coordinates.
    pub x: f64,
    pub y: f64,
    /// Accumulated clockwise rotation in degrees, never normalized.
    pub rotation: f64,
    /// Edge length of the icon square, fixed at placement.
    pub size: f64,
    pub selected: bool,
}

impl IconEntity {
    #[must_use]
    pub fn new(meta: IconMeta, image: ImageHandle, at: Point, rotation: f64, size: f64) -> Self {
        Self { meta, image, x: at.x, y: at.y, rotation, size, selected: false }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Add one rotate step (+90°).
    pub fn rotate(&mut self) {
        self.rotation += ROTATE_STEP_DEG;
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Opacity of the image body; selection dims it slightly.
    #[must_use]
    pub fn body_opacity(&self) -> f64 {
        if self.selected { SELECTED_ICON_OPACITY } else { 1.0 }
    }

    /// Center of a control circle in scene coordinates.
    #[must_use]
    pub fn control_center(&self, control: IconControl) -> Point {
        let reach = self.size / 2.0 + CONTROL_OFFSET;
        match control {
            IconControl::Rotate => Point::new(self.x + reach, self.y - reach),
            IconControl::Delete => Point::new(self.x - reach, self.y - reach),
        }
    }

    /// The dashed outline drawn around a selected icon.
    #[must_use]
    pub fn selection_bounds(&self) -> Bounds {
        let half = self.size / 2.0 + SELECTION_PAD;
        Bounds { x: self.x - half, y: self.y - half, width: half * 2.0, height: half * 2.0 }
    }

    /// Which control, if any, is under `world_pt`. Controls are hidden, and
    /// therefore unclickable, unless the icon is selected.
    #[must_use]
    pub fn control_at(&self, world_pt: Point) -> Option<IconControl> {
        if !self.selected {
            return None;
        }
        [IconControl::Rotate, IconControl::Delete]
            .into_iter()
            .find(|&c| self.control_center(c).distance(world_pt) <= CONTROL_RADIUS)
    }

    /// Whether `world_pt` lies on the (rotated) image body.
    #[must_use]
    pub fn body_contains(&self, world_pt: Point) -> bool {
        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        let dx = world_pt.x - self.x;
        let dy = world_pt.y - self.y;
        let local_x = dx * cos - dy * sin;
        let local_y = dx * sin + dy * cos;
        let half = self.size / 2.0;
        local_x.abs() <= half && local_y.abs() <= half
    }
}

/// Ordered store of icons. Later icons paint above earlier ones.
#[derive(Debug, Clone, Default)]
pub struct IconLayer {
    items: Vec<IconEntity>,
}

impl IconLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an icon on top. Returns `false` without adding if the id is taken.
    pub fn add(&mut self, icon: IconEntity) -> bool {
        if self.contains(&icon.meta.id) {
            return false;
        }
        self.items.push(icon);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<IconEntity> {
        let idx = self.items.iter().position(|i| i.meta.id == id)?;
        Some(self.items.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IconEntity> {
        self.items.iter().find(|i| i.meta.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut IconEntity> {
        self.items.iter_mut().find(|i| i.meta.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Icons bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &IconEntity> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut IconEntity> {
        self.items.iter_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
