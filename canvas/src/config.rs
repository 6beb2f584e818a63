//! Engine configuration.
//!
//! Every field has a default, so hosts only spell out what they change:
//!
//! ```json
//! { "history_limit": 100, "max_zoom": 8.0 }
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_GRID_SIZE, DEFAULT_HISTORY_LIMIT, DEFAULT_STAGE_HEIGHT, DEFAULT_STAGE_WIDTH, GRID_EXTENSION,
    ICON_CELL_RATIO, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Error returned by [`CanvasConfig::from_json`] and [`CanvasConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid canvas config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("history_limit must be at least 1")]
    HistoryLimit,
    #[error("zoom_step must be greater than 1.0, got {0}")]
    ZoomStep(f64),
    #[error("zoom bounds must satisfy 0 < min_zoom <= 1 <= max_zoom, got [{min}, {max}]")]
    ZoomBounds { min: f64, max: f64 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Maximum number of drawing-layer snapshots kept for undo/redo.
    pub history_limit: usize,
    /// Zoom multiplier applied per wheel tick.
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiple of the viewport the grid covers in each axis.
    pub grid_extension: f64,
    /// Cell size used for icon sizing until the host draws a grid.
    pub default_grid_size: f64,
    /// Icon edge length as a fraction of one grid cell.
    pub icon_cell_ratio: f64,
    /// Stage size used when the host surface reports none.
    pub stage_width: f64,
    pub stage_height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            zoom_step: ZOOM_STEP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            grid_extension: GRID_EXTENSION,
            default_grid_size: DEFAULT_GRID_SIZE,
            icon_cell_ratio: ICON_CELL_RATIO,
            stage_width: DEFAULT_STAGE_WIDTH,
            stage_height: DEFAULT_STAGE_HEIGHT,
        }
    }
}

impl CanvasConfig {
    /// Parse a config from JSON text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the first
    /// validation failure reported by [`CanvasConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is within its usable range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::HistoryLimit);
        }
        if self.zoom_step.is_nan() || self.zoom_step <= 1.0 {
            return Err(ConfigError::ZoomStep(self.zoom_step));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0) {
            return Err(ConfigError::ZoomBounds { min: self.min_zoom, max: self.max_zoom });
        }
        for (field, value) in [
            ("grid_extension", self.grid_extension),
            ("default_grid_size", self.default_grid_size),
            ("icon_cell_ratio", self.icon_cell_ratio),
            ("stage_width", self.stage_width),
            ("stage_height", self.stage_height),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}
