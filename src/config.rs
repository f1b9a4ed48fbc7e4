//! Board configuration.
//!
//! Tunables for gestures, zoom, history and packing. Stored as JSON under the
//! platform config directory; every field has a default so partial files load.

use crate::constants::{
    DRAG_THRESHOLD, MAX_HISTORY_COMMANDS, MAX_ZOOM, MIN_ITEM_SCALE, MIN_ZOOM, SCALE_SENSITIVITY,
    SCENE_PADDING, ZOOM_STEP,
};
use crate::error::BoardResult;
use crate::packing::PackingStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Undo entries kept before the oldest is evicted
    pub history_capacity: usize,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Multiplicative zoom per wheel step
    pub zoom_step: f64,
    /// Device pixels of scrollable margin kept around the view
    pub scene_padding: f64,
    /// Scale change per device pixel of pointer travel
    pub scale_sensitivity: f64,
    /// Lower bound applied by the scale gesture
    pub min_scale: f64,
    pub packing: PackingStrategy,
    /// Marquee bands smaller than this, in device pixels, count as clicks
    pub drag_threshold: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            history_capacity: MAX_HISTORY_COMMANDS,
            zoom_min: MIN_ZOOM,
            zoom_max: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            scene_padding: SCENE_PADDING,
            scale_sensitivity: SCALE_SENSITIVITY,
            min_scale: MIN_ITEM_SCALE,
            packing: PackingStrategy::default(),
            drag_threshold: DRAG_THRESHOLD,
        }
    }
}

/// `<config_dir>/rivboard/config.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rivboard").join("config.json"))
}

impl BoardConfig {
    pub fn load(path: &Path) -> BoardResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: BoardConfig = serde_json::from_str(&text)?;
        Ok(config.sanitized())
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Write pretty JSON atomically.
    pub fn save(&self, path: &Path) -> BoardResult<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Replace nonsensical values with defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.history_capacity == 0 {
            self.history_capacity = defaults.history_capacity;
        }
        if !(self.zoom_min > 0.0 && self.zoom_min < self.zoom_max) {
            self.zoom_min = defaults.zoom_min;
            self.zoom_max = defaults.zoom_max;
        }
        if self.zoom_step <= 1.0 {
            self.zoom_step = defaults.zoom_step;
        }
        if self.min_scale <= 0.0 {
            self.min_scale = defaults.min_scale;
        }
        self
    }
}
