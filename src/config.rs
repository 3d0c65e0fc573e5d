//! Stage configuration.
//!
//! Serializable settings for the AEC builders, debug display flags and
//! tracing. Files are read as JSON or RON depending on their extension.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::logging::TracingConfig;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Dimensions and tuning used by wall, room and staircase assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AecSettings {
    pub wall_height: f32,
    pub wall_depth: f32,
    pub door_width: f32,
    pub door_height: f32,
    pub door_depth: f32,
    pub door_swing_seconds: f32,
    pub window_width: f32,
    pub window_height: f32,
    pub window_bottom_frame_height: f32,
    pub glass_depth: f32,
    pub glass_energy_min: f32,
    pub glass_energy_max: f32,
    pub stairs_guard_height: f32,
}

impl Default for AecSettings {
    fn default() -> Self {
        Self {
            wall_height: WALL_HEIGHT,
            wall_depth: WALL_DEPTH,
            door_width: DOOR_WIDTH,
            door_height: DOOR_HEIGHT,
            door_depth: DOOR_DEPTH,
            door_swing_seconds: DOOR_SWING_SECONDS,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            window_bottom_frame_height: WINDOW_BOTTOM_FRAME_HEIGHT,
            glass_depth: GLASS_DEPTH,
            glass_energy_min: GLASS_ENERGY_MIN,
            glass_energy_max: GLASS_ENERGY_MAX,
            stairs_guard_height: STAIRS_GUARD_HEIGHT,
        }
    }
}

impl AecSettings {
    /// Height of the lintel above a door leaf in a wall of `wall_height`.
    /// Zero or negative means there is no room for a frame.
    pub fn door_frame_height(&self, wall_height: f32) -> f32 {
        wall_height - self.door_height
    }

    /// Height of the wall piece above a regular window
    pub fn window_top_frame_height(&self, wall_height: f32) -> f32 {
        wall_height - self.window_bottom_frame_height - self.window_height
    }
}

/// Debug display flags applied to freshly created or cloned meshes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub show_collisions: bool,
    pub show_bounding_boxes: bool,
}

/// Root configuration of a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub aec: AecSettings,
    pub debug: DebugSettings,
    pub tracing: TracingConfig,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            aec: AecSettings::default(),
            debug: DebugSettings::default(),
            tracing: TracingConfig::default(),
            seed: DEFAULT_STAGE_SEED,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load from a `.json` or `.ron` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("ron") => Self::from_ron(&text),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Reject settings the builders cannot produce geometry for
    pub fn validate(&self) -> Result<(), ConfigError> {
        let aec = &self.aec;
        let dimensions = [
            ("wall_height", aec.wall_height),
            ("wall_depth", aec.wall_depth),
            ("door_width", aec.door_width),
            ("door_height", aec.door_height),
            ("door_depth", aec.door_depth),
            ("window_width", aec.window_width),
            ("window_height", aec.window_height),
            ("glass_depth", aec.glass_depth),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        let non_negative = [
            ("window_bottom_frame_height", aec.window_bottom_frame_height),
            ("stairs_guard_height", aec.stairs_guard_height),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and not negative, got {value}"
                )));
            }
        }
        if !aec.door_swing_seconds.is_finite() || aec.door_swing_seconds <= 0.0 {
            return Err(ConfigError::Invalid(
                "door_swing_seconds must be positive and finite".into(),
            ));
        }
        if !aec.glass_energy_min.is_finite()
            || !aec.glass_energy_max.is_finite()
            || aec.glass_energy_min <= 0.0
            || aec.glass_energy_max < aec.glass_energy_min
        {
            return Err(ConfigError::Invalid(format!(
                "glass energy range [{}, {}] is not a positive ordered range",
                aec.glass_energy_min, aec.glass_energy_max
            )));
        }
        Ok(())
    }
}
