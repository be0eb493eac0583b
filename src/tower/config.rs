//! Viewer Configuration
//!
//! Optional JSON file read at startup. Every field has a default, so a
//! partial file only overrides what it names.

use std::path::{Path, PathBuf};

use glam::Vec3;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the config file path.
pub const CONFIG_ENV: &str = "TOWER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bounds applied to keyboard structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditLimits {
    pub min_levels: u32,
    pub max_levels: u32,
    pub min_segments: u32,
    pub max_segments: u32,
}

impl Default for EditLimits {
    fn default() -> Self {
        Self {
            min_levels: 3,
            max_levels: 200,
            min_segments: 3,
            max_segments: 64,
        }
    }
}

impl EditLimits {
    /// `levels + delta`, kept inside the level limits.
    pub fn step_levels(&self, levels: u32, delta: i32) -> u32 {
        step(levels, delta, self.min_levels, self.max_levels)
    }

    pub fn step_segments(&self, segments: u32, delta: i32) -> u32 {
        step(segments, delta, self.min_segments, self.max_segments)
    }
}

fn step(value: u32, delta: i32, min: u32, max: u32) -> u32 {
    let (lo, hi) = (min.min(max), min.max(max));
    (value as i64 + delta as i64).clamp(lo as i64, hi as i64) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Linear RGB background.
    pub clear_color: [f64; 3],
    pub snapshot_path: PathBuf,
    pub limits: EditLimits,
    /// Degrees added per Q/E press.
    pub rotation_step: f32,
    /// Direction light travels toward, world space.
    pub light_direction: Vec3,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 800,
            clear_color: [0.08, 0.09, 0.11],
            snapshot_path: PathBuf::from("tower_snapshot.json"),
            limits: EditLimits::default(),
            rotation_step: 15.0,
            light_direction: Vec3::new(-0.4, -1.0, -0.6),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load `path`, falling back to defaults when it is absent or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Config named by `TOWER_CONFIG`, or defaults when unset.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_or_default(Path::new(&path)),
            None => Self::default(),
        }
    }
}
