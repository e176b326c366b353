//! Runtime settings
//!
//! Loaded from the JSON file named by `RETRACE_SETTINGS`; defaults otherwise.

use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_FRAME_WAIT_MS, DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};
use crate::levels::{self, LevelTemplate};
use crate::platform::ScriptStep;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("viewport must be positive, got {width}x{height}")]
    Viewport { width: i32, height: i32 },
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Visible area in pixels
    pub viewport_width: i32,
    pub viewport_height: i32,
    /// Idle wait handed to the frontend each tick
    pub frame_wait_ms: u32,
    /// JSON level pack replacing the built-in levels
    pub levels_path: Option<PathBuf>,
    /// JSON key script for the headless frontend
    pub input_script: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEW_WIDTH,
            viewport_height: DEFAULT_VIEW_HEIGHT,
            frame_wait_ms: DEFAULT_FRAME_WAIT_MS,
            levels_path: None,
            input_script: None,
        }
    }
}

impl Settings {
    /// Environment variable naming the settings file
    pub const ENV_VAR: &'static str = "RETRACE_SETTINGS";

    pub fn viewport(&self) -> IVec2 {
        IVec2::new(self.viewport_width, self.viewport_height)
    }

    /// Parse and check settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        if settings.viewport_width <= 0 || settings.viewport_height <= 0 {
            return Err(SettingsError::Viewport {
                width: settings.viewport_width,
                height: settings.viewport_height,
            });
        }
        Ok(settings)
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Load from `RETRACE_SETTINGS`, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::try_load(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Path::new(&path).display());
                settings
            }
            Err(e) => {
                log::warn!(
                    "Ignoring settings file {}: {}",
                    Path::new(&path).display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Levels to play: the configured pack, or the built-in set
    pub fn level_pack(&self) -> Result<Vec<LevelTemplate>, SettingsError> {
        match &self.levels_path {
            Some(path) => {
                let pack = LevelTemplate::pack_from_json(&std::fs::read_to_string(path)?)?;
                log::info!("Loaded {} levels from {}", pack.len(), path.display());
                Ok(pack)
            }
            None => Ok(levels::builtin()),
        }
    }

    /// The configured key script; empty when none is set
    pub fn script(&self) -> Result<Vec<ScriptStep>, SettingsError> {
        match &self.input_script {
            Some(path) => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.viewport(), IVec2::new(1300, 720));
        assert_eq!(settings.frame_wait_ms, 1);
        assert_eq!(settings.level_pack().unwrap().len(), 3);
        assert!(settings.script().unwrap().is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"frame_wait_ms": 16}"#).unwrap();
        assert_eq!(settings.frame_wait_ms, 16);
        assert_eq!(settings.viewport_width, 1300);
        assert_eq!(settings.levels_path, None);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Settings::from_json(r#"{"viewport_width": 0}"#),
            Err(SettingsError::Viewport { width: 0, height: 720 })
        ));
        assert!(matches!(
            Settings::from_json("{"),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            Settings::try_load("/nonexistent/retrace.json"),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_missing_level_pack_is_error() {
        let settings = Settings {
            levels_path: Some(PathBuf::from("/nonexistent/levels.json")),
            ..Settings::default()
        };
        assert!(matches!(settings.level_pack(), Err(SettingsError::Io(_))));
    }
}
