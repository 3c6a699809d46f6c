use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::ChartSettings;
use crate::score::ScoreMode;

/// Errors that can occur while reading the settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Returns the path to the settings file: `~/.config/space-rhythm/settings.json`
fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("space-rhythm");
    path.push("settings.json");
    path
}

/// Startup settings.
///
/// Read once from the platform config directory and never written back;
/// presses and scores are not persisted.
/// Fields use `#[serde(default)]` so a partial file only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // Audio
    pub tone_volume: f32,
    pub tone_duration_ms: u64,

    // Scoring
    pub score_mode: ScoreMode,

    // Display (stored as u8 triples since Color32 isn't serde-friendly)
    pub bar_color: [u8; 3],
    pub background: [u8; 3],
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            tone_volume: 0.3,
            tone_duration_ms: 200,

            score_mode: ScoreMode::PerFrame,

            bar_color: [0, 0, 255],
            background: [255, 255, 255],
        }
    }
}

impl AppSettings {
    /// Load settings from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let path = settings_path();
        match Self::read_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) => {
                log::info!("No settings file found ({}), using defaults", e);
                Self::default()
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Read and parse a settings file
    pub fn read_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn tone_duration(&self) -> Duration {
        Duration::from_millis(self.tone_duration_ms)
    }

    pub fn chart_settings(&self) -> ChartSettings {
        let [r, g, b] = self.bar_color;
        let [br, bg, bb] = self.background;
        ChartSettings {
            bar_color: Color32::from_rgb(r, g, b),
            background: Color32::from_rgb(br, bg, bb),
        }
    }
}
