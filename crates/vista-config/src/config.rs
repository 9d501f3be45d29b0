//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level Vista configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Adaptive LOD settings.
    pub lod: LodConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Adaptive LOD settings: frame-rate shift thresholds per display mode,
/// the granularity offset, and the automatic-adjustment switch.
///
/// The two threshold pairs are deliberately independent: an immersive
/// display needs a much higher frame rate before detail loss is preferable
/// to frame drops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Desktop mode: detail is reduced when average FPS falls below this.
    pub desktop_decrease_fps: f32,
    /// Desktop mode: detail is restored when average FPS rises above this.
    pub desktop_increase_fps: f32,
    /// Immersive mode: detail is reduced when average FPS falls below this.
    pub immersive_decrease_fps: f32,
    /// Immersive mode: detail is restored when average FPS rises above this.
    pub immersive_increase_fps: f32,
    /// Discrete granularity offset applied to the visibility distance formula.
    pub boundary_level_adjust: u32,
    /// Whether the controller may adjust the detail scale on its own.
    pub automatic_adjust: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log a human-readable LOD feedback line after every shift.
    pub show_lod_feedback: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            desktop_decrease_fps: 30.0,
            desktop_increase_fps: 35.0,
            immersive_decrease_fps: 60.0,
            immersive_increase_fps: 65.0,
            boundary_level_adjust: 0,
            automatic_adjust: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_lod_feedback: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
