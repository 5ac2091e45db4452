// Engine configuration: layout floors and resize behavior, loadable from TOML.

use serde::Deserialize;
use std::path::Path;

/// Layout and resize parameters for the pane tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Minimum usable pane width in character cells. `can_split` and
    /// directional resize refuse to shrink a pane below this.
    pub min_pane_width: f32,
    /// Minimum usable pane height in character cells.
    pub min_pane_height: f32,
    /// Thickness of the separator between a split's children, in cells.
    pub separator_size: f32,
    /// How far one directional resize step moves a separator, as a fraction
    /// of the enclosing split's dividable extent.
    pub resize_increment: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_pane_width: 4.0,
            min_pane_height: 2.0,
            separator_size: 1.0,
            resize_increment: 0.05,
        }
    }
}

/// Errors that can occur during config loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

// ── Serde intermediate struct (unknown keys ignored, fields defaulted) ───

#[derive(Deserialize)]
#[serde(default)]
struct RawEngineConfig {
    min_pane_width: f32,
    min_pane_height: f32,
    separator_size: f32,
    resize_increment: f32,
}

impl Default for RawEngineConfig {
    fn default() -> Self {
        let d = EngineConfig::default();
        Self {
            min_pane_width: d.min_pane_width,
            min_pane_height: d.min_pane_height,
            separator_size: d.separator_size,
            resize_increment: d.resize_increment,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a TOML string, falling back to defaults for
    /// missing fields.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawEngineConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let config = Self {
            min_pane_width: raw.min_pane_width,
            min_pane_height: raw.min_pane_height,
            separator_size: raw.separator_size,
            resize_increment: raw.resize_increment,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("loaded engine config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pane_width <= 0.0 || self.min_pane_height <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "minimum pane size must be positive, got {}x{}",
                self.min_pane_width, self.min_pane_height
            )));
        }
        if self.separator_size < 0.0 {
            return Err(ConfigError::Validation(format!(
                "separator size must be non-negative, got {}",
                self.separator_size
            )));
        }
        if self.resize_increment <= 0.0 || self.resize_increment > 0.5 {
            return Err(ConfigError::Validation(format!(
                "resize increment must be in (0, 0.5], got {}",
                self.resize_increment
            )));
        }
        Ok(())
    }
}
