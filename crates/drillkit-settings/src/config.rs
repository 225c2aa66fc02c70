//! Configuration for DrillKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats; the default location is
//! `<platform config dir>/drillkit/config.toml`.
//!
//! Configuration is organized into sections:
//! - Optimizer settings (closure, start, move selection, budgets)
//! - Drilling parameters (tool, depths, feeds, speeds)
//! - Output settings (where programs and plans are written)

use crate::error::{SettingsError, SettingsResult};
use drillkit_camtools::{DrillPressParameters, OptimizerConfig};
use drillkit_core::{Error as CoreError, InputError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory that receives generated files
    pub directory: PathBuf,
    /// Write a `<job>.nc` drilling program per job
    pub write_gcode: bool,
    /// Write a `<job>.plan.json` hole order per job
    pub write_plan: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            write_gcode: false,
            write_plan: true,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Path optimizer settings
    pub optimizer: OptimizerConfig,
    /// Drilling program parameters
    pub drilling: DrillPressParameters,
    /// Output settings
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("drillkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => {
                return Err(SettingsError::UnsupportedFormat(
                    "config file must be .json or .toml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise defaults
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            _ => {
                return Err(SettingsError::UnsupportedFormat(
                    "config file must be .json or .toml".to_string(),
                ))
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.optimizer.validate().map_err(|e| match e {
            CoreError::InvalidInput(InputError::InvalidSetting { name, reason }) => {
                SettingsError::InvalidSetting {
                    key: format!("optimizer.{name}"),
                    reason,
                }
            }
            other => SettingsError::InvalidSetting {
                key: "optimizer".to_string(),
                reason: other.to_string(),
            },
        })?;

        self.drilling
            .validate()
            .map_err(|e| SettingsError::InvalidSetting {
                key: "drilling".to_string(),
                reason: e.to_string(),
            })?;

        if self.output.directory.as_os_str().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output.directory".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
