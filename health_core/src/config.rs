//! Configuration file support for the health tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/health-tracker/config.toml`.
//! Every key is optional; an absent file behaves exactly like the defaults.

use crate::stats::DEFAULT_WINDOW;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Where exports are written
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_path")]
    pub path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: default_export_path(),
        }
    }
}

/// Defaults for the statistics commands
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_metric")]
    pub metric: String,

    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            metric: default_metric(),
            window: default_window(),
        }
    }
}

// Default value functions
fn default_export_path() -> PathBuf {
    PathBuf::from("health_entries.csv")
}

fn default_metric() -> String {
    "weight".into()
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            config_path => {
                tracing::info!(
                    "No config file found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("health-tracker").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.analysis.window < 1 {
            return Err(Error::Config("analysis.window must be >= 1".into()));
        }
        Ok(())
    }
}
