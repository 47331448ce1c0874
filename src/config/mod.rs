//! Configuration system for Kondate.
//!
//! Loaded from the first of:
//! 1. Explicit `--config` path
//! 2. kondate.yml in the current directory
//! 3. ~/.config/kondate/kondate.yml
//! 4. Built-in defaults

mod calendar;
mod rotation;
mod source;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use self::calendar::CalendarConfig;
pub use self::rotation::{RecencyConfig, RotationConfig};
pub use self::source::{NotionConfig, SourceConfig, SourceKind};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Weekday table and selection policy.
    pub rotation: RotationConfig,

    /// Where the rotation state lives.
    pub storage: StorageConfig,

    /// Where menu items come from.
    pub source: SourceConfig,

    /// Calendar file output.
    pub calendar: CalendarConfig,
}

/// Persisted state location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    pub state_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("kondate")
                .join("state.json"),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try project config
        let project_config = PathBuf::from(format!("{}.yml", project_name));
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", project_config.display(), e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.rotation.validate()?;
        self.calendar.event_times()?;
        if self.storage.state_file.as_os_str().is_empty() {
            eyre::bail!("storage.state-file must not be empty");
        }
        Ok(())
    }
}
