//! Configuration file support for Memgym.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/memgym/config.toml`.

use crate::{Error, Result, ReviewIntervals};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub review: ReviewConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Spaced-review parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Days until re-review, one entry per mastery level 1..=5
    #[serde(default = "default_interval_days")]
    pub interval_days: Vec<i64>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            interval_days: default_interval_days(),
        }
    }
}

impl ReviewConfig {
    /// Build the validated interval table from the configured values.
    pub fn intervals(&self) -> Result<ReviewIntervals> {
        let days: [i64; 5] = self.interval_days.as_slice().try_into().map_err(|_| {
            Error::Config(format!(
                "interval_days must have exactly 5 entries, got {}",
                self.interval_days.len()
            ))
        })?;
        ReviewIntervals::new(days)
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("memgym")
}

fn default_interval_days() -> Vec<i64> {
    crate::mastery::DEFAULT_INTERVAL_DAYS.to_vec()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("memgym").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
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
}
