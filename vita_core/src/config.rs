//! Configuration file support for vita.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/vita/config.toml`.

use crate::{ActivityLevel, Error, Result, Sex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl DataConfig {
    /// Path of the history database inside the data directory
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("bmi.db")
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Default profile values used when the CLI flags are omitted
///
/// These mirror the input defaults of the dashboard: target BMI 22.0,
/// age 30, sedentary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_target_bmi")]
    pub target_bmi: f64,

    #[serde(default = "default_age")]
    pub age: u32,

    #[serde(default = "default_sex")]
    pub sex: Sex,

    #[serde(default = "default_activity")]
    pub activity: ActivityLevel,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            target_bmi: default_target_bmi(),
            age: default_age(),
            sex: default_sex(),
            activity: default_activity(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("vita")
}

fn default_target_bmi() -> f64 {
    22.0
}

fn default_age() -> u32 {
    30
}

fn default_sex() -> Sex {
    Sex::Male
}

fn default_activity() -> ActivityLevel {
    ActivityLevel::Sedentary
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
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
        base.join("vita").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
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
