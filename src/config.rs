//! Configuration management for the trip duration dashboard

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub models: ModelsConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    pub logging: LoggingConfig,
}

/// Dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Path to the trip CSV
    pub csv_path: String,
    /// Number of rows shown by the dataset preview
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_preview_rows() -> usize {
    5
}

/// Model artifacts configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory containing the model artifacts
    pub models_dir: String,
    /// Models in display order
    #[serde(default = "default_model_entries")]
    pub entries: Vec<ModelEntryConfig>,
}

/// A single named model artifact
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelEntryConfig {
    /// Display name, e.g. "Random Forest"
    pub name: String,
    /// File name relative to `models_dir`
    pub file: String,
}

impl ModelEntryConfig {
    fn new(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            file: file.to_string(),
        }
    }
}

fn default_model_entries() -> Vec<ModelEntryConfig> {
    vec![
        ModelEntryConfig::new("Linear Regression", "linear_reg.json"),
        ModelEntryConfig::new("Decision Tree", "decision_tree.json"),
        ModelEntryConfig::new("Random Forest", "random_forest.json"),
        ModelEntryConfig::new("LightGBM", "light_gbm.json"),
    ]
}

/// Initial filter settings for the dataset view
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Inclusive passenger count range
    #[serde(default = "default_passenger_range")]
    pub passenger_range: (i64, i64),
    /// Inclusive pickup hour range
    #[serde(default = "default_hour_range")]
    pub hour_range: (i64, i64),
}

fn default_passenger_range() -> (i64, i64) {
    (1, 4)
}

fn default_hour_range() -> (i64, i64) {
    (0, 23)
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            passenger_range: default_passenger_range(),
            hour_range: default_hour_range(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from a specific path, with `DASHBOARD__*` overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("DASHBOARD").separator("__"))
            .build()
            .with_context(|| format!("Failed to build configuration from {}", path.display()))?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Resolved path of every model artifact, in display order
    pub fn model_paths(&self) -> Vec<(String, PathBuf)> {
        let dir = Path::new(&self.models.models_dir);
        self.models
            .entries
            .iter()
            .map(|entry| (entry.name.clone(), dir.join(&entry.file)))
            .collect()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                csv_path: "train_updated.csv".to_string(),
                preview_rows: default_preview_rows(),
            },
            models: ModelsConfig {
                models_dir: "models".to_string(),
                entries: default_model_entries(),
            },
            filter: FilterConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
