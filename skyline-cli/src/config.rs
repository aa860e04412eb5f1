//! `skyline.toml` settings.
//!
//! Every section and key is optional; anything left out takes the default
//! shown below. Command-line flags override the file.
//!
//! ```toml
//! [model]
//! format = "json"
//! path = "house_model.json"
//!
//! [data]
//! market_csv = "house_prices.csv"
//!
//! [projection]
//! growth_percent = 8.0
//! horizon_years = 10
//!
//! [loan]
//! principal = 5000000
//! rate_percent = 8.5
//! tenure_years = 20
//!
//! [logging]
//! level = "info"
//! file = "skyline.log"
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use skyline_core::ModelConfig;
use skyline_core::calculations::ProjectionConfig;
use thiserror::Error;
use tracing::debug;

/// File read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "skyline.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub model: ModelSettings,
    pub data: DataSettings,
    pub projection: ProjectionSettings,
    pub loan: LoanSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    pub format: String,
    pub path: PathBuf,
}

impl Default for ModelSettings {
    fn default() -> Self {
        let defaults = ModelConfig::default();
        Self {
            format: defaults.format,
            path: defaults.artifact_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSettings {
    pub market_csv: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            market_csv: PathBuf::from("house_prices.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionSettings {
    pub growth_percent: Decimal,
    pub horizon_years: i32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        let defaults = ProjectionConfig::default();
        Self {
            growth_percent: defaults.annual_growth_percent,
            horizon_years: defaults.horizon_years,
        }
    }
}

/// Starting values for the loan form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoanSettings {
    pub principal: Decimal,
    pub rate_percent: Decimal,
    pub tenure_years: i32,
}

impl Default for LoanSettings {
    fn default() -> Self {
        Self {
            principal: Decimal::from(5_000_000),
            rate_percent: Decimal::new(85, 1),
            tenure_years: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from [`DEFAULT_CONFIG_FILE`] when no
    /// path is given.
    ///
    /// A missing default file yields the defaults. A path given explicitly
    /// must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "config loaded");
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            format: self.model.format.clone(),
            artifact_path: self.model.path.clone(),
        }
    }

    pub fn projection_config(&self) -> ProjectionConfig {
        ProjectionConfig {
            annual_growth_percent: self.projection.growth_percent,
            horizon_years: self.projection.horizon_years,
        }
    }
}
