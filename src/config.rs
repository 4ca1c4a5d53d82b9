//! Dashboard configuration
//!
//! Settings come from built-in defaults, optionally overridden by a TOML file
//! (`crime_dashboard.toml` in the working directory unless `--config` points
//! elsewhere), then by command-line flags in `main`.

use crate::data::{LoadOptions, KNOWN_REGIONS, TOTAL_COLUMN};
use crate::stats::{DEFAULT_HORIZON, DEFAULT_TOP_N};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "crime_dashboard.toml";
pub const DEFAULT_DATA_FILE: &str = "crime.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file loaded at startup.
    pub data_path: PathBuf,
    /// Aggregate crime column used for ratios and trends.
    pub total_column: String,
    /// Drop rows outside `allowed_regions` and `TOTAL` district rows.
    pub restrict_regions: bool,
    /// Overrides the built-in list of states/UTs.
    pub allowed_regions: Option<Vec<String>>,
    /// Categories shown before folding the rest into OTHER.
    pub top_n: usize,
    /// Years projected by the prediction page.
    pub horizon: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            total_column: TOTAL_COLUMN.to_string(),
            restrict_regions: false,
            allowed_regions: None,
            top_n: DEFAULT_TOP_N,
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl DashboardConfig {
    /// Load configuration. An explicit path must exist; the default file is
    /// optional and its absence yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loader options derived from this configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            restrict_regions: self.restrict_regions,
            allowed_regions: self
                .allowed_regions
                .clone()
                .unwrap_or_else(|| KNOWN_REGIONS.iter().map(|r| r.to_string()).collect()),
            total_column: self.total_column.clone(),
        }
    }
}
