//! Runtime configuration loaded from YAML.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::{
    DEFAULT_NEIGHBOR_COUNT, DEFAULT_RADIUS_KM, MAX_NEIGHBOR_COUNT, MAX_RADIUS_KM, MIN_RADIUS_KM,
};
use crate::error::ConfigError;
use crate::estimator::{
    AdverseRegion, EnvironmentalEstimator, HUMIDITY_RANGE, RADIATION_RANGE, TEMPERATURE_RANGE,
};

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_neighbor_count() -> usize {
    DEFAULT_NEIGHBOR_COUNT
}

fn default_adverse_region() -> Option<AdverseRegion> {
    Some(AdverseRegion::default())
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: AnalysisDefaults,
    #[serde(default = "default_adverse_region")]
    pub adverse_region: Option<AdverseRegion>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDefaults {
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default = "default_neighbor_count")]
    pub neighbor_count: usize,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            neighbor_count: default_neighbor_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: AnalysisDefaults::default(),
            adverse_region: default_adverse_region(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.defaults.radius_km;
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius) {
            return Err(ConfigError::Validation(format!(
                "default radius {radius} km outside [{MIN_RADIUS_KM}, {MAX_RADIUS_KM}]"
            )));
        }

        let count = self.defaults.neighbor_count;
        if count == 0 || count > MAX_NEIGHBOR_COUNT {
            return Err(ConfigError::Validation(format!(
                "neighbor_count {count} outside [1, {MAX_NEIGHBOR_COUNT}]"
            )));
        }

        if let Some(region) = &self.adverse_region {
            validate_adverse_region(region)?;
        }

        Ok(())
    }

    pub fn estimator(&self) -> EnvironmentalEstimator {
        EnvironmentalEstimator::new().with_adverse_region(self.adverse_region)
    }
}

fn validate_adverse_region(region: &AdverseRegion) -> Result<(), ConfigError> {
    if region.tolerance_deg.is_nan() || region.tolerance_deg < 0.0 {
        return Err(ConfigError::Validation(format!(
            "adverse region tolerance must be non-negative, got {}",
            region.tolerance_deg
        )));
    }

    let center = region.center;
    if !(-90.0..=90.0).contains(&center.latitude) || !(-180.0..=180.0).contains(&center.longitude)
    {
        return Err(ConfigError::Validation(format!(
            "adverse region center {center} is not a valid coordinate"
        )));
    }

    let sample = region.sample;
    for (name, value, (min, max)) in [
        ("radiation_w_m2", sample.radiation_w_m2, RADIATION_RANGE),
        ("temperature_c", sample.temperature_c, TEMPERATURE_RANGE),
        ("humidity_pct", sample.humidity_pct, HUMIDITY_RANGE),
    ] {
        if !(min..=max).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "adverse region {name} {value} outside [{min}, {max}]"
            )));
        }
    }

    Ok(())
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Config> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Config::from_yaml_str(&data).with_context(|| format!("Invalid config {}", path.display()))
    }
}
