use crate::error::{Result, SiteError};
use crate::models::{ClassificationMode, PipelineParams, ThresholdOverrides, Thresholds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

pub const ENV_RADIUS_KM: &str = "SITESCOPE_RADIUS_KM";
pub const ENV_THRESHOLD_M: &str = "SITESCOPE_THRESHOLD_M";
pub const ENV_MODE: &str = "SITESCOPE_MODE";
pub const ENV_RURAL_THRESHOLD: &str = "SITESCOPE_RURAL_THRESHOLD";
pub const ENV_SUBURBAN_THRESHOLD: &str = "SITESCOPE_SUBURBAN_THRESHOLD";
pub const ENV_URBAN_THRESHOLD: &str = "SITESCOPE_URBAN_THRESHOLD";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument or request parameter
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered analysis defaults: CLI > environment > file > built-in
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub radius_km: ConfigValue<f64>,
    pub threshold_m: ConfigValue<f64>,
    pub mode: ConfigValue<ClassificationMode>,
    pub rural: ConfigValue<f64>,
    pub suburban: ConfigValue<f64>,
    pub urban: ConfigValue<f64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let thresholds = Thresholds::default();
        Self {
            radius_km: ConfigValue::new(PipelineParams::DEFAULT_RADIUS_KM, ConfigSource::Default),
            threshold_m: ConfigValue::new(
                PipelineParams::DEFAULT_THRESHOLD_M,
                ConfigSource::Default,
            ),
            mode: ConfigValue::new(ClassificationMode::default(), ConfigSource::Default),
            rural: ConfigValue::new(thresholds.rural, ConfigSource::Default),
            suburban: ConfigValue::new(thresholds.suburban, ConfigSource::Default),
            urban: ConfigValue::new(thresholds.urban, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SiteError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| SiteError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(radius_km) = file_config.radius_km {
            self.radius_km.update(radius_km, ConfigSource::File);
        }

        if let Some(threshold_m) = file_config.threshold_m {
            self.threshold_m.update(threshold_m, ConfigSource::File);
        }

        if let Some(mode) = file_config.mode {
            let mode = mode.parse::<ClassificationMode>().map_err(|e| SiteError::ConfigInvalid {
                key: "mode".to_string(),
                reason: e.to_string(),
            })?;
            self.mode.update(mode, ConfigSource::File);
        }

        if let Some(thresholds) = file_config.thresholds {
            self.apply_thresholds(thresholds, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Some(radius_km) = read_env_f64(ENV_RADIUS_KM) {
            self.radius_km.update(radius_km, ConfigSource::Environment);
        }

        if let Some(threshold_m) = read_env_f64(ENV_THRESHOLD_M) {
            self.threshold_m.update(threshold_m, ConfigSource::Environment);
        }

        if let Ok(mode_str) = env::var(ENV_MODE) {
            match mode_str.parse::<ClassificationMode>() {
                Ok(mode) => self.mode.update(mode, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid {} value '{}': expected quantile or threshold",
                    ENV_MODE,
                    mode_str
                ),
            }
        }

        let thresholds = ThresholdOverrides {
            rural: read_env_f64(ENV_RURAL_THRESHOLD),
            suburban: read_env_f64(ENV_SUBURBAN_THRESHOLD),
            urban: read_env_f64(ENV_URBAN_THRESHOLD),
        };
        self.apply_thresholds(thresholds, ConfigSource::Environment);

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(radius_km) = overrides.radius_km {
            self.radius_km.update(radius_km, ConfigSource::Cli);
        }

        if let Some(threshold_m) = overrides.threshold_m {
            self.threshold_m.update(threshold_m, ConfigSource::Cli);
        }

        if let Some(mode) = overrides.mode {
            self.mode.update(mode, ConfigSource::Cli);
        }

        self.apply_thresholds(overrides.thresholds, ConfigSource::Cli);
    }

    fn apply_thresholds(&mut self, thresholds: ThresholdOverrides, source: ConfigSource) {
        if let Some(rural) = thresholds.rural {
            self.rural.update(rural, source);
        }
        if let Some(suburban) = thresholds.suburban {
            self.suburban.update(suburban, source);
        }
        if let Some(urban) = thresholds.urban {
            self.urban.update(urban, source);
        }
    }

    /// Resolved threshold-mode cut points
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.rural.value, self.suburban.value, self.urban.value)
    }

    /// Pipeline parameters built from the resolved values
    pub fn pipeline_params(&self) -> PipelineParams {
        PipelineParams::new()
            .with_radius_km(self.radius_km.value)
            .with_threshold_m(self.threshold_m.value)
            .with_mode(self.mode.value)
            .with_thresholds(self.thresholds().into())
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut map = BTreeMap::new();

        map.insert(
            "radius_km".to_string(),
            (self.radius_km.value.to_string(), self.radius_km.source),
        );
        map.insert(
            "threshold_m".to_string(),
            (self.threshold_m.value.to_string(), self.threshold_m.source),
        );
        map.insert("mode".to_string(), (self.mode.value.to_string(), self.mode.source));
        map.insert(
            "thresholds.rural".to_string(),
            (self.rural.value.to_string(), self.rural.source),
        );
        map.insert(
            "thresholds.suburban".to_string(),
            (self.suburban.value.to_string(), self.suburban.source),
        );
        map.insert(
            "thresholds.urban".to_string(),
            (self.urban.value.to_string(), self.urban.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    radius_km: Option<f64>,
    threshold_m: Option<f64>,
    mode: Option<String>,
    thresholds: Option<ThresholdOverrides>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub radius_km: Option<f64>,
    pub threshold_m: Option<f64>,
    pub mode: Option<ClassificationMode>,
    pub thresholds: ThresholdOverrides,
}

/// Read a float from the environment, warning on unparseable values
fn read_env_f64(key: &str) -> Option<f64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected a number", key, raw);
            None
        }
    }
}
