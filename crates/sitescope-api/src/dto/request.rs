use serde::Deserialize;
use sitescope_core::config::LayeredConfig;
use sitescope_core::models::{ClassificationMode, PipelineParams, ThresholdOverrides};

use crate::error::ApiError;

/// Query parameters shared by `/api/v1/analyze` and `/api/v1/download`
///
/// Every parameter is optional; unset ones fall back to the server defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeQuery {
    pub radius_km: Option<f64>,
    pub threshold_m: Option<f64>,
    pub mode: Option<String>,
    pub rural_threshold: Option<f64>,
    pub suburban_threshold: Option<f64>,
    pub urban_threshold: Option<f64>,
}

impl AnalyzeQuery {
    /// Check request ranges and resolve pipeline parameters against `defaults`.
    ///
    /// Threshold overrides only apply in threshold mode.
    pub fn to_params(&self, defaults: &LayeredConfig) -> Result<PipelineParams, ApiError> {
        let base = defaults.pipeline_params();

        let radius_km = match self.radius_km {
            Some(value) => check_range("radius_km", value, 0.1, 100.0)?,
            None => base.radius_km,
        };

        let threshold_m = match self.threshold_m {
            Some(value) => check_range("threshold_m", value, 1.0, 10_000.0)?,
            None => base.threshold_m,
        };

        let mode = match &self.mode {
            Some(mode) => mode.parse::<ClassificationMode>()?,
            None => base.mode,
        };

        let mut params = base.with_radius_km(radius_km).with_threshold_m(threshold_m).with_mode(mode);

        if mode == ClassificationMode::Threshold {
            let overrides = ThresholdOverrides {
                rural: self.rural_threshold.map(|v| check_minimum("rural_threshold", v)).transpose()?,
                suburban: self
                    .suburban_threshold
                    .map(|v| check_minimum("suburban_threshold", v))
                    .transpose()?,
                urban: self.urban_threshold.map(|v| check_minimum("urban_threshold", v)).transpose()?,
            };
            params = params.with_thresholds(overrides.apply_to(defaults.thresholds()).into());
        }

        Ok(params)
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<f64, ApiError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::bad_request(format!("Invalid parameter {}", name))
            .with_details(format!("must be between {} and {}, got {}", min, max, value)))
    }
}

fn check_minimum(name: &str, value: f64) -> Result<f64, ApiError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ApiError::bad_request(format!("Invalid parameter {}", name))
            .with_details(format!("must be at least 0, got {}", value)))
    }
}
