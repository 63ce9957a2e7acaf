use serde::{Deserialize, Serialize};

use super::classification::{ClassificationMode, ThresholdOverrides, Thresholds};
use crate::error::{Result, SiteError};

/// Parameters of a single pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Density search radius in kilometers (> 0)
    pub radius_km: f64,

    /// Co-location edge threshold in meters (>= 0; 0 disables grouping)
    pub threshold_m: f64,

    pub mode: ClassificationMode,

    /// Threshold-mode cut points; ignored in quantile mode
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

impl PipelineParams {
    pub const DEFAULT_RADIUS_KM: f64 = 2.0;
    pub const DEFAULT_THRESHOLD_M: f64 = 100.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_threshold_m(mut self, threshold_m: f64) -> Self {
        self.threshold_m = threshold_m;
        self
    }

    pub fn with_mode(mut self, mode: ClassificationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdOverrides) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Reject parameters no stage can run with.
    ///
    /// Returns the resolved cut points for threshold mode.
    pub fn validate(&self) -> Result<Thresholds> {
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(SiteError::invalid_parameter(
                "radius_km",
                format!("must be a positive number, got {}", self.radius_km),
            ));
        }

        if !self.threshold_m.is_finite() || self.threshold_m < 0.0 {
            return Err(SiteError::invalid_parameter(
                "threshold_m",
                format!("must be zero or a positive number, got {}", self.threshold_m),
            ));
        }

        let thresholds = self.thresholds.resolve();
        if self.mode == ClassificationMode::Threshold {
            thresholds.validate()?;
        }

        Ok(thresholds)
    }
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            radius_km: Self::DEFAULT_RADIUS_KM,
            threshold_m: Self::DEFAULT_THRESHOLD_M,
            mode: ClassificationMode::default(),
            thresholds: ThresholdOverrides::default(),
        }
    }
}
