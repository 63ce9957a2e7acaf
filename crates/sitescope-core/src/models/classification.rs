//! Area classes, classification modes and density cut points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Area type derived from density, ordered from sparsest to densest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AreaClass {
    Rural,
    Suburban,
    Urban,
    Dense,
}

impl AreaClass {
    /// All classes in ascending density order
    pub const ALL: [AreaClass; 4] =
        [AreaClass::Rural, AreaClass::Suburban, AreaClass::Urban, AreaClass::Dense];

    pub fn as_str(&self) -> &'static str {
        match self {
            AreaClass::Rural => "Rural",
            AreaClass::Suburban => "Suburban",
            AreaClass::Urban => "Urban",
            AreaClass::Dense => "Dense",
        }
    }

    /// Classify a value against three cut points.
    ///
    /// Each band is inclusive of its upper bound, so a value equal to a cut
    /// point falls into the lower class. Bands are tested densest first, so
    /// when the cut points are out of order the densest matching band wins.
    pub fn from_cut_points(value: f64, lower: f64, middle: f64, upper: f64) -> Self {
        if value > upper {
            AreaClass::Dense
        } else if value > middle {
            AreaClass::Urban
        } else if value > lower {
            AreaClass::Suburban
        } else {
            AreaClass::Rural
        }
    }
}

impl fmt::Display for AreaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AreaClass {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        AreaClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SiteError::invalid_parameter("area_class", format!("unknown class {s}")))
    }
}

/// Per-class site counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AreaSummary {
    pub rural: usize,
    pub suburban: usize,
    pub urban: usize,
    pub dense: usize,
}

impl AreaSummary {
    /// Count the classes in an iterator
    pub fn from_classes(classes: impl IntoIterator<Item = AreaClass>) -> Self {
        let mut summary = Self::default();
        for class in classes {
            summary.record(class);
        }
        summary
    }

    pub fn record(&mut self, class: AreaClass) {
        match class {
            AreaClass::Rural => self.rural += 1,
            AreaClass::Suburban => self.suburban += 1,
            AreaClass::Urban => self.urban += 1,
            AreaClass::Dense => self.dense += 1,
        }
    }

    pub fn count(&self, class: AreaClass) -> usize {
        match class {
            AreaClass::Rural => self.rural,
            AreaClass::Suburban => self.suburban,
            AreaClass::Urban => self.urban,
            AreaClass::Dense => self.dense,
        }
    }

    pub fn total(&self) -> usize {
        self.rural + self.suburban + self.urban + self.dense
    }
}

/// Strategy used to turn density into an area class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMode {
    /// Per-`cluster_id` quartiles of density
    #[default]
    Quantile,
    /// Fixed global cut points
    Threshold,
}

impl ClassificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMode::Quantile => "quantile",
            ClassificationMode::Threshold => "threshold",
        }
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationMode {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "quantile" => Ok(ClassificationMode::Quantile),
            "threshold" => Ok(ClassificationMode::Threshold),
            _ => Err(SiteError::InvalidMode { mode: s.to_string() }),
        }
    }
}

/// Global density cut points in sites per km²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub rural: f64,
    pub suburban: f64,
    pub urban: f64,
}

impl Thresholds {
    pub const DEFAULT_RURAL: f64 = 10.0;
    pub const DEFAULT_SUBURBAN: f64 = 50.0;
    pub const DEFAULT_URBAN: f64 = 200.0;

    pub fn new(rural: f64, suburban: f64, urban: f64) -> Self {
        Self { rural, suburban, urban }
    }

    /// Check that every cut point is a finite number.
    ///
    /// Cut points need not be ascending; see [`AreaClass::from_cut_points`].
    pub fn validate(&self) -> Result<()> {
        for (name, value) in
            [("rural", self.rural), ("suburban", self.suburban), ("urban", self.urban)]
        {
            if !value.is_finite() {
                return Err(SiteError::invalid_parameter(
                    name,
                    format!("threshold must be a finite number, got {value}"),
                ));
            }
        }

        Ok(())
    }

    pub fn classify(&self, density: f64) -> AreaClass {
        AreaClass::from_cut_points(density, self.rural, self.suburban, self.urban)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RURAL, Self::DEFAULT_SUBURBAN, Self::DEFAULT_URBAN)
    }
}

/// Partial threshold map; unset keys keep their defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub rural: Option<f64>,
    #[serde(default)]
    pub suburban: Option<f64>,
    #[serde(default)]
    pub urban: Option<f64>,
}

impl ThresholdOverrides {
    pub fn is_empty(&self) -> bool {
        self.rural.is_none() && self.suburban.is_none() && self.urban.is_none()
    }

    /// Apply the supplied keys on top of the default cut points
    pub fn resolve(&self) -> Thresholds {
        self.apply_to(Thresholds::default())
    }

    /// Apply the supplied keys on top of `base`
    pub fn apply_to(&self, base: Thresholds) -> Thresholds {
        Thresholds {
            rural: self.rural.unwrap_or(base.rural),
            suburban: self.suburban.unwrap_or(base.suburban),
            urban: self.urban.unwrap_or(base.urban),
        }
    }
}

impl From<Thresholds> for ThresholdOverrides {
    fn from(thresholds: Thresholds) -> Self {
        Self {
            rural: Some(thresholds.rural),
            suburban: Some(thresholds.suburban),
            urban: Some(thresholds.urban),
        }
    }
}
