//! Density to area class, by per-cluster quartiles or fixed cut points.

use sitescope_core::models::{AreaClass, ClassificationMode, Thresholds};
use sitescope_core::{Result, SiteError};
use std::collections::HashMap;

/// Quantile of an ascending slice by linear interpolation.
///
/// Uses `pos = q · (n - 1)` and interpolates between the neighboring ranks.
/// Returns `None` for an empty slice; `q` is clamped to `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Quartile cut points of one cluster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileCuts {
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

impl QuantileCuts {
    /// Quartiles of an ascending slice, or `None` if it is empty
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        Some(Self {
            q25: quantile(sorted, 0.25)?,
            q50: quantile(sorted, 0.50)?,
            q75: quantile(sorted, 0.75)?,
        })
    }

    pub fn classify(&self, value: f64) -> AreaClass {
        AreaClass::from_cut_points(value, self.q25, self.q50, self.q75)
    }
}

/// Classify each density against the quartiles of its own cluster.
///
/// Clusters are compared by exact `cluster_id` and never influence each
/// other. A cluster with a single site is Rural. Tied densities at a quartile
/// collapse neighboring bands, so a cluster of equal values is all Rural.
pub fn classify_quantile<S: AsRef<str>>(densities: &[f64], cluster_ids: &[S]) -> Vec<AreaClass> {
    let mut clusters: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, cluster_id) in cluster_ids.iter().enumerate().take(densities.len()) {
        clusters.entry(cluster_id.as_ref()).or_default().push(i);
    }

    let mut classes = vec![AreaClass::Rural; densities.len()];
    for members in clusters.into_values().filter(|members| members.len() > 1) {
        let mut values: Vec<f64> = members.iter().map(|&i| densities[i]).collect();
        values.sort_by(f64::total_cmp);

        if let Some(cuts) = QuantileCuts::from_sorted(&values) {
            for i in members {
                classes[i] = cuts.classify(densities[i]);
            }
        }
    }

    classes
}

/// Classify each density against global cut points
pub fn classify_threshold(densities: &[f64], thresholds: &Thresholds) -> Vec<AreaClass> {
    densities.iter().map(|&density| thresholds.classify(density)).collect()
}

/// Classify densities with the given mode.
///
/// `cluster_ids` is only consulted in quantile mode and `thresholds` only in
/// threshold mode, but both must line up with `densities`.
pub fn classify<S: AsRef<str>>(
    mode: ClassificationMode,
    densities: &[f64],
    cluster_ids: &[S],
    thresholds: &Thresholds,
) -> Result<Vec<AreaClass>> {
    if densities.len() != cluster_ids.len() {
        return Err(SiteError::invalid_parameter(
            "cluster_ids",
            format!("expected {} ids, got {}", densities.len(), cluster_ids.len()),
        ));
    }

    let classes = match mode {
        ClassificationMode::Quantile => classify_quantile(densities, cluster_ids),
        ClassificationMode::Threshold => {
            thresholds.validate()?;
            classify_threshold(densities, thresholds)
        }
    };

    Ok(classes)
}
