//! Neighbor density per site.

use sitescope_geo::SpatialIndex;
use std::f64::consts::PI;

/// Neighbors per km² within `radius_km` of every indexed site.
///
/// `density = (sites within radius - 1) / (π · radius_km²)`, the site itself
/// excluded. The circle area is not corrected for sites near the edge of the
/// data. Tables of zero or one site, and non-positive radii, give all zeros.
pub fn compute_density(index: &SpatialIndex, radius_km: f64) -> Vec<f64> {
    if index.len() <= 1 || radius_km.is_nan() || radius_km <= 0.0 {
        return vec![0.0; index.len()];
    }

    let area = PI * radius_km * radius_km;
    index
        .count_radius(radius_km)
        .into_iter()
        .map(|count| count.saturating_sub(1) as f64 / area)
        .collect()
}
