use serde::{Deserialize, Serialize};

use super::classification::AreaClass;

/// A validated, geolocated site
///
/// Sites are read-only once they leave the validator; the pipeline derives
/// new values by row position and never rewrites these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Site identifier (expected to be unique, not enforced)
    pub site_id: String,

    /// Latitude in degrees, within [-90, 90]
    pub lat: f64,

    /// Longitude in degrees, within [-180, 180]
    pub lon: f64,

    /// Externally assigned partition key used by quantile classification
    pub cluster_id: String,

    /// Values of non-required input columns, in input column order
    #[serde(default)]
    pub extra: Vec<String>,
}

impl Site {
    /// Create a site without pass-through columns
    pub fn new(
        site_id: impl Into<String>,
        lat: f64,
        lon: f64,
        cluster_id: impl Into<String>,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            lat,
            lon,
            cluster_id: cluster_id.into(),
            extra: Vec::new(),
        }
    }

    /// Attach pass-through column values
    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }

    /// Coordinates as `[lat, lon]` in degrees
    pub fn coordinates(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// A site plus the three derived signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSite {
    #[serde(flatten)]
    pub site: Site,

    /// Neighbors per km² within the density radius
    pub density: f64,

    /// Stable identifier of the co-location group
    pub group_id: String,

    /// Number of sites in the co-location group
    pub group_size: usize,

    pub area_class: AreaClass,
}
