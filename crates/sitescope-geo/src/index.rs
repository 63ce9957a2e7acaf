use crate::distance::{haversine_points_km, km_to_radians};
use geo::Point;
use rayon::prelude::*;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use sitescope_core::validation::coordinates_in_range;
use sitescope_core::{Result, SiteError};
use std::f64::consts::PI;

/// Slack on the unit-sphere chord bound so boundary points survive rounding
const CHORD_EPSILON: f64 = 1e-9;

/// Indexed site position with its row index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    /// Row index of the site in the table the index was built from
    pub id: usize,

    /// Geographic position (x = lon, y = lat, degrees)
    pub point: Point<f64>,

    /// Position on the unit sphere, used by the tree
    position: [f64; 3],
}

impl IndexedPoint {
    /// Create a new indexed point
    pub fn new(id: usize, point: Point<f64>) -> Self {
        Self { id, point, position: unit_vector(point) }
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        self.position.iter().zip(point).map(|(a, b)| (a - b) * (a - b)).sum()
    }
}

/// Embed a lon/lat point on the unit sphere
fn unit_vector(point: Point<f64>) -> [f64; 3] {
    let lat = point.y().to_radians();
    let lon = point.x().to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Straight-line distance through the unit sphere spanning `radius_km` of arc
fn chord_length(radius_km: f64) -> f64 {
    let angle = km_to_radians(radius_km);
    if angle >= PI {
        2.0
    } else {
        2.0 * (angle / 2.0).sin()
    }
}

/// Radius index over a fixed set of site coordinates
///
/// Points are stored on the unit sphere in an R*-tree. A great-circle radius
/// maps monotonically onto a chord length, so the tree narrows the candidates
/// and the exact haversine distance decides membership (boundary inclusive).
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
    points: Vec<Point<f64>>,
}

impl SpatialIndex {
    /// Build an index from `[lat, lon]` pairs in degrees
    ///
    /// Fails on the first coordinate that is non-finite or outside the WGS 84
    /// degree ranges.
    pub fn build(coordinates: &[[f64; 2]]) -> Result<Self> {
        let points = coordinates
            .iter()
            .enumerate()
            .map(|(index, &[lat, lon])| {
                if coordinates_in_range(lat, lon) {
                    Ok(Point::new(lon, lat))
                } else {
                    Err(SiteError::InvalidCoordinate { index, lat, lon })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let indexed: Vec<IndexedPoint> =
            points.iter().enumerate().map(|(id, point)| IndexedPoint::new(id, *point)).collect();

        tracing::debug!(points = points.len(), "Built spatial index");

        Ok(Self { tree: RTree::bulk_load(indexed), points })
    }

    /// Get the total number of points in the index
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of an indexed point
    pub fn point(&self, index: usize) -> Option<Point<f64>> {
        self.points.get(index).copied()
    }

    /// Indices within `radius_km` of each point, in point order
    ///
    /// Each list includes the point itself and is sorted ascending.
    pub fn query_radius(&self, radius_km: f64) -> Vec<Vec<usize>> {
        (0..self.len()).into_par_iter().map(|i| self.query_point(i, radius_km)).collect()
    }

    /// Number of points within `radius_km` of each point, self included
    pub fn count_radius(&self, radius_km: f64) -> Vec<usize> {
        (0..self.len()).into_par_iter().map(|i| self.count_point(i, radius_km)).collect()
    }

    /// Sorted indices within `radius_km` of the point at `index`
    pub fn query_point(&self, index: usize, radius_km: f64) -> Vec<usize> {
        let mut ids: Vec<usize> = self.within(index, radius_km).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of points within `radius_km` of the point at `index`
    pub fn count_point(&self, index: usize, radius_km: f64) -> usize {
        self.within(index, radius_km).count()
    }

    fn within(&self, index: usize, radius_km: f64) -> impl Iterator<Item = usize> + '_ {
        // NaN and negative radii match nothing
        let center = self.point(index).filter(|_| radius_km >= 0.0);

        center.into_iter().flat_map(move |center| {
            let bound = chord_length(radius_km) + CHORD_EPSILON;
            self.tree
                .locate_within_distance(unit_vector(center), bound * bound)
                .filter(move |candidate| haversine_points_km(center, candidate.point) <= radius_km)
                .map(|candidate| candidate.id)
        })
    }
}
