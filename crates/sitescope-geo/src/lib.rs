//! SiteScope Geo - Great-circle distance and radius queries
//!
//! This crate answers "which sites lie within r km of this one" for whole
//! tables at once, backed by an R*-tree over points on the unit sphere.

pub mod distance;
pub mod index;

pub use distance::{haversine_km, km_to_radians, EARTH_RADIUS_KM};
pub use index::SpatialIndex;
