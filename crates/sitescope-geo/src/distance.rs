//! Great-circle distance on a spherical Earth

use geo::Point;

/// Mean Earth radius used for every distance in SiteScope, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two `(lat, lon)` pairs in degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlon = (lon2 - lon1).to_radians() / 2.0;

    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Haversine distance in kilometers between two `geo` points (x = lon, y = lat)
pub fn haversine_points_km(a: Point<f64>, b: Point<f64>) -> f64 {
    haversine_km(a.y(), a.x(), b.y(), b.x())
}

/// Convert a surface distance in kilometers to a central angle in radians
pub fn km_to_radians(km: f64) -> f64 {
    km / EARTH_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Distance, Haversine};

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_km(-8.0, 115.0, -8.0, 115.0), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 1° of arc on a 6371 km sphere
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        let distance = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((distance - expected).abs() < 1e-9, "got {}", distance);
    }

    #[test]
    fn test_paris_london() {
        let distance = haversine_km(48.8566, 2.3522, 51.5074, -0.1276);
        assert!(distance > 339.0 && distance < 349.0, "Paris-London distance {} should be ~344km", distance);
    }

    #[test]
    fn test_antipodal_points() {
        let distance = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert!((distance - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_matches_geo_haversine_within_radius_difference() {
        // geo uses the IUGG mean radius (6371.0088 km), so allow for the scale difference
        let a = Point::new(-74.0, 40.0);
        let b = Point::new(-75.0, 41.0);

        let ours = haversine_points_km(a, b);
        let theirs = Haversine.distance(a, b) / 1000.0;

        assert!((ours / theirs - EARTH_RADIUS_KM / 6371.0088).abs() < 1e-6);
    }

    #[test]
    fn test_km_to_radians() {
        assert_eq!(km_to_radians(EARTH_RADIUS_KM), 1.0);
        assert_eq!(km_to_radians(0.0), 0.0);
    }
}
