//! Coordinate module
//!
//! Provides the validated [`GeoPoint`] value type and great-circle distance
//! math used by the proximity resolver.

mod types;

pub use types::{CoordError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in kilometres used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the haversine great-circle distance between two positions.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First position in decimal degrees
/// * `lat2`, `lon2` - Second position in decimal degrees
///
/// # Returns
///
/// Distance in kilometres.
#[inline]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let point = GeoPoint::new(55.75, 37.60).unwrap();
        assert_eq!(point.latitude(), 55.75);
        assert_eq!(point.longitude(), 37.60);
    }

    #[test]
    fn test_range_limits_are_inclusive() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        let result = GeoPoint::new(90.5, 0.0);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = GeoPoint::new(0.0, -180.1);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<GeoPoint, _> =
            serde_json::from_str(r#"{"latitude": 48.85, "longitude": 2.35}"#);
        assert!(ok.is_ok());

        let bad: Result<GeoPoint, _> =
            serde_json::from_str(r#"{"latitude": 123.0, "longitude": 2.35}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_km(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_at_equator() {
        // 1° of longitude on the equator is 2πR/360 ≈ 111.19 km
        let d = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_haversine_moscow_to_saint_petersburg() {
        // Moscow (55.7558, 37.6173) to Saint Petersburg (59.9343, 30.3351) ≈ 634 km
        let d = haversine_km(55.7558, 37.6173, 59.9343, 30.3351);
        assert!((d - 634.0).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(51.5074, -0.1278).unwrap();
        let b = GeoPoint::new(40.7128, -74.0060).unwrap();
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }
}
