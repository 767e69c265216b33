use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean radius of the earth in meters, the same sphere the map widget measures on.
pub const EARTH_RADIUS_M: f64 = 6_371_000.;

/// A bare coordinate pair. Serializes as `{"lat": .., "lon": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The routing service speaks GeoJSON, where pairs are `[lon, lat]`.
    pub fn from_lon_lat([lon, lat]: [f64; 2]) -> Self {
        Self { lat, lon }
    }

    pub fn distance_to(&self, other: &LatLon) -> f64 {
        haversine_distance(*self, *other)
    }
}

/// A single fix reported by the location sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Result<Self, PositionError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(PositionError::InvalidCoordinate { latitude, longitude });
        }

        Ok(Self {
            latitude,
            longitude,
            timestamp,
        })
    }

    pub fn lat_lon(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        haversine_distance(self.lat_lon(), other.lat_lon())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("Your device does not support geolocation.")]
    Unsupported,
    #[error("Location permission was denied. Please enable location services.")]
    PermissionDenied,
    #[error("Could not get your location. Please ensure location services are enabled. ({0})")]
    Unavailable(String),
    #[error("Received an invalid location ({latitude}, {longitude}).")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

/// Great-circle distance in meters.
pub fn haversine_distance(p1: LatLon, p2: LatLon) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lon = (p2.lon - p1.lon).to_radians();
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    let c = 2. * f64::asin(f64::sqrt(a.min(1.)));

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_ten_thousandth_degree_of_latitude_is_about_eleven_meters() {
        let d = haversine_distance(LatLon::new(51.5, -0.09), LatLon::new(51.5001, -0.09));
        assert!((d - 11.12).abs() < 0.01, "{d}");
    }

    #[test]
    fn distance_is_symmetric_and_zero_for_same_point() {
        let a = LatLon::new(56.175188, 10.196123);
        let b = LatLon::new(40.664208, 44.873029);
        assert_eq!(a.distance_to(&a), 0.);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-6);
    }

    #[test]
    fn antipodal_points_are_half_the_circumference_apart() {
        let d = haversine_distance(LatLon::new(0., 0.), LatLon::new(0., 180.));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1e-3);
    }

    #[test]
    fn rejects_out_of_range_or_nan_coordinates() {
        let now = Utc::now();
        assert!(Position::new(91., 0., now).is_err());
        assert!(Position::new(0., -180.5, now).is_err());
        assert!(matches!(
            Position::new(f64::NAN, 0., now),
            Err(PositionError::InvalidCoordinate { .. })
        ));
        assert!(Position::new(-90., 180., now).is_ok());
    }

    #[test]
    fn lon_lat_pairs_are_swapped() {
        let p = LatLon::from_lon_lat([10.2, 56.1]);
        assert_eq!(p, LatLon::new(56.1, 10.2));
    }

    #[test]
    fn lat_lon_serializes_with_short_keys() {
        let json = serde_json::to_value(LatLon::new(1.5, 2.5)).unwrap();
        assert_eq!(json, serde_json::json!({"lat": 1.5, "lon": 2.5}));
    }
}
