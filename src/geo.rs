//! Geographic coordinates and the flat-earth offset used for neighbour sampling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kilometres per degree of latitude in the equirectangular approximation.
pub const KM_PER_DEGREE: f64 = 111.32;

// Keeps the longitude scale finite at the poles.
const MIN_LONGITUDE_SCALE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, clamping latitude to [-90, 90] and wrapping
    /// longitude into [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: wrap_longitude(longitude),
        }
    }

    /// Moves `distance_km` along `bearing_rad` (0 = north, π/2 = east).
    pub fn offset(&self, distance_km: f64, bearing_rad: f64) -> Coordinate {
        let dlat = distance_km / KM_PER_DEGREE * bearing_rad.cos();
        let dlon = distance_km / (KM_PER_DEGREE * self.longitude_scale()) * bearing_rad.sin();
        Coordinate::new(self.latitude + dlat, self.longitude + dlon)
    }

    /// Approximate ground distance using the same projection as [`offset`].
    ///
    /// [`offset`]: Coordinate::offset
    pub fn approx_distance_km(&self, other: &Coordinate) -> f64 {
        let dlat = (other.latitude - self.latitude) * KM_PER_DEGREE;
        let mut dlon_deg = other.longitude - self.longitude;
        if dlon_deg > 180.0 {
            dlon_deg -= 360.0;
        } else if dlon_deg < -180.0 {
            dlon_deg += 360.0;
        }
        let dlon = dlon_deg * KM_PER_DEGREE * self.longitude_scale();
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Stable textual key used for seeding, six decimal places per axis.
    pub fn seed_key(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }

    fn longitude_scale(&self) -> f64 {
        self.latitude.to_radians().cos().max(MIN_LONGITUDE_SCALE)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_is_clamped() {
        assert_eq!(Coordinate::new(95.0, 0.0).latitude, 90.0);
        assert_eq!(Coordinate::new(-120.0, 0.0).latitude, -90.0);
    }

    #[test]
    fn longitude_wraps() {
        let c = Coordinate::new(0.0, 190.0);
        assert!((c.longitude - -170.0).abs() < 1e-9);
        let c = Coordinate::new(0.0, -540.0);
        assert!((c.longitude - -180.0).abs() < 1e-9);
        assert_eq!(Coordinate::new(0.0, 180.0).longitude, 180.0);
    }

    #[test]
    fn offset_round_trips_distance() {
        let origin = Coordinate::new(4.711, -74.072);
        for bearing in [0.0, 1.0, 2.5, 4.0, 6.0] {
            let moved = origin.offset(3.0, bearing);
            let d = origin.approx_distance_km(&moved);
            assert!((d - 3.0).abs() < 1e-6, "bearing {bearing}: {d}");
        }
    }

    #[test]
    fn seed_key_uses_six_decimals() {
        assert_eq!(Coordinate::new(4.711, -74.072).seed_key(), "4.711000,-74.072000");
    }
}
