//! Geographic coordinates and great-circle distance.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in WGS84 degrees.
///
/// Valid latitudes are `-90.0..=90.0` and longitudes `-180.0..=180.0`;
/// distances computed from out-of-range values are unspecified.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// Haversine distance to the other point, in kilometers.
    #[must_use]
    pub fn distance_km(self, other: Self) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KATHMANDU: GeoLocation = GeoLocation { latitude: 27.7172, longitude: 85.3240 };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(KATHMANDU.distance_km(KATHMANDU), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let pokhara = GeoLocation::builder().latitude(28.2096).longitude(83.9856).build();
        assert_eq!(KATHMANDU.distance_km(pokhara), pokhara.distance_km(KATHMANDU));
    }

    #[test]
    fn small_offset_distance_ok() {
        // A 0.01° latitude offset is a bit over a kilometer anywhere on the globe.
        let nearby = GeoLocation::builder()
            .latitude(KATHMANDU.latitude + 0.01)
            .longitude(KATHMANDU.longitude)
            .build();
        let distance = KATHMANDU.distance_km(nearby);
        assert!((1.1..=1.3).contains(&distance), "unexpected distance: {distance}");
    }

    #[test]
    fn kathmandu_to_pokhara_ok() {
        let pokhara = GeoLocation::builder().latitude(28.2096).longitude(83.9856).build();
        let distance = KATHMANDU.distance_km(pokhara);
        assert!((140.0..=150.0).contains(&distance), "unexpected distance: {distance}");
    }
}
