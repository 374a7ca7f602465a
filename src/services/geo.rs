// src/services/geo.rs
// DOCUMENTATION: Geographic math helpers
// PURPOSE: Distance calculation between coordinates

/// Earth's mean radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates (Haversine), in meters
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert!(haversine_distance(40.4168, -3.7038, 40.4168, -3.7038) < 1e-6);
    }

    #[test]
    fn test_known_distance_madrid_barcelona() {
        // Madrid to Barcelona is roughly 505 km as the crow flies
        let d = haversine_distance(40.4168, -3.7038, 41.3874, 2.1686);
        assert!(d > 490_000.0 && d < 520_000.0, "got {}", d);
    }

    #[test]
    fn test_short_distance() {
        // ~111 meters per 0.001 degrees of latitude
        let d = haversine_distance(40.0, -3.0, 40.001, -3.0);
        assert!((d - 111.2).abs() < 1.0, "got {}", d);
    }
}
