// src/models/location.rs
// DOCUMENTATION: Location input and coordinate types
// PURPOSE: Flexible search origin (address or coordinates) with validation

use crate::errors::SearchError;
use serde::{Deserialize, Serialize};

/// Flexible location input - either an address string OR a coordinate pair.
/// Exactly one form is authoritative; providing neither (or both) is rejected
/// before any dispatch happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Street address or place name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Latitude (-90 to 90)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    /// Longitude (-180 to 180)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Location {
    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            lat: None,
            lng: None,
        }
    }

    pub fn from_coordinates(lat: f64, lng: f64) -> Self {
        Self {
            address: None,
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// Returns the coordinate pair if this location was given as coordinates
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    /// Check the address-XOR-coordinates invariant and coordinate ranges
    pub fn check_form(&self) -> Result<(), SearchError> {
        let has_address = self.address.as_deref().map_or(false, |a| !a.trim().is_empty());
        let has_coords = self.lat.is_some() && self.lng.is_some();

        if !has_address && !has_coords {
            return Err(SearchError::ValidationError(
                "Must provide either 'address' or both 'lat' and 'lng'".to_string(),
            ));
        }

        if has_address && (self.lat.is_some() || self.lng.is_some()) {
            return Err(SearchError::ValidationError(
                "Provide either 'address' OR coordinates, not both".to_string(),
            ));
        }

        if let Some(coords) = self.coordinates() {
            coords.check_bounds()?;
        }

        Ok(())
    }
}

/// A resolved latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn check_bounds(&self) -> Result<(), SearchError> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lng) {
            return Err(SearchError::ValidationError(
                "Invalid coordinates (lat must be -90 to 90, lng must be -180 to 180)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_only_is_valid() {
        let loc = Location::from_address("1600 Amphitheatre Parkway, Mountain View, CA");
        assert!(loc.check_form().is_ok());
        assert!(loc.coordinates().is_none());
    }

    #[test]
    fn test_coordinates_only_is_valid() {
        let loc = Location::from_coordinates(37.4220, -122.0841);
        assert!(loc.check_form().is_ok());
        assert_eq!(loc.coordinates(), Some(Coordinates::new(37.4220, -122.0841)));
    }

    #[test]
    fn test_empty_location_rejected() {
        let loc = Location {
            address: None,
            lat: None,
            lng: None,
        };
        assert!(loc.check_form().is_err());
    }

    #[test]
    fn test_both_forms_rejected() {
        let loc = Location {
            address: Some("Madrid".to_string()),
            lat: Some(40.4168),
            lng: Some(-3.7038),
        };
        assert!(loc.check_form().is_err());
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let loc = Location::from_coordinates(91.0, 0.0);
        assert!(loc.check_form().is_err());

        let loc = Location::from_coordinates(0.0, -181.0);
        assert!(loc.check_form().is_err());
    }

    #[test]
    fn test_blank_address_rejected() {
        let loc = Location::from_address("   ");
        assert!(loc.check_form().is_err());
    }
}
