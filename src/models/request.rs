// src/models/request.rs
// DOCUMENTATION: Request payloads for search endpoints
// PURPOSE: Normalize flexible wire input into canonical request types

use crate::models::Location;
use serde::Deserialize;
use validator::Validate;

/// Accepts either a single string or an array of strings.
/// Some clients send `"park"` where others send `["park", "cafe"]`; the core
/// only ever sees the canonical Vec form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    Single(String),
    List(Vec<String>),
}

impl StringOrList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::Single(s) => vec![s],
            StringOrList::List(list) => list,
        }
    }
}

/// Accepts either a single value or an array of values
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

fn default_radius() -> u32 {
    5000
}

fn default_max_results() -> usize {
    3
}

/// Wire payload for POST /search/batch
#[derive(Debug, Clone, Deserialize)]
pub struct BatchNearbySearchPayload {
    pub locations: Vec<Location>,
    pub feature_types: StringOrList,
    #[serde(default = "default_radius")]
    pub radius_meters: u32,
    #[serde(default = "default_max_results")]
    pub max_results_per_type: usize,
    #[serde(default)]
    pub include_fields: Option<StringOrList>,
}

/// Wire payload for POST /search/nearby
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearchPayload {
    pub location: Location,
    pub feature_types: StringOrList,
    #[serde(default = "default_radius")]
    pub radius_meters: u32,
    #[serde(default = "default_max_results")]
    pub max_results_per_type: usize,
    #[serde(default)]
    pub include_fields: Option<StringOrList>,
}

/// Canonical batch search request consumed by the dispatcher.
/// Feature types here have already passed vocabulary validation, with
/// category names expanded to their members, so the list may exceed the
/// requested-entry cap enforced at the handler boundary.
#[derive(Debug, Clone, Validate)]
pub struct BatchSearchRequest {
    #[validate(length(min = 1, max = 20, message = "1 to 20 locations required"))]
    pub locations: Vec<Location>,

    #[validate(length(min = 1, message = "at least one feature type required"))]
    pub feature_types: Vec<String>,

    #[validate(range(min = 100, max = 50000, message = "radius must be 100-50000 meters"))]
    pub radius_meters: u32,

    #[validate(range(min = 1, max = 10, message = "max_results_per_type must be 1-10"))]
    pub max_results_per_type: usize,

    pub include_fields: Option<Vec<String>>,
}

impl BatchSearchRequest {
    pub fn new(
        locations: Vec<Location>,
        feature_types: Vec<String>,
        radius_meters: u32,
        max_results_per_type: usize,
        include_fields: Option<Vec<String>>,
    ) -> Self {
        Self {
            locations,
            feature_types,
            radius_meters,
            max_results_per_type,
            include_fields,
        }
    }
}

/// Wire payload for POST /geocode
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodePayload {
    pub addresses: StringOrList,
    /// Include place_id in successful results
    #[serde(default)]
    pub include_components: bool,
}

/// One coordinate pair in a reverse geocoding payload.
/// Both fields optional so per-item validation can report missing values
/// instead of rejecting the whole request at the serde layer.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatePayload {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Wire payload for POST /geocode/reverse
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseGeocodePayload {
    pub coordinates: OneOrMany<CoordinatePayload>,
    /// Include place_id and address components in successful results
    #[serde(default)]
    pub include_components: bool,
}

/// Travel mode for distance matrix lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl Default for TravelMode {
    fn default() -> Self {
        TravelMode::Driving
    }
}

/// Wire payload for POST /distance-matrix
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DistanceMatrixPayload {
    #[validate(length(min = 1, max = 25, message = "1 to 25 origins required"))]
    pub origins: Vec<String>,

    #[validate(length(min = 1, max = 25, message = "1 to 25 destinations required"))]
    pub destinations: Vec<String>,

    #[serde(default)]
    pub mode: TravelMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_or_list_single() {
        let parsed: StringOrList = serde_json::from_str("\"park\"").unwrap();
        assert_eq!(parsed.into_vec(), vec!["park".to_string()]);
    }

    #[test]
    fn test_string_or_list_array() {
        let parsed: StringOrList = serde_json::from_str("[\"park\", \"cafe\"]").unwrap();
        assert_eq!(
            parsed.into_vec(),
            vec!["park".to_string(), "cafe".to_string()]
        );
    }

    #[test]
    fn test_batch_payload_defaults() {
        let payload: BatchNearbySearchPayload = serde_json::from_str(
            r#"{"locations": [{"lat": 40.0, "lng": -3.0}], "feature_types": "park"}"#,
        )
        .unwrap();

        assert_eq!(payload.radius_meters, 5000);
        assert_eq!(payload.max_results_per_type, 3);
        assert!(payload.include_fields.is_none());
    }

    #[test]
    fn test_travel_mode_parsing() {
        let mode: TravelMode = serde_json::from_str("\"walking\"").unwrap();
        assert_eq!(mode, TravelMode::Walking);
        assert_eq!(mode.as_str(), "walking");
    }

    #[test]
    fn test_single_coordinate_payload() {
        let payload: ReverseGeocodePayload =
            serde_json::from_str(r#"{"coordinates": {"lat": 40.4, "lng": -3.7}}"#).unwrap();
        assert_eq!(payload.coordinates.into_vec().len(), 1);
    }
}
