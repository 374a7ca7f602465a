// src/models/geocode.rs
// DOCUMENTATION: Geocoding and distance matrix result types
// PURPOSE: Cached geocoding values and per-item geocoding/distance outcomes

use serde::{Deserialize, Serialize};

/// A geocoded address: the value stored in the geocoding cache.
/// Used for both forward (address -> coords) and reverse (coords -> address)
/// lookups, which share the same cache tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_components: Option<serde_json::Value>,
}

/// Outcome for one address in a batch geocode request
#[derive(Debug, Clone, Serialize)]
pub struct GeocodeResult {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome for one coordinate pair in a reverse geocode request
#[derive(Debug, Clone, Serialize)]
pub struct ReverseGeocodeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_components: Option<serde_json::Value>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary for batch geocoding responses
#[derive(Debug, Clone, Serialize)]
pub struct GeocodeSummary {
    pub total_addresses: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeocodeResponse {
    pub results: Vec<GeocodeResult>,
    pub summary: GeocodeSummary,
}

/// Summary for reverse geocoding responses
#[derive(Debug, Clone, Serialize)]
pub struct ReverseGeocodeSummary {
    pub total_coordinates: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReverseGeocodeResponse {
    pub results: Vec<ReverseGeocodeResult>,
    pub summary: ReverseGeocodeSummary,
}

/// Result for a single origin-destination pair in a distance matrix
#[derive(Debug, Clone, Serialize)]
pub struct DistancePairResult {
    pub origin: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
    /// Status from the provider: OK, NOT_FOUND, ZERO_RESULTS, ...
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistanceMatrixSummary {
    pub total_pairs: usize,
    pub mode: String,
    pub api_calls: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistanceMatrixResponse {
    pub results: Vec<DistancePairResult>,
    pub summary: DistanceMatrixSummary,
}
