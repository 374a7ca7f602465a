// src/models/place.rs
// DOCUMENTATION: Place results, per-location results, and batch summary
// PURPOSE: Output structures produced by the dispatch engine

use crate::models::{Coordinates, Location};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single place returned by a nearby search.
///
/// Name, place_id and distance are always present; the optional attributes are
/// only serialized when populated (see `project`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    pub place_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

/// Optional field names accepted in `include_fields`
pub const AVAILABLE_FIELDS: &[&str] = &[
    "rating",
    "user_ratings_total",
    "address",
    "phone_number",
    "website",
    "price_level",
    "opening_hours",
    "types",
];

impl PlaceResult {
    /// Keep only the requested optional attributes.
    /// With no `include_fields` the minimal form (name, place_id, distance) remains.
    pub fn project(&self, include_fields: Option<&[String]>) -> PlaceResult {
        let mut projected = PlaceResult {
            name: self.name.clone(),
            place_id: self.place_id.clone(),
            distance_meters: self.distance_meters,
            rating: None,
            user_ratings_total: None,
            address: None,
            phone_number: None,
            website: None,
            price_level: None,
            opening_hours: None,
            types: None,
        };

        let fields = match include_fields {
            Some(fields) => fields,
            None => return projected,
        };

        for field in fields {
            match field.as_str() {
                "rating" => projected.rating = self.rating,
                "user_ratings_total" => projected.user_ratings_total = self.user_ratings_total,
                "address" => projected.address = self.address.clone(),
                "phone_number" => projected.phone_number = self.phone_number.clone(),
                "website" => projected.website = self.website.clone(),
                "price_level" => projected.price_level = self.price_level,
                "opening_hours" => projected.opening_hours = self.opening_hours.clone(),
                "types" => projected.types = self.types.clone(),
                _ => {}
            }
        }

        projected
    }
}

/// Per-location search status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Success,
    Partial,
    Error,
}

/// Results for a single location in a batch search
#[derive(Debug, Clone, Serialize)]
pub struct LocationSearchResult {
    /// Index in the original locations list
    pub location_index: usize,
    /// Original location query
    pub location: Location,
    /// Resolved coordinates, absent when geocoding failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Results grouped by feature type, nearest first
    pub features: BTreeMap<String, Vec<PlaceResult>>,
    pub status: SearchStatus,
    /// Per-category error messages ("type: reason"), empty on full success
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Summary statistics for a batch search operation.
/// Always recomputed from the final per-location results, never maintained
/// incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSearchSummary {
    pub total_locations: usize,
    pub successful: usize,
    pub partial: usize,
    pub failed: usize,
    pub total_places_found: usize,
}

/// Complete response for a batch nearby search
#[derive(Debug, Clone, Serialize)]
pub struct BatchSearchResponse {
    pub results: Vec<LocationSearchResult>,
    pub summary: BatchSearchSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Response for a single-location nearby search
#[derive(Debug, Clone, Serialize)]
pub struct NearbySearchResponse {
    pub location: Coordinates,
    pub features: BTreeMap<String, Vec<PlaceResult>>,
    pub summary: NearbySearchSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbySearchSummary {
    pub total_feature_types: usize,
    pub total_places_found: usize,
    pub radius_meters: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_place() -> PlaceResult {
        PlaceResult {
            name: "Retiro Park".to_string(),
            place_id: "ChIJ123".to_string(),
            distance_meters: Some(420.0),
            rating: Some(4.7),
            user_ratings_total: Some(180000),
            address: Some("Plaza de la Independencia 7, Madrid".to_string()),
            phone_number: Some("+34 914 00 87 40".to_string()),
            website: Some("https://example.com".to_string()),
            price_level: Some(0),
            opening_hours: None,
            types: Some(vec!["park".to_string()]),
        }
    }

    #[test]
    fn test_project_minimal_by_default() {
        let place = sample_place();
        let projected = place.project(None);

        assert_eq!(projected.name, "Retiro Park");
        assert_eq!(projected.place_id, "ChIJ123");
        assert_eq!(projected.distance_meters, Some(420.0));
        assert!(projected.rating.is_none());
        assert!(projected.address.is_none());
        assert!(projected.types.is_none());
    }

    #[test]
    fn test_project_requested_fields() {
        let place = sample_place();
        let fields = vec!["rating".to_string(), "address".to_string()];
        let projected = place.project(Some(&fields));

        assert_eq!(projected.rating, Some(4.7));
        assert!(projected.address.is_some());
        assert!(projected.website.is_none());
        assert!(projected.phone_number.is_none());
    }

    #[test]
    fn test_project_ignores_unknown_fields() {
        let place = sample_place();
        let fields = vec!["photos".to_string()];
        let projected = place.project(Some(&fields));

        assert!(projected.rating.is_none());
        assert_eq!(projected.name, place.name);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SearchStatus::Partial).unwrap(),
            "\"partial\""
        );
    }
}
