// src/services/google_client.rs
// DOCUMENTATION: Google Maps API client
// PURPOSE: Raw upstream calls for geocoding, nearby search, and distance matrix

use crate::errors::SearchError;
use crate::models::{DistancePairResult, GeocodedAddress, PlaceResult, TravelMode};
use crate::services::geo::haversine_distance;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Seam between the dispatch engine and the upstream provider.
///
/// Calls here are raw: no caching and no rate limiting. The dispatcher composes
/// both explicitly around every call, so the ordering (cache check before
/// permit acquisition) stays a testable contract.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Resolve an address to coordinates
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, SearchError>;

    /// Resolve coordinates to the most specific known address
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<GeocodedAddress, SearchError>;

    /// Find places of one type around a point, nearest first.
    /// Always returns the full provider page (up to 20 results); callers
    /// truncate to their own cap.
    async fn nearby_search(
        &self,
        lat: f64,
        lng: f64,
        place_type: &str,
        radius_meters: u32,
    ) -> Result<Vec<PlaceResult>, SearchError>;

    /// Distances and travel times for every origin-destination pair
    async fn distance_matrix(
        &self,
        origins: &[String],
        destinations: &[String],
        mode: TravelMode,
    ) -> Result<Vec<DistancePairResult>, SearchError>;
}

const GEOCODING_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DISTANCE_MATRIX_API_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";
const PLACES_API_URL: &str = "https://places.googleapis.com/v1/places:searchNearby";

/// Field mask for the Places API (New); only these attributes are billed and returned
const PLACES_FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location,places.rating,places.userRatingCount,places.nationalPhoneNumber,places.websiteUri,places.priceLevel,places.currentOpeningHours,places.types,places.id";

/// Google Maps API client
/// DOCUMENTATION: Uses the Places API (New) for nearby search and the legacy
/// endpoints for geocoding and distance matrix
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
}

// --- Geocoding API response shapes ---

#[derive(Debug, Deserialize)]
struct GeocodeApiResponse {
    results: Vec<GeocodeEntry>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    geometry: GeocodeGeometry,
    formatted_address: String,
    place_id: Option<String>,
    address_components: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

// --- Places API (New) response shapes ---

#[derive(Debug, Deserialize)]
struct SearchNearbyApiResponse {
    #[serde(default)]
    places: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
    id: Option<String>,
    display_name: Option<DisplayName>,
    location: Option<RawLatLng>,
    formatted_address: Option<String>,
    rating: Option<f32>,
    user_rating_count: Option<i64>,
    national_phone_number: Option<String>,
    website_uri: Option<String>,
    price_level: Option<String>,
    current_opening_hours: Option<serde_json::Value>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DisplayName {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    latitude: f64,
    longitude: f64,
}

// --- Distance Matrix API response shapes ---

#[derive(Debug, Deserialize)]
struct DistanceMatrixApiResponse {
    rows: Vec<DistanceMatrixRow>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<ValueField>,
    duration: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: i64,
}

/// Map the Places API (New) price level string to the legacy 0-4 scale
pub(crate) fn map_price_level(price_level: Option<&str>) -> Option<i32> {
    match price_level? {
        "PRICE_LEVEL_FREE" => Some(0),
        "PRICE_LEVEL_INEXPENSIVE" => Some(1),
        "PRICE_LEVEL_MODERATE" => Some(2),
        "PRICE_LEVEL_EXPENSIVE" => Some(3),
        "PRICE_LEVEL_VERY_EXPENSIVE" => Some(4),
        _ => None,
    }
}

impl GoogleMapsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Shared handling for the geocoding endpoint (forward and reverse)
    async fn call_geocoding_api(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<GeocodeEntry>, SearchError> {
        let response = self
            .client
            .get(GEOCODING_API_URL)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                log::error!("Geocoding API request failed: {}", e);
                SearchError::GeocodingError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(SearchError::GeocodingError(format!(
                "HTTP error {}",
                status
            )));
        }

        let api_response: GeocodeApiResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse geocoding response: {}", e);
            SearchError::GeocodingError(format!("Parse error: {}", e))
        })?;

        match api_response.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(api_response.results),
            "OVER_QUERY_LIMIT" => {
                log::error!("Geocoding API quota exceeded");
                Err(SearchError::RateLimitExceeded)
            }
            other => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unknown status: {}", other));
                log::error!("Geocoding API error: {}", msg);
                Err(SearchError::GeocodingError(msg))
            }
        }
    }
}

#[async_trait]
impl ProviderGateway for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, SearchError> {
        log::debug!("Geocoding address: {}", address);

        let results = self
            .call_geocoding_api(&[("address", address.to_string())])
            .await?;

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::AddressNotFound(address.to_string()))?;

        Ok(GeocodedAddress {
            lat: first.geometry.location.lat,
            lng: first.geometry.location.lng,
            formatted_address: first.formatted_address,
            place_id: first.place_id,
            address_components: None,
        })
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<GeocodedAddress, SearchError> {
        log::debug!("Reverse geocoding: ({}, {})", lat, lng);

        let results = self
            .call_geocoding_api(&[("latlng", format!("{},{}", lat, lng))])
            .await?;

        // First result is the most specific one
        let first = results
            .into_iter()
            .next()
            .ok_or(SearchError::CoordinatesNotFound(lat, lng))?;

        Ok(GeocodedAddress {
            lat,
            lng,
            formatted_address: first.formatted_address,
            place_id: first.place_id,
            address_components: first.address_components,
        })
    }

    async fn nearby_search(
        &self,
        lat: f64,
        lng: f64,
        place_type: &str,
        radius_meters: u32,
    ) -> Result<Vec<PlaceResult>, SearchError> {
        log::debug!(
            "Nearby search: lat={}, lng={}, type={}, radius={}",
            lat,
            lng,
            place_type,
            radius_meters
        );

        let request_body = json!({
            "includedTypes": [place_type],
            "maxResultCount": 20,
            "locationRestriction": {
                "circle": {
                    "center": { "latitude": lat, "longitude": lng },
                    "radius": radius_meters as f64
                }
            },
            "rankPreference": "DISTANCE"
        });

        let response = self
            .client
            .post(PLACES_API_URL)
            .header("Content-Type", "application/json")
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", PLACES_FIELD_MASK)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Places API request failed: {}", e);
                SearchError::PlacesApiError(format!("Request failed for {}: {}", place_type, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Places API error {}: {}", status, body);
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SearchError::RateLimitExceeded);
            }
            return Err(SearchError::PlacesApiError(format!(
                "API error {} for {}: {}",
                status, place_type, body
            )));
        }

        let api_response: SearchNearbyApiResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Places API response: {}", e);
            SearchError::PlacesApiError(format!("Parse error: {}", e))
        })?;

        let mut places: Vec<PlaceResult> = api_response
            .places
            .into_iter()
            .filter_map(|raw| {
                let location = raw.location?;
                let distance =
                    haversine_distance(lat, lng, location.latitude, location.longitude);

                Some(PlaceResult {
                    name: raw
                        .display_name
                        .and_then(|n| n.text)
                        .unwrap_or_else(|| "Unknown".to_string()),
                    // "places/" prefix is an API artifact
                    place_id: raw
                        .id
                        .unwrap_or_default()
                        .trim_start_matches("places/")
                        .to_string(),
                    distance_meters: Some(distance),
                    rating: raw.rating,
                    user_ratings_total: raw.user_rating_count,
                    address: raw.formatted_address,
                    phone_number: raw.national_phone_number,
                    website: raw.website_uri,
                    price_level: map_price_level(raw.price_level.as_deref()),
                    opening_hours: raw.current_opening_hours,
                    types: if raw.types.is_empty() {
                        None
                    } else {
                        Some(raw.types)
                    },
                })
            })
            .collect();

        // The API already ranks by distance; the stable sort keeps provider
        // order for ties while guaranteeing a non-decreasing sequence
        places.sort_by(|a, b| {
            a.distance_meters
                .partial_cmp(&b.distance_meters)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        log::info!(
            "Nearby search for '{}' returned {} places",
            place_type,
            places.len()
        );

        Ok(places)
    }

    async fn distance_matrix(
        &self,
        origins: &[String],
        destinations: &[String],
        mode: TravelMode,
    ) -> Result<Vec<DistancePairResult>, SearchError> {
        log::debug!(
            "Distance matrix: {} origins x {} destinations, mode={}",
            origins.len(),
            destinations.len(),
            mode.as_str()
        );

        let params = [
            ("origins", origins.join("|")),
            ("destinations", destinations.join("|")),
            ("mode", mode.as_str().to_string()),
            ("key", self.api_key.clone()),
        ];

        let response = self
            .client
            .get(DISTANCE_MATRIX_API_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Distance Matrix API request failed: {}", e);
                SearchError::DistanceMatrixError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(SearchError::DistanceMatrixError(format!(
                "HTTP error {}",
                response.status()
            )));
        }

        let api_response: DistanceMatrixApiResponse = response.json().await.map_err(|e| {
            SearchError::DistanceMatrixError(format!("Parse error: {}", e))
        })?;

        match api_response.status.as_str() {
            "OK" => {}
            "OVER_QUERY_LIMIT" => return Err(SearchError::RateLimitExceeded),
            other => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unknown status: {}", other));
                return Err(SearchError::DistanceMatrixError(msg));
            }
        }

        let mut pairs = Vec::new();
        for (i, row) in api_response.rows.iter().enumerate() {
            let origin = origins.get(i).cloned().unwrap_or_else(|| "Unknown".to_string());

            for (j, element) in row.elements.iter().enumerate() {
                let destination = destinations
                    .get(j)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());

                let (distance_meters, duration_seconds) = if element.status == "OK" {
                    (
                        element.distance.as_ref().map(|d| d.value),
                        element.duration.as_ref().map(|d| d.value),
                    )
                } else {
                    (None, None)
                };

                pairs.push(DistancePairResult {
                    origin: origin.clone(),
                    destination,
                    distance_meters,
                    duration_seconds,
                    status: element.status.clone(),
                });
            }
        }

        Ok(pairs)
    }
}
