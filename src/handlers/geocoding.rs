// src/handlers/geocoding.rs
// DOCUMENTATION: HTTP handlers for geocoding and distance matrix
// PURPOSE: Batch address/coordinate conversion and travel distance lookups

use crate::errors::SearchError;
use crate::models::{
    DistanceMatrixPayload, DistanceMatrixResponse, DistanceMatrixSummary, GeocodePayload,
    GeocodeResponse, GeocodeResult, GeocodeSummary, ReverseGeocodePayload, ReverseGeocodeResponse,
    ReverseGeocodeResult, ReverseGeocodeSummary,
};
use crate::services::BatchDispatcher;
use actix_web::{web, HttpResponse, Responder};
use futures::future::join_all;
use validator::Validate;

/// POST /geocode
/// Convert one or more addresses to coordinates (forward geocoding)
pub async fn geocode(
    dispatcher: web::Data<BatchDispatcher>,
    payload: web::Json<GeocodePayload>,
) -> Result<impl Responder, SearchError> {
    let payload = payload.into_inner();
    let addresses = payload.addresses.into_vec();

    if addresses.is_empty() {
        return Err(SearchError::ValidationError(
            "At least one address required".to_string(),
        ));
    }

    let geocoded = join_all(
        addresses
            .iter()
            .map(|address| dispatcher.geocode_address(address)),
    )
    .await;

    let mut results = Vec::with_capacity(addresses.len());
    let mut successful = 0;
    let mut failed = 0;

    for (address, outcome) in addresses.iter().zip(geocoded) {
        match outcome {
            Ok(entry) => {
                successful += 1;
                results.push(GeocodeResult {
                    address: address.clone(),
                    formatted_address: Some(entry.formatted_address),
                    lat: Some(entry.lat),
                    lng: Some(entry.lng),
                    place_id: if payload.include_components {
                        entry.place_id
                    } else {
                        None
                    },
                    status: "success".to_string(),
                    error: None,
                });
            }
            Err(e) => {
                failed += 1;
                results.push(GeocodeResult {
                    address: address.clone(),
                    formatted_address: None,
                    lat: None,
                    lng: None,
                    place_id: None,
                    status: "error".to_string(),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(HttpResponse::Ok().json(GeocodeResponse {
        results,
        summary: GeocodeSummary {
            total_addresses: addresses.len(),
            successful,
            failed,
        },
    }))
}

/// POST /geocode/reverse
/// Convert one or more coordinate pairs to addresses (reverse geocoding)
pub async fn reverse_geocode(
    dispatcher: web::Data<BatchDispatcher>,
    payload: web::Json<ReverseGeocodePayload>,
) -> Result<impl Responder, SearchError> {
    let payload = payload.into_inner();
    let coordinates = payload.coordinates.into_vec();

    if coordinates.is_empty() {
        return Err(SearchError::ValidationError(
            "At least one coordinate pair required".to_string(),
        ));
    }

    // Per-item validation: bad coordinates become error entries instead of
    // failing the whole request
    let mut slots: Vec<Option<ReverseGeocodeResult>> =
        (0..coordinates.len()).map(|_| None).collect();
    let mut pending: Vec<(usize, f64, f64)> = Vec::new();

    for (index, coord) in coordinates.iter().enumerate() {
        match (coord.lat, coord.lng) {
            (Some(lat), Some(lng))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) =>
            {
                pending.push((index, lat, lng));
            }
            (Some(lat), Some(lng)) => {
                slots[index] = Some(ReverseGeocodeResult {
                    lat: Some(lat),
                    lng: Some(lng),
                    formatted_address: None,
                    place_id: None,
                    address_components: None,
                    status: "error".to_string(),
                    error: Some(
                        "Invalid coordinates (lat must be -90 to 90, lng must be -180 to 180)"
                            .to_string(),
                    ),
                });
            }
            _ => {
                slots[index] = Some(ReverseGeocodeResult {
                    lat: coord.lat,
                    lng: coord.lng,
                    formatted_address: None,
                    place_id: None,
                    address_components: None,
                    status: "error".to_string(),
                    error: Some("Missing lat or lng".to_string()),
                });
            }
        }
    }

    let outcomes = join_all(
        pending
            .iter()
            .map(|(_, lat, lng)| dispatcher.reverse_geocode(*lat, *lng)),
    )
    .await;

    for ((index, lat, lng), outcome) in pending.into_iter().zip(outcomes) {
        slots[index] = Some(match outcome {
            Ok(entry) => ReverseGeocodeResult {
                lat: Some(lat),
                lng: Some(lng),
                formatted_address: Some(entry.formatted_address),
                place_id: if payload.include_components {
                    entry.place_id
                } else {
                    None
                },
                address_components: if payload.include_components {
                    entry.address_components
                } else {
                    None
                },
                status: "success".to_string(),
                error: None,
            },
            Err(e) => ReverseGeocodeResult {
                lat: Some(lat),
                lng: Some(lng),
                formatted_address: None,
                place_id: None,
                address_components: None,
                status: "error".to_string(),
                error: Some(e.to_string()),
            },
        });
    }

    let results: Vec<ReverseGeocodeResult> = slots.into_iter().flatten().collect();
    let successful = results.iter().filter(|r| r.status == "success").count();
    let failed = results.len() - successful;

    Ok(HttpResponse::Ok().json(ReverseGeocodeResponse {
        summary: ReverseGeocodeSummary {
            total_coordinates: results.len(),
            successful,
            failed,
        },
        results,
    }))
}

/// POST /distance-matrix
/// Calculate distances and travel times between origin-destination pairs
pub async fn distance_matrix(
    dispatcher: web::Data<BatchDispatcher>,
    payload: web::Json<DistanceMatrixPayload>,
) -> Result<impl Responder, SearchError> {
    let payload = payload.into_inner();

    if let Err(e) = payload.validate() {
        return Err(SearchError::ValidationError(e.to_string()));
    }

    let results = dispatcher
        .distance_matrix(&payload.origins, &payload.destinations, payload.mode)
        .await?;

    Ok(HttpResponse::Ok().json(DistanceMatrixResponse {
        summary: DistanceMatrixSummary {
            total_pairs: results.len(),
            mode: payload.mode.as_str().to_string(),
            api_calls: 1,
        },
        results,
    }))
}

/// Configuration for geocoding routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/geocode")
            .route("", web::post().to(geocode))
            .route("/reverse", web::post().to(reverse_geocode)),
    )
    .route("/distance-matrix", web::post().to(distance_matrix));
}
