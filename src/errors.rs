// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("No address found for coordinates: ({0}, {1})")]
    CoordinatesNotFound(f64, f64),

    #[error("Geocoding API error: {0}")]
    GeocodingError(String),

    #[error("Places API error: {0}")]
    PlacesApiError(String),

    #[error("Distance Matrix API error: {0}")]
    DistanceMatrixError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal server error")]
    InternalError,
}

/// Convert SearchError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for SearchError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            SearchError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            SearchError::AddressNotFound(_) => (StatusCode::NOT_FOUND, "ADDRESS_NOT_FOUND"),
            SearchError::CoordinatesNotFound(_, _) => {
                (StatusCode::NOT_FOUND, "COORDINATES_NOT_FOUND")
            }
            SearchError::GeocodingError(_) => (StatusCode::BAD_GATEWAY, "GEOCODING_ERROR"),
            SearchError::PlacesApiError(_) => (StatusCode::BAD_GATEWAY, "PLACES_API_ERROR"),
            SearchError::DistanceMatrixError(_) => {
                (StatusCode::BAD_GATEWAY, "DISTANCE_MATRIX_ERROR")
            }
            SearchError::ExternalApiError(_) => (StatusCode::BAD_GATEWAY, "EXTERNAL_API_ERROR"),
            SearchError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            SearchError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            SearchError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SearchError::AddressNotFound(_) => StatusCode::NOT_FOUND,
            SearchError::CoordinatesNotFound(_, _) => StatusCode::NOT_FOUND,
            SearchError::GeocodingError(_) => StatusCode::BAD_GATEWAY,
            SearchError::PlacesApiError(_) => StatusCode::BAD_GATEWAY,
            SearchError::DistanceMatrixError(_) => StatusCode::BAD_GATEWAY,
            SearchError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            SearchError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            SearchError::Unauthorized => StatusCode::UNAUTHORIZED,
            SearchError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
