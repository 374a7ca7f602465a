// src/handlers/search.rs
// DOCUMENTATION: HTTP handlers for nearby search operations
// PURPOSE: Parse requests, run the dispatch engine, return structured results

use crate::errors::SearchError;
use crate::models::{
    BatchNearbySearchPayload, BatchSearchRequest, BatchSearchResponse, NearbySearchPayload,
    NearbySearchResponse, NearbySearchSummary, SearchStatus, AVAILABLE_FIELDS,
};
use crate::services::place_types::validate_place_types;
use crate::services::{BatchDispatcher, ResultAggregator};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Validate and expand requested feature types, producing warnings for any
/// invalid entries. Fails only when nothing valid remains.
///
/// The 1-10 cap applies to the requested entries; a category name counts as
/// one entry and its expansion may exceed the cap.
fn resolve_feature_types(requested: Vec<String>) -> Result<(Vec<String>, Vec<String>), SearchError> {
    if requested.is_empty() || requested.len() > 10 {
        return Err(SearchError::ValidationError(
            "1 to 10 feature types required".to_string(),
        ));
    }

    let validation = validate_place_types(&requested);
    let warnings = validation.warnings(requested.len());

    if validation.valid.is_empty() {
        let mut message = "No valid place types provided".to_string();
        if let Some(detail) = warnings.first() {
            message = format!("{}. {}", message, detail);
        }
        return Err(SearchError::ValidationError(message));
    }

    // Duplicates would dispatch redundant work items
    let mut seen = std::collections::HashSet::new();
    let valid: Vec<String> = validation
        .valid
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect();

    Ok((valid, warnings))
}

/// Drop unknown field names from `include_fields`, warning about each one
fn resolve_include_fields(
    requested: Option<Vec<String>>,
    warnings: &mut Vec<String>,
) -> Option<Vec<String>> {
    let requested = requested?;

    let (known, unknown): (Vec<String>, Vec<String>) = requested
        .into_iter()
        .partition(|f| AVAILABLE_FIELDS.contains(&f.as_str()));

    if !unknown.is_empty() {
        warnings.push(format!(
            "Unknown include_fields ignored: {}. Available: {}",
            unknown.join(", "),
            AVAILABLE_FIELDS.join(", ")
        ));
    }

    Some(known)
}

/// POST /search/batch
/// Find nearby places for multiple locations in one concurrent batch
pub async fn batch_nearby_search(
    dispatcher: web::Data<BatchDispatcher>,
    payload: web::Json<BatchNearbySearchPayload>,
) -> Result<impl Responder, SearchError> {
    let payload = payload.into_inner();

    let (feature_types, mut warnings) = resolve_feature_types(payload.feature_types.into_vec())?;
    let include_fields =
        resolve_include_fields(payload.include_fields.map(|f| f.into_vec()), &mut warnings);

    let request = BatchSearchRequest::new(
        payload.locations,
        feature_types,
        payload.radius_meters,
        payload.max_results_per_type,
        include_fields,
    );

    if let Err(e) = request.validate() {
        return Err(SearchError::ValidationError(e.to_string()));
    }

    let outcome = dispatcher.dispatch(&request).await?;
    let (results, summary) = ResultAggregator::aggregate(
        &request.locations,
        &outcome,
        request.include_fields.as_deref(),
    );

    log::info!(
        "Batch search done: {} locations ({} ok, {} partial, {} failed), {} places",
        summary.total_locations,
        summary.successful,
        summary.partial,
        summary.failed,
        summary.total_places_found
    );

    Ok(HttpResponse::Ok().json(BatchSearchResponse {
        results,
        summary,
        warnings,
    }))
}

/// POST /search/nearby
/// Find nearby places from a single location
pub async fn nearby_search(
    dispatcher: web::Data<BatchDispatcher>,
    payload: web::Json<NearbySearchPayload>,
) -> Result<impl Responder, SearchError> {
    let payload = payload.into_inner();

    let (feature_types, mut warnings) = resolve_feature_types(payload.feature_types.into_vec())?;
    let include_fields =
        resolve_include_fields(payload.include_fields.map(|f| f.into_vec()), &mut warnings);
    let radius_meters = payload.radius_meters;

    let request = BatchSearchRequest::new(
        vec![payload.location],
        feature_types,
        radius_meters,
        payload.max_results_per_type,
        include_fields,
    );

    if let Err(e) = request.validate() {
        return Err(SearchError::ValidationError(e.to_string()));
    }

    let outcome = dispatcher.dispatch(&request).await?;
    let (mut results, _) = ResultAggregator::aggregate(
        &request.locations,
        &outcome,
        request.include_fields.as_deref(),
    );

    // Exactly one location in, one result out
    let result = results.pop().ok_or(SearchError::InternalError)?;

    // A single-location search cannot degrade the resolution failure to a
    // partial response; surface it as the request error it is
    let coordinates = match result.coordinates {
        Some(coords) => coords,
        None => {
            let reason = result
                .errors
                .first()
                .cloned()
                .unwrap_or_else(|| "geocoding failed".to_string());
            return Err(SearchError::GeocodingError(reason));
        }
    };

    let total_places_found = result.features.values().map(|p| p.len()).sum();
    let errors = if result.status == SearchStatus::Success {
        Vec::new()
    } else {
        result.errors
    };

    Ok(HttpResponse::Ok().json(NearbySearchResponse {
        location: coordinates,
        summary: NearbySearchSummary {
            total_feature_types: request.feature_types.len(),
            total_places_found,
            radius_meters,
        },
        features: result.features,
        warnings,
        errors,
    }))
}

/// Configuration for search routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/search")
            .route("/batch", web::post().to(batch_nearby_search))
            .route("/nearby", web::post().to(nearby_search)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category_expands_past_ten_types() {
        // One requested entry; its expansion is allowed to exceed the cap
        let (types, warnings) =
            resolve_feature_types(vec!["food_drink".to_string()]).unwrap();

        assert!(types.len() > 10);
        assert!(types.contains(&"restaurant".to_string()));
        assert!(types.contains(&"cafe".to_string()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_more_than_ten_requested_entries_rejected() {
        let requested: Vec<String> = (0..11).map(|i| format!("type_{}", i)).collect();
        assert!(matches!(
            resolve_feature_types(requested),
            Err(SearchError::ValidationError(_))
        ));
    }

    #[test]
    fn test_no_requested_entries_rejected() {
        assert!(resolve_feature_types(Vec::new()).is_err());
    }

    #[test]
    fn test_duplicate_types_collapse_to_one() {
        let (types, _) =
            resolve_feature_types(vec!["park".to_string(), "park".to_string()]).unwrap();
        assert_eq!(types, vec!["park".to_string()]);
    }

    #[test]
    fn test_unknown_include_fields_warned_and_dropped() {
        let mut warnings = Vec::new();
        let fields = resolve_include_fields(
            Some(vec!["rating".to_string(), "photos".to_string()]),
            &mut warnings,
        );

        assert_eq!(fields, Some(vec!["rating".to_string()]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("photos"));
    }
}
