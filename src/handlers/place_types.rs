// src/handlers/place_types.rs
// DOCUMENTATION: HTTP handler for place type discovery
// PURPOSE: Let clients list valid Google place types before searching

use crate::services::place_types::{all_place_types, category_types, PLACE_TYPES_BY_CATEGORY};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct PlaceTypesQuery {
    /// Comma-separated category filter (e.g., "food_drink,sports")
    pub categories: Option<String>,
}

/// GET /place-types
/// List valid place types, optionally filtered by category
pub async fn list_place_types(query: web::Query<PlaceTypesQuery>) -> impl Responder {
    let requested = match &query.categories {
        Some(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>(),
        _ => Vec::new(),
    };

    if requested.is_empty() {
        let categories: BTreeMap<&str, &[&str]> =
            PLACE_TYPES_BY_CATEGORY.iter().map(|(name, types)| (*name, *types)).collect();

        return HttpResponse::Ok().json(json!({
            "categories": categories,
            "total_categories": PLACE_TYPES_BY_CATEGORY.len(),
            "total_types": all_place_types().len(),
        }));
    }

    let mut found: BTreeMap<String, &[&str]> = BTreeMap::new();
    let mut unknown: Vec<String> = Vec::new();

    for category in requested {
        match category_types(&category) {
            Some(types) => {
                found.insert(category, types);
            }
            None => unknown.push(category),
        }
    }

    if !unknown.is_empty() {
        let available: Vec<&str> = PLACE_TYPES_BY_CATEGORY.iter().map(|(name, _)| *name).collect();
        return HttpResponse::BadRequest().json(json!({
            "error": format!("Unknown categories: {}", unknown.join(", ")),
            "available_categories": available,
            "valid_results": if found.is_empty() { None } else { Some(&found) },
        }));
    }

    let total_types: usize = found.values().map(|types| types.len()).sum();
    HttpResponse::Ok().json(json!({
        "categories": found,
        "total_types": total_types,
    }))
}

/// Configuration for place type routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/place-types", web::get().to(list_place_types));
}
