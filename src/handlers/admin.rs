// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for cache management
// PURPOSE: Expose cache statistics and clearing via REST endpoints

use crate::config::Config;
use crate::errors::SearchError;
use crate::services::SearchCaches;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

/// Verify the X-Admin-Token header against the configured token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), SearchError> {
    let provided = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(token) if token == config.admin_token => Ok(()),
        _ => Err(SearchError::Unauthorized),
    }
}

/// GET /admin/cache/stats
/// Hit/miss counters and sizes for both cache tiers
pub async fn cache_stats(
    config: web::Data<Config>,
    caches: web::Data<Arc<SearchCaches>>,
    req: HttpRequest,
) -> Result<impl Responder, SearchError> {
    verify_admin_token(&req, &config)?;

    let stats = caches.stats().await;
    Ok(HttpResponse::Ok().json(stats))
}

/// POST /admin/cache/clear
/// Drop all cached geocoding and places entries
pub async fn clear_caches(
    config: web::Data<Config>,
    caches: web::Data<Arc<SearchCaches>>,
    req: HttpRequest,
) -> Result<impl Responder, SearchError> {
    verify_admin_token(&req, &config)?;

    log::info!("Admin requested cache clear");
    caches.clear().await;

    Ok(HttpResponse::Ok().json(json!({ "message": "caches cleared" })))
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/cache/stats", web::get().to(cache_stats))
            .route("/cache/clear", web::post().to(clear_caches)),
    );
}
