// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, caches, rate limiter, and start HTTP server

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{BatchDispatcher, GoogleMapsClient, ProviderGateway, RateLimiter, SearchCaches};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging before validation so warnings are visible
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting batch-nearby-search service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Process-wide shared state: caches, rate limiter, Google client.
    //    Cache entries live for the process lifetime; nothing is persisted.
    let caches = Arc::new(SearchCaches::new(&config));
    log::info!(
        "Initialized caches (geocoding: {} entries, places: {} entries / {}s TTL)",
        config.geocoding_cache_size,
        config.places_cache_size,
        config.places_cache_ttl
    );

    let limiter = RateLimiter::new(config.max_concurrent_requests);
    log::info!(
        "Rate limiter allows {} concurrent upstream calls",
        limiter.max_concurrent()
    );

    let gateway: Arc<dyn ProviderGateway> =
        Arc::new(GoogleMapsClient::new(config.google_maps_api_key.clone()));

    let dispatcher = web::Data::new(BatchDispatcher::new(gateway, caches.clone(), limiter));

    // 5. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_data = web::Data::new(config);
    let caches_data = web::Data::new(caches);

    HttpServer::new(move || {
        App::new()
            // Application state (config, caches, dispatch engine)
            .app_data(config_data.clone())
            .app_data(caches_data.clone())
            .app_data(dispatcher.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::search_config)
            .configure(handlers::geocoding_config)
            .configure(handlers::place_types_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
