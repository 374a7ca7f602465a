// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Google Maps API key (shared by Geocoding, Places, and Distance Matrix)
    pub google_maps_api_key: String,

    /// Admin authentication token (for cache management endpoints)
    pub admin_token: String,

    /// Maximum entries in the geocoding cache (LRU, no expiry)
    pub geocoding_cache_size: usize,

    /// Maximum entries in the places cache (LRU + TTL)
    pub places_cache_size: usize,

    /// Time-to-live for places cache entries, in seconds
    pub places_cache_ttl: u64,

    /// Maximum concurrent Google API requests
    pub max_concurrent_requests: usize,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env file or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8003".to_string())
                .parse()
                .unwrap_or(8003),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY").unwrap_or_else(|_| String::new()),

            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "admin-token-dev".to_string()),

            geocoding_cache_size: env::var("GEOCODING_CACHE_SIZE")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),

            places_cache_size: env::var("PLACES_CACHE_SIZE")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),

            places_cache_ttl: env::var("PLACES_CACHE_TTL")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),

            max_concurrent_requests: env::var("MAX_CONCURRENT_REQUESTS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.google_maps_api_key.is_empty() {
            log::warn!("GOOGLE_MAPS_API_KEY not configured - upstream calls will fail");
        }

        if self.max_concurrent_requests == 0 {
            return Err("MAX_CONCURRENT_REQUESTS must be at least 1".to_string());
        }

        if self.geocoding_cache_size == 0 || self.places_cache_size == 0 {
            return Err("cache sizes must be at least 1".to_string());
        }

        Ok(())
    }
}
