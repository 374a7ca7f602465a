// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod geocoding;
pub mod health;
pub mod place_types;
pub mod search;

pub use admin::config as admin_config;
pub use geocoding::config as geocoding_config;
pub use health::config as health_config;
pub use place_types::config as place_types_config;
pub use search::config as search_config;
