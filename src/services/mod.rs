// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod aggregator;
pub mod cache;
pub mod dispatcher;
pub mod geo;
pub mod google_client;
pub mod place_types;
pub mod rate_limit;

pub use aggregator::ResultAggregator;
pub use cache::SearchCaches;
pub use dispatcher::BatchDispatcher;
pub use google_client::{GoogleMapsClient, ProviderGateway};
pub use rate_limit::RateLimiter;
