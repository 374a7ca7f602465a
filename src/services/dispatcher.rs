// src/services/dispatcher.rs
// DOCUMENTATION: Batch dispatch engine
// PURPOSE: Fan (location x feature type) work items out through cache and rate limiter

use crate::errors::SearchError;
use crate::models::{
    BatchSearchRequest, Coordinates, DistancePairResult, GeocodedAddress, Location, PlaceResult,
    TravelMode,
};
use crate::services::cache::{geocoding_key, places_key, reverse_geocoding_key, SearchCaches};
use crate::services::google_client::ProviderGateway;
use crate::services::rate_limit::RateLimiter;
use futures::future::join_all;
use std::sync::Arc;

/// One (location, feature type) unit of search, dispatched independently
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub location_index: usize,
    pub lat: f64,
    pub lng: f64,
    pub place_type: String,
    pub radius_meters: u32,
    pub max_results: usize,
}

/// Outcome of one work item. Failures carry a category-scoped message and
/// never cancel sibling items.
#[derive(Debug, Clone)]
pub struct WorkOutcome {
    pub location_index: usize,
    pub place_type: String,
    pub result: Result<Vec<PlaceResult>, String>,
}

/// Raw per-location, per-category outcomes of one batch dispatch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Resolution outcome per input location, in input order
    pub resolutions: Vec<Result<Coordinates, String>>,
    /// One entry per dispatched work item
    pub outcomes: Vec<WorkOutcome>,
}

/// Concurrency-bounded fan-out over the two-tier cache and the provider.
///
/// Construction is explicit: callers inject the gateway, caches, and limiter,
/// so tests run against fresh stores and a mock provider.
pub struct BatchDispatcher {
    gateway: Arc<dyn ProviderGateway>,
    caches: Arc<SearchCaches>,
    limiter: RateLimiter,
}

impl BatchDispatcher {
    pub fn new(
        gateway: Arc<dyn ProviderGateway>,
        caches: Arc<SearchCaches>,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            gateway,
            caches,
            limiter,
        }
    }

    /// Structural validation, before any remote work.
    /// A violation here aborts the whole request: it indicates a malformed
    /// request rather than a transient per-item failure.
    pub fn validate_request(request: &BatchSearchRequest) -> Result<(), SearchError> {
        if request.locations.is_empty() || request.locations.len() > 20 {
            return Err(SearchError::ValidationError(
                "1 to 20 locations required".to_string(),
            ));
        }

        // The requested-entry cap is enforced before category expansion at
        // the handler boundary; the expanded list only has to be non-empty
        if request.feature_types.is_empty() {
            return Err(SearchError::ValidationError(
                "at least one feature type required".to_string(),
            ));
        }

        if !(100..=50000).contains(&request.radius_meters) {
            return Err(SearchError::ValidationError(
                "radius_meters must be between 100 and 50000".to_string(),
            ));
        }

        if !(1..=10).contains(&request.max_results_per_type) {
            return Err(SearchError::ValidationError(
                "max_results_per_type must be between 1 and 10".to_string(),
            ));
        }

        for location in &request.locations {
            location.check_form()?;
        }

        Ok(())
    }

    /// Run a full batch: validate, resolve every location, expand work items,
    /// and dispatch them all concurrently.
    pub async fn dispatch(&self, request: &BatchSearchRequest) -> Result<BatchOutcome, SearchError> {
        Self::validate_request(request)?;

        // Resolve all locations to coordinates in parallel
        let resolutions: Vec<Result<Coordinates, String>> = join_all(
            request.locations.iter().map(|loc| self.resolve(loc)),
        )
        .await;

        // Expand one work item per (resolved location, feature type)
        let mut items = Vec::new();
        for (index, resolution) in resolutions.iter().enumerate() {
            let coords = match resolution {
                Ok(coords) => coords,
                // Geocoding failed: no coordinate, no category expansion
                Err(_) => continue,
            };

            for place_type in &request.feature_types {
                items.push(WorkItem {
                    location_index: index,
                    lat: coords.lat,
                    lng: coords.lng,
                    place_type: place_type.clone(),
                    radius_meters: request.radius_meters,
                    max_results: request.max_results_per_type,
                });
            }
        }

        log::info!(
            "Dispatching {} work items for {} locations x {} feature types",
            items.len(),
            request.locations.len(),
            request.feature_types.len()
        );

        // All items at once; the rate limiter bounds in-flight provider calls
        let outcomes = join_all(items.into_iter().map(|item| self.search_item(item))).await;

        Ok(BatchOutcome {
            resolutions,
            outcomes,
        })
    }

    /// Resolve a single location to coordinates.
    /// Coordinate inputs pass through untouched; addresses go through the
    /// geocoding cache backed by a rate-limited provider call.
    async fn resolve(&self, location: &Location) -> Result<Coordinates, String> {
        if let Some(coords) = location.coordinates() {
            return Ok(coords);
        }

        let address = location.address.as_deref().unwrap_or_default();
        match self.geocode_address(address).await {
            Ok(geocoded) => Ok(Coordinates::new(geocoded.lat, geocoded.lng)),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Run one work item through the places cache
    async fn search_item(&self, item: WorkItem) -> WorkOutcome {
        let key = places_key(item.lat, item.lng, &item.place_type, item.radius_meters);

        let gateway = self.gateway.clone();
        let limiter = self.limiter.clone();
        let (lat, lng, radius) = (item.lat, item.lng, item.radius_meters);
        let place_type = item.place_type.clone();

        let result = self
            .caches
            .places
            .get_or_populate(key, move || async move {
                let _permit = limiter.acquire().await?;
                gateway.nearby_search(lat, lng, &place_type, radius).await
            })
            .await;

        WorkOutcome {
            location_index: item.location_index,
            place_type: item.place_type,
            result: result.map(|mut places| {
                // Full provider page is cached; the per-request cap applies here
                places.truncate(item.max_results);
                places
            })
            .map_err(|e| e.to_string()),
        }
    }

    /// Geocode an address through the cache and rate limiter
    pub async fn geocode_address(&self, address: &str) -> Result<GeocodedAddress, SearchError> {
        let key = geocoding_key(address);

        let gateway = self.gateway.clone();
        let limiter = self.limiter.clone();
        let address = address.to_string();

        self.caches
            .geocoding
            .get_or_populate(key, move || async move {
                let _permit = limiter.acquire().await?;
                gateway.geocode(&address).await
            })
            .await
    }

    /// Reverse geocode coordinates through the cache and rate limiter.
    /// Shares the geocoding tier under a rounded-coordinate key.
    pub async fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<GeocodedAddress, SearchError> {
        let key = reverse_geocoding_key(lat, lng);

        let gateway = self.gateway.clone();
        let limiter = self.limiter.clone();

        self.caches
            .geocoding
            .get_or_populate(key, move || async move {
                let _permit = limiter.acquire().await?;
                gateway.reverse_geocode(lat, lng).await
            })
            .await
    }

    /// Distance matrix lookup: rate-limited, not cached
    pub async fn distance_matrix(
        &self,
        origins: &[String],
        destinations: &[String],
        mode: TravelMode,
    ) -> Result<Vec<DistancePairResult>, SearchError> {
        let _permit = self.limiter.acquire().await?;
        self.gateway.distance_matrix(origins, destinations, mode).await
    }
}
