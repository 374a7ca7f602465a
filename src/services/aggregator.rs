// src/services/aggregator.rs
// DOCUMENTATION: Batch result aggregation
// PURPOSE: Fold raw dispatch outcomes into per-location results and a summary

use crate::models::{
    BatchSearchSummary, Coordinates, Location, LocationSearchResult, SearchStatus,
};
use crate::services::dispatcher::BatchOutcome;
use std::collections::BTreeMap;

/// Pure fold from raw dispatch outcomes to the final response shape.
///
/// Nothing here is stateful: results and summary are recomputed from scratch
/// for every request, so they cannot drift from the underlying outcomes.
pub struct ResultAggregator;

impl ResultAggregator {
    /// Produce one result per input location (in input order, reassembled by
    /// index rather than completion order) plus the derived summary.
    pub fn aggregate(
        locations: &[Location],
        outcome: &BatchOutcome,
        include_fields: Option<&[String]>,
    ) -> (Vec<LocationSearchResult>, BatchSearchSummary) {
        let mut results = Vec::with_capacity(locations.len());

        for (index, location) in locations.iter().enumerate() {
            let resolution = outcome.resolutions.get(index);

            let coordinates: Option<Coordinates> = match resolution {
                Some(Ok(coords)) => Some(*coords),
                _ => None,
            };

            let mut features: BTreeMap<String, Vec<_>> = BTreeMap::new();
            let mut errors: Vec<String> = Vec::new();

            if let Some(Err(reason)) = resolution {
                errors.push(format!("geocoding: {}", reason));
            }

            let mut succeeded = 0usize;
            let mut failed = 0usize;

            for work in outcome.outcomes.iter().filter(|w| w.location_index == index) {
                match &work.result {
                    Ok(places) => {
                        succeeded += 1;
                        features.insert(
                            work.place_type.clone(),
                            places.iter().map(|p| p.project(include_fields)).collect(),
                        );
                    }
                    Err(reason) => {
                        failed += 1;
                        errors.push(format!("{}: {}", work.place_type, reason));
                    }
                }
            }

            // Precedence: error > partial > success. An empty-but-successful
            // result list still counts as success.
            let status = if coordinates.is_none() || (succeeded == 0 && failed > 0) {
                SearchStatus::Error
            } else if failed > 0 {
                SearchStatus::Partial
            } else {
                SearchStatus::Success
            };

            results.push(LocationSearchResult {
                location_index: index,
                location: location.clone(),
                coordinates,
                features,
                status,
                errors,
            });
        }

        let summary = Self::summarize(&results);
        (results, summary)
    }

    /// Derive the summary counts from the final per-location results
    pub fn summarize(results: &[LocationSearchResult]) -> BatchSearchSummary {
        let mut summary = BatchSearchSummary {
            total_locations: results.len(),
            successful: 0,
            partial: 0,
            failed: 0,
            total_places_found: 0,
        };

        for result in results {
            match result.status {
                SearchStatus::Success => summary.successful += 1,
                SearchStatus::Partial => summary.partial += 1,
                SearchStatus::Error => summary.failed += 1,
            }
            summary.total_places_found += result
                .features
                .values()
                .map(|places| places.len())
                .sum::<usize>();
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaceResult;
    use crate::services::dispatcher::WorkOutcome;

    fn place(name: &str) -> PlaceResult {
        PlaceResult {
            name: name.to_string(),
            place_id: format!("id-{}", name),
            distance_meters: Some(100.0),
            rating: Some(4.0),
            user_ratings_total: None,
            address: None,
            phone_number: None,
            website: None,
            price_level: None,
            opening_hours: None,
            types: None,
        }
    }

    fn ok_outcome(index: usize, place_type: &str, count: usize) -> WorkOutcome {
        WorkOutcome {
            location_index: index,
            place_type: place_type.to_string(),
            result: Ok((0..count).map(|i| place(&format!("p{}", i))).collect()),
        }
    }

    fn err_outcome(index: usize, place_type: &str) -> WorkOutcome {
        WorkOutcome {
            location_index: index,
            place_type: place_type.to_string(),
            result: Err("upstream failure".to_string()),
        }
    }

    #[test]
    fn test_all_success() {
        let locations = vec![
            Location::from_coordinates(40.0, -3.0),
            Location::from_coordinates(41.0, 2.0),
        ];
        let outcome = BatchOutcome {
            resolutions: vec![
                Ok(Coordinates::new(40.0, -3.0)),
                Ok(Coordinates::new(41.0, 2.0)),
            ],
            outcomes: vec![
                ok_outcome(0, "park", 2),
                ok_outcome(0, "cafe", 1),
                ok_outcome(1, "park", 3),
                ok_outcome(1, "cafe", 0),
            ],
        };

        let (results, summary) = ResultAggregator::aggregate(&locations, &outcome, None);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == SearchStatus::Success));
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.total_places_found, 6);
    }

    #[test]
    fn test_empty_result_list_is_success() {
        // "No places found" is not an error
        let locations = vec![Location::from_coordinates(40.0, -3.0)];
        let outcome = BatchOutcome {
            resolutions: vec![Ok(Coordinates::new(40.0, -3.0))],
            outcomes: vec![ok_outcome(0, "heliport", 0)],
        };

        let (results, summary) = ResultAggregator::aggregate(&locations, &outcome, None);

        assert_eq!(results[0].status, SearchStatus::Success);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.total_places_found, 0);
    }

    #[test]
    fn test_resolution_failure_is_error() {
        let locations = vec![Location::from_address("nowhere")];
        let outcome = BatchOutcome {
            resolutions: vec![Err("Address not found: nowhere".to_string())],
            outcomes: vec![],
        };

        let (results, summary) = ResultAggregator::aggregate(&locations, &outcome, None);

        assert_eq!(results[0].status, SearchStatus::Error);
        assert!(results[0].coordinates.is_none());
        assert_eq!(results[0].errors.len(), 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_every_category_failing_is_error() {
        let locations = vec![Location::from_coordinates(40.0, -3.0)];
        let outcome = BatchOutcome {
            resolutions: vec![Ok(Coordinates::new(40.0, -3.0))],
            outcomes: vec![err_outcome(0, "park"), err_outcome(0, "cafe")],
        };

        let (results, summary) = ResultAggregator::aggregate(&locations, &outcome, None);

        assert_eq!(results[0].status, SearchStatus::Error);
        assert_eq!(results[0].errors.len(), 2);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_mixed_outcomes_are_partial() {
        let locations = vec![Location::from_coordinates(40.0, -3.0)];
        let outcome = BatchOutcome {
            resolutions: vec![Ok(Coordinates::new(40.0, -3.0))],
            outcomes: vec![ok_outcome(0, "park", 2), err_outcome(0, "cafe")],
        };

        let (results, summary) = ResultAggregator::aggregate(&locations, &outcome, None);

        assert_eq!(results[0].status, SearchStatus::Partial);
        assert_eq!(results[0].errors, vec!["cafe: upstream failure"]);
        assert_eq!(summary.partial, 1);
        assert_eq!(summary.total_places_found, 2);
    }

    #[test]
    fn test_results_keep_input_order() {
        let locations = vec![
            Location::from_coordinates(40.0, -3.0),
            Location::from_coordinates(41.0, 2.0),
            Location::from_coordinates(42.0, 5.0),
        ];
        // Outcomes arrive out of order; aggregation reassembles by index
        let outcome = BatchOutcome {
            resolutions: vec![
                Ok(Coordinates::new(40.0, -3.0)),
                Ok(Coordinates::new(41.0, 2.0)),
                Ok(Coordinates::new(42.0, 5.0)),
            ],
            outcomes: vec![
                ok_outcome(2, "park", 1),
                ok_outcome(0, "park", 1),
                ok_outcome(1, "park", 1),
            ],
        };

        let (results, _) = ResultAggregator::aggregate(&locations, &outcome, None);

        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.location_index, i);
        }
    }

    #[test]
    fn test_field_projection_applied() {
        let locations = vec![Location::from_coordinates(40.0, -3.0)];
        let outcome = BatchOutcome {
            resolutions: vec![Ok(Coordinates::new(40.0, -3.0))],
            outcomes: vec![ok_outcome(0, "park", 1)],
        };

        let fields = vec!["rating".to_string()];
        let (results, _) = ResultAggregator::aggregate(&locations, &outcome, Some(&fields));
        let projected = &results[0].features["park"][0];
        assert_eq!(projected.rating, Some(4.0));

        let (results, _) = ResultAggregator::aggregate(&locations, &outcome, None);
        let minimal = &results[0].features["park"][0];
        assert!(minimal.rating.is_none());
        assert!(minimal.distance_meters.is_some());
    }

    #[test]
    fn test_summary_recomputed_from_results() {
        let summary = ResultAggregator::summarize(&[]);
        assert_eq!(
            summary,
            BatchSearchSummary {
                total_locations: 0,
                successful: 0,
                partial: 0,
                failed: 0,
                total_places_found: 0,
            }
        );
    }
}
