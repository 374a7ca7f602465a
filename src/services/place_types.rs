// src/services/place_types.rs
// DOCUMENTATION: Google Place types vocabulary and validation
// PURPOSE: Validate requested feature types and suggest corrections for typos

use serde::Serialize;
use std::sync::OnceLock;

/// Google Place types organized by category (Table A - primary & filterable types)
pub const PLACE_TYPES_BY_CATEGORY: &[(&str, &[&str])] = &[
    (
        "automotive",
        &[
            "car_dealer",
            "car_rental",
            "car_repair",
            "car_wash",
            "electric_vehicle_charging_station",
            "gas_station",
            "parking",
            "rest_stop",
        ],
    ),
    ("business", &["corporate_office", "farm", "ranch"]),
    (
        "culture",
        &[
            "art_gallery",
            "art_studio",
            "auditorium",
            "cultural_landmark",
            "historical_place",
            "monument",
            "museum",
            "performing_arts_theater",
            "sculpture",
        ],
    ),
    (
        "education",
        &[
            "library",
            "preschool",
            "primary_school",
            "school",
            "secondary_school",
            "university",
        ],
    ),
    (
        "entertainment_recreation",
        &[
            "amusement_center",
            "amusement_park",
            "aquarium",
            "banquet_hall",
            "bowling_alley",
            "casino",
            "community_center",
            "convention_center",
            "cultural_center",
            "dog_park",
            "event_venue",
            "hiking_area",
            "historical_landmark",
            "marina",
            "movie_rental",
            "movie_theater",
            "national_park",
            "night_club",
            "park",
            "tourist_attraction",
            "visitor_center",
            "wedding_venue",
            "zoo",
        ],
    ),
    ("facilities", &["public_bath", "public_bathroom", "stable"]),
    ("finance", &["accounting", "atm", "bank"]),
    (
        "food_drink",
        &[
            "american_restaurant",
            "bakery",
            "bar",
            "barbecue_restaurant",
            "brazilian_restaurant",
            "breakfast_restaurant",
            "brunch_restaurant",
            "cafe",
            "chinese_restaurant",
            "coffee_shop",
            "fast_food_restaurant",
            "french_restaurant",
            "greek_restaurant",
            "hamburger_restaurant",
            "ice_cream_shop",
            "indian_restaurant",
            "indonesian_restaurant",
            "italian_restaurant",
            "japanese_restaurant",
            "korean_restaurant",
            "lebanese_restaurant",
            "meal_delivery",
            "meal_takeaway",
            "mediterranean_restaurant",
            "mexican_restaurant",
            "middle_eastern_restaurant",
            "pizza_restaurant",
            "ramen_restaurant",
            "restaurant",
            "sandwich_shop",
            "seafood_restaurant",
            "spanish_restaurant",
            "steak_house",
            "sushi_restaurant",
            "thai_restaurant",
            "turkish_restaurant",
            "vegan_restaurant",
            "vegetarian_restaurant",
            "vietnamese_restaurant",
        ],
    ),
    (
        "government",
        &[
            "city_hall",
            "courthouse",
            "embassy",
            "fire_station",
            "local_government_office",
            "police",
            "post_office",
        ],
    ),
    (
        "health_wellness",
        &[
            "dental_clinic",
            "dentist",
            "doctor",
            "drugstore",
            "hospital",
            "medical_lab",
            "pharmacy",
            "physiotherapist",
            "spa",
        ],
    ),
    (
        "lodging",
        &[
            "bed_and_breakfast",
            "campground",
            "camping_cabin",
            "cottage",
            "extended_stay_hotel",
            "farmstay",
            "guest_house",
            "hostel",
            "hotel",
            "lodging",
            "motel",
            "private_guest_room",
            "resort_hotel",
            "rv_park",
        ],
    ),
    (
        "places_of_worship",
        &["church", "hindu_temple", "mosque", "synagogue"],
    ),
    (
        "services",
        &[
            "barber_shop",
            "beauty_salon",
            "cemetery",
            "child_care_agency",
            "consultant",
            "courier_service",
            "electrician",
            "florist",
            "funeral_home",
            "hair_care",
            "hair_salon",
            "insurance_agency",
            "laundry",
            "lawyer",
            "locksmith",
            "moving_company",
            "painter",
            "plumber",
            "real_estate_agency",
            "roofing_contractor",
            "storage",
            "tailor",
            "telecommunications_service_provider",
            "travel_agency",
            "veterinary_care",
        ],
    ),
    (
        "shopping",
        &[
            "auto_parts_store",
            "bicycle_store",
            "book_store",
            "cell_phone_store",
            "clothing_store",
            "convenience_store",
            "department_store",
            "discount_store",
            "electronics_store",
            "furniture_store",
            "gift_shop",
            "grocery_store",
            "hardware_store",
            "home_goods_store",
            "home_improvement_store",
            "jewelry_store",
            "liquor_store",
            "market",
            "pet_store",
            "shoe_store",
            "shopping_mall",
            "sporting_goods_store",
            "store",
            "supermarket",
            "wholesaler",
        ],
    ),
    (
        "sports",
        &[
            "athletic_field",
            "fitness_center",
            "golf_course",
            "gym",
            "playground",
            "ski_resort",
            "sports_club",
            "sports_complex",
            "stadium",
            "swimming_pool",
        ],
    ),
    (
        "transportation",
        &[
            "airport",
            "bus_station",
            "bus_stop",
            "ferry_terminal",
            "heliport",
            "light_rail_station",
            "park_and_ride",
            "subway_station",
            "taxi_stand",
            "train_station",
            "transit_depot",
            "transit_station",
            "truck_stop",
        ],
    ),
];

/// Flattened, sorted list of every valid place type
pub fn all_place_types() -> &'static [&'static str] {
    static ALL: OnceLock<Vec<&'static str>> = OnceLock::new();
    ALL.get_or_init(|| {
        let mut types: Vec<&'static str> = PLACE_TYPES_BY_CATEGORY
            .iter()
            .flat_map(|(_, types)| types.iter().copied())
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    })
}

/// Lowercase, trim, and replace spaces with underscores
pub fn normalize_place_type(place_type: &str) -> String {
    place_type.trim().to_lowercase().replace(' ', "_")
}

pub fn is_valid_place_type(place_type: &str) -> bool {
    all_place_types().binary_search(&place_type).is_ok()
}

/// Types belonging to a category, if the category exists
pub fn category_types(category: &str) -> Option<&'static [&'static str]> {
    PLACE_TYPES_BY_CATEGORY
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, types)| *types)
}

/// Category a place type belongs to
pub fn get_category_for_type(place_type: &str) -> Option<&'static str> {
    let normalized = normalize_place_type(place_type);
    PLACE_TYPES_BY_CATEGORY
        .iter()
        .find(|(_, types)| types.contains(&normalized.as_str()))
        .map(|(name, _)| *name)
}

/// Find similar valid place types for an invalid input, ordered by similarity
pub fn suggest_place_types(invalid_type: &str, max_suggestions: usize) -> Vec<String> {
    let normalized = normalize_place_type(invalid_type);

    if is_valid_place_type(&normalized) {
        return vec![normalized];
    }

    let mut scored: Vec<(f64, &'static str)> = all_place_types()
        .iter()
        .map(|candidate| (strsim::jaro_winkler(&normalized, candidate), *candidate))
        .filter(|(score, _)| *score >= 0.8)
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// An invalid requested type with fuzzy-matched suggestions
#[derive(Debug, Clone, Serialize)]
pub struct InvalidPlaceType {
    pub name: String,
    pub suggestions: Vec<String>,
}

/// Outcome of validating a list of requested types
#[derive(Debug, Clone)]
pub struct TypeValidation {
    /// Valid place types, with category names expanded to their members
    pub valid: Vec<String>,
    pub invalid: Vec<InvalidPlaceType>,
}

impl TypeValidation {
    pub fn all_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Human-readable warnings describing the invalid entries
    pub fn warnings(&self, total_requested: usize) -> Vec<String> {
        if self.invalid.is_empty() {
            return Vec::new();
        }

        let mut invalid_msgs = Vec::new();
        for invalid in &self.invalid {
            if invalid.suggestions.is_empty() {
                invalid_msgs.push(format!(
                    "  - '{}' is not valid. Use the place-types endpoint to see all options.",
                    invalid.name
                ));
            } else {
                let suggestion_str = invalid
                    .suggestions
                    .iter()
                    .take(3)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                invalid_msgs.push(format!(
                    "  - '{}' is not valid. Did you mean: {}?",
                    invalid.name, suggestion_str
                ));
            }
        }

        let summary = if self.valid.is_empty() {
            format!(
                "Validation: None of the {} place types are valid.\nInvalid types:\n{}",
                total_requested,
                invalid_msgs.join("\n")
            )
        } else {
            format!(
                "Validation: {} of {} place types are valid. Proceeding with: {}\nInvalid types:\n{}",
                self.valid.len(),
                total_requested,
                self.valid.join(", "),
                invalid_msgs.join("\n")
            )
        };

        vec![summary]
    }
}

/// Validate requested place types.
///
/// Category names are accepted and expand to every type in the category.
/// Invalid entries come back with fuzzy-matched suggestions.
pub fn validate_place_types(requested: &[String]) -> TypeValidation {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for place_type in requested {
        let normalized = normalize_place_type(place_type);

        if is_valid_place_type(&normalized) {
            valid.push(normalized);
        } else if let Some(members) = category_types(&normalized) {
            valid.extend(members.iter().map(|t| t.to_string()));
        } else {
            invalid.push(InvalidPlaceType {
                name: place_type.clone(),
                suggestions: suggest_place_types(&normalized, 5),
            });
        }
    }

    TypeValidation { valid, invalid }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_place_types_sorted_unique() {
        let types = all_place_types();
        assert!(types.windows(2).all(|w| w[0] < w[1]));
        assert!(types.contains(&"restaurant"));
        assert!(types.contains(&"park"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_place_type("  Fast Food Restaurant "), "fast_food_restaurant");
    }

    #[test]
    fn test_validate_all_valid() {
        let requested = vec!["park".to_string(), "GYM".to_string()];
        let validation = validate_place_types(&requested);

        assert!(validation.all_valid());
        assert_eq!(validation.valid, vec!["park", "gym"]);
        assert!(validation.warnings(2).is_empty());
    }

    #[test]
    fn test_validate_invalid_with_suggestion() {
        let requested = vec!["restaurnt".to_string()];
        let validation = validate_place_types(&requested);

        assert!(!validation.all_valid());
        assert_eq!(validation.invalid.len(), 1);
        assert!(validation.invalid[0]
            .suggestions
            .contains(&"restaurant".to_string()));
        assert_eq!(validation.warnings(1).len(), 1);
    }

    #[test]
    fn test_category_name_expands() {
        let requested = vec!["places_of_worship".to_string()];
        let validation = validate_place_types(&requested);

        assert!(validation.all_valid());
        assert_eq!(validation.valid.len(), 4);
        assert!(validation.valid.contains(&"mosque".to_string()));
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(get_category_for_type("restaurant"), Some("food_drink"));
        assert_eq!(get_category_for_type("park"), Some("entertainment_recreation"));
        assert_eq!(get_category_for_type("flying_saucer_pad"), None);
    }
}
