use crate::{content::model::SectionRegistry, foundation::error::PlacescapeResult};

const PLACES_AND_LANDSCAPES: &str = include_str!("data/places_and_landscapes.json");

/// The built-in "Places & Landscapes" essay: five sections plus hero and footer copy.
pub fn places_and_landscapes() -> PlacescapeResult<SectionRegistry> {
    SectionRegistry::from_json_str(PLACES_AND_LANDSCAPES)
}
