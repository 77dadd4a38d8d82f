//! `Tripwise` - travel planning front end
//!
//! This library provides destination search, a map panel with nearby
//! restaurants, hotels and parkings, AI itineraries and translation of the
//! displayed content, all on top of an HTTP travel backend.

pub mod api;
pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod maps;
pub mod models;
pub mod search;
pub mod web;

#[cfg(test)]
mod test_support;

// Re-export core types for public API
pub use app::{AppView, TravelPlanner};
pub use backend::{BackendClient, LanguageOption, TravelBackend};
pub use config::TripwiseConfig;
pub use error::TripwiseError;
pub use i18n::{BackendTranslator, LanguageContext, TranslationBundle, Translator};
pub use maps::{GoogleMapsClient, MapProvider, MapScene, PlacesPanel};
pub use models::{Coordinate, Itinerary, Place, PlaceCategory, WeatherReport, WikiSummary};
pub use search::{DestinationSearch, SearchState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripwiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
