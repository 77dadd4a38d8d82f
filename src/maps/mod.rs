//! Map & places panel
//!
//! The mapping provider is an injected capability: [`MapProvider`] geocodes
//! addresses and runs proximity searches, [`MapScene`] holds the rendered map
//! view with its markers, and [`PlacesPanel`] drives both for a destination.

use async_trait::async_trait;

use crate::Result;
use crate::models::{Coordinate, PlaceCategory, PointOfInterest};

pub mod google;
pub mod panel;
pub mod scene;

pub use google::GoogleMapsClient;
pub use panel::{ItineraryRequest, PanelState, PlacesPanel};
pub use scene::{InfoPopup, MapScene, Marker};

/// Geocoding and proximity search capability of a mapping provider
#[async_trait]
pub trait MapProvider: Send + Sync {
    /// Resolve an address to a coordinate.
    ///
    /// Fails with [`crate::TripwiseError::Geocoding`] when the provider does
    /// not answer `OK` or returns no results.
    async fn geocode(&self, address: &str) -> Result<Coordinate>;

    /// Points of interest of `category` within `radius_m` meters of `center`
    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_m: u32,
        category: PlaceCategory,
    ) -> Result<Vec<PointOfInterest>>;
}
