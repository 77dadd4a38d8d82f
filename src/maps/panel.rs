//! Map & places panel for a resolved destination

use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use super::{InfoPopup, MapProvider, MapScene};
use crate::backend::TravelBackend;
use crate::config::MapsConfig;
use crate::models::{Coordinate, Itinerary, PlaceCategory, PointOfInterest};
use crate::{Result, TripwiseError};

/// Observable state of the panel
#[derive(Debug, Clone, Serialize)]
pub struct PanelState {
    pub destination: Option<String>,
    pub selected: BTreeSet<PlaceCategory>,
    pub scene: MapScene,
    pub itinerary: Option<Itinerary>,
    pub itinerary_pending: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            destination: None,
            selected: PlaceCategory::ALL.into_iter().collect(),
            scene: MapScene::default(),
            itinerary: None,
            itinerary_pending: false,
        }
    }
}

/// Outcome of [`PlacesPanel::request_itinerary`]
#[derive(Debug, Clone, PartialEq)]
pub enum ItineraryRequest {
    Generated(Itinerary),
    /// A request is already in flight; nothing was sent
    Busy,
    /// The destination changed while the itinerary was generated
    Superseded,
}

/// Geocodes a destination, shows it on the map and keeps one marker set per
/// selected category.
pub struct PlacesPanel {
    provider: Arc<dyn MapProvider>,
    backend: Arc<dyn TravelBackend>,
    radius_m: u32,
    zoom: u8,
    state: Mutex<PanelState>,
    view_generation: AtomicU64,
    marker_generation: AtomicU64,
}

impl PlacesPanel {
    pub fn new(
        provider: Arc<dyn MapProvider>,
        backend: Arc<dyn TravelBackend>,
        config: &MapsConfig,
    ) -> Self {
        Self {
            provider,
            backend,
            radius_m: config.search_radius_m,
            zoom: config.zoom,
            state: Mutex::new(PanelState::default()),
            view_generation: AtomicU64::new(0),
            marker_generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> PanelState {
        self.state().clone()
    }

    /// Show `name` on the map. Returns whether a map is displayed.
    ///
    /// Geocoding failures are logged and leave the panel without a map.
    #[instrument(skip(self))]
    pub async fn set_destination(&self, name: &str) -> bool {
        let generation = self.view_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state();
            state.destination = Some(name.to_string());
            state.itinerary = None;
        }

        let center = match self.provider.geocode(name).await {
            Ok(center) => center,
            Err(e) => {
                warn!("Error geocoding location '{}': {}", name, e);
                if self.view_generation.load(Ordering::SeqCst) == generation {
                    self.state().scene.hide();
                }
                return false;
            }
        };

        {
            let mut state = self.state();
            if self.view_generation.load(Ordering::SeqCst) != generation {
                debug!("Discarding geocoding result for superseded destination '{}'", name);
                return false;
            }
            state.scene.show(center, self.zoom);
        }

        self.rebuild_markers().await;
        true
    }

    /// Forget the destination and hide the map
    pub fn clear_destination(&self) {
        self.view_generation.fetch_add(1, Ordering::SeqCst);
        self.marker_generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        state.destination = None;
        state.itinerary = None;
        state.scene.hide();
    }

    /// Flip one category in the filter and rebuild the markers
    pub async fn toggle_category(&self, category: PlaceCategory) {
        {
            let mut state = self.state();
            if !state.selected.remove(&category) {
                state.selected.insert(category);
            }
        }
        self.rebuild_markers().await;
    }

    /// Replace the category filter and rebuild the markers
    pub async fn set_categories<I: IntoIterator<Item = PlaceCategory>>(&self, categories: I) {
        self.state().selected = categories.into_iter().collect();
        self.rebuild_markers().await;
    }

    /// Run one proximity search per selected category and install the
    /// results as the complete marker set.
    ///
    /// A rebuild that is overtaken by a newer one, or whose map center moved
    /// meanwhile, is discarded.
    pub async fn rebuild_markers(&self) {
        let generation = self.marker_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (center, selected) = {
            let mut state = self.state();
            let Some(center) = state.scene.center() else {
                return;
            };
            state.scene.clear_markers();
            (center, state.selected.clone())
        };

        let searches = selected
            .into_iter()
            .map(|category| self.search_category(center, category));
        let results = join_all(searches).await;

        let mut state = self.state();
        if self.marker_generation.load(Ordering::SeqCst) != generation
            || state.scene.center() != Some(center)
        {
            debug!("Discarding superseded marker rebuild");
            return;
        }
        state.scene.replace_markers(results);
        info!("Map now shows {} markers", state.scene.markers().len());
    }

    async fn search_category(
        &self,
        center: Coordinate,
        category: PlaceCategory,
    ) -> (PlaceCategory, Vec<PointOfInterest>) {
        match self
            .provider
            .search_nearby(center, self.radius_m, category)
            .await
        {
            Ok(places) => (category, places),
            Err(e) => {
                warn!("Nearby search for {} failed: {}", category, e);
                (category, Vec::new())
            }
        }
    }

    /// Open the info popup of a marker
    pub fn open_marker(&self, marker_id: u64) -> Option<InfoPopup> {
        self.state().scene.open_popup(marker_id).cloned()
    }

    /// Ask the backend for an itinerary for the current destination
    #[instrument(skip(self))]
    pub async fn request_itinerary(&self) -> Result<ItineraryRequest> {
        let destination = {
            let mut state = self.state();
            let Some(destination) = state.destination.clone() else {
                return Err(TripwiseError::validation(
                    "Search for a destination before generating an itinerary.",
                ));
            };
            if state.itinerary_pending {
                return Ok(ItineraryRequest::Busy);
            }
            state.itinerary_pending = true;
            destination
        };

        let result = self.backend.itinerary(&destination).await;

        let mut state = self.state();
        state.itinerary_pending = false;
        let content = result.inspect_err(|e| {
            warn!("Error generating itinerary for '{}': {}", destination, e);
        })?;

        if state.destination.as_deref() != Some(destination.as_str()) {
            return Ok(ItineraryRequest::Superseded);
        }
        let itinerary = Itinerary::new(destination, content);
        state.itinerary = Some(itinerary.clone());
        Ok(ItineraryRequest::Generated(itinerary))
    }
}
