//! Destination search
//!
//! A submitted query fans out into the place lookup (followed by the wiki
//! lookup for the resolved name) and the weather lookup. Failures are logged
//! and folded into one cumulative message; none of them stops the others.
//! Every search carries a generation number so that responses belonging to
//! an older search never overwrite the state of a newer one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::backend::TravelBackend;
use crate::config::WeatherKey;
use crate::models::{Place, WeatherReport, WikiSummary};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a destination.";
pub const PLACE_FAILED_MESSAGE: &str = "Failed to fetch place.";
pub const WIKI_FAILED_MESSAGE: &str = "Failed to fetch wiki summary.";
pub const WEATHER_FAILED_MESSAGE: &str = "Failed to fetch weather.";

/// Observable state of the destination search
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchState {
    pub query: String,
    pub place: Option<Place>,
    pub weather: Option<WeatherReport>,
    pub wiki: Option<WikiSummary>,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    pub completed_at: Option<DateTime<Utc>>,
    /// Set on the state returned by [`DestinationSearch::submit`] when a
    /// newer submission replaced that search before it settled
    #[serde(skip)]
    pub superseded: bool,
}

impl SearchState {
    fn push_error(&mut self, message: &str) {
        self.error = Some(match self.error.take() {
            Some(existing) => format!("{existing} {message}"),
            None => message.to_string(),
        });
    }
}

/// Strip diacritics so `"Bogotá"` becomes `"Bogota"`
#[must_use]
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Runs destination searches against the backend
pub struct DestinationSearch {
    backend: Arc<dyn TravelBackend>,
    weather_key: WeatherKey,
    state: Mutex<SearchState>,
    generation: AtomicU64,
}

impl DestinationSearch {
    pub fn new(backend: Arc<dyn TravelBackend>, weather_key: WeatherKey) -> Self {
        Self {
            backend,
            weather_key,
            state: Mutex::new(SearchState::default()),
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchState {
        self.state().clone()
    }

    /// Apply `update` only while `generation` is still the latest search
    fn apply(&self, generation: u64, update: impl FnOnce(&mut SearchState)) -> bool {
        let mut state = self.state();
        if state.generation != generation {
            debug!(
                "Dropping response of search #{} (current #{})",
                generation, state.generation
            );
            return false;
        }
        update(&mut state);
        true
    }

    /// Submit a query and wait until every lookup of this search has settled.
    ///
    /// Returns the resulting state. If a newer submission arrived meanwhile
    /// the state belongs to it and `superseded` is set.
    ///
    /// An empty query only sets the validation error, but it still ends any
    /// search in flight so no later lookup result lands next to it.
    #[instrument(skip(self))]
    pub async fn submit(&self, query: &str) -> SearchState {
        let query = query.trim();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if query.is_empty() {
            let mut state = self.state();
            state.generation = generation;
            state.loading = false;
            state.error = Some(EMPTY_QUERY_MESSAGE.to_string());
            return state.clone();
        }

        {
            let mut state = self.state();
            *state = SearchState {
                query: query.to_string(),
                loading: true,
                generation,
                ..SearchState::default()
            };
        }
        info!("Search #{} for '{}'", generation, query);

        match self.weather_key {
            WeatherKey::Query => {
                let (_place, ()) = tokio::join!(
                    self.lookup_place_and_wiki(generation, query),
                    self.lookup_weather(generation, query)
                );
            }
            WeatherKey::Address => {
                let place = self.lookup_place_and_wiki(generation, query).await;
                let key = place
                    .as_ref()
                    .map(|p| p.address.as_str())
                    .filter(|address| !address.is_empty())
                    .unwrap_or(query);
                self.lookup_weather(generation, key).await;
            }
        }

        let current = self.apply(generation, |state| {
            state.loading = false;
            state.completed_at = Some(Utc::now());
        });
        let mut state = self.snapshot();
        state.superseded = !current;
        state
    }

    /// Whether `generation` is still the latest submission
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Place lookup followed by the dependent wiki lookup; returns the place
    async fn lookup_place_and_wiki(
        &self,
        generation: u64,
        query: &str,
    ) -> Option<Place> {
        let place = match self.backend.place(query).await {
            Ok(place) => place,
            Err(e) => {
                warn!("Error fetching place for '{}': {}", query, e);
                self.apply(generation, |state| state.push_error(PLACE_FAILED_MESSAGE));
                return None;
            }
        };

        if !self.apply(generation, |state| state.place = Some(place.clone())) {
            return None;
        }

        let wiki_key = strip_diacritics(&place.name);
        match self.backend.wiki(&wiki_key).await {
            Ok(wiki) => {
                self.apply(generation, |state| state.wiki = Some(wiki));
            }
            Err(e) => {
                warn!("Error fetching wiki summary for '{}': {}", wiki_key, e);
                self.apply(generation, |state| state.push_error(WIKI_FAILED_MESSAGE));
            }
        }

        Some(place)
    }

    async fn lookup_weather(&self, generation: u64, key: &str) {
        match self.backend.weather(key).await {
            Ok(weather) => {
                self.apply(generation, |state| state.weather = Some(weather));
            }
            Err(e) => {
                warn!("Error fetching weather for '{}': {}", key, e);
                self.apply(generation, |state| state.push_error(WEATHER_FAILED_MESSAGE));
            }
        }
    }
}
