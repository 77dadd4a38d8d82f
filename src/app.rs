//! Application shell wiring search, map panel and language together

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::backend::{LanguageOption, TravelBackend};
use crate::config::TripwiseConfig;
use crate::i18n::{BackendTranslator, LanguageContext, Translator, normalize_language};
use crate::maps::{InfoPopup, ItineraryRequest, MapProvider, MapScene, PlacesPanel};
use crate::models::{Place, PlaceCategory, WeatherReport};
use crate::search::DestinationSearch;
use crate::{Result, TripwiseError};

/// Bundle key of the translated wiki excerpt
pub const WIKI_KEY: &str = "wiki.extract";
/// Bundle key of the translated itinerary text
pub const ITINERARY_KEY: &str = "itinerary.content";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceView {
    pub name: String,
    pub address: String,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub temperature: String,
    pub rain: String,
    pub humidity: String,
    pub wind: String,
    pub feels_like: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub category: PlaceCategory,
    pub label: String,
    pub selected: bool,
}

/// Everything the front end renders, in the active display language
#[derive(Debug, Clone, Serialize)]
pub struct AppView {
    pub language: String,
    pub labels: BTreeMap<String, String>,
    pub query: String,
    pub place: Option<PlaceView>,
    pub weather: Option<WeatherView>,
    pub wiki: Option<String>,
    pub destination: Option<String>,
    pub itinerary: Option<String>,
    pub categories: Vec<CategoryView>,
    pub scene: MapScene,
    pub loading: bool,
    pub itinerary_pending: bool,
    pub error: Option<String>,
}

/// Language codes look like `EN`, `es` or `PT-BR`
fn is_language_code(code: &str) -> bool {
    let code = normalize_language(code);
    code.len() >= 2 && code.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}

pub struct TravelPlanner {
    backend: Arc<dyn TravelBackend>,
    search: DestinationSearch,
    panel: PlacesPanel,
    language: LanguageContext,
}

impl TravelPlanner {
    pub fn new(
        backend: Arc<dyn TravelBackend>,
        provider: Arc<dyn MapProvider>,
        translator: Arc<dyn Translator>,
        config: &TripwiseConfig,
    ) -> Self {
        Self {
            search: DestinationSearch::new(backend.clone(), config.backend.weather_key),
            panel: PlacesPanel::new(provider, backend.clone(), &config.maps),
            language: LanguageContext::new(&config.language.default, translator),
            backend,
        }
    }

    /// Planner translating through the backend's translate endpoint
    pub fn with_backend_translator(
        backend: Arc<dyn TravelBackend>,
        provider: Arc<dyn MapProvider>,
        config: &TripwiseConfig,
    ) -> Self {
        let translator = Arc::new(BackendTranslator::new(backend.clone()));
        Self::new(backend, provider, translator, config)
    }

    /// Run a destination search, then show the resolved place on the map
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> AppView {
        let state = self.search.submit(query).await;
        if query.trim().is_empty() || state.superseded {
            return self.view();
        }

        match &state.place {
            Some(place) => {
                self.panel.set_destination(&place.name).await;
            }
            None => self.panel.clear_destination(),
        }
        if !self.search.is_current(state.generation) {
            return self.view();
        }
        if let Some(wiki) = &state.wiki {
            self.language
                .translate_content(&BTreeMap::from([(
                    WIKI_KEY.to_string(),
                    wiki.extract.clone(),
                )]))
                .await;
        }
        self.view()
    }

    /// Generate an itinerary for the current destination and translate it
    /// when a non-default language is active
    #[instrument(skip(self))]
    pub async fn generate_itinerary(&self) -> Result<AppView> {
        match self.panel.request_itinerary().await? {
            ItineraryRequest::Generated(itinerary) => {
                info!("Itinerary generated for '{}'", itinerary.destination);
                self.language
                    .translate_content(&BTreeMap::from([(
                        ITINERARY_KEY.to_string(),
                        itinerary.content,
                    )]))
                    .await;
            }
            ItineraryRequest::Busy => info!("Itinerary request already in flight"),
            ItineraryRequest::Superseded => info!("Destination changed during itinerary generation"),
        }
        Ok(self.view())
    }

    /// Switch the display language, translating labels and fetched content
    #[instrument(skip(self))]
    pub async fn set_language(&self, language: &str) -> Result<AppView> {
        if !is_language_code(language) {
            return Err(TripwiseError::validation(format!(
                "Invalid language code '{}'.",
                language.trim()
            )));
        }
        let mut sources = self.language.label_sources();
        if let Some(wiki) = self.search.snapshot().wiki {
            sources.insert(WIKI_KEY.to_string(), wiki.extract);
        }
        if let Some(itinerary) = self.panel.snapshot().itinerary {
            sources.insert(ITINERARY_KEY.to_string(), itinerary.content);
        }
        self.language.set_language(language, &sources).await;
        Ok(self.view())
    }

    pub async fn toggle_category(&self, category: PlaceCategory) -> AppView {
        self.panel.toggle_category(category).await;
        self.view()
    }

    pub fn open_marker(&self, marker_id: u64) -> Option<InfoPopup> {
        self.panel.open_marker(marker_id)
    }

    pub async fn languages(&self) -> Result<Vec<LanguageOption>> {
        self.backend.languages().await
    }

    #[must_use]
    pub fn current_language(&self) -> String {
        self.language.current_language()
    }

    /// Current state rendered in the active language
    #[must_use]
    pub fn view(&self) -> AppView {
        let search = self.search.snapshot();
        let panel = self.panel.snapshot();
        let labels = self
            .language
            .catalog()
            .keys()
            .map(|key| (key.to_string(), self.language.label(key)))
            .collect();

        let categories = PlaceCategory::ALL
            .iter()
            .map(|category| CategoryView {
                category: *category,
                label: self.language.label(category.label_key()),
                selected: panel.selected.contains(category),
            })
            .collect();

        AppView {
            language: self.language.current_language(),
            labels,
            query: search.query,
            place: search.place.as_ref().map(|place| self.place_view(place)),
            weather: search.weather.as_ref().map(|report| self.weather_view(report)),
            wiki: search
                .wiki
                .map(|wiki| self.language.text(WIKI_KEY, &wiki.extract)),
            destination: panel.destination,
            itinerary: panel
                .itinerary
                .map(|itinerary| self.language.text(ITINERARY_KEY, &itinerary.content)),
            categories,
            scene: panel.scene,
            loading: search.loading,
            itinerary_pending: panel.itinerary_pending,
            error: search.error,
        }
    }

    fn place_view(&self, place: &Place) -> PlaceView {
        PlaceView {
            name: place.name.clone(),
            address: place.address.clone(),
            category: place.primary_category().map(ToString::to_string),
            rating: place.rating,
            photo_url: place
                .photo_ref
                .as_deref()
                .map(|photo_ref| self.backend.photo_url(photo_ref)),
        }
    }

    fn weather_view(&self, report: &WeatherReport) -> WeatherView {
        WeatherView {
            temperature: report.format_temperature(),
            rain: self.language.label(if report.rain { "Yes" } else { "No" }),
            humidity: report.format_humidity(),
            wind: report.format_wind(),
            feels_like: report.format_feels_like(),
        }
    }
}
