//! Scripted in-memory collaborators for unit tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::backend::{LanguageOption, TravelBackend};
use crate::maps::MapProvider;
use crate::models::{Coordinate, Place, PlaceCategory, PointOfInterest, WeatherReport, WikiSummary};
use crate::{Result, TripwiseError};

pub fn poi(name: &str) -> PointOfInterest {
    PointOfInterest {
        name: name.to_string(),
        vicinity: Some(format!("Near {name}")),
        coordinate: Coordinate::new(48.85, 2.35),
    }
}

pub fn place(name: &str, address: &str, categories: &[&str]) -> Place {
    Place {
        name: name.to_string(),
        address: address.to_string(),
        categories: categories.iter().map(ToString::to_string).collect(),
        rating: None,
        photo_ref: None,
        coordinate: None,
    }
}

pub fn weather(temperature: f64, description: &str) -> WeatherReport {
    WeatherReport {
        temperature,
        description: description.to_string(),
        rain: false,
        humidity: 55.0,
        wind: 10.0,
        feels_like: "Agradable".to_string(),
        feels_like_unit: "20".to_string(),
    }
}

/// Backend answering from fixed tables; anything missing fails.
///
/// Every call is recorded as `"<operation>:<argument>"`.
#[derive(Default)]
pub struct FakeBackend {
    places: HashMap<String, Place>,
    weather: HashMap<String, WeatherReport>,
    wiki: HashMap<String, String>,
    itineraries: HashMap<String, String>,
    translations: HashMap<(String, String), String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, query: &str, place: Place) -> Self {
        self.places.insert(query.to_string(), place);
        self
    }

    pub fn with_weather(mut self, city: &str, report: WeatherReport) -> Self {
        self.weather.insert(city.to_string(), report);
        self
    }

    pub fn with_wiki(mut self, name: &str, extract: &str) -> Self {
        self.wiki.insert(name.to_string(), extract.to_string());
        self
    }

    pub fn with_itinerary(mut self, destination: &str, content: &str) -> Self {
        self.itineraries
            .insert(destination.to_string(), content.to_string());
        self
    }

    pub fn with_translation(mut self, text: &str, lang: &str, translated: &str) -> Self {
        self.translations
            .insert((text.to_string(), lang.to_string()), translated.to_string());
        self
    }

    /// Delay the call recorded as `key` (e.g. `"place:Paris"`)
    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        let prefix = format!("{operation}:");
        self.calls()
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    async fn record(&self, operation: &str, argument: &str) {
        let key = format!("{operation}:{argument}");
        self.calls.lock().unwrap().push(key.clone());
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
    }
}

fn missing(what: &str, key: &str) -> TripwiseError {
    TripwiseError::api(format!("no scripted {what} for '{key}'"))
}

#[async_trait]
impl TravelBackend for FakeBackend {
    async fn place(&self, destination: &str) -> Result<Place> {
        self.record("place", destination).await;
        self.places
            .get(destination)
            .cloned()
            .ok_or_else(|| missing("place", destination))
    }

    async fn weather(&self, city: &str) -> Result<WeatherReport> {
        self.record("weather", city).await;
        self.weather
            .get(city)
            .cloned()
            .ok_or_else(|| missing("weather", city))
    }

    async fn wiki(&self, place_name: &str) -> Result<WikiSummary> {
        self.record("wiki", place_name).await;
        self.wiki
            .get(place_name)
            .map(|extract| WikiSummary {
                extract: extract.clone(),
            })
            .ok_or_else(|| missing("wiki", place_name))
    }

    async fn itinerary(&self, destination: &str) -> Result<String> {
        self.record("itinerary", destination).await;
        self.itineraries
            .get(destination)
            .cloned()
            .ok_or_else(|| missing("itinerary", destination))
    }

    async fn translate(&self, text: &str, lang: &str) -> Result<String> {
        self.record("translate", text).await;
        self.translations
            .get(&(text.to_string(), lang.to_string()))
            .cloned()
            .ok_or_else(|| missing("translation", text))
    }

    async fn languages(&self) -> Result<Vec<LanguageOption>> {
        self.record("languages", "").await;
        Ok(vec![
            LanguageOption {
                code: "ES".to_string(),
                name: "Español".to_string(),
            },
            LanguageOption {
                code: "EN".to_string(),
                name: "English".to_string(),
            },
        ])
    }

    fn photo_url(&self, photo_ref: &str) -> String {
        format!("http://backend.test/api/foto?photo_ref={photo_ref}")
    }
}

/// Map provider answering from fixed tables
#[derive(Default)]
pub struct FakeMaps {
    locations: HashMap<String, Coordinate>,
    places: HashMap<PlaceCategory, Vec<PointOfInterest>>,
    failing: HashSet<PlaceCategory>,
    delays: HashMap<PlaceCategory, Duration>,
    nearby_calls: Mutex<Vec<(PlaceCategory, u32)>>,
}

impl FakeMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.locations.insert(address.to_string(), coordinate);
        self
    }

    pub fn with_places(mut self, category: PlaceCategory, places: Vec<PointOfInterest>) -> Self {
        self.places.insert(category, places);
        self
    }

    pub fn failing(mut self, category: PlaceCategory) -> Self {
        self.failing.insert(category);
        self
    }

    pub fn with_delay(mut self, category: PlaceCategory, delay: Duration) -> Self {
        self.delays.insert(category, delay);
        self
    }

    pub fn nearby_calls(&self) -> usize {
        self.nearby_calls.lock().unwrap().len()
    }

    pub fn last_radius(&self) -> Option<u32> {
        self.nearby_calls.lock().unwrap().last().map(|(_, r)| *r)
    }
}

#[async_trait]
impl MapProvider for FakeMaps {
    async fn geocode(&self, address: &str) -> Result<Coordinate> {
        self.locations
            .get(address)
            .copied()
            .ok_or_else(|| TripwiseError::geocoding(address, "ZERO_RESULTS"))
    }

    async fn search_nearby(
        &self,
        _center: Coordinate,
        radius_m: u32,
        category: PlaceCategory,
    ) -> Result<Vec<PointOfInterest>> {
        self.nearby_calls.lock().unwrap().push((category, radius_m));
        if let Some(delay) = self.delays.get(&category) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&category) {
            return Err(TripwiseError::api(format!("{category} search failed")));
        }
        Ok(self.places.get(&category).cloned().unwrap_or_default())
    }
}
