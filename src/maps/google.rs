//! Google Maps web-service implementation of [`MapProvider`]

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::MapProvider;
use crate::config::MapsConfig;
use crate::models::{Coordinate, PlaceCategory, PointOfInterest};
use crate::{Result, TripwiseError};

/// Client for the Google Geocoding and Places Nearby Search APIs
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinate,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    name: String,
    vicinity: Option<String>,
    geometry: Geometry,
}

impl From<NearbyResult> for PointOfInterest {
    fn from(result: NearbyResult) -> Self {
        PointOfInterest {
            name: result.name,
            vicinity: result.vicinity,
            coordinate: result.geometry.location,
        }
    }
}

impl GoogleMapsClient {
    /// Create a client from configuration; an API key is required
    pub fn new(config: &MapsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TripwiseError::config("Missing maps.api_key for Google Maps"))?;
        Self::with_base_url(&config.base_url, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Tripwise/0.1.0")
            .build()
            .map_err(|e| TripwiseError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TripwiseError::api(format!("Maps request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TripwiseError::api(format!(
                "Maps API returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TripwiseError::api(format!("Failed to parse maps response: {e}")))
    }
}

#[async_trait]
impl MapProvider for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Coordinate> {
        let url = format!(
            "{}/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            urlencoding::encode(&self.api_key)
        );

        let response: GeocodeResponse = self.fetch(&url).await?;
        if response.status != "OK" {
            if let Some(message) = &response.error_message {
                debug!("Geocoding error message: {}", message);
            }
            return Err(TripwiseError::geocoding(address, response.status));
        }

        let coordinate = response
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)
            .ok_or_else(|| TripwiseError::geocoding(address, "no results"))?;

        info!("Geocoded '{}' to ({})", address, coordinate);
        Ok(coordinate)
    }

    #[instrument(skip(self, category), fields(category = %category))]
    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_m: u32,
        category: PlaceCategory,
    ) -> Result<Vec<PointOfInterest>> {
        let url = format!(
            "{}/place/nearbysearch/json?location={}&radius={}&type={}&key={}",
            self.base_url,
            urlencoding::encode(&center.to_query()),
            radius_m,
            category.search_type(),
            urlencoding::encode(&self.api_key)
        );

        let response: NearbyResponse = self.fetch(&url).await?;
        match response.status.as_str() {
            "OK" => {
                let places: Vec<PointOfInterest> =
                    response.results.into_iter().map(Into::into).collect();
                info!("Found {} {} places near ({})", places.len(), category, center);
                Ok(places)
            }
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => {
                warn!(
                    "Nearby search for {} failed: {} {}",
                    category,
                    status,
                    response.error_message.as_deref().unwrap_or_default()
                );
                Err(TripwiseError::api(format!(
                    "Nearby search for {category} returned {status}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let config = MapsConfig::default();
        assert!(matches!(
            GoogleMapsClient::new(&config),
            Err(TripwiseError::Config { .. })
        ));
    }

    #[test]
    fn test_nearby_result_conversion() {
        let result: NearbyResult = serde_json::from_value(serde_json::json!({
            "name": "Le Comptoir",
            "vicinity": "9 Carrefour de l'Odéon, Paris",
            "geometry": {"location": {"lat": 48.852, "lng": 2.339}},
            "types": ["restaurant", "food"]
        }))
        .unwrap();

        let poi: PointOfInterest = result.into();
        assert_eq!(poi.name, "Le Comptoir");
        assert_eq!(poi.vicinity.as_deref(), Some("9 Carrefour de l'Odéon, Paris"));
        assert_eq!(poi.coordinate, Coordinate::new(48.852, 2.339));
    }
}
