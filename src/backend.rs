//! HTTP client for the Tripwise travel backend
//!
//! Every backend endpoint is a GET with query-string parameters returning
//! JSON. Network failures, non-success status codes, unparseable bodies and
//! bodies carrying an `error` field all surface as [`TripwiseError::Api`].

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::BackendConfig;
use crate::models::{ChatCompletion, Place, WeatherReport, WikiSummary};
use crate::{Result, TripwiseError};

/// A display language offered by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
}

/// Operations of the travel backend
#[async_trait]
pub trait TravelBackend: Send + Sync {
    /// Resolve a free-text destination into a place
    async fn place(&self, destination: &str) -> Result<Place>;
    /// Current weather keyed by city name or address
    async fn weather(&self, city: &str) -> Result<WeatherReport>;
    /// Wikipedia excerpt for a place name
    async fn wiki(&self, place_name: &str) -> Result<WikiSummary>;
    /// AI-generated itinerary text for a destination
    async fn itinerary(&self, destination: &str) -> Result<String>;
    /// Translate a single text into `lang`
    async fn translate(&self, text: &str, lang: &str) -> Result<String>;
    /// Languages the translation endpoint supports
    async fn languages(&self) -> Result<Vec<LanguageOption>>;
    /// URL of the place photo proxy for a photo reference
    fn photo_url(&self, photo_ref: &str) -> String;
}

/// reqwest-based [`TravelBackend`]
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranslateResponse {
    Proxy { translated_text: String },
    DeepL { translations: Vec<DeepLTranslation> },
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LanguagesResponse {
    Codes(Vec<String>),
    Options(Vec<LanguageOption>),
    Map(BTreeMap<String, String>),
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url, config.timeout_seconds)
    }

    pub fn with_base_url(base_url: &str, timeout_seconds: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.into()))
            .user_agent("Tripwise/0.1.0")
            .build()
            .map_err(|e| TripwiseError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// GET `path` and return the JSON body, rejecting error payloads
    #[instrument(skip(self, params))]
    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.endpoint(path, params);
        let start_time = Instant::now();
        debug!("Backend request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TripwiseError::api(format!("Request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned HTTP {} for {}", status, path);
            return Err(TripwiseError::api(format!(
                "{path} returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TripwiseError::api(format!("Invalid JSON from {path}: {e}")))?;

        if let Some(error) = body.get("error").filter(|error| !error.is_null()) {
            let message = error
                .as_str()
                .map_or_else(|| error.to_string(), ToString::to_string);
            warn!("Backend reported an error for {}: {}", path, message);
            return Err(TripwiseError::api(format!("{path}: {message}")));
        }

        let elapsed = start_time.elapsed();
        info!("{} answered in {:.3}s", path, elapsed.as_secs_f64());
        if elapsed.as_secs() > 5 {
            warn!("Slow backend response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let body = self.get_json(path, params).await?;
        serde_json::from_value(body)
            .map_err(|e| TripwiseError::api(format!("Unexpected response shape from {path}: {e}")))
    }
}

#[async_trait]
impl TravelBackend for BackendClient {
    async fn place(&self, destination: &str) -> Result<Place> {
        self.get("/api/places", &[("destination", destination)]).await
    }

    async fn weather(&self, city: &str) -> Result<WeatherReport> {
        self.get("/api/weather", &[("city", city)]).await
    }

    async fn wiki(&self, place_name: &str) -> Result<WikiSummary> {
        self.get("/api/wiki", &[("lugar", place_name)]).await
    }

    async fn itinerary(&self, destination: &str) -> Result<String> {
        let completion: ChatCompletion = self.get("/api/ia", &[("lugar", destination)]).await?;
        completion
            .into_content()
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| TripwiseError::api("Itinerary response contained no content"))
    }

    async fn translate(&self, text: &str, lang: &str) -> Result<String> {
        let response: TranslateResponse = self
            .get("/api/translate", &[("text", text), ("lang", lang)])
            .await?;
        match response {
            TranslateResponse::Proxy { translated_text } => Ok(translated_text),
            TranslateResponse::DeepL { translations } => translations
                .into_iter()
                .next()
                .map(|t| t.text)
                .ok_or_else(|| TripwiseError::translation("Empty translation list")),
        }
    }

    async fn languages(&self) -> Result<Vec<LanguageOption>> {
        let response: LanguagesResponse = self.get("/api/languages", &[]).await?;
        Ok(match response {
            LanguagesResponse::Codes(codes) => codes
                .into_iter()
                .map(|code| LanguageOption {
                    name: code.clone(),
                    code,
                })
                .collect(),
            LanguagesResponse::Options(options) => options,
            LanguagesResponse::Map(map) => map
                .into_iter()
                .map(|(code, name)| LanguageOption { code, name })
                .collect(),
        })
    }

    fn photo_url(&self, photo_ref: &str) -> String {
        self.endpoint("/api/foto", &[("photo_ref", photo_ref)])
    }
}
