//! Display language and translation
//!
//! Source content is always kept in the default language. Translated
//! variants live in a separate [`TranslationBundle`] for the active language,
//! so every lookup has a defined fallback.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::backend::TravelBackend;

pub const FALLBACK_LANGUAGE: &str = "EN";

/// Static labels shown by the front end, with built-in EN and ES text
const LABELS: &[(&str, &str, &str)] = &[
    ("Select language", "Select language", "Seleccionar idioma"),
    ("Translate", "Translate", "Traducir"),
    ("Translating...", "Translating...", "Traduciendo..."),
    ("Restaurants", "Restaurants", "Restaurantes"),
    ("Hotels", "Hotels", "Hoteles"),
    ("Parkings", "Parkings", "Aparcamientos"),
    ("Generate itinerary", "Generate itinerary", "Generar itinerario"),
    ("Generating...", "Generating...", "Generando..."),
    ("Destination summary", "Destination summary", "Resumen del destino"),
    ("Weather report", "Weather report", "Informe del tiempo"),
    ("Temperature", "Temperature", "Temperatura"),
    ("Enter a destination", "Enter a destination", "Introduce un destino"),
    ("Search", "Search", "Buscar"),
    ("Searching...", "Searching...", "Buscando..."),
    ("Destination information", "Destination information", "Información del destino"),
    ("Type", "Type", "Tipo"),
    ("Current weather", "Current weather", "Información del clima actual"),
    ("Rain", "Rain", "Lluvia"),
    ("Yes", "Yes", "Sí"),
    ("No", "No", "No"),
    ("Humidity", "Humidity", "Humedad"),
    ("Wind", "Wind", "Viento"),
    ("Feels like", "Feels like", "Sensación"),
];

/// Normalize a language code (`"en"` → `"EN"`)
#[must_use]
pub fn normalize_language(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Built-in label tables keyed by language
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for LabelCatalog {
    fn default() -> Self {
        let mut tables: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (key, en, es) in LABELS {
            tables
                .entry("EN".to_string())
                .or_default()
                .insert((*key).to_string(), (*en).to_string());
            tables
                .entry("ES".to_string())
                .or_default()
                .insert((*key).to_string(), (*es).to_string());
        }
        Self { tables }
    }
}

impl LabelCatalog {
    #[must_use]
    pub fn get(&self, language: &str, key: &str) -> Option<&str> {
        self.tables.get(language)?.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        LABELS.iter().map(|(key, _, _)| *key)
    }

    /// Label texts in `language`, falling back to EN, then to the key
    #[must_use]
    pub fn sources(&self, language: &str) -> BTreeMap<String, String> {
        self.keys()
            .map(|key| {
                let text = self
                    .get(language, key)
                    .or_else(|| self.get(FALLBACK_LANGUAGE, key))
                    .unwrap_or(key);
                (key.to_string(), text.to_string())
            })
            .collect()
    }
}

/// Translated strings for one language.
///
/// `sources` holds the latest source text requested per key. A translation
/// only counts for the source it was made from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslationBundle {
    pub language: String,
    pub entries: BTreeMap<String, String>,
    pub sources: BTreeMap<String, String>,
}

impl TranslationBundle {
    fn empty(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Self::default()
        }
    }

    /// Translation of `key`, if it was made from `source`
    #[must_use]
    pub fn get(&self, key: &str, source: &str) -> Option<&str> {
        if self.sources.get(key).map(String::as_str) != Some(source) {
            return None;
        }
        self.entries.get(key).map(String::as_str)
    }
}

/// Batch translation capability
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate every value of `texts` into `language`, keeping the keys.
    ///
    /// Never fails as a whole: an entry that cannot be translated maps to its
    /// source text.
    async fn translate_batch(
        &self,
        texts: &BTreeMap<String, String>,
        language: &str,
    ) -> BTreeMap<String, String>;
}

/// [`Translator`] issuing one backend `/api/translate` call per entry
pub struct BackendTranslator {
    backend: Arc<dyn TravelBackend>,
}

impl BackendTranslator {
    pub fn new(backend: Arc<dyn TravelBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Translator for BackendTranslator {
    #[instrument(skip(self, texts), fields(entries = texts.len()))]
    async fn translate_batch(
        &self,
        texts: &BTreeMap<String, String>,
        language: &str,
    ) -> BTreeMap<String, String> {
        let requests = texts.iter().map(|(key, text)| async move {
            let translated = match self.backend.translate(text, language).await {
                Ok(translated) if !translated.is_empty() => translated,
                Ok(_) => text.clone(),
                Err(e) => {
                    warn!("Translation error for '{}': {}", key, e);
                    text.clone()
                }
            };
            (key.clone(), translated)
        });
        join_all(requests).await.into_iter().collect()
    }
}

#[derive(Debug, Clone)]
struct LanguageState {
    current: String,
    bundle: TranslationBundle,
}

/// Active display language and its translations
pub struct LanguageContext {
    default_language: String,
    catalog: LabelCatalog,
    translator: Arc<dyn Translator>,
    state: Mutex<LanguageState>,
}

impl LanguageContext {
    pub fn new(default_language: &str, translator: Arc<dyn Translator>) -> Self {
        let default_language = normalize_language(default_language);
        Self {
            catalog: LabelCatalog::default(),
            translator,
            state: Mutex::new(LanguageState {
                current: default_language.clone(),
                bundle: TranslationBundle::empty(&default_language),
            }),
            default_language,
        }
    }

    fn state(&self) -> MutexGuard<'_, LanguageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    #[must_use]
    pub fn current_language(&self) -> String {
        self.state().current.clone()
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.state().current == self.default_language
    }

    #[must_use]
    pub fn bundle(&self) -> TranslationBundle {
        self.state().bundle.clone()
    }

    #[must_use]
    pub fn catalog(&self) -> &LabelCatalog {
        &self.catalog
    }

    /// Label texts in the default language, used as translation sources
    #[must_use]
    pub fn label_sources(&self) -> BTreeMap<String, String> {
        self.catalog.sources(&self.default_language)
    }

    /// Switch the display language and translate every known source value
    /// the built-in catalog does not already cover.
    ///
    /// Switching to the default language drops all translations without
    /// issuing any request.
    #[instrument(skip(self, sources), fields(entries = sources.len()))]
    pub async fn set_language(&self, language: &str, sources: &BTreeMap<String, String>) {
        let language = normalize_language(language);
        {
            let mut state = self.state();
            state.current = language.clone();
            state.bundle = TranslationBundle::empty(&language);
        }

        if language == self.default_language {
            info!("Display language reset to {}", language);
            return;
        }

        let pending: BTreeMap<String, String> = sources
            .iter()
            .filter(|(key, _)| self.catalog.get(&language, key).is_none())
            .map(|(key, text)| (key.clone(), text.clone()))
            .collect();
        if !pending.is_empty() && self.register(&language, &pending) {
            let translated = self.translator.translate_batch(&pending, &language).await;
            self.merge(&language, &pending, translated);
        }
        info!("Display language switched to {}", language);
    }

    /// Translate newly produced content into the active language.
    ///
    /// Each key now stands for the given source; a translation still in
    /// flight for an older source of the same key is dropped when it lands.
    pub async fn translate_content(&self, sources: &BTreeMap<String, String>) {
        let language = self.current_language();
        if language == self.default_language || sources.is_empty() {
            return;
        }
        if !self.register(&language, sources) {
            return;
        }
        let translated = self.translator.translate_batch(sources, &language).await;
        self.merge(&language, sources, translated);
    }

    /// Record `sources` as the latest text per key; false if `language` is
    /// no longer active
    fn register(&self, language: &str, sources: &BTreeMap<String, String>) -> bool {
        let mut state = self.state();
        if state.current != language {
            return false;
        }
        for (key, source) in sources {
            state.bundle.sources.insert(key.clone(), source.clone());
            state.bundle.entries.remove(key);
        }
        true
    }

    fn merge(
        &self,
        language: &str,
        sources: &BTreeMap<String, String>,
        translated: BTreeMap<String, String>,
    ) {
        let mut state = self.state();
        if state.current != language {
            debug!("Dropping {} translations for inactive language", language);
            return;
        }
        for (key, text) in translated {
            if state.bundle.sources.get(&key) != sources.get(&key) {
                debug!("Dropping translation of '{}' for replaced source", key);
                continue;
            }
            state.bundle.entries.insert(key, text);
        }
    }

    /// Text of a static label in the active language
    #[must_use]
    pub fn label(&self, key: &str) -> String {
        let state = self.state();
        state
            .bundle
            .entries
            .get(key)
            .map(String::as_str)
            .or_else(|| self.catalog.get(&state.current, key))
            .or_else(|| self.catalog.get(FALLBACK_LANGUAGE, key))
            .unwrap_or(key)
            .to_string()
    }

    /// Translated variant of dynamic content, or the source text
    #[must_use]
    pub fn text(&self, key: &str, source: &str) -> String {
        let state = self.state();
        if state.current == self.default_language {
            return source.to_string();
        }
        state
            .bundle
            .get(key, source)
            .unwrap_or(source)
            .to_string()
    }
}
