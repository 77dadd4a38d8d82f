//! Text content produced by the backend: wiki summaries and itineraries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plain-text Wikipedia excerpt for a destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WikiSummary {
    #[serde(default)]
    pub extract: String,
}

/// AI-generated travel plan for a destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Itinerary {
    pub destination: String,
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

impl Itinerary {
    #[must_use]
    pub fn new(destination: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            content: content.into(),
            generated_at: Utc::now(),
        }
    }
}

/// Chat-completion envelope returned by `/api/ia`
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: String,
}

impl ChatCompletion {
    /// Content of the first choice, if any
    #[must_use]
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_completion_first_choice() {
        let completion: ChatCompletion = serde_json::from_value(serde_json::json!({
            "id": "gen-1",
            "choices": [
                {"message": {"role": "assistant", "content": "Día 1: Louvre"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(completion.into_content().as_deref(), Some("Día 1: Louvre"));
    }

    #[test]
    fn test_chat_completion_without_choices() {
        let completion: ChatCompletion = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(completion.into_content().is_none());
    }

    #[test]
    fn test_wiki_summary_ignores_extra_fields() {
        let wiki: WikiSummary = serde_json::from_value(serde_json::json!({
            "title": "París",
            "extract": "París es la capital de Francia."
        }))
        .unwrap();
        assert_eq!(wiki.extract, "París es la capital de Francia.");
    }
}
