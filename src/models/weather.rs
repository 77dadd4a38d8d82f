//! Weather report model and display methods

use serde::{Deserialize, Deserializer, Serialize};

/// Current weather for a destination, as returned by the backend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReport {
    /// Temperature in Celsius
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    /// Human-readable description of weather conditions
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Whether rain is expected
    #[serde(rename = "lluvia", default)]
    pub rain: bool,
    /// Relative humidity percentage (0-100)
    #[serde(rename = "humedad", default)]
    pub humidity: f64,
    /// Wind speed in km/h
    #[serde(rename = "viento", default)]
    pub wind: f64,
    /// Perceived conditions
    #[serde(rename = "sensacion", default, deserialize_with = "string_or_number")]
    pub feels_like: String,
    /// Perceived temperature value reported alongside `feels_like`
    #[serde(
        rename = "sensacion_unidad",
        default,
        deserialize_with = "string_or_number"
    )]
    pub feels_like_unit: String,
}

impl WeatherReport {
    /// Format temperature and description, e.g. `21.0°C - Sunny`
    #[must_use]
    pub fn format_temperature(&self) -> String {
        if self.description.is_empty() {
            format!("{:.1}°C", self.temperature)
        } else {
            format!("{:.1}°C - {}", self.temperature, self.description)
        }
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{:.0}%", self.humidity)
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.1} km/h", self.wind)
    }

    #[must_use]
    pub fn format_feels_like(&self) -> String {
        match (self.feels_like_unit.is_empty(), self.feels_like.is_empty()) {
            (false, false) => format!("{}°C - {}", self.feels_like_unit, self.feels_like),
            (false, true) => format!("{}°C", self.feels_like_unit),
            (true, _) => self.feels_like.clone(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherReport {
        serde_json::from_value(serde_json::json!({
            "temperatura": 21.0,
            "descripcion": "Soleado",
            "lluvia": false,
            "humedad": 60,
            "viento": 12.5,
            "sensacion": "Agradable",
            "sensacion_unidad": 22
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_backend_weather() {
        let weather = sample();
        assert_eq!(weather.temperature, 21.0);
        assert_eq!(weather.description, "Soleado");
        assert!(!weather.rain);
        assert_eq!(weather.humidity, 60.0);
        assert_eq!(weather.feels_like, "Agradable");
        assert_eq!(weather.feels_like_unit, "22");
    }

    #[test]
    fn test_format_lines() {
        let weather = sample();
        assert_eq!(weather.format_temperature(), "21.0°C - Soleado");
        assert_eq!(weather.format_humidity(), "60%");
        assert_eq!(weather.format_wind(), "12.5 km/h");
        assert_eq!(weather.format_feels_like(), "22°C - Agradable");
    }

    #[test]
    fn test_missing_optional_fields() {
        let weather: WeatherReport =
            serde_json::from_value(serde_json::json!({"temperatura": -3.5})).unwrap();
        assert_eq!(weather.format_temperature(), "-3.5°C");
        assert_eq!(weather.format_feels_like(), "");
    }
}
