//! Place and point-of-interest models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TripwiseError;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format as `"lat,lng"`, the form the places web service expects
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// A destination resolved by the backend place lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "tipos", default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "foto_ref", default)]
    pub photo_ref: Option<String>,
    #[serde(rename = "coordenadas", default)]
    pub coordinate: Option<Coordinate>,
}

impl Place {
    #[must_use]
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

/// Categories offered by the map filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Restaurant,
    Hotel,
    Parking,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 3] = [Self::Restaurant, Self::Hotel, Self::Parking];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Hotel => "hotel",
            Self::Parking => "parking",
        }
    }

    /// Place type understood by the nearby search service
    #[must_use]
    pub fn search_type(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Hotel => "lodging",
            Self::Parking => "parking",
        }
    }

    /// Key of the translatable filter label
    #[must_use]
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Restaurant => "Restaurants",
            Self::Hotel => "Hotels",
            Self::Parking => "Parkings",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceCategory {
    type Err = TripwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "restaurant" | "restaurants" => Ok(Self::Restaurant),
            "hotel" | "hotels" | "lodging" => Ok(Self::Hotel),
            "parking" | "parkings" => Ok(Self::Parking),
            other => Err(TripwiseError::validation(format!(
                "Unknown place category: {other}"
            ))),
        }
    }
}

/// A result of a proximity search
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PointOfInterest {
    pub name: String,
    pub vicinity: Option<String>,
    pub coordinate: Coordinate,
}
