//! Data models for the Tripwise front end
//!
//! This module contains the domain models organized by concern:
//! - Place: destinations, coordinates and points of interest
//! - Weather: current weather reports
//! - Content: wiki summaries and generated itineraries

pub mod content;
pub mod place;
pub mod weather;

// Re-export all public types for convenient access
pub use content::{ChatCompletion, Itinerary, WikiSummary};
pub use place::{Coordinate, Place, PlaceCategory, PointOfInterest};
pub use weather::WeatherReport;
