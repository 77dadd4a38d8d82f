//! Rendered map state: view center, markers and the open info popup

use serde::Serialize;

use crate::models::{Coordinate, PlaceCategory, PointOfInterest};

/// A marker placed for one point of interest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: u64,
    pub category: PlaceCategory,
    pub title: String,
    pub vicinity: Option<String>,
    pub position: Coordinate,
}

/// Content shown when a marker is clicked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoPopup {
    pub marker_id: u64,
    pub title: String,
    pub body: String,
}

impl Marker {
    #[must_use]
    pub fn popup(&self) -> InfoPopup {
        InfoPopup {
            marker_id: self.id,
            title: self.title.clone(),
            body: self.vicinity.clone().unwrap_or_default(),
        }
    }
}

/// Map view with its marker set.
///
/// Markers are never patched individually: [`MapScene::replace_markers`]
/// drops the whole set and installs the new one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MapScene {
    center: Option<Coordinate>,
    zoom: u8,
    markers: Vec<Marker>,
    popup: Option<InfoPopup>,
    #[serde(skip)]
    next_marker_id: u64,
}

impl MapScene {
    /// Show the map centered on `center`, discarding any previous view
    pub fn show(&mut self, center: Coordinate, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom;
        self.clear_markers();
    }

    /// Hide the map entirely
    pub fn hide(&mut self) {
        self.center = None;
        self.clear_markers();
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.center.is_some()
    }

    #[must_use]
    pub fn center(&self) -> Option<Coordinate> {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.popup = None;
    }

    /// Place one marker for a point of interest and return its id
    pub fn place_marker(&mut self, category: PlaceCategory, poi: PointOfInterest) -> u64 {
        self.next_marker_id += 1;
        let id = self.next_marker_id;
        self.markers.push(Marker {
            id,
            category,
            title: poi.name,
            vicinity: poi.vicinity,
            position: poi.coordinate,
        });
        id
    }

    /// Clear all markers, then place the given per-category results
    pub fn replace_markers<I>(&mut self, results: I)
    where
        I: IntoIterator<Item = (PlaceCategory, Vec<PointOfInterest>)>,
    {
        self.clear_markers();
        for (category, places) in results {
            for poi in places {
                self.place_marker(category, poi);
            }
        }
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn markers_for(&self, category: PlaceCategory) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |m| m.category == category)
    }

    /// Open the info popup of a marker; `None` if the marker is not on the map
    pub fn open_popup(&mut self, marker_id: u64) -> Option<&InfoPopup> {
        let popup = self.markers.iter().find(|m| m.id == marker_id)?.popup();
        self.popup = Some(popup);
        self.popup.as_ref()
    }

    #[must_use]
    pub fn popup(&self) -> Option<&InfoPopup> {
        self.popup.as_ref()
    }
}
