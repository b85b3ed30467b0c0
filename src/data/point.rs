use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A trackable entity on the map: a company, mine or deposit.
///
/// `properties` carries the complete record the point was built from, so a
/// selection callback sees every original field, not just the ones the map
/// uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GeoPoint {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            lat: None,
            lng: None,
            properties: Map::new(),
        }
    }

    pub fn with_position(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The coordinate, if both halves are present and in range
    pub fn position(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)).filter(LatLng::is_valid),
            _ => None,
        }
    }

    pub fn has_position(&self) -> bool {
        self.position().is_some()
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
