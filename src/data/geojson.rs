//! GeoJSON `FeatureCollection` ingestion.
//!
//! The companies endpoint returns Point features whose properties describe a
//! listed miner (`symbol`, `name`, `primary_commodity`, `latitude`, ...).
//! Other feeds use `id`/`category`; both spellings are accepted.

use crate::data::point::GeoPoint;
use crate::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Category given to features that carry none
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

impl Geometry {
    /// `(lat, lng)` of a Point geometry; GeoJSON stores `[lng, lat]`
    fn point(&self) -> Option<(f64, f64)> {
        if self.kind != "Point" {
            return None;
        }
        let coords = self.coordinates.as_array()?;
        let lng = coords.first()?.as_f64()?;
        let lat = coords.get(1)?.as_f64()?;
        Some((lat, lng))
    }
}

/// Parses a `FeatureCollection` into points, in feature order.
///
/// Features without a usable Point geometry fall back to `latitude` /
/// `longitude` properties and otherwise keep no coordinate; they are kept so
/// callers can still list them, and the map never renders them.
pub fn points_from_geojson_str(json: &str) -> Result<Vec<GeoPoint>> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    let points = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| feature_to_point(index, feature))
        .collect();
    Ok(points)
}

/// Parses a plain JSON array of [`GeoPoint`] records
pub fn points_from_json_str(json: &str) -> Result<Vec<GeoPoint>> {
    Ok(serde_json::from_str(json)?)
}

fn feature_to_point(index: usize, feature: Feature) -> GeoPoint {
    let properties = feature.properties.unwrap_or_default();

    let id = string_property(&properties, &["id", "symbol"])
        .or_else(|| feature.id.as_ref().and_then(value_to_string))
        .unwrap_or_else(|| index.to_string());
    let name = string_property(&properties, &["name", "symbol"]).unwrap_or_else(|| id.clone());
    let category = string_property(&properties, &["category", "primary_commodity", "commodity"])
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

    let position = match feature.geometry.as_ref() {
        Some(geometry) => {
            let point = geometry.point();
            if point.is_none() {
                log::debug!(
                    "feature {id} has {} geometry, trying coordinate properties",
                    geometry.kind
                );
            }
            point
        }
        None => None,
    }
    .or_else(|| {
        let lat = properties.get("latitude").and_then(Value::as_f64)?;
        let lng = properties.get("longitude").and_then(Value::as_f64)?;
        Some((lat, lng))
    });

    GeoPoint {
        id,
        name,
        category,
        lat: position.map(|(lat, _)| lat),
        lng: position.map(|(_, lng)| lng),
        properties,
    }
}

fn string_property(properties: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| properties.get(*key))
        .find_map(value_to_string)
        .filter(|s| !s.is_empty())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    const COMPANIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [115.86, -31.95] },
                "properties": {
                    "symbol": "NST",
                    "name": "Northern Star Resources",
                    "exchange": "ASX",
                    "primary_commodity": "Gold",
                    "secondary_commodities": ["Copper"],
                    "latitude": -31.95,
                    "longitude": 115.86
                }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {
                    "symbol": "AAL",
                    "name": "Anglo American",
                    "primary_commodity": "Diversified",
                    "latitude": null,
                    "longitude": null
                }
            },
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] },
                "properties": { "name": "Haul road", "latitude": -26.2, "longitude": 28.0 }
            }
        ],
        "metadata": { "total_companies": 3 }
    }"#;

    #[test]
    fn test_company_feature_collection() {
        let points = points_from_geojson_str(COMPANIES).unwrap();
        assert_eq!(points.len(), 3);

        let nst = &points[0];
        assert_eq!(nst.id, "NST");
        assert_eq!(nst.name, "Northern Star Resources");
        assert_eq!(nst.category, "Gold");
        assert_eq!((nst.lat, nst.lng), (Some(-31.95), Some(115.86)));
        assert_eq!(nst.property("exchange"), Some(&Value::from("ASX")));
        assert!(nst.property("secondary_commodities").unwrap().is_array());

        let aal = &points[1];
        assert_eq!(aal.id, "AAL");
        assert!(!aal.has_position());

        let road = &points[2];
        assert_eq!(road.id, "2");
        assert_eq!(road.category, UNKNOWN_CATEGORY);
        assert_eq!((road.lat, road.lng), (Some(-26.2), Some(28.0)));
    }

    #[test]
    fn test_feature_id_fallback() {
        let json = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "id": 42,
              "geometry": { "type": "Point", "coordinates": [28.0, -26.2] },
              "properties": { "name": "Deep level", "category": "Gold" } }
        ] }"#;
        let points = points_from_geojson_str(json).unwrap();
        assert_eq!(points[0].id, "42");
        assert_eq!(points[0].category, "Gold");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            points_from_geojson_str("{ \"features\": 7 }"),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_plain_point_array() {
        let points = points_from_json_str(
            r#"[{ "id": "1", "name": "A", "category": "Gold", "lat": 10, "lng": 20 }]"#,
        )
        .unwrap();
        assert_eq!(points[0].lat, Some(10.0));
    }
}
