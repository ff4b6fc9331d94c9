//! GeoJSON FeatureCollection parsing (feature `geojson`).
//!
//! Reads the `line_data` payload the web frontend posts: a FeatureCollection
//! whose features carry `id`, `pointA`, `pointB`, `pointC` properties and,
//! optionally, `direction` and `speed`.  Coordinates must already be in the
//! projected CRS; a third (z) ordinate is ignored.
//!
//! `Point`, `LineString`, `MultiLineString` and `Polygon` geometries are
//! parsed; whether non-linear ones are rejected or skipped is the graph
//! builder's decision.  Any other geometry type is a parse error.

use serde::Deserialize;
use serde_json::Value;

use sp_core::ProjectedPoint;
use sp_network::{Feature, FeatureAttributes, Geometry};

use crate::loader::parse_direction;
use crate::{SourceError, SourceResult};

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind:     String,
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    geometry:   RawGeometry,
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind:        String,
    coordinates: Value,
}

/// Parse a FeatureCollection document.
pub fn parse_feature_collection(json: &str) -> SourceResult<Vec<Feature>> {
    let raw: RawCollection =
        serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))?;
    collection_to_features(raw)
}

/// Like [`parse_feature_collection`] for an already-parsed JSON value.
pub fn feature_collection_from_value(value: Value) -> SourceResult<Vec<Feature>> {
    let raw: RawCollection =
        serde_json::from_value(value).map_err(|e| SourceError::Parse(e.to_string()))?;
    collection_to_features(raw)
}

fn collection_to_features(raw: RawCollection) -> SourceResult<Vec<Feature>> {
    if raw.kind != "FeatureCollection" {
        return Err(SourceError::Parse(format!(
            "expected a FeatureCollection, got {:?}",
            raw.kind
        )));
    }
    raw.features.into_iter().map(convert_feature).collect()
}

fn convert_feature(raw: RawFeature) -> SourceResult<Feature> {
    let props = raw.properties.unwrap_or_default();
    let text = |key: &str| props.get(key).map(value_text).unwrap_or_default();

    let attributes = FeatureAttributes {
        id:      text("id"),
        point_a: text("pointA"),
        point_b: text("pointB"),
        point_c: text("pointC"),
    };
    let direction = parse_direction(props.get("direction").map(value_text).as_deref(), &attributes.id)?;
    let speed = match props.get("speed") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_f64().ok_or_else(|| {
            SourceError::Parse(format!("speed {v} of feature {:?} is not a number", attributes.id))
        })?),
    };

    let geometry = convert_geometry(raw.geometry, &attributes.id)?;
    Ok(Feature { geometry, attributes, direction, speed })
}

fn convert_geometry(raw: RawGeometry, feature: &str) -> SourceResult<Geometry> {
    let bad = |what: &str| {
        SourceError::Parse(format!("feature {feature:?}: malformed {} coordinates ({what})", raw.kind))
    };
    let c = &raw.coordinates;
    Ok(match raw.kind.as_str() {
        "Point"           => Geometry::Point(position(c).ok_or_else(|| bad("position"))?),
        "LineString"      => Geometry::LineString(positions(c).ok_or_else(|| bad("position list"))?),
        "MultiLineString" => Geometry::MultiLineString(rings(c).ok_or_else(|| bad("nested list"))?),
        "Polygon"         => Geometry::Polygon(rings(c).ok_or_else(|| bad("nested list"))?),
        other => {
            return Err(SourceError::Parse(format!(
                "feature {feature:?}: unsupported geometry type {other}"
            )));
        }
    })
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

/// Strings verbatim, `null` as empty, anything else in its JSON form.
fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn position(v: &Value) -> Option<ProjectedPoint> {
    let arr = v.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    Some(ProjectedPoint::new(arr[0].as_f64()?, arr[1].as_f64()?))
}

fn positions(v: &Value) -> Option<Vec<ProjectedPoint>> {
    v.as_array()?.iter().map(position).collect()
}

fn rings(v: &Value) -> Option<Vec<Vec<ProjectedPoint>>> {
    v.as_array()?.iter().map(positions).collect()
}
