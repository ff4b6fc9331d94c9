//! CSV feature loader.
//!
//! # CSV format
//!
//! One row per vertex, in drawing order.  Rows sharing an `id` form one
//! feature; `part` (default 0) separates the lines of a multi-line feature.
//! Attribute columns are read from the first row of each feature.
//!
//! ```csv
//! id,part,x,y,pointA,pointB,pointC,direction,speed
//! r1,0,0,0,Bakkegata,Nedre,1,,
//! r1,0,100,0,,,,,
//! r2,0,100,0,Elvegata,Ovre,2,yes,40
//! r2,0,100,80,,,,,
//! ```
//!
//! Coordinates are in the projected CRS the orchestrator is configured with.
//!
//! **`direction`** field: empty for the configured default, otherwise any
//! value accepted by [`Direction::parse`] (`yes`/`1`/`forward`,
//! `-1`/`reverse`/`backward`, `no`/`both`/`0`).
//!
//! Features are returned in order of first appearance.  Vertices of one
//! feature need not be contiguous in the file.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use sp_core::{Direction, ProjectedPoint};
use sp_network::{Feature, FeatureAttributes, Geometry};

use crate::{SourceError, SourceResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct VertexRecord {
    id:        String,
    #[serde(default)]
    part:      u32,
    x:         f64,
    y:         f64,
    #[serde(default, rename = "pointA")]
    point_a:   String,
    #[serde(default, rename = "pointB")]
    point_b:   String,
    #[serde(default, rename = "pointC")]
    point_c:   String,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    speed:     Option<f64>,
}

/// Feature under construction: attributes from the first row, then one
/// coordinate list per part.
struct PendingFeature {
    attributes: FeatureAttributes,
    direction:  Option<Direction>,
    speed:      Option<f64>,
    parts:      Vec<(u32, Vec<ProjectedPoint>)>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load features from a vertex CSV file.
pub fn load_features_csv(path: &Path) -> SourceResult<Vec<Feature>> {
    let file = std::fs::File::open(path).map_err(SourceError::Io)?;
    load_features_reader(file)
}

/// Like [`load_features_csv`] but accepts any `Read` source.
pub fn load_features_reader<R: Read>(reader: R) -> SourceResult<Vec<Feature>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, PendingFeature> = HashMap::new();

    for result in csv_reader.deserialize::<VertexRecord>() {
        let VertexRecord { id, part, x, y, point_a, point_b, point_c, direction, speed } =
            result.map_err(|e| SourceError::Parse(e.to_string()))?;
        let point = ProjectedPoint::new(x, y);

        let pending = match by_id.entry(id) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let direction = parse_direction(direction.as_deref(), e.key())?;
                order.push(e.key().clone());
                let attributes = FeatureAttributes { id: e.key().clone(), point_a, point_b, point_c };
                e.insert(PendingFeature { attributes, direction, speed, parts: Vec::new() })
            }
        };

        match pending.parts.iter_mut().find(|(p, _)| *p == part) {
            Some((_, coords)) => coords.push(point),
            None => pending.parts.push((part, vec![point])),
        }
    }

    let features: Vec<Feature> = order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .map(PendingFeature::into_feature)
        .collect();
    debug!(features = features.len(), "loaded vertex CSV");
    Ok(features)
}

impl PendingFeature {
    fn into_feature(mut self) -> Feature {
        self.parts.sort_by_key(|(part, _)| *part);
        let mut lines: Vec<Vec<ProjectedPoint>> = self.parts.into_iter().map(|(_, c)| c).collect();
        let geometry = if lines.len() == 1 {
            Geometry::LineString(lines.remove(0))
        } else {
            Geometry::MultiLineString(lines)
        };
        Feature {
            geometry,
            attributes: self.attributes,
            direction:  self.direction,
            speed:      self.speed,
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Empty or missing → `None` (use the configured default).
pub(crate) fn parse_direction(raw: Option<&str>, feature: &str) -> SourceResult<Option<Direction>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Direction::parse(s).map(Some).ok_or_else(|| {
            SourceError::Parse(format!("invalid direction {s:?} for feature {feature:?}"))
        }),
    }
}
