//! Route output types.

use sp_core::{BoundingBox, CoreResult, FeatureId, GeoPoint, ProjectedPoint, Reprojector};
use sp_network::{FeatureAttributes, Path, RoadGraph};

use crate::{RouteError, RoutingResult};

// ── PathSegment ───────────────────────────────────────────────────────────────

/// A run of consecutive traversed edges that came from the same feature.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSegment {
    /// Projected coordinates in travel order.
    pub geometry:   Vec<ProjectedPoint>,
    pub attributes: FeatureAttributes,
    pub cost:       f64,
    pub length:     f64,
}

impl PathSegment {
    /// Render the geometry as WKT, e.g. `LineString (0 0, 10 0)`.
    pub fn to_wkt(&self) -> String {
        let coords = self
            .geometry
            .iter()
            .map(|p| format!("{} {}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(", ");
        format!("LineString ({coords})")
    }

    /// Geometry converted back to longitude/latitude.
    pub fn to_geographic(&self, reprojector: &Reprojector) -> CoreResult<Vec<GeoPoint>> {
        self.geometry.iter().map(|&p| reprojector.to_geographic(p)).collect()
    }
}

/// Group the steps of `path` into one [`PathSegment`] per run of edges from
/// the same decomposed feature.
pub(crate) fn segments_from_path(graph: &RoadGraph, path: &Path) -> Vec<PathSegment> {
    let mut segments: Vec<PathSegment> = Vec::new();
    let mut current: Option<FeatureId> = None;

    for step in &path.steps {
        let e = step.edge.index();
        let feature = graph.edge_feature[e];
        let to = graph.node_pos[step.to.index()];

        match segments.last_mut() {
            Some(seg) if current == Some(feature) => {
                seg.geometry.push(to);
                seg.cost += graph.edge_cost[e];
                seg.length += graph.edge_length[e];
            }
            _ => {
                segments.push(PathSegment {
                    geometry:   vec![graph.node_pos[step.from.index()], to],
                    attributes: graph.edge_attributes(step.edge).clone(),
                    cost:       graph.edge_cost[e],
                    length:     graph.edge_length[e],
                });
                current = Some(feature);
            }
        }
    }
    segments
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// A successful routing outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Traversed feature runs in travel order.  Empty when both points
    /// snapped to the same node.
    pub segments:     Vec<PathSegment>,
    pub total_cost:   f64,
    pub total_length: f64,
    /// Number of fetches made, including the successful one.
    pub attempts:     u32,
    /// The bounding box of the successful attempt.
    pub bbox:         BoundingBox,
    /// Snapped start and end positions.
    pub start:        ProjectedPoint,
    pub end:          ProjectedPoint,
}

impl Route {
    /// All coordinates along the route, with the shared vertex between
    /// consecutive segments listed once.
    pub fn coordinates(&self) -> Vec<ProjectedPoint> {
        let mut out: Vec<ProjectedPoint> = Vec::new();
        for seg in &self.segments {
            let skip = usize::from(out.last() == seg.geometry.first());
            out.extend(seg.geometry.iter().skip(skip).copied());
        }
        out
    }
}

// ── RouteResult ───────────────────────────────────────────────────────────────

/// Outcome of [`compute_route`](crate::RoutingOrchestrator::compute_route):
/// either a path or the error that ended the request.
#[derive(Debug)]
pub struct RouteResult {
    pub success: bool,
    pub path:    Option<Vec<PathSegment>>,
    pub error:   Option<RouteError>,
    /// Total cost of `path`; `None` on failure.
    pub total_cost: Option<f64>,
}

impl RouteResult {
    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<RoutingResult<Route>> for RouteResult {
    fn from(outcome: RoutingResult<Route>) -> Self {
        match outcome {
            Ok(route) => RouteResult {
                success:    true,
                total_cost: Some(route.total_cost),
                path:       Some(route.segments),
                error:      None,
            },
            Err(e) => RouteResult { success: false, path: None, error: Some(e), total_cost: None },
        }
    }
}
