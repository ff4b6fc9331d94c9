//! Snapping arbitrary points onto the road graph.
//!
//! A query point is projected onto the nearest live edge (perpendicular
//! foot, clamped to the segment's endpoints).  If the foot lands on an
//! existing endpoint that node is the routing endpoint; otherwise the edge
//! is split there and the new node is used.
//!
//! Equidistant edges are resolved by input order: the edge built from the
//! earliest feature (and earliest segment within it) wins.

use tracing::debug;

use sp_core::{EdgeId, NodeId, ProjectedPoint, RouteConfig};

use crate::network::RoadGraph;
use crate::{NetworkError, NetworkResult};

/// Outcome of a successful snap.
#[derive(Clone, Debug, PartialEq)]
pub struct Snap {
    /// Node to route from / to.
    pub node: NodeId,
    /// Position of `node` (the foot of the perpendicular).
    pub point: ProjectedPoint,
    /// Distance from the query point to `point`.
    pub distance: f64,
    /// Edge the point was projected onto (retired if it was split).
    pub edge: EdgeId,
    /// The two halves replacing `edge`, when a split was needed.
    pub split: Option<[EdgeId; 2]>,
}

/// Maps query points to graph nodes, splitting edges where needed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointSnapper {
    tolerance: f64,
    epsilon: f64,
}

impl PointSnapper {
    /// Snapper that fails for points further than `tolerance` from every edge.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance, epsilon: 1e-6 }
    }

    pub fn from_config(cfg: &RouteConfig) -> Self {
        Self { tolerance: cfg.snap_tolerance, epsilon: cfg.snap_epsilon }
    }

    /// A foot closer than `epsilon` to an endpoint reuses that endpoint.
    /// Also the band within which two edge distances count as a tie.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Nearest live edge to `p` and its distance, without modifying the
    /// graph.  `None` for a graph with no edges.
    pub fn nearest_edge(&self, graph: &RoadGraph, p: ProjectedPoint) -> Option<(EdgeId, f64)> {
        let mut best: Option<(EdgeId, f64)> = None;
        for (entry, d2) in graph.spatial_idx.nearest_neighbor_iter_with_distance_2(&p.to_array()) {
            let (edge, d) = (entry.data, d2.sqrt());
            match best {
                None => best = Some((edge, d)),
                Some((b, bd)) => {
                    // Ascending distance: once past the tie band, done.
                    if d - bd > self.epsilon {
                        break;
                    }
                    if (graph.edge_rank(edge), edge) < (graph.edge_rank(b), b) {
                        best = Some((edge, d));
                    }
                }
            }
        }
        best
    }

    /// Snap `p` onto `graph`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::NoNearbyEdge`] if the graph has no edges or the
    /// nearest one is further than the tolerance.  The graph is unchanged on
    /// error.
    pub fn snap(&self, graph: &mut RoadGraph, p: ProjectedPoint) -> NetworkResult<Snap> {
        let Some((edge, distance)) = self.nearest_edge(graph, p) else {
            return Err(NetworkError::NoNearbyEdge {
                distance:  f64::INFINITY,
                tolerance: self.tolerance,
            });
        };
        if distance > self.tolerance {
            return Err(NetworkError::NoNearbyEdge { distance, tolerance: self.tolerance });
        }

        let (a, b) = graph.edge_segment(edge);
        let t = project_onto_segment(p, a, b);
        let foot = a.lerp(b, t);

        let snap = if foot.distance(a) <= self.epsilon {
            Snap { node: graph.edge_from[edge.index()], point: a, distance, edge, split: None }
        } else if foot.distance(b) <= self.epsilon {
            Snap { node: graph.edge_to[edge.index()], point: b, distance, edge, split: None }
        } else {
            let (node, halves) = graph.split_edge(edge, t);
            Snap {
                node,
                point: graph.node_pos[node.index()],
                distance,
                edge,
                split: Some(halves),
            }
        };

        debug!(
            x = p.x,
            y = p.y,
            node = %snap.node,
            edge = %edge,
            distance,
            split = snap.split.is_some(),
            "snapped point"
        );
        Ok(snap)
    }
}

/// Parameter `t ∈ [0, 1]` of the point on segment `a → b` closest to `p`.
fn project_onto_segment(p: ProjectedPoint, a: ProjectedPoint, b: ProjectedPoint) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_2 = dx * dx + dy * dy;
    if len_2 == 0.0 {
        return 0.0;
    }
    (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_2).clamp(0.0, 1.0)
}
