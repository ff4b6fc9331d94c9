//! Routing trait with Dijkstra and A* implementations.
//!
//! # Pluggability
//!
//! The orchestrator calls routing through the [`Router`] trait, so callers
//! can swap in other search strategies without touching the attempt loop.
//! [`DijkstraRouter`] is the default; [`AStarRouter`] returns the same
//! optimal cost and usually settles fewer nodes.
//!
//! # Direction
//!
//! Search follows [`OutArc`](crate::OutArc)s only, and the graph creates an
//! arc only for the directions an edge permits.  A backward-only edge is
//! therefore invisible to forward travel.
//!
//! # Determinism
//!
//! Distances are relaxed only on strict improvement, and the queue breaks
//! cost ties by insertion order, so among equal-cost paths the one
//! discovered first is returned.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use sp_core::{EdgeId, NodeId, ProjectedPoint};

use crate::network::RoadGraph;
use crate::{NetworkError, NetworkResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// One traversed edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// `true` if the edge was travelled against its coordinate order.
    pub reversed: bool,
}

/// The result of a routing query: edges in travel order and their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub steps: Vec<PathStep>,
    pub total_cost: f64,
    pub total_length: f64,
}

impl Path {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.steps.is_empty()
    }

    /// Traversed `EdgeId`s in order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.steps.iter().map(|s| s.edge)
    }

    /// Node sequence, start to end.  Empty for a trivial path.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            out.push(first.from);
        }
        out.extend(self.steps.iter().map(|s| s.to));
        out
    }

    /// Coordinates along the path in travel order.
    pub fn coordinates(&self, graph: &RoadGraph) -> Vec<ProjectedPoint> {
        self.nodes().into_iter().map(|n| graph.node_pos[n.index()]).collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one orchestrator can serve
/// concurrent requests.  The graph itself is per request and never shared.
pub trait Router: Send + Sync {
    /// Minimum-cost path from `from` to `to`.
    ///
    /// `from == to` yields an empty path, not an error.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::NodeNotFound`] if either node is not in the graph.
    /// - [`NetworkError::NoRoute`] if `to` is unreachable from `from`.
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> NetworkResult<Path>;
}

// ── Implementations ───────────────────────────────────────────────────────────

/// Plain Dijkstra over edge costs.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> NetworkResult<Path> {
        search(graph, from, to, |_| 0.0)
    }
}

/// A* with a straight-line heuristic.
///
/// The heuristic is `distance(n, target) × graph.min_cost_per_length()`,
/// which never overestimates: every edge costs at least its length times
/// that ratio, and no path is shorter than the straight line.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> NetworkResult<Path> {
        if !graph.contains_node(to) {
            return Err(NetworkError::NodeNotFound(to));
        }
        let target = graph.node_pos[to.index()];
        let scale = graph.min_cost_per_length();
        search(graph, from, to, |n| graph.node_pos[n.index()].distance(target) * scale)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Priority-queue entry.  Ordered so that `BinaryHeap` (a max-heap) pops the
/// lowest `priority` first and, among equal priorities, the earliest `seq`.
struct QueueEntry {
    priority: f64,
    seq: u64,
    cost: f64,
    node: NodeId,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Best-first search shared by both routers.  `heuristic` must be consistent
/// (`h(u) <= cost(u, v) + h(v)`); `|_| 0.0` gives Dijkstra.
fn search<H>(graph: &RoadGraph, from: NodeId, to: NodeId, heuristic: H) -> NetworkResult<Path>
where
    H: Fn(NodeId) -> f64,
{
    for n in [from, to] {
        if !graph.contains_node(n) {
            return Err(NetworkError::NodeNotFound(n));
        }
    }
    if from == to {
        return Ok(Path { steps: vec![], total_cost: 0.0, total_length: 0.0 });
    }

    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = step that reached v; None for unreached nodes and the source.
    let mut prev: Vec<Option<PathStep>> = vec![None; n];
    let mut settled = vec![false; n];

    dist[from.index()] = 0.0;
    let mut seq = 0u64;
    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry { priority: heuristic(from), seq, cost: 0.0, node: from });

    while let Some(QueueEntry { cost, node, .. }) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev, to, cost));
        }
        // Skip stale heap entries.
        if settled[node.index()] || cost > dist[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        for arc in graph.out_arcs(node) {
            let next = arc.to;
            if settled[next.index()] {
                continue;
            }
            let new_cost = cost + graph.edge_cost[arc.edge.index()];
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev[next.index()] = Some(PathStep {
                    edge: arc.edge,
                    from: node,
                    to: next,
                    reversed: arc.reversed,
                });
                seq += 1;
                heap.push(QueueEntry {
                    priority: new_cost + heuristic(next),
                    seq,
                    cost: new_cost,
                    node: next,
                });
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

fn reconstruct(graph: &RoadGraph, prev: &[Option<PathStep>], to: NodeId, total_cost: f64) -> Path {
    let mut steps = Vec::new();
    let mut cur = to;
    while let Some(step) = prev[cur.index()] {
        steps.push(step);
        cur = step.from;
    }
    steps.reverse();
    let total_length = steps.iter().map(|s| graph.edge_length[s.edge.index()]).sum();
    Path { steps, total_cost, total_length }
}
