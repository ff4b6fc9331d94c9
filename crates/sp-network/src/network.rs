//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph is one arena per routing attempt.  Nodes, edges and the
//! decomposed features they came from live in parallel `Vec`s indexed by
//! `NodeId`, `EdgeId` and `FeatureId`:
//!
//! ```text
//! node_pos[n]                      position of node n
//! edge_from[e], edge_to[e]         endpoints, in coordinate order
//! edge_length[e], edge_cost[e]     planar length and traversal cost
//! edge_direction[e]                which way(s) e may be travelled
//! edge_feature[e]                  FeatureId of the originating line
//! ```
//!
//! Outgoing adjacency is kept as one `Vec<OutArc>` per node rather than CSR:
//! snapping splits edges after the graph is built, which appends nodes and
//! edges.  A split edge stays in the arrays (so `EdgeId`s never shift) but is
//! marked dead and unlinked from the adjacency lists and the spatial index.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds one line segment per live edge, used by
//! [`PointSnapper`](crate::PointSnapper) to find the nearest edge to a query
//! point.
//!
//! # Node merging
//!
//! Endpoints closer than the coincidence tolerance resolve to one node.
//! Lookup goes through a hash grid keyed by `floor(coord / tolerance)`, so a
//! match is always in the 3×3 block of cells around the query.

use rstar::primitives::{GeomWithData, Line};
use rstar::RTree;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use sp_core::{Direction, EdgeId, FeatureId, GeometryPolicy, NodeId, ProjectedPoint, RouteConfig};

use crate::feature::{Feature, FeatureAttributes, LineFeature};
use crate::NetworkResult;

/// R-tree entry: the straight segment of one live edge.
pub(crate) type SegmentEntry = GeomWithData<Line<[f64; 2]>, EdgeId>;

// ── OutArc ────────────────────────────────────────────────────────────────────

/// One permitted traversal of an edge, stored in the adjacency list of the
/// node it starts from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutArc {
    pub edge: EdgeId,
    /// Node reached by following the arc.
    pub to: NodeId,
    /// `true` if the arc runs against the edge's coordinate order.
    pub reversed: bool,
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Navigable graph built from one attempt's feature set.
///
/// Edge and node fields are `pub` for direct indexed access on the search
/// hot path.  Do not construct directly; use [`GraphBuilder`].
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Planar position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<ProjectedPoint>,

    node_arcs: Vec<Vec<OutArc>>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Planar length in projection units.
    pub edge_length: Vec<f64>,

    /// Traversal cost: `length`, or `length / speed` when a speed applies.
    pub edge_cost: Vec<f64>,

    pub edge_direction: Vec<Direction>,

    pub edge_feature: Vec<FeatureId>,

    /// Input-order rank.  Split halves inherit their parent's rank so
    /// snapping tie-breaks stay tied to the original feature ordering.
    edge_rank: Vec<u32>,

    edge_live: Vec<bool>,

    // ── Feature arena ─────────────────────────────────────────────────────
    features: Vec<LineFeature>,

    // ── Spatial index ─────────────────────────────────────────────────────
    pub(crate) spatial_idx: RTree<SegmentEntry>,
}

impl RoadGraph {
    /// Construct an empty graph with no nodes or edges.
    ///
    /// Any snap against an empty graph fails with
    /// [`NetworkError::NoNearbyEdge`](crate::NetworkError::NoNearbyEdge).
    pub fn empty() -> Self {
        GraphBuilder::new(BuildOptions::default()).build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of edge slots, including edges retired by splitting.
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// Number of edges that can still be traversed.
    pub fn live_edge_count(&self) -> usize {
        self.edge_live.iter().filter(|&&l| l).count()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// `false` for edges replaced by a split.
    #[inline]
    pub fn is_live(&self, edge: EdgeId) -> bool {
        self.edge_live.get(edge.index()).copied().unwrap_or(false)
    }

    /// Iterator over all live `EdgeId`s in ascending order.
    pub fn live_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(i, _)| EdgeId::from_index(i))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Permitted outgoing traversals from `node`, in edge-creation order.
    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> &[OutArc] {
        &self.node_arcs[node.index()]
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.node_arcs[node.index()].len()
    }

    /// Endpoint positions of `edge` in coordinate order.
    #[inline]
    pub fn edge_segment(&self, edge: EdgeId) -> (ProjectedPoint, ProjectedPoint) {
        (
            self.node_pos[self.edge_from[edge.index()].index()],
            self.node_pos[self.edge_to[edge.index()].index()],
        )
    }

    /// Closest node to `p` by straight-line distance (lowest id on ties).
    /// `None` for an empty graph.
    ///
    /// Linear scan; routing endpoints come from [`PointSnapper`](crate::PointSnapper)
    /// instead, which does not require the point to sit near a node.
    pub fn nearest_node(&self, p: ProjectedPoint) -> Option<NodeId> {
        self.node_pos
            .iter()
            .enumerate()
            .map(|(i, pos)| (pos.distance_2(p), i))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, i)| NodeId::from_index(i))
    }

    #[inline]
    pub(crate) fn edge_rank(&self, edge: EdgeId) -> u32 {
        self.edge_rank[edge.index()]
    }

    // ── Feature lookups ───────────────────────────────────────────────────

    pub fn feature(&self, id: FeatureId) -> &LineFeature {
        &self.features[id.index()]
    }

    /// Attributes of the feature `edge` was built from.
    pub fn edge_attributes(&self, edge: EdgeId) -> &FeatureAttributes {
        &self.features[self.edge_feature[edge.index()].index()].attributes
    }

    // ── Search support ────────────────────────────────────────────────────

    /// Smallest `cost / length` over live edges with positive length.
    ///
    /// Straight-line distance × this ratio never overestimates the cost of
    /// reaching a point, which makes it an admissible A* heuristic scale.
    /// Returns 0 for a graph with no such edge.
    pub fn min_cost_per_length(&self) -> f64 {
        let ratio = self
            .live_edges()
            .filter_map(|e| {
                let len = self.edge_length[e.index()];
                (len > 0.0).then(|| self.edge_cost[e.index()] / len)
            })
            .fold(f64::INFINITY, f64::min);
        if ratio.is_finite() { ratio } else { 0.0 }
    }

    // ── Mutation (snapping only) ──────────────────────────────────────────

    /// Replace `edge` with two edges meeting at a new node placed at
    /// parameter `t ∈ (0, 1)` along it.
    ///
    /// Both halves keep the original direction, feature and rank; length and
    /// cost are divided in proportion `t : 1 − t`, so the halves sum to the
    /// original.  No other node or edge is touched.
    pub(crate) fn split_edge(&mut self, edge: EdgeId, t: f64) -> (NodeId, [EdgeId; 2]) {
        let i = edge.index();
        let (from, to) = (self.edge_from[i], self.edge_to[i]);
        let (a, b) = self.edge_segment(edge);
        let at = a.lerp(b, t);

        // Retire the original.
        self.edge_live[i] = false;
        self.node_arcs[from.index()].retain(|arc| arc.edge != edge);
        self.node_arcs[to.index()].retain(|arc| arc.edge != edge);
        self.spatial_idx.remove(&segment_entry(a, b, edge));

        let mid = NodeId::from_index(self.node_pos.len());
        self.node_pos.push(at);
        self.node_arcs.push(Vec::new());

        let length = self.edge_length[i];
        let cost = self.edge_cost[i];
        let (len_1, cost_1) = (length * t, cost * t);
        let direction = self.edge_direction[i];
        let feature = self.edge_feature[i];
        let rank = self.edge_rank[i];

        let first = self.push_edge(from, mid, len_1, cost_1, direction, feature, rank);
        let second = self.push_edge(mid, to, length - len_1, cost - cost_1, direction, feature, rank);
        self.spatial_idx.insert(segment_entry(a, at, first));
        self.spatial_idx.insert(segment_entry(at, b, second));

        (mid, [first, second])
    }

    #[allow(clippy::too_many_arguments)]
    fn push_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        length: f64,
        cost: f64,
        direction: Direction,
        feature: FeatureId,
        rank: u32,
    ) -> EdgeId {
        let id = EdgeId::from_index(self.edge_to.len());
        self.edge_from.push(from);
        self.edge_to.push(to);
        self.edge_length.push(length);
        self.edge_cost.push(cost);
        self.edge_direction.push(direction);
        self.edge_feature.push(feature);
        self.edge_rank.push(rank);
        self.edge_live.push(true);
        link_arcs(&mut self.node_arcs, id, from, to, direction);
        id
    }
}

fn segment_entry(a: ProjectedPoint, b: ProjectedPoint, edge: EdgeId) -> SegmentEntry {
    GeomWithData::new(Line::new(a.to_array(), b.to_array()), edge)
}

/// Append the arcs `direction` permits for edge `id` (`from` → `to`).
fn link_arcs(arcs: &mut [Vec<OutArc>], id: EdgeId, from: NodeId, to: NodeId, direction: Direction) {
    if direction.allows_forward() {
        arcs[from.index()].push(OutArc { edge: id, to, reversed: false });
    }
    if direction.allows_backward() {
        arcs[to.index()].push(OutArc { edge: id, to: from, reversed: true });
    }
}

// ── BuildOptions ──────────────────────────────────────────────────────────────

/// The subset of [`RouteConfig`] the builder needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BuildOptions {
    pub coincidence_tolerance: f64,
    pub default_speed: Option<f64>,
    pub default_direction: Direction,
    pub geometry_policy: GeometryPolicy,
}

impl From<&RouteConfig> for BuildOptions {
    fn from(cfg: &RouteConfig) -> Self {
        Self {
            coincidence_tolerance: cfg.coincidence_tolerance,
            default_speed:         cfg.default_speed,
            default_direction:     cfg.default_direction,
            geometry_policy:       cfg.geometry_policy,
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from(&RouteConfig::default())
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] feature by feature, then call
/// [`build`](Self::build).
///
/// Each line feature with N coordinates contributes N − 1 edges, one per
/// consecutive coordinate pair.  A pair whose endpoints merge into the same
/// node is kept as a zero-length loop.
///
/// # Example
///
/// ```
/// use sp_core::ProjectedPoint;
/// use sp_network::{BuildOptions, Feature, FeatureAttributes, GraphBuilder};
///
/// let mut b = GraphBuilder::new(BuildOptions::default());
/// b.add_feature(Feature::line(
///     FeatureAttributes::with_id("main-st"),
///     vec![ProjectedPoint::new(0.0, 0.0), ProjectedPoint::new(10.0, 0.0)],
/// ))
/// .unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub struct GraphBuilder {
    options:   BuildOptions,
    nodes:     Vec<ProjectedPoint>,
    grid:      NodeGrid,
    raw_edges: Vec<RawEdge>,
    features:  Vec<LineFeature>,
    skipped:   usize,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length:    f64,
    cost:      f64,
    direction: Direction,
    feature:   FeatureId,
}

impl GraphBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self::with_capacity(options, 0, 0)
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(options: BuildOptions, nodes: usize, edges: usize) -> Self {
        Self {
            grid: NodeGrid::new(options.coincidence_tolerance),
            options,
            nodes: Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
            features: Vec::new(),
            skipped: 0,
        }
    }

    /// Build a graph from a complete feature set in one call.
    ///
    /// # Errors
    ///
    /// The first decomposition error, when the geometry policy is
    /// [`GeometryPolicy::Reject`].
    pub fn from_features<I>(features: I, options: BuildOptions) -> NetworkResult<RoadGraph>
    where
        I: IntoIterator<Item = Feature>,
    {
        let mut builder = GraphBuilder::new(options);
        for feature in features {
            builder.add_feature(feature)?;
        }
        Ok(builder.build())
    }

    /// Decompose `feature` and add every part.  Returns the number of edges
    /// added.
    ///
    /// Unroutable features follow the geometry policy: with `Reject` the
    /// error is returned and the builder is left unchanged; with `Skip` the
    /// feature is dropped with a warning and `Ok(0)` is returned.
    pub fn add_feature(&mut self, feature: Feature) -> NetworkResult<usize> {
        match feature.decompose() {
            Ok(lines) => Ok(lines.into_iter().map(|l| self.add_line(l)).sum()),
            Err(e) => match self.options.geometry_policy {
                GeometryPolicy::Reject => Err(e),
                GeometryPolicy::Skip => {
                    warn!(error = %e, "skipping unroutable feature");
                    self.skipped += 1;
                    Ok(0)
                }
            },
        }
    }

    /// Add one single-part line.  Returns the number of edges added.
    pub fn add_line(&mut self, line: LineFeature) -> usize {
        let speed = match line.speed {
            Some(s) if s.is_finite() && s > 0.0 => Some(s),
            Some(s) => {
                warn!(feature = %line.attributes.id, speed = s, "ignoring non-positive speed");
                self.options.default_speed
            }
            None => self.options.default_speed,
        };
        let direction = line.direction.unwrap_or(self.options.default_direction);
        let feature = FeatureId::from_index(self.features.len());

        // One edge per coordinate pair.  A pair whose endpoints merge into
        // one node becomes a zero-length loop, which no search relaxes.
        let added = line.coordinates.len().saturating_sub(1);
        for w in line.coordinates.windows(2) {
            let from = self.add_node(w[0]);
            let to = self.add_node(w[1]);
            let length = self.nodes[from.index()].distance(self.nodes[to.index()]);
            let cost = speed.map_or(length, |s| length / s);
            self.raw_edges.push(RawEdge { from, to, length, cost, direction, feature });
        }
        self.features.push(line);
        added
    }

    /// Resolve `pos` to an existing node within the coincidence tolerance,
    /// or add a new node there.
    pub fn add_node(&mut self, pos: ProjectedPoint) -> NodeId {
        if let Some(id) = self.grid.find(pos, &self.nodes) {
            return id;
        }
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(pos);
        self.grid.insert(pos, id);
        id
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }
    /// Features dropped under [`GeometryPolicy::Skip`].
    pub fn skipped_count(&self) -> usize { self.skipped }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E) for adjacency + O(E log E) for the R-tree bulk
    /// load.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut node_arcs: Vec<Vec<OutArc>> = vec![Vec::new(); node_count];
        let mut entries: Vec<SegmentEntry> = Vec::with_capacity(edge_count);
        for (i, e) in self.raw_edges.iter().enumerate() {
            let id = EdgeId::from_index(i);
            link_arcs(&mut node_arcs, id, e.from, e.to, e.direction);
            entries.push(segment_entry(
                self.nodes[e.from.index()],
                self.nodes[e.to.index()],
                id,
            ));
        }
        let spatial_idx = RTree::bulk_load(entries);

        debug!(
            nodes = node_count,
            edges = edge_count,
            features = self.features.len(),
            skipped = self.skipped,
            "built road graph"
        );

        let raw = self.raw_edges;
        RoadGraph {
            node_pos: self.nodes,
            node_arcs,
            edge_from:      raw.iter().map(|e| e.from).collect(),
            edge_to:        raw.iter().map(|e| e.to).collect(),
            edge_length:    raw.iter().map(|e| e.length).collect(),
            edge_cost:      raw.iter().map(|e| e.cost).collect(),
            edge_direction: raw.iter().map(|e| e.direction).collect(),
            edge_feature:   raw.iter().map(|e| e.feature).collect(),
            edge_rank:      (0..edge_count as u32).collect(),
            edge_live:      vec![true; edge_count],
            features: self.features,
            spatial_idx,
        }
    }
}

// ── NodeGrid ──────────────────────────────────────────────────────────────────

/// Hash grid over node positions for coincidence lookups.
///
/// With a zero tolerance only bit-identical coordinates merge.
struct NodeGrid {
    tolerance: f64,
    cells: FxHashMap<(i64, i64), Vec<NodeId>>,
}

impl NodeGrid {
    fn new(tolerance: f64) -> Self {
        Self { tolerance, cells: FxHashMap::default() }
    }

    fn key(&self, p: ProjectedPoint) -> (i64, i64) {
        if self.tolerance > 0.0 {
            ((p.x / self.tolerance).floor() as i64, (p.y / self.tolerance).floor() as i64)
        } else {
            // `+ 0.0` folds -0.0 into 0.0.
            ((p.x + 0.0).to_bits() as i64, (p.y + 0.0).to_bits() as i64)
        }
    }

    /// Nearest node within tolerance; ties go to the lower `NodeId`.
    fn find(&self, p: ProjectedPoint, nodes: &[ProjectedPoint]) -> Option<NodeId> {
        let (kx, ky) = self.key(p);
        if self.tolerance <= 0.0 {
            return self.cells.get(&(kx, ky)).and_then(|v| v.first().copied());
        }

        let tol_2 = self.tolerance * self.tolerance;
        let mut best: Option<(f64, NodeId)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = self.cells.get(&(kx + dx, ky + dy)) else { continue };
                for &id in ids {
                    let d2 = nodes[id.index()].distance_2(p);
                    if d2 > tol_2 {
                        continue;
                    }
                    let better = match best {
                        None => true,
                        Some((bd, bid)) => d2 < bd || (d2 == bd && id < bid),
                    };
                    if better {
                        best = Some((d2, id));
                    }
                }
            }
        }
        best.map(|(_, id)| id)
    }

    fn insert(&mut self, p: ProjectedPoint, id: NodeId) {
        let key = self.key(p);
        self.cells.entry(key).or_default().push(id);
    }
}
