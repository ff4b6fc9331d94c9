//! The `RoutingOrchestrator` and its attempt loop.

use tracing::{debug, info, warn};

use sp_core::{BoundingBox, GeoPoint, ProjectedPoint, Reprojector, RouteConfig};
use sp_network::{
    BuildOptions, DijkstraRouter, Feature, GraphBuilder, NetworkError, PointSnapper, Router,
};

use crate::result::segments_from_path;
use crate::{
    FailureReason, FeatureSource, FetchError, NoopObserver, Route, RouteError, RouteObserver,
    RouteResult, RouteState, RoutingResult,
};

/// Outcome of one attempt that did not abort the request.
enum Attempt {
    Found(Route),
    Failed(FailureReason),
}

/// Runs routing requests: reproject, then per attempt fetch → build → snap
/// → solve, expanding the bounding box after every failed attempt.
///
/// ```text
///            ┌──────────────────────── Expanding ◄──────────────┐
///            ▼                                                  │
///   Fetching ──► Building ──► Snapping ──► Solving ──► Done     │
///      │ no features             │ no edge     │ no route       │
///      └─────────────────────────┴─────────────┴────────────────┘
/// ```
///
/// A request makes at most `max_expansions + 1` fetches.  Every attempt
/// builds a fresh graph; nothing is cached between attempts or requests.
/// The orchestrator holds no mutable state, so one instance can serve
/// concurrent requests (`Send + Sync` whenever `R` is).
///
/// Create via [`OrchestratorBuilder`][crate::OrchestratorBuilder] or
/// [`RoutingOrchestrator::new`].
#[derive(Debug, Clone)]
pub struct RoutingOrchestrator<R: Router = DijkstraRouter> {
    pub(crate) config:        RouteConfig,
    pub(crate) reprojector:   Reprojector,
    pub(crate) snapper:       PointSnapper,
    pub(crate) build_options: BuildOptions,
    pub(crate) router:        R,
}

impl RoutingOrchestrator<DijkstraRouter> {
    /// Orchestrator using Dijkstra search.
    ///
    /// # Errors
    ///
    /// [`RouteError::Config`] if `config` fails validation.
    pub fn new(config: RouteConfig) -> RoutingResult<Self> {
        crate::OrchestratorBuilder::new(config).build()
    }
}

impl<R: Router> RoutingOrchestrator<R> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// The lng/lat ↔ planar transform used for inputs and for converting
    /// results back at the boundary.
    pub fn reprojector(&self) -> Reprojector {
        self.reprojector
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Route from `start` to `end`, starting from a box around both points.
    pub fn compute_route<S>(&self, start: GeoPoint, end: GeoPoint, source: &S) -> RouteResult
    where
        S: FeatureSource + ?Sized,
    {
        self.try_route(start, end, None, source, &mut NoopObserver).into()
    }

    /// Route from `start` to `end`, starting from the caller's `bbox`
    /// (projected coordinates).
    pub fn compute_route_in<S>(
        &self,
        start:  GeoPoint,
        end:    GeoPoint,
        bbox:   BoundingBox,
        source: &S,
    ) -> RouteResult
    where
        S: FeatureSource + ?Sized,
    {
        self.try_route(start, end, Some(bbox), source, &mut NoopObserver).into()
    }

    /// [`compute_route`](Self::compute_route) with progress callbacks.
    pub fn compute_route_with<S, O>(
        &self,
        start:    GeoPoint,
        end:      GeoPoint,
        source:   &S,
        observer: &mut O,
    ) -> RouteResult
    where
        S: FeatureSource + ?Sized,
        O: RouteObserver,
    {
        self.try_route(start, end, None, source, observer).into()
    }

    /// Full attempt loop returning a typed result.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidPointFormat`] if either point cannot be
    ///   projected.  Nothing is fetched.
    /// - [`RouteError::Config`] if `bbox` is not finite.
    /// - [`RouteError::FetchTransport`] as soon as the source reports a
    ///   transport failure.
    /// - [`RouteError::UnsupportedGeometry`] / [`RouteError::Network`] if a
    ///   fetched feature is rejected under the `Reject` geometry policy.
    /// - [`RouteError::NoFeaturesInExpandedBoundingBox`] if every attempt
    ///   came back empty.
    /// - [`RouteError::NoRouteFoundAfterExpansion`] if features were found
    ///   but no attempt produced a route.
    pub fn try_route<S, O>(
        &self,
        start:    GeoPoint,
        end:      GeoPoint,
        bbox:     Option<BoundingBox>,
        source:   &S,
        observer: &mut O,
    ) -> RoutingResult<Route>
    where
        S: FeatureSource + ?Sized,
        O: RouteObserver,
    {
        let outcome = self.run_attempts(start, end, bbox, source, observer);
        match &outcome {
            Ok(route) => info!(
                attempts = route.attempts,
                segments = route.segments.len(),
                cost = route.total_cost,
                "route found"
            ),
            Err(e) => info!(error = %e, "routing failed"),
        }
        observer.on_finish(outcome.as_ref());
        outcome
    }

    // ── Attempt loop ──────────────────────────────────────────────────────

    fn run_attempts<S, O>(
        &self,
        start:    GeoPoint,
        end:      GeoPoint,
        bbox:     Option<BoundingBox>,
        source:   &S,
        observer: &mut O,
    ) -> RoutingResult<Route>
    where
        S: FeatureSource + ?Sized,
        O: RouteObserver,
    {
        let a = self.reprojector.to_projected(start)?;
        let b = self.reprojector.to_projected(end)?;

        let mut bbox = match bbox {
            Some(bbox) => bbox.with_min_margin(self.config.min_margin),
            None => BoundingBox::around(a, b, self.config.initial_margin, self.config.min_margin),
        };
        if !bbox.is_finite() {
            return Err(RouteError::Config(format!("bounding box {bbox} is not finite")));
        }

        let max_attempts = self.config.max_expansions.saturating_add(1);
        let mut attempts = 0;
        let mut saw_features = false;
        let mut last = FailureReason::EmptyFeatureSet;

        for attempt in 1..=max_attempts {
            attempts = attempt;
            match self.attempt(attempt, a, b, &bbox, source, observer)? {
                Attempt::Found(route) => {
                    observer.on_state(attempt, RouteState::Done);
                    return Ok(route);
                }
                Attempt::Failed(reason) => {
                    debug!(attempt, %reason, %bbox, "attempt failed");
                    observer.on_attempt_failed(attempt, reason);
                    saw_features |= reason != FailureReason::EmptyFeatureSet;
                    last = reason;
                }
            }

            if attempt < max_attempts {
                let next = bbox.expanded(self.config.expansion_factor);
                if !next.is_finite() {
                    warn!(attempt, %bbox, "bounding box cannot grow further");
                    break;
                }
                observer.on_state(attempt, RouteState::Expanding);
                bbox = next;
            }
        }

        observer.on_state(attempts, RouteState::Done);
        if saw_features {
            Err(RouteError::NoRouteFoundAfterExpansion { attempts, last, bbox })
        } else {
            Err(RouteError::NoFeaturesInExpandedBoundingBox { attempts, bbox })
        }
    }

    fn attempt<S, O>(
        &self,
        attempt:  u32,
        a:        ProjectedPoint,
        b:        ProjectedPoint,
        bbox:     &BoundingBox,
        source:   &S,
        observer: &mut O,
    ) -> RoutingResult<Attempt>
    where
        S: FeatureSource + ?Sized,
        O: RouteObserver,
    {
        // ── Fetching ──────────────────────────────────────────────────────
        observer.on_state(attempt, RouteState::Fetching);
        let features = self.fetch(attempt, bbox, source)?;
        observer.on_fetched(attempt, bbox, features.len());
        debug!(attempt, %bbox, features = features.len(), "fetched features");
        if features.is_empty() {
            return Ok(Attempt::Failed(FailureReason::EmptyFeatureSet));
        }

        // ── Building ──────────────────────────────────────────────────────
        observer.on_state(attempt, RouteState::Building);
        let mut graph = GraphBuilder::from_features(features, self.build_options)?;
        observer.on_graph_built(attempt, &graph);

        // ── Snapping ──────────────────────────────────────────────────────
        observer.on_state(attempt, RouteState::Snapping);
        let mut snap = |p: ProjectedPoint| match self.snapper.snap(&mut graph, p) {
            Ok(s) => Ok(Some(s)),
            Err(NetworkError::NoNearbyEdge { distance, tolerance }) => {
                debug!(attempt, x = p.x, y = p.y, distance, tolerance, "no edge near point");
                Ok(None)
            }
            Err(e) => Err(RouteError::from(e)),
        };
        let Some(from) = snap(a)? else {
            return Ok(Attempt::Failed(FailureReason::SnapFailed));
        };
        let Some(to) = snap(b)? else {
            return Ok(Attempt::Failed(FailureReason::SnapFailed));
        };

        // ── Solving ───────────────────────────────────────────────────────
        observer.on_state(attempt, RouteState::Solving);
        let path = match self.router.route(&graph, from.node, to.node) {
            Ok(path) => path,
            Err(NetworkError::NoRoute { .. }) => return Ok(Attempt::Failed(FailureReason::NoRoute)),
            Err(e) => return Err(e.into()),
        };

        Ok(Attempt::Found(Route {
            segments:     segments_from_path(&graph, &path),
            total_cost:   path.total_cost,
            total_length: path.total_length,
            attempts:     attempt,
            bbox:         *bbox,
            start:        from.point,
            end:          to.point,
        }))
    }

    /// Fetch with transient failures folded into an empty result.
    fn fetch<S>(&self, attempt: u32, bbox: &BoundingBox, source: &S) -> RoutingResult<Vec<Feature>>
    where
        S: FeatureSource + ?Sized,
    {
        match source.fetch(bbox) {
            Ok(features) => Ok(features),
            Err(FetchError::Transport(msg)) => Err(RouteError::FetchTransport(msg)),
            Err(e) => {
                warn!(attempt, error = %e, "fetch did not complete; treating as empty");
                Ok(Vec::new())
            }
        }
    }
}
