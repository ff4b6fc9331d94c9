//! Fluent builder for constructing a [`RoutingOrchestrator`].

use sp_core::{GeometryPolicy, Projection, Reprojector, RouteConfig};
use sp_network::{BuildOptions, DijkstraRouter, PointSnapper, Router};

use crate::{RoutingOrchestrator, RoutingResult};

/// Fluent builder for [`RoutingOrchestrator<R>`].
///
/// Starts from a [`RouteConfig`]; the setters below override single fields.
/// The router defaults to [`DijkstraRouter`].
///
/// # Example
///
/// ```
/// use sp_core::RouteConfig;
/// use sp_network::AStarRouter;
/// use sp_route::OrchestratorBuilder;
///
/// let orchestrator = OrchestratorBuilder::new(RouteConfig::default())
///     .router(AStarRouter)
///     .snap_tolerance(250.0)
///     .max_expansions(3)
///     .build()
///     .unwrap();
/// assert_eq!(orchestrator.config().max_expansions, 3);
/// ```
pub struct OrchestratorBuilder<R: Router = DijkstraRouter> {
    config: RouteConfig,
    router: R,
}

impl OrchestratorBuilder<DijkstraRouter> {
    pub fn new(config: RouteConfig) -> Self {
        Self { config, router: DijkstraRouter }
    }
}

impl<R: Router> OrchestratorBuilder<R> {
    /// Replace the search strategy.
    pub fn router<R2: Router>(self, router: R2) -> OrchestratorBuilder<R2> {
        OrchestratorBuilder { config: self.config, router }
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.config.projection = projection;
        self
    }

    pub fn snap_tolerance(mut self, tolerance: f64) -> Self {
        self.config.snap_tolerance = tolerance;
        self
    }

    pub fn coincidence_tolerance(mut self, tolerance: f64) -> Self {
        self.config.coincidence_tolerance = tolerance;
        self
    }

    pub fn max_expansions(mut self, n: u32) -> Self {
        self.config.max_expansions = n;
        self
    }

    pub fn expansion_factor(mut self, factor: f64) -> Self {
        self.config.expansion_factor = factor;
        self
    }

    pub fn geometry_policy(mut self, policy: GeometryPolicy) -> Self {
        self.config.geometry_policy = policy;
        self
    }

    /// Validate the configuration and return a ready-to-use orchestrator.
    ///
    /// # Errors
    ///
    /// [`RouteError::Config`](crate::RouteError::Config) describing the first
    /// invalid field.
    pub fn build(self) -> RoutingResult<RoutingOrchestrator<R>> {
        self.config.validate()?;
        Ok(RoutingOrchestrator {
            reprojector:   Reprojector::new(self.config.projection),
            snapper:       PointSnapper::from_config(&self.config),
            build_options: BuildOptions::from(&self.config),
            router:        self.router,
            config:        self.config,
        })
    }
}
