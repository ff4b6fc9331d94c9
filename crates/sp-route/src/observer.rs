//! Observer trait for attempt-level progress reporting.

use std::fmt;

use sp_core::BoundingBox;
use sp_network::RoadGraph;

use crate::{FailureReason, RouteError, Route};

/// Phase of one routing attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteState {
    Fetching,
    Building,
    Snapping,
    Solving,
    Expanding,
    Done,
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Callbacks invoked by
/// [`RoutingOrchestrator::compute_route_with`][crate::RoutingOrchestrator::compute_route_with]
/// as a request moves through its attempts.
///
/// All methods have default no-op implementations.  `attempt` counts from 1.
///
/// # Example: attempt counter
///
/// ```rust,ignore
/// struct Attempts(u32);
///
/// impl RouteObserver for Attempts {
///     fn on_state(&mut self, attempt: u32, state: RouteState) {
///         if state == RouteState::Fetching {
///             self.0 = attempt;
///         }
///     }
/// }
/// ```
pub trait RouteObserver {
    /// Called on entry to every state.
    fn on_state(&mut self, _attempt: u32, _state: RouteState) {}

    /// Called after each successful fetch with the box queried and the
    /// number of features returned.
    fn on_fetched(&mut self, _attempt: u32, _bbox: &BoundingBox, _features: usize) {}

    /// Called once the attempt's graph is built, before snapping.
    fn on_graph_built(&mut self, _attempt: u32, _graph: &RoadGraph) {}

    /// Called when an attempt ends without a route.
    fn on_attempt_failed(&mut self, _attempt: u32, _reason: FailureReason) {}

    /// Called once with the final outcome.
    fn on_finish(&mut self, _outcome: Result<&Route, &RouteError>) {}
}

/// A [`RouteObserver`] that does nothing.
pub struct NoopObserver;

impl RouteObserver for NoopObserver {}
