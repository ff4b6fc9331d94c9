use std::fmt;

use sp_core::{BoundingBox, CoreError};
use sp_network::NetworkError;
use thiserror::Error;

/// Failure reported by a [`FeatureSource`](crate::FeatureSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The store did not answer in time.  Treated as an empty result.
    #[error("feature fetch timed out")]
    Timeout,

    /// The request was cancelled before completing.  Treated as an empty
    /// result.
    #[error("feature fetch cancelled")]
    Cancelled,

    /// The store could not be reached or failed internally.  Aborts the
    /// request.
    #[error("feature store transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// `true` for failures that count as "no features" rather than aborting.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout | FetchError::Cancelled)
    }
}

/// Why a single attempt did not produce a route.  Each one triggers a
/// bounding-box expansion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The source returned no features (or timed out).
    EmptyFeatureSet,
    /// The start or end point had no edge within the snap tolerance.
    SnapFailed,
    /// Both points snapped but lie in disconnected parts of the graph.
    NoRoute,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureReason::EmptyFeatureSet => "empty feature set",
            FailureReason::SnapFailed      => "snap failed",
            FailureReason::NoRoute         => "no route",
        })
    }
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid point format: {0}")]
    InvalidPointFormat(String),

    #[error("routing configuration error: {0}")]
    Config(String),

    #[error("unsupported geometry type {kind} in feature {feature:?}")]
    UnsupportedGeometry {
        feature: String,
        kind:    &'static str,
    },

    #[error("network error: {0}")]
    Network(NetworkError),

    #[error("feature store transport error: {0}")]
    FetchTransport(String),

    #[error("no features found within {bbox} after {attempts} attempts")]
    NoFeaturesInExpandedBoundingBox {
        attempts: u32,
        bbox:     BoundingBox,
    },

    #[error("no route found within {bbox} after {attempts} attempts (last failure: {last})")]
    NoRouteFoundAfterExpansion {
        attempts: u32,
        last:     FailureReason,
        bbox:     BoundingBox,
    },
}

impl RouteError {
    /// `true` if the error is the orchestrator giving up after exhausting
    /// its expansions, as opposed to an input, data or transport failure.
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self,
            RouteError::NoFeaturesInExpandedBoundingBox { .. }
                | RouteError::NoRouteFoundAfterExpansion { .. }
        )
    }
}

impl From<CoreError> for RouteError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidPointFormat(msg) => RouteError::InvalidPointFormat(msg),
            CoreError::Config(msg) => RouteError::Config(msg),
        }
    }
}

impl From<NetworkError> for RouteError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::UnsupportedGeometry { feature, kind } => {
                RouteError::UnsupportedGeometry { feature, kind }
            }
            other => RouteError::Network(other),
        }
    }
}

pub type RoutingResult<T> = Result<T, RouteError>;
