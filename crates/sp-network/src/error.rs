//! Network-subsystem error type.

use thiserror::Error;

use sp_core::NodeId;

/// Errors produced by `sp-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("feature {feature:?} has unsupported geometry type {kind}")]
    UnsupportedGeometry { feature: String, kind: &'static str },

    #[error("feature {feature:?} has a line part with {points} coordinate(s); at least 2 are required")]
    DegenerateLine { feature: String, points: usize },

    #[error("feature {feature:?} contains a non-finite coordinate")]
    NonFiniteCoordinate { feature: String },

    /// The nearest edge is further than the snap tolerance, or the graph has
    /// no edges at all (`distance` is then infinite).
    #[error("no edge within {tolerance} of query point (nearest at {distance})")]
    NoNearbyEdge { distance: f64, tolerance: f64 },

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
