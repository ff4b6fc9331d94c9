//! `sp-network` — road graph, point snapping, and shortest-path search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`feature`] | `Feature`, `Geometry`, `LineFeature`, `FeatureAttributes`    |
//! | [`network`] | `RoadGraph` (arena + R-tree), `GraphBuilder`, `BuildOptions` |
//! | [`snap`]    | `PointSnapper`, `Snap`                                       |
//! | [`router`]  | `Router` trait, `Path`, `DijkstraRouter`, `AStarRouter`      |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on feature types.          |

pub mod error;
pub mod feature;
pub mod network;
pub mod router;
pub mod snap;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use feature::{Feature, FeatureAttributes, Geometry, LineFeature};
pub use network::{BuildOptions, GraphBuilder, OutArc, RoadGraph};
pub use router::{AStarRouter, DijkstraRouter, Path, PathStep, Router};
pub use snap::{PointSnapper, Snap};
