//! `sp-core` — foundational types for the `shortestpath` routing engine.
//!
//! This crate is a dependency of every other `sp-*` crate.  It has no `sp-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`ids`]          | `NodeId`, `EdgeId`, `FeatureId`                       |
//! | [`geo`]          | `GeoPoint`, `ProjectedPoint`, `BoundingBox`           |
//! | [`projection`]   | `Projection`, `Reprojector`                           |
//! | [`direction`]    | `Direction` (forward / backward / both)               |
//! | [`config`]       | `RouteConfig`, `GeometryPolicy`                       |
//! | [`error`]        | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load a `RouteConfig` from a file.              |

pub mod config;
pub mod direction;
pub mod error;
pub mod geo;
pub mod ids;
pub mod projection;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{GeometryPolicy, MAX_EXPANSIONS, RouteConfig};
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use geo::{BoundingBox, GeoPoint, ProjectedPoint};
pub use ids::{EdgeId, FeatureId, NodeId};
pub use projection::{Projection, Reprojector};
