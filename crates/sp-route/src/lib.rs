//! `sp-route` — routing orchestrator for the shortestpath engine.
//!
//! # Attempt loop
//!
//! ```text
//! reproject start/end (lng/lat → planar)
//! bbox = caller box, or both endpoints padded by initial_margin
//! for attempt in 1..=max_expansions + 1:
//!   ① Fetching  — source.fetch(bbox); timeout/cancel counts as empty,
//!                 transport failure aborts.
//!   ② Building  — fresh RoadGraph from the fetched features.
//!   ③ Snapping  — start and end onto the nearest edges (splitting them).
//!   ④ Solving   — Router::route between the snapped nodes.
//!   on failure   — bbox.expanded(expansion_factor), next attempt.
//! ```
//!
//! # Crate layout
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`orchestrator`] | `RoutingOrchestrator`                                 |
//! | [`builder`]      | `OrchestratorBuilder`                                 |
//! | [`source`]       | `FeatureSource` trait                                 |
//! | [`observer`]     | `RouteObserver`, `RouteState`, `NoopObserver`         |
//! | [`result`]       | `Route`, `RouteResult`, `PathSegment`                 |
//! | [`error`]        | `RouteError`, `FetchError`, `FailureReason`           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sp_core::{GeoPoint, RouteConfig};
//! use sp_route::RoutingOrchestrator;
//!
//! let orchestrator = RoutingOrchestrator::new(RouteConfig::default())?;
//! let result = orchestrator.compute_route(
//!     "10.39,63.43".parse()?,
//!     GeoPoint::new(10.41, 63.44),
//!     &source,
//! );
//! for segment in result.path.unwrap_or_default() {
//!     println!("{} {}", segment.attributes.id, segment.to_wkt());
//! }
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod orchestrator;
pub mod result;
pub mod source;


pub use builder::OrchestratorBuilder;
pub use error::{FailureReason, FetchError, RouteError, RoutingResult};
pub use observer::{NoopObserver, RouteObserver, RouteState};
pub use orchestrator::RoutingOrchestrator;
pub use result::{PathSegment, Route, RouteResult};
pub use source::FeatureSource;
