//! `sp-source` — concrete feature sources for the routing orchestrator.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`memory`]  | `InMemorySource` (R-tree over feature envelopes)              |
//! | [`loader`]  | `load_features_csv`, `load_features_reader`                   |
//! | `geojson`   | `parse_feature_collection` (feature `geojson`)                |
//! | `sqlite`    | `SqliteSource` (feature `sqlite`)                             |
//! | [`error`]   | `SourceError`, `SourceResult<T>`                              |
//!
//! Loaders produce `Vec<Feature>`; wrap the result in an [`InMemorySource`]
//! to serve bounding-box queries.  Every source answers in input order so
//! graph construction is reproducible.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                      |
//! |-----------|-------------------------------------------------------------|
//! | `geojson` | GeoJSON FeatureCollection parsing via `serde_json`.         |
//! | `sqlite`  | `SqliteSource` via `rusqlite` (bundled SQLite).             |

pub mod error;
pub mod loader;
pub mod memory;

#[cfg(feature = "geojson")]
pub mod geojson;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use error::{SourceError, SourceResult};
pub use loader::{load_features_csv, load_features_reader};
pub use memory::InMemorySource;

#[cfg(feature = "geojson")]
pub use geojson::{feature_collection_from_value, parse_feature_collection};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;
