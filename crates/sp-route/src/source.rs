//! The feature-fetch boundary.
//!
//! The orchestrator knows nothing about where features are stored; it calls
//! [`FeatureSource::fetch`] once per attempt with the current bounding box.
//! Concrete sources live in `sp-source`.  Any closure with the right
//! signature is also a source, which keeps tests short:
//!
//! ```
//! use sp_core::BoundingBox;
//! use sp_network::Feature;
//! use sp_route::{FeatureSource, FetchError};
//!
//! let empty = |_: &BoundingBox| -> Result<Vec<Feature>, FetchError> { Ok(Vec::new()) };
//! assert!(empty.fetch(&BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap().is_empty());
//! ```

use sp_core::BoundingBox;
use sp_network::Feature;

use crate::FetchError;

/// Supplier of network features intersecting a bounding box.
///
/// Returned geometry must already be in the orchestrator's projected CRS.
/// Features only partly inside `bbox` should be returned whole.
pub trait FeatureSource {
    fn fetch(&self, bbox: &BoundingBox) -> Result<Vec<Feature>, FetchError>;
}

impl<F> FeatureSource for F
where
    F: Fn(&BoundingBox) -> Result<Vec<Feature>, FetchError>,
{
    fn fetch(&self, bbox: &BoundingBox) -> Result<Vec<Feature>, FetchError> {
        self(bbox)
    }
}
