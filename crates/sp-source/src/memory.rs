//! In-memory feature source backed by an R-tree of feature envelopes.

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};
use tracing::debug;

use sp_core::BoundingBox;
use sp_network::Feature;
use sp_route::{FeatureSource, FetchError};

type Envelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// A fixed feature set answering bounding-box queries.
///
/// `fetch` returns every feature whose envelope intersects the query box,
/// in the order the features were supplied, so graph construction (and
/// therefore snapping tie-breaks) is independent of the R-tree layout.
pub struct InMemorySource {
    features: Vec<Feature>,
    index:    RTree<Envelope>,
}

impl InMemorySource {
    pub fn new(features: Vec<Feature>) -> Self {
        let entries = features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| {
                f.bbox().map(|b| {
                    GeomWithData::new(Rectangle::from_corners([b.min_x, b.min_y], [b.max_x, b.max_y]), i)
                })
            })
            .collect::<Vec<_>>();
        debug!(
            features = features.len(),
            unindexed = features.len() - entries.len(),
            "built in-memory feature index"
        );
        Self { index: RTree::bulk_load(entries), features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Box covering every feature, or `None` if there are none with
    /// coordinates.
    pub fn extent(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.features.iter().flat_map(|f| f.geometry.coords()))
    }

    /// Features intersecting `bbox`, in input order.
    pub fn query(&self, bbox: &BoundingBox) -> Vec<&Feature> {
        let envelope = AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y]);
        let mut hits: Vec<usize> = self
            .index
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|i| &self.features[i]).collect()
    }
}

impl From<Vec<Feature>> for InMemorySource {
    fn from(features: Vec<Feature>) -> Self {
        Self::new(features)
    }
}

impl FeatureSource for InMemorySource {
    fn fetch(&self, bbox: &BoundingBox) -> Result<Vec<Feature>, FetchError> {
        let hits: Vec<Feature> = self.query(bbox).into_iter().cloned().collect();
        debug!(%bbox, features = hits.len(), "in-memory query");
        Ok(hits)
    }
}
