//! Network features as delivered by a feature source, and their
//! decomposition into single-part lines.
//!
//! A [`Feature`] carries whatever geometry the store returned.  Only line
//! and multi-line geometries are routable; [`Feature::decompose`] turns one
//! of those into [`LineFeature`]s (one per part), copying the parent's
//! attributes, direction and speed onto every part.

use sp_core::{BoundingBox, Direction, ProjectedPoint};

use crate::{NetworkError, NetworkResult};

// ── Attributes ────────────────────────────────────────────────────────────────

/// Attribute bundle reported back for every traversed segment.
///
/// `point_a`, `point_b` and `point_c` are opaque to the engine; they are
/// carried from input to output unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureAttributes {
    pub id:      String,
    #[cfg_attr(feature = "serde", serde(rename = "pointA"))]
    pub point_a: String,
    #[cfg_attr(feature = "serde", serde(rename = "pointB"))]
    pub point_b: String,
    #[cfg_attr(feature = "serde", serde(rename = "pointC"))]
    pub point_c: String,
}

impl FeatureAttributes {
    /// Attributes with only an id set.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Geometry of a fetched feature, in projected coordinates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry {
    Point(ProjectedPoint),
    LineString(Vec<ProjectedPoint>),
    MultiLineString(Vec<Vec<ProjectedPoint>>),
    /// Exterior ring followed by holes.
    Polygon(Vec<Vec<ProjectedPoint>>),
}

impl Geometry {
    /// Geometry type name as used in GeoJSON / WKT.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_)           => "Point",
            Geometry::LineString(_)      => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_)         => "Polygon",
        }
    }

    /// `true` for the geometry types the graph builder can consume.
    pub fn is_linear(&self) -> bool {
        matches!(self, Geometry::LineString(_) | Geometry::MultiLineString(_))
    }

    /// Every coordinate of the geometry, in storage order.
    pub fn coords(&self) -> Box<dyn Iterator<Item = ProjectedPoint> + '_> {
        match self {
            Geometry::Point(p)           => Box::new(std::iter::once(*p)),
            Geometry::LineString(c)      => Box::new(c.iter().copied()),
            Geometry::MultiLineString(p) => Box::new(p.iter().flatten().copied()),
            Geometry::Polygon(r)         => Box::new(r.iter().flatten().copied()),
        }
    }
}

// ── Feature ───────────────────────────────────────────────────────────────────

/// One feature as returned by a feature source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    pub geometry:   Geometry,
    pub attributes: FeatureAttributes,
    /// Overrides the configured default direction when present.
    pub direction:  Option<Direction>,
    /// Overrides the configured default speed when present.  Cost becomes
    /// `length / speed`.
    pub speed:      Option<f64>,
}

impl Feature {
    /// A two-way line feature with no speed attribute.
    pub fn line(attributes: FeatureAttributes, coordinates: Vec<ProjectedPoint>) -> Self {
        Self {
            geometry: Geometry::LineString(coordinates),
            attributes,
            direction: None,
            speed: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Bounding box of all coordinates, or `None` for an empty geometry.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.geometry.coords())
    }

    /// Split into single-part lines, each carrying this feature's attributes.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::UnsupportedGeometry`] for points and polygons.
    /// - [`NetworkError::DegenerateLine`] if any part has fewer than two
    ///   coordinates.
    /// - [`NetworkError::NonFiniteCoordinate`] if any coordinate is NaN/inf.
    ///
    /// On error nothing is returned; a multi-line with one bad part is
    /// rejected as a whole.
    pub fn decompose(self) -> NetworkResult<Vec<LineFeature>> {
        let Feature { geometry, attributes, direction, speed } = self;
        let parts = match geometry {
            Geometry::LineString(c) => vec![c],
            Geometry::MultiLineString(parts) => parts,
            other => {
                return Err(NetworkError::UnsupportedGeometry {
                    feature: attributes.id,
                    kind:    other.kind(),
                });
            }
        };

        for part in &parts {
            if part.len() < 2 {
                return Err(NetworkError::DegenerateLine {
                    feature: attributes.id,
                    points:  part.len(),
                });
            }
            if part.iter().any(|p| !p.is_finite()) {
                return Err(NetworkError::NonFiniteCoordinate { feature: attributes.id });
            }
        }

        Ok(parts
            .into_iter()
            .enumerate()
            .map(|(i, coordinates)| LineFeature {
                coordinates,
                attributes: attributes.clone(),
                part: i as u32,
                direction,
                speed,
            })
            .collect())
    }
}

// ── LineFeature ───────────────────────────────────────────────────────────────

/// A single-part line: the unit the graph builder consumes.
///
/// Invariant: `coordinates.len() >= 2`, all finite (enforced by
/// [`Feature::decompose`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineFeature {
    pub coordinates: Vec<ProjectedPoint>,
    pub attributes:  FeatureAttributes,
    /// Index of this part within its parent feature (0 for a LineString).
    pub part:        u32,
    pub direction:   Option<Direction>,
    pub speed:       Option<f64>,
}

impl LineFeature {
    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.coordinates
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }
}
