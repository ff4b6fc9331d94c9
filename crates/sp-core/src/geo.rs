//! Coordinate and bounding-box types.
//!
//! Two coordinate spaces are in play:
//!
//! - [`GeoPoint`]: WGS-84 longitude/latitude in degrees, as supplied by the
//!   caller.  Longitude comes first everywhere (`"lng,lat"`, `new(lng, lat)`).
//! - [`ProjectedPoint`]: planar metric coordinates.  All distance, snapping
//!   and cost math happens here, with plain Euclidean geometry.
//!
//! Both use `f64`: projected coordinates reach ±2×10⁷ m, where `f32` would
//! lose metre precision.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Construct without validation.  Prefer [`try_new`](Self::try_new) for
    /// caller-supplied input.
    #[inline]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Construct and validate.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPointFormat`] if either value is non-finite,
    /// longitude is outside `[-180, 180]`, or latitude is outside the open
    /// interval `(-90, 90)` (the poles have no Mercator image).
    pub fn try_new(lng: f64, lat: f64) -> CoreResult<Self> {
        let p = Self { lng, lat };
        p.validate()?;
        Ok(p)
    }

    /// Check the invariants documented on [`try_new`](Self::try_new).
    pub fn validate(&self) -> CoreResult<()> {
        if !self.lng.is_finite() || !self.lat.is_finite() {
            return Err(CoreError::InvalidPointFormat(format!(
                "non-finite coordinate {self}"
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(CoreError::InvalidPointFormat(format!(
                "longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        if self.lat <= -90.0 || self.lat >= 90.0 {
            return Err(CoreError::InvalidPointFormat(format!(
                "latitude {} out of range (-90, 90)",
                self.lat
            )));
        }
        Ok(())
    }
}

/// Parses `"lng,lat"` (whitespace around either number is allowed).
impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(lng), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoreError::InvalidPointFormat(format!(
                "expected \"lng,lat\", got {s:?}"
            )));
        };
        let parse = |v: &str| {
            v.trim().parse::<f64>().map_err(|_| {
                CoreError::InvalidPointFormat(format!("non-numeric coordinate {v:?} in {s:?}"))
            })
        };
        GeoPoint::try_new(parse(lng)?, parse(lat)?)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lng, self.lat)
    }
}

// ── ProjectedPoint ────────────────────────────────────────────────────────────

/// A point in the planar metric CRS.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in projection units.
    #[inline]
    pub fn distance(self, other: ProjectedPoint) -> f64 {
        self.distance_2(other).sqrt()
    }

    /// Squared Euclidean distance.  Cheaper for comparisons.
    #[inline]
    pub fn distance_2(self, other: ProjectedPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Linear interpolation: `t = 0` → `self`, `t = 1` → `other`.
    #[inline]
    pub fn lerp(self, other: ProjectedPoint, t: f64) -> ProjectedPoint {
        ProjectedPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for ProjectedPoint {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ProjectedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned rectangle used to scope a feature query.
///
/// Only the routing orchestrator grows a box; everything below it treats
/// boxes as read-only.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Construct from corner values.  Corners are normalised so that
    /// `min_* <= max_*` regardless of argument order.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// The smallest box containing every point in `points`.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = ProjectedPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = BoundingBox::new(first.x, first.y, first.x, first.y);
        for p in iter {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    /// The minimal box containing `a` and `b`, with each side pushed out by
    /// `margin` × the box's extent on that axis.
    ///
    /// An axis with zero extent (both points share an x or a y) would never
    /// grow under a relative margin, so each side is pushed out by at least
    /// `min_margin` units.
    pub fn around(a: ProjectedPoint, b: ProjectedPoint, margin: f64, min_margin: f64) -> Self {
        let raw = BoundingBox::new(a.x, a.y, b.x, b.y);
        let pad_x = (raw.width() * margin).max(min_margin);
        let pad_y = (raw.height() * margin).max(min_margin);
        BoundingBox {
            min_x: raw.min_x - pad_x,
            min_y: raw.min_y - pad_y,
            max_x: raw.max_x + pad_x,
            max_y: raw.max_y + pad_y,
        }
    }

    /// A copy whose width and height are each at least `2 × min_margin`,
    /// widened about the centre.  Axes already that wide are unchanged.
    ///
    /// A box with a zero-width axis stays zero-width under
    /// [`expanded`](Self::expanded), so caller-supplied boxes go through
    /// this before the first query.
    pub fn with_min_margin(&self, min_margin: f64) -> Self {
        let (cx, cy) = self.center();
        let half_w = (self.width() * 0.5).max(min_margin);
        let half_h = (self.height() * 0.5).max(min_margin);
        BoundingBox {
            min_x: self.min_x.min(cx - half_w),
            min_y: self.min_y.min(cy - half_h),
            max_x: self.max_x.max(cx + half_w),
            max_y: self.max_y.max(cy + half_h),
        }
    }

    /// A copy scaled by `factor` about its centre: width and height are both
    /// multiplied by `factor`.
    pub fn expanded(&self, factor: f64) -> Self {
        let (cx, cy) = self.center();
        let half_w = self.width() * 0.5 * factor;
        let half_h = self.height() * 0.5 * factor;
        BoundingBox {
            min_x: cx - half_w,
            min_y: cy - half_h,
            max_x: cx + half_w,
            max_y: cy + half_h,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// `true` if `p` lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, p: ProjectedPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// `true` if the two boxes overlap or touch.
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// `true` if every corner is a finite number.  An infinite box is the
    /// "unbounded query" the orchestrator must never issue.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.1}, {:.1}, {:.1}, {:.1}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
