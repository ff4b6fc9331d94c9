//! Routing configuration.
//!
//! All distances are in projection units (metres for both supported
//! Mercator variants, at the equator).  The defaults reproduce the behaviour
//! of the service this engine backs: EPSG:3395 geometry, 1-unit endpoint
//! tolerance, two-way streets, cost = length.

use crate::{CoreError, CoreResult, Direction, Projection};

/// Upper bound accepted for [`RouteConfig::max_expansions`].
pub const MAX_EXPANSIONS: u32 = 64;

/// What the graph builder does with a feature it cannot route over
/// (a point or polygon geometry, or a line with fewer than two coordinates).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GeometryPolicy {
    /// Abort the whole build with `UnsupportedGeometry`.
    #[default]
    Reject,
    /// Drop the feature, log a warning, and build from the rest.
    Skip,
}

/// Top-level routing configuration.
///
/// Typically constructed with `RouteConfig::default()` and a few field
/// overrides, or loaded from a JSON file by the application crate (with the
/// `serde` feature).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouteConfig {
    /// Planar CRS.  Must match the CRS of stored feature geometry.
    pub projection: Projection,

    /// Endpoints closer than this are merged into one graph node.  Default: 1.
    pub coincidence_tolerance: f64,

    /// A query point further than this from every edge fails to snap.
    /// Default: 500.
    pub snap_tolerance: f64,

    /// A snapped point closer than this to an edge endpoint reuses that
    /// node instead of splitting the edge.  Default: 1e-6.
    pub snap_epsilon: f64,

    /// Relative margin added on every side of the initial start/end box.
    /// Default: 0.1 (10 %).
    pub initial_margin: f64,

    /// Absolute lower bound for that margin, so a degenerate box (start and
    /// end share an axis) still has area.  Default: 50.
    pub min_margin: f64,

    /// Scale applied to the box's width and height on each expansion.
    /// Default: 1.2.
    pub expansion_factor: f64,

    /// How many times the box may grow before giving up.  The engine issues
    /// at most `max_expansions + 1` feature queries.  Default: 4, at most
    /// [`MAX_EXPANSIONS`].
    pub max_expansions: u32,

    /// Speed for features without a speed attribute.  `None` makes cost
    /// equal to length for those features.
    pub default_speed: Option<f64>,

    /// Direction for features without a direction attribute.
    pub default_direction: Direction,

    /// Handling of unroutable geometries.
    pub geometry_policy: GeometryPolicy,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            projection:            Projection::WorldMercator,
            coincidence_tolerance: 1.0,
            snap_tolerance:        500.0,
            snap_epsilon:          1e-6,
            initial_margin:        0.1,
            min_margin:            50.0,
            expansion_factor:      1.2,
            max_expansions:        4,
            default_speed:         None,
            default_direction:     Direction::Both,
            geometry_policy:       GeometryPolicy::Reject,
        }
    }
}

impl RouteConfig {
    /// Reject values that would make the attempt loop or the cost model
    /// meaningless.
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] naming the first offending field.
    pub fn validate(&self) -> CoreResult<()> {
        fn positive(name: &str, v: f64) -> CoreResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be finite and > 0, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f64) -> CoreResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be finite and >= 0, got {v}")))
            }
        }

        non_negative("coincidence_tolerance", self.coincidence_tolerance)?;
        non_negative("snap_epsilon", self.snap_epsilon)?;
        non_negative("initial_margin", self.initial_margin)?;
        positive("min_margin", self.min_margin)?;

        // An infinite snap tolerance is allowed: "snap to whatever is nearest".
        if self.snap_tolerance.is_nan() || self.snap_tolerance < 0.0 {
            return Err(CoreError::Config(format!(
                "snap_tolerance must be >= 0, got {}",
                self.snap_tolerance
            )));
        }
        if !(self.expansion_factor.is_finite() && self.expansion_factor > 1.0) {
            return Err(CoreError::Config(format!(
                "expansion_factor must be finite and > 1, got {}",
                self.expansion_factor
            )));
        }
        if self.max_expansions > MAX_EXPANSIONS {
            return Err(CoreError::Config(format!(
                "max_expansions must be <= {MAX_EXPANSIONS}, got {}",
                self.max_expansions
            )));
        }
        if let Some(speed) = self.default_speed {
            positive("default_speed", speed)?;
        }
        Ok(())
    }
}
