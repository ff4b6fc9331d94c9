//! Geographic ↔ planar coordinate reprojection.
//!
//! Two Mercator variants are supported, both on the WGS-84 ellipsoid axis:
//!
//! | Variant          | EPSG | Model                                       |
//! |------------------|------|---------------------------------------------|
//! | `WorldMercator`  | 3395 | Ellipsoidal; inverse solved by iteration    |
//! | `WebMercator`    | 3857 | Spherical; closed-form inverse              |
//!
//! `WorldMercator` is the default because stored network geometry is
//! expected in EPSG:3395.  Whichever variant is chosen must match the CRS of
//! the features returned by the feature source.
//!
//! [`Reprojector`] is `Copy` and holds no mutable state, so it can be shared
//! freely across threads.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::{BoundingBox, CoreError, CoreResult, GeoPoint, ProjectedPoint};

/// WGS-84 semi-major axis in metres.
const WGS84_A: f64 = 6_378_137.0;

/// WGS-84 first eccentricity, `sqrt(2f − f²)` with `f = 1 / 298.257223563`.
const WGS84_E: f64 = 0.081_819_190_842_621_5;

/// Convergence threshold (radians) for the EPSG:3395 inverse.
const INVERSE_EPSILON: f64 = 1e-12;
const INVERSE_MAX_ITER: usize = 20;

/// Planar CRS used for distance and snapping math.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Projection {
    /// EPSG:3395, ellipsoidal World Mercator.
    #[default]
    WorldMercator,
    /// EPSG:3857, spherical "Web" Mercator.
    WebMercator,
}

impl Projection {
    /// The EPSG code of this CRS.
    pub fn epsg(self) -> u32 {
        match self {
            Projection::WorldMercator => 3395,
            Projection::WebMercator   => 3857,
        }
    }
}

/// Pure, deterministic converter between [`GeoPoint`] and [`ProjectedPoint`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Reprojector {
    projection: Projection,
}

impl Reprojector {
    pub fn new(projection: Projection) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Geographic → planar.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPointFormat`] if `p` fails
    /// [`GeoPoint::validate`].
    pub fn to_projected(&self, p: GeoPoint) -> CoreResult<ProjectedPoint> {
        p.validate()?;
        let lam = p.lng.to_radians();
        let phi = p.lat.to_radians();
        let x = WGS84_A * lam;
        let y = match self.projection {
            Projection::WebMercator => WGS84_A * (FRAC_PI_4 + phi * 0.5).tan().ln(),
            Projection::WorldMercator => {
                let es = WGS84_E * phi.sin();
                let ratio = ((1.0 - es) / (1.0 + es)).powf(WGS84_E * 0.5);
                WGS84_A * ((FRAC_PI_4 + phi * 0.5).tan() * ratio).ln()
            }
        };
        Ok(ProjectedPoint { x, y })
    }

    /// Planar → geographic.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPointFormat`] if either coordinate is non-finite.
    pub fn to_geographic(&self, p: ProjectedPoint) -> CoreResult<GeoPoint> {
        if !p.is_finite() {
            return Err(CoreError::InvalidPointFormat(format!(
                "non-finite projected coordinate ({}, {})",
                p.x, p.y
            )));
        }
        let lng = (p.x / WGS84_A).to_degrees();
        let t = (-p.y / WGS84_A).exp();
        let phi = match self.projection {
            Projection::WebMercator => FRAC_PI_2 - 2.0 * t.atan(),
            Projection::WorldMercator => {
                let mut phi = FRAC_PI_2 - 2.0 * t.atan();
                for _ in 0..INVERSE_MAX_ITER {
                    let es = WGS84_E * phi.sin();
                    let next = FRAC_PI_2
                        - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(WGS84_E * 0.5)).atan();
                    let done = (next - phi).abs() < INVERSE_EPSILON;
                    phi = next;
                    if done {
                        break;
                    }
                }
                phi
            }
        };
        Ok(GeoPoint::new(lng, phi.to_degrees()))
    }

    /// Project the box spanned by two geographic corners.
    pub fn project_bbox(&self, a: GeoPoint, b: GeoPoint) -> CoreResult<BoundingBox> {
        let pa = self.to_projected(a)?;
        let pb = self.to_projected(b)?;
        Ok(BoundingBox::new(pa.x, pa.y, pb.x, pb.y))
    }
}
