//! Unit tests for sp-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, FeatureId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
        assert_eq!(EdgeId::from_index(7), EdgeId(7));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert!(!FeatureId::INVALID.is_valid());
        assert!(FeatureId(0).is_valid());
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(EdgeId(7).to_string(), "EdgeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{BoundingBox, CoreError, GeoPoint, ProjectedPoint};

    #[test]
    fn parse_lng_lat_string() {
        let p: GeoPoint = "8.0182, 58.1599".parse().unwrap();
        assert_eq!(p, GeoPoint::new(8.0182, 58.1599));
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "8.0", "8.0,abc", "1,2,3", "nan,1", "200,10", "10,90"] {
            let r = bad.parse::<GeoPoint>();
            assert!(
                matches!(r, Err(CoreError::InvalidPointFormat(_))),
                "{bad:?} should be rejected, got {r:?}"
            );
        }
    }

    #[test]
    fn projected_distance_and_lerp() {
        let a = ProjectedPoint::new(0.0, 0.0);
        let b = ProjectedPoint::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_2(b), 25.0);
        assert_eq!(a.lerp(b, 0.5), ProjectedPoint::new(1.5, 2.0));
    }

    #[test]
    fn bbox_normalises_corners() {
        let b = BoundingBox::new(10.0, 20.0, 0.0, 5.0);
        assert_eq!(b, BoundingBox { min_x: 0.0, min_y: 5.0, max_x: 10.0, max_y: 20.0 });
    }

    #[test]
    fn bbox_around_adds_relative_margin() {
        let b = BoundingBox::around(
            ProjectedPoint::new(0.0, 0.0),
            ProjectedPoint::new(1_000.0, 2_000.0),
            0.1,
            1.0,
        );
        assert_eq!(b, BoundingBox::new(-100.0, -200.0, 1_100.0, 2_200.0));
        assert!(b.contains(ProjectedPoint::new(0.0, 0.0)));
    }

    #[test]
    fn bbox_around_degenerate_axis_uses_min_margin() {
        // Both points share y → zero height before padding.
        let b = BoundingBox::around(
            ProjectedPoint::new(0.0, 5.0),
            ProjectedPoint::new(100.0, 5.0),
            0.1,
            50.0,
        );
        assert_eq!(b.min_y, -45.0);
        assert_eq!(b.max_y, 55.0);
        // Relative margin (10) is below the floor, so x also gets 50.
        assert_eq!(b.min_x, -50.0);
        assert_eq!(b.max_x, 150.0);
    }

    #[test]
    fn bbox_expanded_is_symmetric() {
        let b = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let e = b.expanded(1.2);
        assert!((e.width() - 120.0).abs() < 1e-9);
        assert!((e.height() - 60.0).abs() < 1e-9);
        assert_eq!(e.center(), b.center());
    }

    #[test]
    fn bbox_min_margin_pads_degenerate_axes_only() {
        let point = BoundingBox::new(5.0, 5.0, 5.0, 5.0).with_min_margin(50.0);
        assert_eq!(point, BoundingBox::new(-45.0, -45.0, 55.0, 55.0));

        let flat = BoundingBox::new(0.0, 10.0, 400.0, 10.0).with_min_margin(50.0);
        assert_eq!(flat, BoundingBox::new(0.0, -40.0, 400.0, 60.0));

        let wide = BoundingBox::new(0.0, 0.0, 400.0, 200.0);
        assert_eq!(wide.with_min_margin(50.0), wide);
    }

    #[test]
    fn bbox_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&BoundingBox::new(5.0, 5.0, 15.0, 15.0)));
        assert!(a.intersects(&BoundingBox::new(10.0, 10.0, 20.0, 20.0))); // touching
        assert!(!a.intersects(&BoundingBox::new(11.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn bbox_from_points() {
        let b = BoundingBox::from_points([
            ProjectedPoint::new(3.0, -1.0),
            ProjectedPoint::new(-2.0, 4.0),
            ProjectedPoint::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(b, BoundingBox::new(-2.0, -1.0, 3.0, 4.0));
        assert!(BoundingBox::from_points([]).is_none());
    }
}

#[cfg(test)]
mod projection {
    use crate::{CoreError, GeoPoint, ProjectedPoint, Projection, Reprojector};

    const SAMPLES: [(f64, f64); 8] = [
        (0.0, 0.0),
        (8.0182, 58.1599), // Kristiansand
        (-88.043, 30.694),
        (179.9, -45.0),
        (-179.9, 84.0),
        (12.5, -80.0),
        (-0.1278, 51.5074),
        (151.2, -33.9),
    ];

    #[test]
    fn round_trip_world_mercator() {
        let r = Reprojector::new(Projection::WorldMercator);
        for (lng, lat) in SAMPLES {
            let p = GeoPoint::new(lng, lat);
            let back = r.to_geographic(r.to_projected(p).unwrap()).unwrap();
            assert!((back.lng - lng).abs() < 1e-6, "{p}: lng {}", back.lng);
            assert!((back.lat - lat).abs() < 1e-6, "{p}: lat {}", back.lat);
        }
    }

    #[test]
    fn round_trip_web_mercator() {
        let r = Reprojector::new(Projection::WebMercator);
        for (lng, lat) in SAMPLES {
            let p = GeoPoint::new(lng, lat);
            let back = r.to_geographic(r.to_projected(p).unwrap()).unwrap();
            assert!((back.lng - lng).abs() < 1e-6);
            assert!((back.lat - lat).abs() < 1e-6);
        }
    }

    #[test]
    fn origin_maps_to_origin() {
        let p = Reprojector::default().to_projected(GeoPoint::new(0.0, 0.0)).unwrap();
        assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);
    }

    #[test]
    fn antimeridian_x() {
        let p = Reprojector::default().to_projected(GeoPoint::new(180.0, 0.0)).unwrap();
        assert!((p.x - 20_037_508.342_789).abs() < 1e-3, "got {}", p.x);
    }

    #[test]
    fn ellipsoid_northing_below_sphere() {
        // The ellipsoidal correction pulls northing towards the equator.
        let p = GeoPoint::new(8.0, 58.0);
        let world = Reprojector::new(Projection::WorldMercator).to_projected(p).unwrap();
        let web = Reprojector::new(Projection::WebMercator).to_projected(p).unwrap();
        assert_eq!(world.x, web.x);
        assert!(world.y < web.y);
    }

    #[test]
    fn rejects_invalid_input() {
        let r = Reprojector::default();
        assert!(matches!(
            r.to_projected(GeoPoint::new(f64::NAN, 0.0)),
            Err(CoreError::InvalidPointFormat(_))
        ));
        assert!(matches!(
            r.to_projected(GeoPoint::new(0.0, 90.0)),
            Err(CoreError::InvalidPointFormat(_))
        ));
        assert!(matches!(
            r.to_geographic(ProjectedPoint::new(f64::INFINITY, 0.0)),
            Err(CoreError::InvalidPointFormat(_))
        ));
    }

    #[test]
    fn epsg_codes() {
        assert_eq!(Projection::WorldMercator.epsg(), 3395);
        assert_eq!(Projection::WebMercator.epsg(), 3857);
    }
}

#[cfg(test)]
mod direction {
    use crate::Direction;

    #[test]
    fn allows() {
        assert!(Direction::Both.allows_forward() && Direction::Both.allows_backward());
        assert!(Direction::Forward.allows_forward() && !Direction::Forward.allows_backward());
        assert!(!Direction::Backward.allows_forward() && Direction::Backward.allows_backward());
    }

    #[test]
    fn parse_values() {
        assert_eq!(Direction::parse("yes"), Some(Direction::Forward));
        assert_eq!(Direction::parse("Backward"), Some(Direction::Backward));
        assert_eq!(Direction::parse("-1"), Some(Direction::Backward));
        assert_eq!(Direction::parse(" both "), Some(Direction::Both));
        assert_eq!(Direction::parse("sideways"), None);
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, MAX_EXPANSIONS, RouteConfig};

    #[test]
    fn default_is_valid() {
        RouteConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_non_growing_expansion() {
        let cfg = RouteConfig { expansion_factor: 1.0, ..RouteConfig::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_bad_speed() {
        let cfg = RouteConfig { default_speed: Some(0.0), ..RouteConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_oversized_expansion_budget() {
        let cfg = RouteConfig { max_expansions: MAX_EXPANSIONS + 1, ..RouteConfig::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
        let cfg = RouteConfig { max_expansions: MAX_EXPANSIONS, ..RouteConfig::default() };
        cfg.validate().unwrap();
    }

    #[test]
    fn infinite_snap_tolerance_allowed() {
        let cfg = RouteConfig { snap_tolerance: f64::INFINITY, ..RouteConfig::default() };
        cfg.validate().unwrap();
    }
}
