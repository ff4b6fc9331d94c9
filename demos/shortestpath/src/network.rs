//! Built-in street network used when no `--network` file is given.
//!
//! A handful of streets around Trondheim's Midtbyen, drawn in lng/lat and
//! projected with the configured projection so the demo needs no data files.

use sp_core::{Direction, GeoPoint, Reprojector};
use sp_network::{Feature, FeatureAttributes};

/// `(id, street, from, to, lng/lat vertices)`.
const STREETS: &[(&str, &str, &str, &str, &[(f64, f64)])] = &[
    ("1", "Munkegata",        "Torget",       "Nidarosdomen",  &[(10.3951, 63.4305), (10.3960, 63.4280), (10.3966, 63.4270)]),
    ("2", "Kongens gate",     "Torget",       "Prinsens gate", &[(10.3951, 63.4305), (10.3920, 63.4303)]),
    ("3", "Prinsens gate",    "Kongens gate", "Elgeseter",     &[(10.3920, 63.4303), (10.3925, 63.4280), (10.3930, 63.4265)]),
    ("4", "Olav Tryggvasons", "Torget",       "Bakke bru",     &[(10.3951, 63.4305), (10.3955, 63.4330), (10.4020, 63.4340)]),
    ("5", "Erling Skakkes",   "Nidarosdomen", "Prinsens gate", &[(10.3966, 63.4270), (10.3930, 63.4265)]),
    ("6", "Kjøpmannsgata",    "Bakke bru",    "Nidarosdomen",  &[(10.4020, 63.4340), (10.4005, 63.4300), (10.3966, 63.4270)]),
];

/// Project [`STREETS`] into features.
///
/// Kjøpmannsgata is one-way towards the cathedral; Olav Tryggvasons gate is
/// slowed to half speed.
pub fn build_network(reprojector: &Reprojector) -> anyhow::Result<Vec<Feature>> {
    STREETS
        .iter()
        .map(|&(id, street, from, to, coords)| {
            let line = coords
                .iter()
                .map(|&(lng, lat)| reprojector.to_projected(GeoPoint::new(lng, lat)))
                .collect::<Result<Vec<_>, _>>()?;
            let attributes = FeatureAttributes {
                id:      id.to_string(),
                point_a: street.to_string(),
                point_b: from.to_string(),
                point_c: to.to_string(),
            };
            let feature = Feature::line(attributes, line);
            Ok(match id {
                "6" => feature.with_direction(Direction::Forward),
                "4" => feature.with_speed(0.5),
                _ => feature,
            })
        })
        .collect()
}

/// Default start (near Torget) and end (near Elgeseter).
pub fn default_endpoints() -> (GeoPoint, GeoPoint) {
    (GeoPoint::new(10.3950, 63.4306), GeoPoint::new(10.3931, 63.4264))
}
