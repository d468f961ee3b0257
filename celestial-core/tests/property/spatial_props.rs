//! P4: every result reported by `search_radius` is within `r` of the query
//! (soundness), and every stored point truly within `r` appears (completeness).

use celestial_core::SpatialIndex;
use proptest::prelude::*;

/// Independent haversine-formula oracle, deliberately not the implementation's
/// own spherical-law-of-cosines formula, so completeness isn't checked against
/// itself.
fn haversine_deg(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (ra1, dec1, ra2, dec2) = (
        ra1.to_radians(),
        dec1.to_radians(),
        ra2.to_radians(),
        dec2.to_radians(),
    );
    let d_dec = dec2 - dec1;
    let d_ra = ra2 - ra1;
    let a = (d_dec / 2.0).sin().powi(2) + dec1.cos() * dec2.cos() * (d_ra / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin().to_degrees()
}

proptest! {
    #[test]
    fn prop_spatial_sound_and_complete(
        points in proptest::collection::vec((0.0f64..360.0, -89.9f64..=89.9), 1..40),
        center_ra in 0.0f64..360.0,
        center_dec in -89.9f64..=89.9,
        radius_deg in 0.1f64..20.0,
    ) {
        let idx = SpatialIndex::new();
        for (i, (ra, dec)) in points.iter().enumerate() {
            idx.insert(i as i64, *ra, *dec);
        }

        let hits = idx.search_radius(center_ra, center_dec, radius_deg);

        // Soundness: every returned distance truly falls within the radius.
        for (_, d) in &hits {
            prop_assert!(*d <= radius_deg + 1e-9);
        }

        // Completeness: every point within radius_deg under the independent
        // oracle appears in the result set.
        let found: std::collections::HashSet<i64> = hits.iter().map(|(id, _)| *id).collect();
        for (i, (ra, dec)) in points.iter().enumerate() {
            let d = haversine_deg(center_ra, center_dec, *ra, *dec);
            if d <= radius_deg - 1e-6 {
                prop_assert!(found.contains(&(i as i64)), "point {i} at distance {d} should be found");
            }
        }
    }
}
