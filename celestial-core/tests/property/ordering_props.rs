//! P6: fuzzy results are non-decreasing by distance, spatial results are
//! non-decreasing by angular distance, and `sort_results` is consistent with
//! `(order_by, ascending)`.

use crate::common::{identifier_strategy, object};
use celestial_core::{CelestialSearchFilter, FilterEvaluator, FuzzyIndex, OrderBy, SpatialIndex};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_fuzzy_results_non_decreasing(
        terms in proptest::collection::vec(identifier_strategy(), 1..20),
        query in identifier_strategy(),
    ) {
        let idx = FuzzyIndex::new();
        for (i, term) in terms.iter().enumerate() {
            idx.add_term(term, i as i64);
        }
        let hits = idx.match_(&query, 1000);
        for pair in hits.windows(2) {
            prop_assert!(pair[0].2 <= pair[1].2);
        }
    }

    #[test]
    fn prop_spatial_results_non_decreasing(
        points in proptest::collection::vec((0.0f64..360.0, -89.9f64..=89.9), 1..30),
        center_ra in 0.0f64..360.0,
        center_dec in -89.9f64..=89.9,
    ) {
        let idx = SpatialIndex::new();
        for (i, (ra, dec)) in points.iter().enumerate() {
            idx.insert(i as i64, *ra, *dec);
        }
        let hits = idx.search_radius(center_ra, center_dec, 180.0);
        for pair in hits.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn prop_sort_results_consistent_with_order_by(
        entries in proptest::collection::vec(
            (identifier_strategy(), -30.0f64..30.0, 0.0f64..360.0, -90.0f64..=90.0),
            1..20,
        ),
        order_choice in 0u8..4,
        ascending in proptest::bool::ANY,
    ) {
        let order_by = match order_choice {
            0 => OrderBy::Identifier,
            1 => OrderBy::Magnitude,
            2 => OrderBy::Ra,
            _ => OrderBy::Dec,
        };
        let mut rows: Vec<_> = entries
            .iter()
            .map(|(identifier, mag, ra, dec)| {
                let mut obj = object(identifier, *ra, *dec);
                obj.visual_magnitude = *mag;
                obj
            })
            .collect();

        let filter = CelestialSearchFilter { order_by, ascending, ..Default::default() };
        FilterEvaluator::sort_results(&mut rows, &filter);

        for pair in rows.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ord = match order_by {
                OrderBy::Identifier => a.identifier.cmp(&b.identifier),
                OrderBy::Magnitude => a.visual_magnitude.total_cmp(&b.visual_magnitude),
                OrderBy::Ra => a.ra_deg.total_cmp(&b.ra_deg),
                OrderBy::Dec => a.dec_deg.total_cmp(&b.dec_deg),
            };
            let expected = if ascending { ord } else { ord.reverse() };
            prop_assert_ne!(expected, std::cmp::Ordering::Greater);
        }
    }
}
