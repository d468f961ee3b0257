//! P7: `paginate(sort(filter(All)))` agrees with `Repository::search(filter)`
//! on the same subset.

use crate::common::{identifier_strategy, object};
use celestial_core::{CelestialSearchFilter, FilterEvaluator, OrderBy, Repository};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn prop_paginate_matches_repository_search(
        entries in proptest::collection::vec(
            (identifier_strategy(), -30.0f64..30.0, 0.0f64..360.0, -90.0f64..=90.0),
            1..15,
        ),
        limit in 1i64..10,
        offset in 0i64..10,
        order_choice in 0u8..4,
        ascending in proptest::bool::ANY,
    ) {
        let unique_ids: HashSet<&String> = entries.iter().map(|(id, ..)| id).collect();
        prop_assume!(unique_ids.len() == entries.len());

        let order_by = match order_choice {
            0 => OrderBy::Identifier,
            1 => OrderBy::Magnitude,
            2 => OrderBy::Ra,
            _ => OrderBy::Dec,
        };

        let repo = Repository::open_in_memory().unwrap();
        let mut all = Vec::new();
        for (identifier, mag, ra, dec) in &entries {
            let mut obj = object(identifier, *ra, *dec);
            obj.visual_magnitude = *mag;
            repo.insert(&obj).unwrap();
            all.push(obj);
        }

        let filter = CelestialSearchFilter { limit, offset, order_by, ascending, ..Default::default() };

        let mut expected = FilterEvaluator::filter_results(&all, &filter);
        FilterEvaluator::sort_results(&mut expected, &filter);
        let expected = FilterEvaluator::paginate(&expected, offset, limit);

        let actual = repo.search(&filter).unwrap();

        let expected_ids: Vec<&str> = expected.iter().map(|o| o.identifier.as_str()).collect();
        let actual_ids: Vec<&str> = actual.iter().map(|o| o.identifier.as_str()).collect();
        prop_assert_eq!(expected_ids, actual_ids);
    }
}
