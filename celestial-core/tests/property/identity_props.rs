//! P1: `find_by_identifier` never returns more than one row for a given
//! identifier, however many insert attempts target it. P10:
//! `increment_click_count` strictly increases `click_count` by exactly 1 and
//! never decreases it.

use crate::common::{identifier_strategy, object};
use celestial_core::Repository;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_identifier_uniqueness(
        identifier in identifier_strategy(),
        attempts in 1usize..8,
        ra_deg in 0.0f64..360.0,
        dec_deg in -90.0f64..=90.0,
    ) {
        let repo = Repository::open_in_memory().unwrap();
        let mut successes = 0;
        for _ in 0..attempts {
            if repo.insert(&object(&identifier, ra_deg, dec_deg)).is_ok() {
                successes += 1;
            }
        }
        prop_assert_eq!(successes, 1);
        prop_assert!(repo.find_by_identifier(&identifier).unwrap().is_some());
    }

    #[test]
    fn prop_click_count_monotonic(
        identifier in identifier_strategy(),
        ra_deg in 0.0f64..360.0,
        dec_deg in -90.0f64..=90.0,
        increments in 0usize..20,
    ) {
        let repo = Repository::open_in_memory().unwrap();
        repo.insert(&object(&identifier, ra_deg, dec_deg)).unwrap();

        let mut previous = repo.find_by_identifier(&identifier).unwrap().unwrap().click_count;
        for _ in 0..increments {
            repo.increment_click_count(&identifier).unwrap();
            let current = repo.find_by_identifier(&identifier).unwrap().unwrap().click_count;
            prop_assert_eq!(current, previous + 1);
            previous = current;
        }
    }
}
