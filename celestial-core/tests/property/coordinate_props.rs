//! P2: every successful insert/update satisfies `0 <= ra_deg < 360` and
//! `-90 <= dec_deg <= 90`; everything outside that box is rejected.

use crate::common::{identifier_strategy, object};
use celestial_core::Repository;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_in_range_coordinates_are_accepted(
        identifier in identifier_strategy(),
        ra_deg in 0.0f64..360.0,
        dec_deg in -90.0f64..=90.0,
    ) {
        let repo = Repository::open_in_memory().unwrap();
        let obj = object(&identifier, ra_deg, dec_deg);
        let id = repo.insert(&obj);
        prop_assert!(id.is_ok());

        let stored = repo.find_by_identifier(&identifier).unwrap().unwrap();
        prop_assert!(stored.has_valid_coordinates());
    }

    #[test]
    fn prop_out_of_range_ra_is_rejected(
        identifier in identifier_strategy(),
        ra_deg in prop_oneof![-720.0f64..0.0, 360.0f64..720.0],
        dec_deg in -90.0f64..=90.0,
    ) {
        let repo = Repository::open_in_memory().unwrap();
        let obj = object(&identifier, ra_deg, dec_deg);
        prop_assert!(repo.insert(&obj).is_err());
        prop_assert!(repo.find_by_identifier(&identifier).unwrap().is_none());
    }

    #[test]
    fn prop_out_of_range_dec_is_rejected(
        identifier in identifier_strategy(),
        ra_deg in 0.0f64..360.0,
        dec_deg in prop_oneof![-720.0f64..-90.0001, 90.0001f64..720.0],
    ) {
        let repo = Repository::open_in_memory().unwrap();
        let obj = object(&identifier, ra_deg, dec_deg);
        prop_assert!(repo.insert(&obj).is_err());
        prop_assert!(repo.find_by_identifier(&identifier).unwrap().is_none());
    }
}
