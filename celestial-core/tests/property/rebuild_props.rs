//! P9: `initialize -> rebuildIndexes -> query` yields the same results as
//! `initialize -> query` for an unchanged store.

use crate::common::{identifier_strategy, object};
use celestial_core::{Repository, SearchEngine, SearchOptions, ServiceConfig};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn prop_rebuild_is_idempotent(
        entries in proptest::collection::vec(
            (identifier_strategy(), 0.0f64..360.0, -90.0f64..=90.0),
            1..15,
        ),
        query in identifier_strategy(),
    ) {
        let unique: HashSet<&String> = entries.iter().map(|(id, ..)| id).collect();
        prop_assume!(unique.len() == entries.len());

        let repo = Repository::open_in_memory().unwrap();
        for (identifier, ra, dec) in &entries {
            repo.insert(&object(identifier, *ra, *dec)).unwrap();
        }
        let engine = SearchEngine::new(repo, ServiceConfig::in_memory());
        engine.initialize().unwrap();

        let before_search: Vec<String> = engine
            .search(&query, &SearchOptions::default())
            .into_iter()
            .map(|o| o.identifier)
            .collect();
        let before_auto: Vec<String> = engine.autocomplete(&query, 50);
        let before_nearby: usize = engine.search_by_coordinates(180.0, 0.0, 180.0, 1000).len();

        engine.rebuild_indexes().unwrap();

        let after_search: Vec<String> = engine
            .search(&query, &SearchOptions::default())
            .into_iter()
            .map(|o| o.identifier)
            .collect();
        let after_auto: Vec<String> = engine.autocomplete(&query, 50);
        let after_nearby: usize = engine.search_by_coordinates(180.0, 0.0, 180.0, 1000).len();

        prop_assert_eq!(before_search, after_search);
        prop_assert_eq!(before_auto, after_auto);
        prop_assert_eq!(before_nearby, after_nearby);
    }
}
