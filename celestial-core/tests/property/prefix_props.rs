//! P5: `autocomplete(p, limit)` returns only strings that case-insensitively
//! start with `p` (soundness), and with a generous cap/limit every stored
//! name that does so appears (completeness).

use crate::common::identifier_strategy;
use celestial_core::PrefixIndex;
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn prop_prefix_sound_and_complete(
        names in proptest::collection::vec(identifier_strategy(), 1..20),
        prefix in identifier_strategy(),
    ) {
        let unique: Vec<String> = names.into_iter().collect::<HashSet<_>>().into_iter().collect();
        let idx = PrefixIndex::new(unique.len().max(1));
        for (i, name) in unique.iter().enumerate() {
            idx.insert(name, i as i64);
        }

        let hits = idx.autocomplete(&prefix, unique.len().max(1));
        let lowered_prefix = prefix.to_lowercase();

        for (name, _) in &hits {
            prop_assert!(name.to_lowercase().starts_with(&lowered_prefix));
        }

        let found: HashSet<&str> = hits.iter().map(|(name, _)| name.as_str()).collect();
        for name in &unique {
            if name.to_lowercase().starts_with(&lowered_prefix) {
                prop_assert!(found.contains(name.as_str()), "{name} should autocomplete from {prefix}");
            }
        }
    }
}
