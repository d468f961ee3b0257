//! P3: Levenshtein is a metric; the BK-tree built on it is sound and complete.

use crate::common::identifier_strategy;
use celestial_core::distance::levenshtein;
use celestial_core::FuzzyIndex;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_identity(a in identifier_strategy()) {
        prop_assert_eq!(levenshtein(&a, &a), 0);
    }

    #[test]
    fn prop_symmetry(a in identifier_strategy(), b in identifier_strategy()) {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
    }

    #[test]
    fn prop_triangle_inequality(
        a in identifier_strategy(),
        b in identifier_strategy(),
        c in identifier_strategy(),
    ) {
        let ab = levenshtein(&a, &b);
        let bc = levenshtein(&b, &c);
        let ac = levenshtein(&a, &c);
        prop_assert!(ac <= ab + bc);
    }

    /// `match_` returns every indexed term within `max_distance` (completeness)
    /// and no term beyond it (soundness).
    #[test]
    fn prop_bk_tree_sound_and_complete(
        terms in proptest::collection::vec(identifier_strategy(), 1..20),
        query in identifier_strategy(),
        max_distance in 0usize..4,
    ) {
        let index = FuzzyIndex::new();
        for (i, term) in terms.iter().enumerate() {
            index.add_term(term, i as i64);
        }

        let hits: std::collections::HashSet<String> = index
            .match_(&query, max_distance)
            .into_iter()
            .map(|(term, _, _)| term)
            .collect();

        for term in &terms {
            let d = levenshtein(term, &query);
            if d <= max_distance {
                prop_assert!(hits.contains(term), "expected {term} (d={d}) to match");
            }
        }
        for term in &hits {
            prop_assert!(levenshtein(term, &query) <= max_distance);
        }
    }
}
