//! BK-tree over Levenshtein edit distance, for typo-tolerant lookup (§4.B).
//!
//! Branching on edit distance (rather than a prefix or hash) works because
//! edit distance satisfies the triangle inequality: a node's children are
//! keyed by their distance to that node, so a query only has to descend into
//! children whose key falls within `[d - tolerance, d + tolerance]`.

use crate::distance::levenshtein;
use parking_lot::RwLock;
use std::collections::HashMap;

struct Node {
    term: String,
    object_id: i64,
    children: HashMap<usize, Box<Node>>,
}

impl Node {
    fn depth(&self) -> usize {
        1 + self.children.values().map(|c| c.depth()).max().unwrap_or(0)
    }

    fn count(&self) -> usize {
        1 + self.children.values().map(|c| c.count()).sum::<usize>()
    }

    fn insert(&mut self, term: String, object_id: i64) {
        let d = levenshtein(&self.term, &term);
        if d == 0 {
            return;
        }
        match self.children.get_mut(&d) {
            Some(child) => child.insert(term, object_id),
            None => {
                self.children.insert(
                    d,
                    Box::new(Node {
                        term,
                        object_id,
                        children: HashMap::new(),
                    }),
                );
            }
        }
    }

    fn search(&self, query: &str, max_distance: usize, out: &mut Vec<(String, i64, usize)>) {
        let d = levenshtein(&self.term, query);
        if d <= max_distance {
            out.push((self.term.clone(), self.object_id, d));
        }
        let lo = d.saturating_sub(max_distance);
        let hi = d.saturating_add(max_distance);
        for k in lo..=hi {
            if let Some(child) = self.children.get(&k) {
                child.search(query, max_distance, out);
            }
        }
    }

}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyIndexStats {
    pub term_count: usize,
    pub node_count: usize,
    pub depth: usize,
}

/// Thread-safe BK-tree keyed on identifier/alias terms.
///
/// `terms` is the side table from §4.B: it is the source of truth for
/// membership (first wins on a duplicate term) and for `get_object_id`, kept
/// separate from the tree so `add_term` never has to walk the tree to check
/// whether a term is already present.
pub struct FuzzyIndex {
    root: RwLock<Option<Node>>,
    terms: RwLock<HashMap<String, i64>>,
}

/// Create operations.
impl FuzzyIndex {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(None),
            terms: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for FuzzyIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutation operations.
impl FuzzyIndex {
    /// Duplicate terms are silently ignored — first wins (§4.B).
    pub fn add_term(&self, term: &str, object_id: i64) {
        let mut terms = self.terms.write();
        if terms.contains_key(term) {
            return;
        }
        let mut root = self.root.write();
        match root.as_mut() {
            Some(node) => node.insert(term.to_string(), object_id),
            None => {
                *root = Some(Node {
                    term: term.to_string(),
                    object_id,
                    children: HashMap::new(),
                });
            }
        }
        terms.insert(term.to_string(), object_id);
    }

    pub fn add_terms(&self, terms: &[(String, i64)]) {
        for (term, object_id) in terms {
            self.add_term(term, *object_id);
        }
    }

    pub fn clear(&self) {
        *self.root.write() = None;
        self.terms.write().clear();
    }
}

/// Search operations.
impl FuzzyIndex {
    /// Returns `(term, object_id, distance)` triples within `max_distance` of `query`.
    pub fn match_(&self, query: &str, max_distance: usize) -> Vec<(String, i64, usize)> {
        let root = self.root.read();
        let mut out = Vec::new();
        if let Some(node) = root.as_ref() {
            node.search(query, max_distance, &mut out);
        }
        out.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| a.0.cmp(&b.0)));
        out
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.read().contains_key(term)
    }

    pub fn get_object_id(&self, term: &str) -> Option<i64> {
        self.terms.read().get(term).copied()
    }
}

/// Maintenance operations.
impl FuzzyIndex {
    pub fn size(&self) -> usize {
        self.terms.read().len()
    }

    pub fn get_stats(&self) -> FuzzyIndexStats {
        let root = self.root.read();
        match root.as_ref() {
            Some(node) => FuzzyIndexStats {
                term_count: self.terms.read().len(),
                node_count: node.count(),
                depth: node.depth(),
            },
            None => FuzzyIndexStats {
                term_count: 0,
                node_count: 0,
                depth: 0,
            },
        }
    }
}
