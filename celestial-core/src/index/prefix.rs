//! Case-folded character trie over object identifiers, for autocomplete (§4.A).

use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct Node {
    children: HashMap<char, Node>,
    /// Identifiers reachable through this prefix, capped at `candidate_cap`.
    candidates: Vec<(String, i64)>,
    terminal: Option<i64>,
}

struct Inner {
    root: Node,
    candidate_cap: usize,
    size: usize,
}

/// Thread-safe prefix trie. Folds to lowercase on insert and lookup so that
/// autocomplete is case-insensitive, matching the repository's `searchByName`.
pub struct PrefixIndex {
    inner: RwLock<Inner>,
}

/// Create operations.
impl PrefixIndex {
    pub fn new(candidate_cap: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                root: Node::default(),
                candidate_cap,
                size: 0,
            }),
        }
    }
}

/// Mutation operations.
impl PrefixIndex {
    /// Inserts one `(identifier, object_id)` pair. Re-inserting the same
    /// identifier with a different id overwrites the terminal mapping but
    /// does not duplicate candidate entries.
    pub fn insert(&self, identifier: &str, object_id: i64) {
        let folded: Vec<char> = identifier.to_lowercase().chars().collect();
        let mut inner = self.inner.write();
        let cap = inner.candidate_cap;
        let mut is_new = true;
        Self::push_candidate(&mut inner.root, identifier, object_id, cap, &mut is_new);
        let mut node = &mut inner.root;
        for ch in &folded {
            node = node.children.entry(*ch).or_default();
            Self::push_candidate(node, identifier, object_id, cap, &mut is_new);
        }
        node.terminal = Some(object_id);
        if is_new {
            inner.size += 1;
        }
    }

    fn push_candidate(node: &mut Node, identifier: &str, object_id: i64, cap: usize, is_new: &mut bool) {
        if node.candidates.iter().any(|(id, _)| id == identifier) {
            *is_new = false;
        } else if node.candidates.len() < cap {
            node.candidates.push((identifier.to_string(), object_id));
        }
    }

    pub fn insert_batch(&self, entries: &[(String, i64)]) {
        for (identifier, object_id) in entries {
            self.insert(identifier, *object_id);
        }
    }

    /// Removes every trace of `identifier` from the candidate lists along its path.
    pub fn remove(&self, identifier: &str) {
        let folded: Vec<char> = identifier.to_lowercase().chars().collect();
        let mut inner = self.inner.write();
        let mut found = false;
        let root_before = inner.root.candidates.len();
        inner.root.candidates.retain(|(id, _)| id != identifier);
        if inner.root.candidates.len() != root_before {
            found = true;
        }
        let mut node = &mut inner.root;
        for ch in &folded {
            let Some(next) = node.children.get_mut(ch) else {
                return;
            };
            let before = next.candidates.len();
            next.candidates.retain(|(id, _)| id != identifier);
            if next.candidates.len() != before {
                found = true;
            }
            node = next;
        }
        if node.terminal.is_some() {
            node.terminal = None;
            found = true;
        }
        if found {
            inner.size = inner.size.saturating_sub(1);
        }
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.root = Node::default();
        inner.size = 0;
    }
}

/// Search operations.
impl PrefixIndex {
    /// Returns up to `limit` `(identifier, object_id)` pairs whose identifier
    /// starts with `prefix` (case-insensitive).
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Vec<(String, i64)> {
        let folded: Vec<char> = prefix.to_lowercase().chars().collect();
        let inner = self.inner.read();
        let mut node = &inner.root;
        for ch in &folded {
            match node.children.get(ch) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }
        node.candidates.iter().take(limit).cloned().collect()
    }
}

/// Maintenance operations.
impl PrefixIndex {
    pub fn size(&self) -> usize {
        self.inner.read().size
    }
}
