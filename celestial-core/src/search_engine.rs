//! Orchestrator: builds the three indices from the Repository, serves queries,
//! and is the sole mutator of index state (§4.F).

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::filter::CelestialSearchFilter;
use crate::index::{FuzzyIndex, PrefixIndex, SpatialIndex};
use crate::model::CelestialObject;
use crate::repository::Repository;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub use_fuzzy: bool,
    pub fuzzy_tolerance: i64,
    pub search_aliases: bool,
    pub max_results: i64,
    pub filter: Option<CelestialSearchFilter>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            use_fuzzy: true,
            fuzzy_tolerance: 2,
            search_aliases: true,
            max_results: 100,
            filter: None,
        }
    }
}

/// The three in-memory indices plus the bookkeeping SearchEngine needs to keep
/// them consistent, all behind one reader/writer lock (§5 "single reader/writer
/// lock protecting the three indices and the `initialized` flag together").
struct IndexState {
    prefix: PrefixIndex,
    fuzzy: FuzzyIndex,
    spatial: SpatialIndex,
    initialized: bool,
    /// object id → click_count, refreshed on `incrementClickCount` and rebuild,
    /// so PrefixIndex can rank autocomplete results without a back-pointer into
    /// the Repository (§9 "Cache of object metadata for trie ranking"). Keyed
    /// by id rather than surface name so names indexed from `m_identifier` or
    /// `chinese_name` rank by the same owning object's click_count as its
    /// primary identifier.
    click_counts: HashMap<i64, i64>,
    /// identifier → id, so writes addressed by identifier can look up the id
    /// that keys `click_counts` and `coords`.
    ids: HashMap<String, i64>,
    /// identifier → (id, ra_deg, dec_deg) last indexed, so `refresh` can remove
    /// the old SpatialIndex entry before inserting the new one.
    coords: HashMap<String, (i64, f64, f64)>,
}

pub struct SearchEngine {
    repository: Repository,
    state: RwLock<IndexState>,
    config: ServiceConfig,
}

/// Construction.
impl SearchEngine {
    pub fn new(repository: Repository, config: ServiceConfig) -> Self {
        Self {
            repository,
            config,
            state: RwLock::new(IndexState {
                prefix: PrefixIndex::new(512),
                fuzzy: FuzzyIndex::new(),
                spatial: SpatialIndex::new(),
                initialized: false,
                click_counts: HashMap::new(),
                ids: HashMap::new(),
                coords: HashMap::new(),
            }),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}

/// Lifecycle.
impl SearchEngine {
    /// Idempotent: drains the Repository and populates all three indices.
    /// Rolls back partial index state via `clear_indexes` on any failure.
    pub fn initialize(&self) -> Result<()> {
        let mut state = self.state.write();
        if state.initialized {
            return Ok(());
        }
        match self.populate(&mut state) {
            Ok(()) => {
                state.initialized = true;
                Ok(())
            }
            Err(e) => {
                Self::clear_locked(&mut state);
                Err(e)
            }
        }
    }

    pub fn rebuild_indexes(&self) -> Result<()> {
        let mut state = self.state.write();
        Self::clear_locked(&mut state);
        match self.populate(&mut state) {
            Ok(()) => {
                state.initialized = true;
                Ok(())
            }
            Err(e) => {
                Self::clear_locked(&mut state);
                Err(e)
            }
        }
    }

    pub fn clear_indexes(&self) {
        let mut state = self.state.write();
        Self::clear_locked(&mut state);
    }

    /// Re-indexes a single identifier: remove from all three indices, re-read
    /// from the Repository, re-insert if still present.
    pub fn refresh(&self, identifier: &str) -> Result<()> {
        let mut state = self.state.write();
        state.prefix.remove(identifier);
        if let Some((id, ra, dec)) = state.coords.remove(identifier) {
            state.spatial.remove(id, ra, dec);
        }
        if let Some(id) = state.ids.remove(identifier) {
            state.click_counts.remove(&id);
        }
        if let Some(obj) = self.repository.find_by_identifier(identifier)? {
            Self::index_object(&mut state, &obj);
        }
        Ok(())
    }

    fn populate(&self, state: &mut IndexState) -> Result<()> {
        let all = self.repository.search(&CelestialSearchFilter {
            limit: i64::MAX,
            ..Default::default()
        })?;
        for obj in &all {
            Self::index_object(state, obj);
        }
        debug!(count = all.len(), "search engine indices populated");
        Ok(())
    }

    fn clear_locked(state: &mut IndexState) {
        state.prefix.clear();
        state.fuzzy.clear();
        state.spatial.clear();
        state.click_counts.clear();
        state.ids.clear();
        state.coords.clear();
        state.initialized = false;
    }

    /// Indexes identifier, m_identifier, chinese_name (PrefixIndex), identifier
    /// and m_identifier (FuzzyIndex), and the coordinates (SpatialIndex) (§4.F step 2).
    fn index_object(state: &mut IndexState, obj: &CelestialObject) {
        for name in [&obj.identifier, &obj.m_identifier, &obj.chinese_name] {
            if !name.is_empty() {
                state.prefix.insert(name, obj.id);
            }
        }
        state.fuzzy.add_term(&obj.identifier, obj.id);
        if !obj.m_identifier.is_empty() {
            state.fuzzy.add_term(&obj.m_identifier, obj.id);
        }
        if obj.has_valid_coordinates() {
            state.spatial.insert(obj.id, obj.ra_deg, obj.dec_deg);
            state.coords.insert(obj.identifier.clone(), (obj.id, obj.ra_deg, obj.dec_deg));
        }
        state.ids.insert(obj.identifier.clone(), obj.id);
        state.click_counts.insert(obj.id, obj.click_count);
    }
}

/// Query operations (all shared-lock).
impl SearchEngine {
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<CelestialObject> {
        if !self.is_initialized() {
            warn!(%query, "search against un-initialized engine");
            return Vec::new();
        }

        let mut rows = match self.repository.find_by_identifier(query) {
            Ok(Some(obj)) => vec![obj],
            Ok(None) => {
                if options.use_fuzzy && options.fuzzy_tolerance > 0 {
                    self.fuzzy_search(query, options.fuzzy_tolerance, options.max_results)
                } else {
                    Vec::new()
                }
            }
            Err(e) => {
                warn!(error = %e, "search repository lookup failed");
                Vec::new()
            }
        };
        rows.truncate(options.max_results.max(0) as usize);
        rows
    }

    pub fn exact_search(&self, query: &str) -> Vec<CelestialObject> {
        match self.repository.find_by_identifier(query) {
            Ok(Some(obj)) => vec![obj],
            _ => Vec::new(),
        }
    }

    /// `FuzzyIndex.match` → resolve each hit via the Repository, skipping races
    /// with concurrent deletes (§4.F `fuzzySearch`).
    pub fn fuzzy_search(&self, query: &str, tolerance: i64, limit: i64) -> Vec<CelestialObject> {
        if !self.is_initialized() {
            return Vec::new();
        }
        let state = self.state.read();
        let hits = state.fuzzy.match_(query, tolerance.max(0) as usize);
        drop(state);

        let mut out = Vec::new();
        for (term, _object_id, _distance) in hits {
            match self.repository.find_by_identifier(&term) {
                Ok(Some(obj)) => out.push(obj),
                Ok(None) => debug!(term, "fuzzy hit no longer present in repository"),
                Err(e) => warn!(error = %e, "fuzzy resolve failed"),
            }
            if out.len() as i64 >= limit.max(0) {
                break;
            }
        }
        out
    }

    pub fn search_by_coordinates(&self, ra: f64, dec: f64, radius_deg: f64, limit: i64) -> Vec<CelestialObject> {
        if !self.is_initialized() {
            return Vec::new();
        }
        let state = self.state.read();
        let hits = state.spatial.search_radius(ra, dec, radius_deg);
        drop(state);

        let mut out = Vec::new();
        for (object_id, _distance) in hits {
            match self.repository.find_by_id(object_id) {
                Ok(Some(obj)) => out.push(obj),
                Ok(None) => debug!(object_id, "spatial hit no longer present in repository"),
                Err(e) => warn!(error = %e, "spatial resolve failed"),
            }
            if out.len() as i64 >= limit.max(0) {
                break;
            }
        }
        out
    }

    /// Returns surface-form names, ranked by descending click_count then
    /// lexicographic tie-break (§4.A `autocomplete`).
    pub fn autocomplete(&self, prefix: &str, limit: i64) -> Vec<String> {
        let state = self.state.read();
        let mut hits = state.prefix.autocomplete(prefix, self.config.tuning.prefix_index_candidate_cap);
        hits.sort_by(|a, b| {
            let count_a = state.click_counts.get(&a.1).copied().unwrap_or(0);
            let count_b = state.click_counts.get(&b.1).copied().unwrap_or(0);
            count_b.cmp(&count_a).then_with(|| a.0.cmp(&b.0))
        });
        hits.into_iter().take(limit.max(0) as usize).map(|(name, _)| name).collect()
    }

    pub fn advanced_search(&self, filter: &CelestialSearchFilter) -> Result<Vec<CelestialObject>> {
        self.repository.search(filter)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }
}

/// Write operations. Every mutation re-reads the row and calls `refresh` so the
/// indices never see a stale identifier→coordinate mapping.
impl SearchEngine {
    pub fn insert(&self, obj: &CelestialObject) -> Result<i64> {
        let id = self.repository.insert(obj)?;
        self.refresh(&obj.identifier)?;
        Ok(id)
    }

    pub fn update(&self, obj: &CelestialObject) -> Result<bool> {
        let updated = self.repository.update(obj)?;
        if updated {
            self.refresh(&obj.identifier)?;
        }
        Ok(updated)
    }

    pub fn remove(&self, identifier: &str) -> Result<bool> {
        let removed = self.repository.remove(identifier)?;
        if removed {
            let mut state = self.state.write();
            state.prefix.remove(identifier);
            if let Some(id) = state.ids.remove(identifier) {
                state.click_counts.remove(&id);
            }
            if let Some((id, ra, dec)) = state.coords.remove(identifier) {
                state.spatial.remove(id, ra, dec);
            }
        }
        Ok(removed)
    }

    pub fn increment_click_count(&self, identifier: &str) -> Result<bool> {
        let ok = self.repository.increment_click_count(identifier)?;
        if ok {
            let mut state = self.state.write();
            if let Some(&id) = state.ids.get(identifier) {
                *state.click_counts.entry(id).or_insert(0) += 1;
            }
        }
        Ok(ok)
    }
}
