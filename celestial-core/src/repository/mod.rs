//! The durable catalog store: CRUD, bulk I/O, statistics (§4.D).
//!
//! Backed by SQLite. Every write happens inside an explicit transaction so a
//! statement failure cannot leave the store half-mutated (§7 "exception-safe").

mod import_export;
mod schema;

pub use import_export::{ImportExportOptions, ImportResult};

use crate::distance::levenshtein;
use crate::error::{Error, RepositoryError, Result, ValidationError};
use crate::filter::{CelestialSearchFilter, OrderBy};
use crate::model::{CelestialObject, SearchHistoryEntry, UserRating};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn validate_coordinates(ra_deg: f64, dec_deg: f64) -> std::result::Result<(), ValidationError> {
    if !(0.0..360.0).contains(&ra_deg) {
        return Err(ValidationError::RaOutOfRange(ra_deg));
    }
    if !(-90.0..=90.0).contains(&dec_deg) {
        return Err(ValidationError::DecOutOfRange(dec_deg));
    }
    Ok(())
}

fn row_to_object(row: &Row) -> rusqlite::Result<CelestialObject> {
    Ok(CelestialObject {
        id: row.get(0)?,
        identifier: row.get(1)?,
        m_identifier: row.get(2)?,
        extension_name: row.get(3)?,
        component: row.get(4)?,
        class_name: row.get(5)?,
        amateur_rank: row.get(6)?,
        chinese_name: row.get(7)?,
        object_type: row.get(8)?,
        duplicate_type: row.get(9)?,
        morphology: row.get(10)?,
        constellation_zh: row.get(11)?,
        constellation_en: row.get(12)?,
        ra_text: row.get(13)?,
        ra_deg: row.get(14)?,
        dec_text: row.get(15)?,
        dec_deg: row.get(16)?,
        visual_magnitude: row.get(17)?,
        photographic_magnitude: row.get(18)?,
        b_minus_v: row.get(19)?,
        surface_brightness: row.get(20)?,
        major_axis: row.get(21)?,
        minor_axis: row.get(22)?,
        position_angle: row.get(23)?,
        detailed_description: row.get(24)?,
        brief_description: row.get(25)?,
        aliases: row.get(26)?,
        click_count: row.get(27)?,
        created_at: row.get(28)?,
        updated_at: row.get(29)?,
    })
}

/// The persistent catalog. Connection access is serialized through a mutex: SQLite
/// itself serializes writers, and a single shared handle avoids a thread-local
/// statement-cache split (§9 "thread-safety of the prepared statement cache" —
/// resolved here by sharing one connection under a lock rather than per-thread caches).
pub struct Repository {
    conn: Mutex<Connection>,
}

/// Construction.
impl Repository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(RepositoryError::Database)?;
        let repo = Self { conn: Mutex::new(conn) };
        repo.initialize_schema()?;
        Ok(repo)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(RepositoryError::Database)?;
        let repo = Self { conn: Mutex::new(conn) };
        repo.initialize_schema()?;
        Ok(repo)
    }

    pub fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(schema::CREATE_TABLES)
            .map_err(RepositoryError::Database)?;
        conn.execute_batch(schema::CREATE_INDEXES)
            .map_err(RepositoryError::Database)?;
        Ok(())
    }
}

/// Create operations.
impl Repository {
    /// Inserts a new object. Returns the assigned id.
    pub fn insert(&self, obj: &CelestialObject) -> Result<i64> {
        if obj.identifier.trim().is_empty() {
            return Err(Error::Validation(ValidationError::EmptyIdentifier));
        }
        validate_coordinates(obj.ra_deg, obj.dec_deg).map_err(Error::Validation)?;

        let conn = self.conn.lock();
        let ts = now();
        let result = conn.execute(
            &format!(
                "INSERT INTO celestial_objects ({}) VALUES (\
                    NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
                    ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29)",
                schema::OBJECT_COLUMNS
            ),
            params![
                obj.identifier,
                obj.m_identifier,
                obj.extension_name,
                obj.component,
                obj.class_name,
                obj.amateur_rank,
                obj.chinese_name,
                obj.object_type,
                obj.duplicate_type,
                obj.morphology,
                obj.constellation_zh,
                obj.constellation_en,
                obj.ra_text,
                obj.ra_deg,
                obj.dec_text,
                obj.dec_deg,
                obj.visual_magnitude,
                obj.photographic_magnitude,
                obj.b_minus_v,
                obj.surface_brightness,
                obj.major_axis,
                obj.minor_axis,
                obj.position_angle,
                obj.detailed_description,
                obj.brief_description,
                obj.aliases,
                obj.click_count,
                ts,
                ts,
            ],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::Repository(RepositoryError::AlreadyExists(obj.identifier.clone())))
            }
            Err(e) => Err(Error::Repository(RepositoryError::Database(e))),
        }
    }
}

/// Read operations.
impl Repository {
    pub fn find_by_id(&self, id: i64) -> Result<Option<CelestialObject>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {} FROM celestial_objects WHERE id = ?1", schema::OBJECT_COLUMNS),
            params![id],
            row_to_object,
        )
        .optional()
        .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    /// Looks up by `identifier`; falls back to an exact alias-list membership
    /// test (§9 "Alias uniqueness" — the spec's source used a substring
    /// `LIKE '%…%'` scan, which this implementation deliberately avoids).
    pub fn find_by_identifier(&self, identifier: &str) -> Result<Option<CelestialObject>> {
        let conn = self.conn.lock();
        if let Some(obj) = conn
            .query_row(
                &format!(
                    "SELECT {} FROM celestial_objects WHERE identifier = ?1",
                    schema::OBJECT_COLUMNS
                ),
                params![identifier],
                row_to_object,
            )
            .optional()
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?
        {
            return Ok(Some(obj));
        }

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM celestial_objects WHERE aliases LIKE ?1",
                schema::OBJECT_COLUMNS
            ))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let candidates = stmt
            .query_map(params![format!("%{identifier}%")], row_to_object)
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;

        for candidate in candidates {
            let candidate = candidate.map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
            if candidate.alias_list().contains(&identifier) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// SQL-style name search; user `*` maps to `%`, and an unwildcarded pattern
    /// is wrapped in `%…%` (§4.D `searchByName`).
    pub fn search_by_name(&self, pattern: &str, limit: i64) -> Result<Vec<CelestialObject>> {
        let mapped = pattern.replace('*', "%");
        let wrapped = if mapped.contains('%') || mapped.contains('_') {
            mapped
        } else {
            format!("%{mapped}%")
        };

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM celestial_objects WHERE identifier LIKE ?1 ORDER BY identifier LIMIT ?2",
                schema::OBJECT_COLUMNS
            ))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let rows = stmt
            .query_map(params![wrapped, limit], row_to_object)
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    /// Assembles a parameterized query honoring every non-default field of `filter` (§4.D `search`).
    pub fn search(&self, filter: &CelestialSearchFilter) -> Result<Vec<CelestialObject>> {
        let mut clauses = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if !filter.name_pattern.is_empty() {
            clauses.push("identifier LIKE ?".to_string());
            args.push(Box::new(filter.name_pattern.replace('*', "%")));
        }
        if !filter.object_type.is_empty() {
            clauses.push("type = ?".to_string());
            args.push(Box::new(filter.object_type.clone()));
        }
        if !filter.morphology.is_empty() {
            clauses.push("morphology = ?".to_string());
            args.push(Box::new(filter.morphology.clone()));
        }
        if !filter.constellation.is_empty() {
            clauses.push("constellation_en = ?".to_string());
            args.push(Box::new(filter.constellation.clone()));
        }
        clauses.push("visual_magnitude BETWEEN ? AND ?".to_string());
        args.push(Box::new(filter.min_magnitude));
        args.push(Box::new(filter.max_magnitude));
        clauses.push("ra_deg BETWEEN ? AND ?".to_string());
        args.push(Box::new(filter.min_ra));
        args.push(Box::new(filter.max_ra));
        clauses.push("dec_deg BETWEEN ? AND ?".to_string());
        args.push(Box::new(filter.min_dec));
        args.push(Box::new(filter.max_dec));

        let direction = if filter.ascending { "ASC" } else { "DESC" };
        let sql = format!(
            "SELECT {} FROM celestial_objects WHERE {} ORDER BY {} {} LIMIT {} OFFSET {}",
            schema::OBJECT_COLUMNS,
            clauses.join(" AND "),
            filter.order_by.column(),
            direction,
            filter.limit.max(0),
            filter.offset.max(0),
        );

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql).map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let params_ref: Vec<&dyn rusqlite::types::ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let rows = stmt
            .query_map(params_ref.as_slice(), row_to_object)
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    /// Authoritative fuzzy fallback: scans candidates and computes Levenshtein
    /// distance against `identifier` and every alias, keeping the minimum (§4.D `fuzzySearch`).
    pub fn fuzzy_search(&self, name: &str, tolerance: i64, limit: i64) -> Result<Vec<(CelestialObject, usize)>> {
        let tolerance = tolerance.max(0) as usize;
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM celestial_objects", schema::OBJECT_COLUMNS))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let rows = stmt
            .query_map([], row_to_object)
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;

        let mut hits = Vec::new();
        for row in rows {
            let obj = row.map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
            let mut best = levenshtein(&obj.identifier, name);
            for alias in obj.alias_list() {
                best = best.min(levenshtein(alias, name));
            }
            if best <= tolerance {
                hits.push((obj, best));
            }
        }
        hits.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.identifier.cmp(&b.0.identifier)));
        hits.truncate(limit.max(0) as usize);
        Ok(hits)
    }
}

/// Update operations.
impl Repository {
    pub fn update(&self, obj: &CelestialObject) -> Result<bool> {
        validate_coordinates(obj.ra_deg, obj.dec_deg).map_err(Error::Validation)?;
        let conn = self.conn.lock();
        let affected = conn
            .execute(
                "UPDATE celestial_objects SET m_identifier=?2, extension_name=?3, component=?4, \
                 class_name=?5, amateur_rank=?6, chinese_name=?7, type=?8, duplicate_type=?9, \
                 morphology=?10, constellation_zh=?11, constellation_en=?12, ra_text=?13, ra_deg=?14, \
                 dec_text=?15, dec_deg=?16, visual_magnitude=?17, photographic_magnitude=?18, \
                 b_minus_v=?19, surface_brightness=?20, major_axis=?21, minor_axis=?22, \
                 position_angle=?23, detailed_description=?24, brief_description=?25, aliases=?26, \
                 updated_at=?27 WHERE identifier=?1",
                params![
                    obj.identifier,
                    obj.m_identifier,
                    obj.extension_name,
                    obj.component,
                    obj.class_name,
                    obj.amateur_rank,
                    obj.chinese_name,
                    obj.object_type,
                    obj.duplicate_type,
                    obj.morphology,
                    obj.constellation_zh,
                    obj.constellation_en,
                    obj.ra_text,
                    obj.ra_deg,
                    obj.dec_text,
                    obj.dec_deg,
                    obj.visual_magnitude,
                    obj.photographic_magnitude,
                    obj.b_minus_v,
                    obj.surface_brightness,
                    obj.major_axis,
                    obj.minor_axis,
                    obj.position_angle,
                    obj.detailed_description,
                    obj.brief_description,
                    obj.aliases,
                    now(),
                ],
            )
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        Ok(affected > 0)
    }

    /// Insert if absent, otherwise update the row matched by `identifier`.
    pub fn upsert(&self, obj: &CelestialObject) -> Result<()> {
        if self.find_by_identifier(&obj.identifier)?.is_some() {
            self.update(obj)?;
        } else {
            self.insert(obj)?;
        }
        Ok(())
    }

    pub fn increment_click_count(&self, identifier: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let affected = conn
            .execute(
                "UPDATE celestial_objects SET click_count = click_count + 1, updated_at = ?2 WHERE identifier = ?1",
                params![identifier, now()],
            )
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        Ok(affected > 0)
    }
}

/// Delete operations.
impl Repository {
    pub fn remove(&self, identifier: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let affected = conn
            .execute("DELETE FROM celestial_objects WHERE identifier = ?1", params![identifier])
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        Ok(affected > 0)
    }

    /// Wipes objects, and optionally ratings/history (§4.D `clearAll`).
    pub fn clear_all(&self, include_history: bool) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM celestial_objects", [])
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        conn.execute("DELETE FROM user_ratings", [])
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        if include_history {
            conn.execute("DELETE FROM search_history", [])
                .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        }
        Ok(())
    }
}

/// Batch operations. Each chunk is an all-or-nothing transaction; a failed
/// chunk rolls back and the caller learns how many earlier chunks committed (§4.D "Batch").
impl Repository {
    pub fn batch_insert(&self, objects: &[CelestialObject], chunk_size: usize) -> Result<usize> {
        let chunk_size = chunk_size.max(1);
        let mut committed = 0;
        for chunk in objects.chunks(chunk_size) {
            let mut conn = self.conn.lock();
            let tx = conn.transaction().map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
            let mut ok = true;
            for obj in chunk {
                if validate_coordinates(obj.ra_deg, obj.dec_deg).is_err() {
                    ok = false;
                    break;
                }
                let ts = now();
                let result = tx.execute(
                    &format!(
                        "INSERT INTO celestial_objects ({}) VALUES (\
                            NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
                            ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29)",
                        schema::OBJECT_COLUMNS
                    ),
                    params![
                        obj.identifier,
                        obj.m_identifier,
                        obj.extension_name,
                        obj.component,
                        obj.class_name,
                        obj.amateur_rank,
                        obj.chinese_name,
                        obj.object_type,
                        obj.duplicate_type,
                        obj.morphology,
                        obj.constellation_zh,
                        obj.constellation_en,
                        obj.ra_text,
                        obj.ra_deg,
                        obj.dec_text,
                        obj.dec_deg,
                        obj.visual_magnitude,
                        obj.photographic_magnitude,
                        obj.b_minus_v,
                        obj.surface_brightness,
                        obj.major_axis,
                        obj.minor_axis,
                        obj.position_angle,
                        obj.detailed_description,
                        obj.brief_description,
                        obj.aliases,
                        obj.click_count,
                        ts,
                        ts,
                    ],
                );
                if result.is_err() {
                    ok = false;
                    break;
                }
            }
            if ok {
                tx.commit().map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
                committed += chunk.len();
            } else {
                drop(tx);
                return Ok(committed);
            }
        }
        Ok(committed)
    }

    pub fn batch_update(&self, objects: &[CelestialObject], chunk_size: usize) -> Result<usize> {
        let chunk_size = chunk_size.max(1);
        let mut updated = 0;
        for chunk in objects.chunks(chunk_size) {
            let mut conn = self.conn.lock();
            let tx = conn.transaction().map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
            let mut chunk_updates = 0;
            let mut ok = true;
            for obj in chunk {
                if validate_coordinates(obj.ra_deg, obj.dec_deg).is_err() {
                    ok = false;
                    break;
                }
                match tx.execute(
                    "UPDATE celestial_objects SET m_identifier=?2, extension_name=?3, component=?4, \
                     class_name=?5, amateur_rank=?6, chinese_name=?7, type=?8, duplicate_type=?9, \
                     morphology=?10, constellation_zh=?11, constellation_en=?12, ra_text=?13, ra_deg=?14, \
                     dec_text=?15, dec_deg=?16, visual_magnitude=?17, photographic_magnitude=?18, \
                     b_minus_v=?19, surface_brightness=?20, major_axis=?21, minor_axis=?22, \
                     position_angle=?23, detailed_description=?24, brief_description=?25, aliases=?26, \
                     updated_at=?27 WHERE identifier=?1",
                    params![
                        obj.identifier,
                        obj.m_identifier,
                        obj.extension_name,
                        obj.component,
                        obj.class_name,
                        obj.amateur_rank,
                        obj.chinese_name,
                        obj.object_type,
                        obj.duplicate_type,
                        obj.morphology,
                        obj.constellation_zh,
                        obj.constellation_en,
                        obj.ra_text,
                        obj.ra_deg,
                        obj.dec_text,
                        obj.dec_deg,
                        obj.visual_magnitude,
                        obj.photographic_magnitude,
                        obj.b_minus_v,
                        obj.surface_brightness,
                        obj.major_axis,
                        obj.minor_axis,
                        obj.position_angle,
                        obj.detailed_description,
                        obj.brief_description,
                        obj.aliases,
                        now(),
                    ],
                ) {
                    Ok(n) => chunk_updates += n,
                    Err(_) => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                tx.commit().map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
                updated += chunk_updates;
            } else {
                drop(tx);
                return Ok(updated);
            }
        }
        Ok(updated)
    }
}

/// Ratings & history.
impl Repository {
    pub fn add_rating(&self, user_id: &str, object_id: &str, rating: f64) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO user_ratings (user_id, object_id, rating, timestamp) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(user_id, object_id) DO UPDATE SET rating = excluded.rating, timestamp = excluded.timestamp",
            params![user_id, object_id, rating, now()],
        )
        .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        Ok(())
    }

    pub fn get_user_ratings(&self, user_id: &str) -> Result<Vec<UserRating>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, user_id, object_id, rating, timestamp FROM user_ratings WHERE user_id = ?1")
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(UserRating {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    object_id: row.get(2)?,
                    rating: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    pub fn get_average_rating(&self, object_id: &str) -> Result<Option<f64>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT AVG(rating) FROM user_ratings WHERE object_id = ?1",
            params![object_id],
            |row| row.get::<_, Option<f64>>(0),
        )
        .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    pub fn record_search(&self, user_id: &str, query: &str, search_type: &str, result_count: i64) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO search_history (user_id, query, search_type, timestamp, result_count) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, query, search_type, now(), result_count],
        )
        .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        Ok(())
    }

    pub fn get_search_history(&self, user_id: &str, limit: i64) -> Result<Vec<SearchHistoryEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, query, search_type, timestamp, result_count FROM search_history \
                 WHERE user_id = ?1 ORDER BY timestamp DESC LIMIT ?2",
            )
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let rows = stmt
            .query_map(params![user_id, limit], |row| {
                Ok(SearchHistoryEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    query: row.get(2)?,
                    search_type: row.get(3)?,
                    timestamp: row.get(4)?,
                    result_count: row.get(5)?,
                })
            })
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    pub fn get_popular_searches(&self, limit: i64) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT query, COUNT(*) as c FROM search_history GROUP BY query ORDER BY c DESC LIMIT ?1",
            )
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let rows = stmt
            .query_map(params![limit], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }
}

/// Statistics.
impl Repository {
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM celestial_objects", [], |row| row.get(0))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    pub fn count_by_type(&self, object_type: &str) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT COUNT(*) FROM celestial_objects WHERE type = ?1",
            params![object_type],
            |row| row.get(0),
        )
        .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    pub fn get_most_popular(&self, limit: i64) -> Result<Vec<CelestialObject>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM celestial_objects ORDER BY click_count DESC LIMIT ?1",
                schema::OBJECT_COLUMNS
            ))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let rows = stmt
            .query_map(params![limit], row_to_object)
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    /// Returns a JSON blob: total objects, distinct types, average magnitude (§4.D `getStatistics`).
    pub fn get_statistics(&self) -> Result<serde_json::Value> {
        let conn = self.conn.lock();
        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM celestial_objects", [], |row| row.get(0))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let distinct_types: i64 = conn
            .query_row("SELECT COUNT(DISTINCT type) FROM celestial_objects", [], |row| row.get(0))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;
        let avg_magnitude: Option<f64> = conn
            .query_row("SELECT AVG(visual_magnitude) FROM celestial_objects", [], |row| row.get(0))
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))?;

        Ok(serde_json::json!({
            "total": total,
            "distinct_types": distinct_types,
            "average_magnitude": avg_magnitude,
        }))
    }
}

/// Maintenance.
impl Repository {
    pub fn create_indexes(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(schema::CREATE_INDEXES)
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }

    /// VACUUM+ANALYZE equivalent (§4.D `optimize`).
    pub fn optimize(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch("VACUUM; ANALYZE;")
            .map_err(|e| Error::Repository(RepositoryError::Database(e)))
    }
}

/// Import/export.
impl Repository {
    /// Upsert-by-identifier; never aborts on a single bad record (§6.1, §7).
    pub fn import_json(&self, text: &str) -> Result<ImportResult> {
        let records = import_export::parse_json_array(text).map_err(RepositoryError::Json)?;
        let mut result = ImportResult { total: records.len(), ..Default::default() };

        for (i, record) in records.iter().enumerate() {
            match import_export::parse_json_record(record, i + 1) {
                Ok(obj) => {
                    let existed = self.find_by_identifier(&obj.identifier)?.is_some();
                    match self.upsert(&obj) {
                        Ok(()) => {
                            if existed {
                                result.duplicate += 1;
                            } else {
                                result.success += 1;
                            }
                        }
                        Err(e) => {
                            result.error += 1;
                            result.errors.push(format!("record {}: {e}", i + 1));
                        }
                    }
                }
                Err(msg) => {
                    result.error += 1;
                    result.errors.push(msg);
                }
            }
        }
        Ok(result)
    }

    pub fn export_json(&self, options: &ImportExportOptions) -> Result<String> {
        let objects = self.search(&CelestialSearchFilter {
            limit: i64::MAX,
            order_by: OrderBy::Identifier,
            ..Default::default()
        })?;
        import_export::export_json(&objects, options).map_err(|e| Error::Repository(RepositoryError::Json(e)))
    }

    pub fn import_csv(&self, text: &str, options: &ImportExportOptions) -> Result<ImportResult> {
        let records = import_export::parse_csv(text, options).map_err(RepositoryError::Csv)?;
        let mut result = ImportResult { total: records.len(), ..Default::default() };
        for obj in records {
            let existed = self.find_by_identifier(&obj.identifier)?.is_some();
            match self.upsert(&obj) {
                Ok(()) => {
                    if existed {
                        result.duplicate += 1;
                    } else {
                        result.success += 1;
                    }
                }
                Err(e) => {
                    result.error += 1;
                    result.errors.push(e.to_string());
                }
            }
        }
        Ok(result)
    }

    pub fn export_csv(&self, options: &ImportExportOptions) -> Result<String> {
        let objects = self.search(&CelestialSearchFilter {
            limit: i64::MAX,
            order_by: OrderBy::Identifier,
            ..Default::default()
        })?;
        import_export::export_csv(&objects, options).map_err(|e| Error::Repository(RepositoryError::Csv(e)))
    }
}
