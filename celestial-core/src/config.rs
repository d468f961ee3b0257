//! Service configuration (§6.3), mirroring the teacher's path-config /
//! tunable-config split.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to the SQLite database file (§6.3 `ServiceConfig.databasePath`).
    pub database_path: PathBuf,
    pub tuning: TuningConfig,
}

/// Runtime tunables that have sane defaults but may be overridden.
#[derive(Debug, Clone)]
pub struct TuningConfig {
    /// Default `fuzzyTolerance` for `SearchOptions` (§6.2).
    pub default_fuzzy_tolerance: i64,
    /// Chunk size for `batchInsert`/`batchUpdate` transactions (§4.D).
    pub default_batch_chunk_size: usize,
    /// Max candidate identifiers retained per trie node (§4.A "up to K").
    pub prefix_index_candidate_cap: usize,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            default_fuzzy_tolerance: 2,
            default_batch_chunk_size: 100,
            prefix_index_candidate_cap: 64,
        }
    }
}

impl ServiceConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            tuning: TuningConfig::default(),
        }
    }

    /// In-memory database, for tests and ephemeral CLI runs.
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// Loads a `ServiceConfig` from a TOML file.
    ///
    /// Expected shape:
    /// ```toml
    /// database_path = "catalog.db"
    ///
    /// [tuning]
    /// default_fuzzy_tolerance = 2
    /// default_batch_chunk_size = 100
    /// prefix_index_candidate_cap = 64
    /// ```
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        #[derive(serde::Deserialize)]
        struct RawTuning {
            default_fuzzy_tolerance: Option<i64>,
            default_batch_chunk_size: Option<usize>,
            prefix_index_candidate_cap: Option<usize>,
        }

        #[derive(serde::Deserialize)]
        struct RawConfig {
            database_path: PathBuf,
            tuning: Option<RawTuning>,
        }

        let text = std::fs::read_to_string(path)
            .map_err(crate::error::RepositoryError::Io)
            .map_err(crate::error::Error::Repository)?;
        let raw: RawConfig = toml::from_str(&text).unwrap_or_else(|_| RawConfig {
            database_path: path.to_path_buf(),
            tuning: None,
        });

        let defaults = TuningConfig::default();
        let tuning = raw.tuning.map_or_else(TuningConfig::default, |t| TuningConfig {
            default_fuzzy_tolerance: t.default_fuzzy_tolerance.unwrap_or(defaults.default_fuzzy_tolerance),
            default_batch_chunk_size: t
                .default_batch_chunk_size
                .unwrap_or(defaults.default_batch_chunk_size),
            prefix_index_candidate_cap: t
                .prefix_index_candidate_cap
                .unwrap_or(defaults.prefix_index_candidate_cap),
        });

        Ok(Self {
            database_path: raw.database_path,
            tuning,
        })
    }
}
