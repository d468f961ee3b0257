use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Failures from the persistent store (§7 `StoreError`).
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("identifier already exists: {0}")]
    AlreadyExists(String),

    #[error("object not found: {0}")]
    NotFound(String),
}

/// Failures from invalid caller input (§7 `InvalidArgument`).
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("ra_deg must be in [0, 360), got {0}")]
    RaOutOfRange(f64),

    #[error("dec_deg must be in [-90, 90], got {0}")]
    DecOutOfRange(f64),

    #[error("minMagnitude ({min}) > maxMagnitude ({max})")]
    MagnitudeRangeInverted { min: f64, max: f64 },

    #[error("minRA ({min}) > maxRA ({max})")]
    RaRangeInverted { min: f64, max: f64 },

    #[error("minDec ({min}) > maxDec ({max})")]
    DecRangeInverted { min: f64, max: f64 },

    #[error("maxDistance must be >= 0, got {0}")]
    NegativeDistance(i64),

    #[error("limit must be > 0, got {0}")]
    NonPositiveLimit(i64),
}
