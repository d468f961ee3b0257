//! SQL schema (§4.D "Schema (logical)").

pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS celestial_objects (
    id                      INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier              TEXT NOT NULL UNIQUE,
    m_identifier            TEXT NOT NULL DEFAULT '',
    extension_name          TEXT NOT NULL DEFAULT '',
    component               TEXT NOT NULL DEFAULT '',
    class_name              TEXT NOT NULL DEFAULT '',
    amateur_rank            INTEGER NOT NULL DEFAULT 0,
    chinese_name            TEXT NOT NULL DEFAULT '',
    type                    TEXT NOT NULL DEFAULT '',
    duplicate_type          TEXT NOT NULL DEFAULT '',
    morphology              TEXT NOT NULL DEFAULT '',
    constellation_zh        TEXT NOT NULL DEFAULT '',
    constellation_en        TEXT NOT NULL DEFAULT '',
    ra_text                 TEXT NOT NULL DEFAULT '',
    ra_deg                  REAL NOT NULL,
    dec_text                TEXT NOT NULL DEFAULT '',
    dec_deg                 REAL NOT NULL,
    visual_magnitude        REAL NOT NULL DEFAULT 0.0,
    photographic_magnitude  REAL NOT NULL DEFAULT 0.0,
    b_minus_v               REAL NOT NULL DEFAULT 0.0,
    surface_brightness      REAL NOT NULL DEFAULT 0.0,
    major_axis              REAL NOT NULL DEFAULT 0.0,
    minor_axis              REAL NOT NULL DEFAULT 0.0,
    position_angle          REAL NOT NULL DEFAULT 0.0,
    detailed_description    TEXT NOT NULL DEFAULT '',
    brief_description       TEXT NOT NULL DEFAULT '',
    aliases                 TEXT NOT NULL DEFAULT '',
    click_count             INTEGER NOT NULL DEFAULT 0,
    created_at              INTEGER NOT NULL,
    updated_at              INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS user_ratings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL,
    object_id   TEXT NOT NULL,
    rating      REAL NOT NULL,
    timestamp   INTEGER NOT NULL,
    UNIQUE(user_id, object_id)
);

CREATE TABLE IF NOT EXISTS search_history (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       TEXT NOT NULL,
    query         TEXT NOT NULL,
    search_type   TEXT NOT NULL,
    timestamp     INTEGER NOT NULL,
    result_count  INTEGER NOT NULL
);
";

pub const CREATE_INDEXES: &str = "
CREATE INDEX IF NOT EXISTS idx_objects_identifier ON celestial_objects(identifier);
CREATE INDEX IF NOT EXISTS idx_objects_type ON celestial_objects(type);
CREATE INDEX IF NOT EXISTS idx_objects_magnitude ON celestial_objects(visual_magnitude);
CREATE INDEX IF NOT EXISTS idx_objects_constellation ON celestial_objects(constellation_en);
CREATE INDEX IF NOT EXISTS idx_objects_coords ON celestial_objects(ra_deg, dec_deg);
CREATE INDEX IF NOT EXISTS idx_objects_click_count ON celestial_objects(click_count DESC);
CREATE INDEX IF NOT EXISTS idx_objects_aliases ON celestial_objects(aliases);
CREATE INDEX IF NOT EXISTS idx_ratings_user ON user_ratings(user_id);
CREATE INDEX IF NOT EXISTS idx_ratings_object ON user_ratings(object_id);
CREATE INDEX IF NOT EXISTS idx_history_user ON search_history(user_id);
CREATE INDEX IF NOT EXISTS idx_history_query ON search_history(query);
";

pub const OBJECT_COLUMNS: &str = "id, identifier, m_identifier, extension_name, component, class_name, \
amateur_rank, chinese_name, type, duplicate_type, morphology, constellation_zh, constellation_en, \
ra_text, ra_deg, dec_text, dec_deg, visual_magnitude, photographic_magnitude, b_minus_v, \
surface_brightness, major_axis, minor_axis, position_angle, detailed_description, brief_description, \
aliases, click_count, created_at, updated_at";
