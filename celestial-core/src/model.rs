//! Row types for the catalog: celestial objects, user ratings, search history.

use serde::{Deserialize, Serialize};

/// A single catalog entry (J2000 equatorial coordinates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CelestialObject {
    pub id: i64,
    pub identifier: String,
    pub m_identifier: String,
    pub extension_name: String,
    pub component: String,
    pub class_name: String,
    pub amateur_rank: i64,
    pub chinese_name: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub duplicate_type: String,
    pub morphology: String,
    pub constellation_zh: String,
    pub constellation_en: String,
    pub ra_text: String,
    pub ra_deg: f64,
    pub dec_text: String,
    pub dec_deg: f64,
    pub visual_magnitude: f64,
    pub photographic_magnitude: f64,
    pub b_minus_v: f64,
    pub surface_brightness: f64,
    pub major_axis: f64,
    pub minor_axis: f64,
    pub position_angle: f64,
    pub detailed_description: String,
    pub brief_description: String,
    /// Comma-separated alternate names.
    pub aliases: String,
    pub click_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CelestialObject {
    /// Splits `aliases` into trimmed, non-empty entries.
    pub fn alias_list(&self) -> Vec<&str> {
        self.aliases
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// Checks coordinate domain (I2): `ra_deg in [0, 360)`, `dec_deg in [-90, 90]`.
    pub fn has_valid_coordinates(&self) -> bool {
        (0.0..360.0).contains(&self.ra_deg) && (-90.0..=90.0).contains(&self.dec_deg)
    }
}

/// `(user_id, object_id)` is unique; re-rating upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    pub id: i64,
    pub user_id: String,
    pub object_id: String,
    pub rating: f64,
    pub timestamp: i64,
}

/// Append-only log of user queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub id: i64,
    pub user_id: String,
    pub query: String,
    pub search_type: String,
    pub timestamp: i64,
    pub result_count: i64,
}
