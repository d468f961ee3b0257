//! Shared fixtures for the property test suite.

#![allow(dead_code)]

use celestial_core::CelestialObject;
use proptest::prelude::*;

/// A minimal object with only the fields a given test cares about defaulted.
pub fn object(identifier: &str, ra_deg: f64, dec_deg: f64) -> CelestialObject {
    CelestialObject {
        id: 0,
        identifier: identifier.to_string(),
        m_identifier: String::new(),
        extension_name: String::new(),
        component: String::new(),
        class_name: String::new(),
        amateur_rank: 0,
        chinese_name: String::new(),
        object_type: "Galaxy".to_string(),
        duplicate_type: String::new(),
        morphology: String::new(),
        constellation_zh: String::new(),
        constellation_en: String::new(),
        ra_text: String::new(),
        ra_deg,
        dec_text: String::new(),
        dec_deg,
        visual_magnitude: 0.0,
        photographic_magnitude: 0.0,
        b_minus_v: 0.0,
        surface_brightness: 0.0,
        major_axis: 0.0,
        minor_axis: 0.0,
        position_angle: 0.0,
        detailed_description: String::new(),
        brief_description: String::new(),
        aliases: String::new(),
        click_count: 0,
        created_at: 0,
        updated_at: 0,
    }
}

/// A short alphabetic identifier, distinct enough across a batch for proptest shrinking.
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,12}"
}

/// Right-angle-open, left-closed RA in `[0, 360)`.
pub fn valid_ra() -> impl Strategy<Value = f64> {
    0.0f64..360.0
}

/// Closed Dec in `[-90, 90]`.
pub fn valid_dec() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}
