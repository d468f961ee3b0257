//! P8: exporting an object to JSON/CSV and re-importing it yields an object
//! whose round-tripped fields equal the original (aliases may be reordered).

use crate::common::identifier_strategy;
use celestial_core::{CelestialObject, ImportExportOptions, Repository};
use proptest::prelude::*;

fn text_field() -> impl Strategy<Value = String> {
    "[A-Za-z ]{0,16}"
}

fn full_object(identifier: String, extras: (String, String, String, f64, f64, f64, i64)) -> CelestialObject {
    let (object_type, morphology, constellation_en, ra_deg, dec_deg, visual_magnitude, click_count) = extras;
    CelestialObject {
        id: 0,
        identifier,
        m_identifier: String::new(),
        extension_name: String::new(),
        component: String::new(),
        class_name: String::new(),
        amateur_rank: 0,
        chinese_name: String::new(),
        object_type,
        duplicate_type: String::new(),
        morphology,
        constellation_zh: String::new(),
        constellation_en,
        ra_text: String::new(),
        ra_deg,
        dec_text: String::new(),
        dec_deg,
        visual_magnitude,
        photographic_magnitude: 0.0,
        b_minus_v: 0.0,
        surface_brightness: 0.0,
        major_axis: 0.0,
        minor_axis: 0.0,
        position_angle: 0.0,
        detailed_description: String::new(),
        brief_description: String::new(),
        aliases: String::new(),
        click_count,
        created_at: 0,
        updated_at: 0,
    }
}

proptest! {
    #[test]
    fn prop_json_round_trip_preserves_fields(
        identifier in identifier_strategy(),
        object_type in text_field(),
        morphology in text_field(),
        constellation_en in text_field(),
        ra_deg in 0.0f64..360.0,
        dec_deg in -90.0f64..=90.0,
        visual_magnitude in -30.0f64..30.0,
        click_count in 0i64..1000,
    ) {
        let repo = Repository::open_in_memory().unwrap();
        let obj = full_object(
            identifier.clone(),
            (object_type, morphology, constellation_en, ra_deg, dec_deg, visual_magnitude, click_count),
        );
        repo.insert(&obj).unwrap();

        let exported = repo.export_json(&ImportExportOptions::default()).unwrap();
        repo.clear_all(false).unwrap();
        let result = repo.import_json(&exported).unwrap();
        prop_assert_eq!(result.success, 1);

        let restored = repo.find_by_identifier(&identifier).unwrap().unwrap();
        prop_assert_eq!(&restored.object_type, &obj.object_type);
        prop_assert_eq!(&restored.morphology, &obj.morphology);
        prop_assert_eq!(&restored.constellation_en, &obj.constellation_en);
        prop_assert!((restored.ra_deg - obj.ra_deg).abs() < 1e-9);
        prop_assert!((restored.dec_deg - obj.dec_deg).abs() < 1e-9);
        prop_assert!((restored.visual_magnitude - obj.visual_magnitude).abs() < 1e-9);
        prop_assert_eq!(restored.click_count, obj.click_count);
    }

    #[test]
    fn prop_csv_round_trip_preserves_carried_fields(
        identifier in identifier_strategy(),
        object_type in text_field(),
        constellation_en in text_field(),
        ra_deg in 0.0f64..360.0,
        dec_deg in -90.0f64..=90.0,
        visual_magnitude in -30.0f64..30.0,
    ) {
        let repo = Repository::open_in_memory().unwrap();
        let obj = full_object(
            identifier.clone(),
            (object_type, String::new(), constellation_en, ra_deg, dec_deg, visual_magnitude, 0),
        );
        repo.insert(&obj).unwrap();

        let exported = repo.export_csv(&ImportExportOptions::default()).unwrap();
        repo.clear_all(false).unwrap();
        let result = repo.import_csv(&exported, &ImportExportOptions::default()).unwrap();
        prop_assert_eq!(result.success, 1);

        let restored = repo.find_by_identifier(&identifier).unwrap().unwrap();
        prop_assert_eq!(&restored.object_type, &obj.object_type);
        prop_assert_eq!(&restored.constellation_en, &obj.constellation_en);
        prop_assert!((restored.ra_deg - obj.ra_deg).abs() < 1e-9);
        prop_assert!((restored.dec_deg - obj.dec_deg).abs() < 1e-9);
        prop_assert!((restored.visual_magnitude - obj.visual_magnitude).abs() < 1e-9);
    }
}
