//! JSON/CSV import and export (§6.1), tolerant of CamelCase and snake_case keys.

use crate::model::CelestialObject;
use serde_json::Value;

/// Summary of an import run (§7 "structured summary").
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ImportResult {
    pub total: usize,
    pub success: usize,
    pub error: usize,
    pub duplicate: usize,
    pub errors: Vec<String>,
}

/// Options controlling which auxiliary fields an export/import carries.
#[derive(Debug, Clone)]
pub struct ImportExportOptions {
    pub include_aliases: bool,
    pub include_ratings: bool,
    pub include_history: bool,
    pub delimiter: u8,
    pub has_header: bool,
}

impl Default for ImportExportOptions {
    fn default() -> Self {
        Self {
            include_aliases: true,
            include_ratings: false,
            include_history: false,
            delimiter: b',',
            has_header: true,
        }
    }
}

fn get_str(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn get_f64(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

fn get_i64(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> i64 {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

fn get_aliases(obj: &serde_json::Map<String, Value>) -> String {
    match obj.get("aliases") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Accepts both the CamelCase and snake_case spelling of every field (§6.1).
pub fn parse_json_record(value: &Value, record_number: usize) -> Result<CelestialObject, String> {
    let Value::Object(obj) = value else {
        return Err(format!("record {record_number}: not a JSON object"));
    };

    let identifier = get_str(obj, &["identifier", "Identifier"])
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("record {record_number}: missing identifier"))?;

    Ok(CelestialObject {
        id: 0,
        identifier,
        m_identifier: get_str(obj, &["m_identifier", "MIdentifier"]).unwrap_or_default(),
        extension_name: get_str(obj, &["extension_name", "ExtensionName"]).unwrap_or_default(),
        component: get_str(obj, &["component", "Component"]).unwrap_or_default(),
        class_name: get_str(obj, &["class_name", "ClassName"]).unwrap_or_default(),
        amateur_rank: get_i64(obj, &["amateur_rank", "AmateurRank"]),
        chinese_name: get_str(obj, &["chinese_name", "ChineseName"]).unwrap_or_default(),
        object_type: get_str(obj, &["type", "Type"]).unwrap_or_default(),
        duplicate_type: get_str(obj, &["duplicate_type", "DuplicateType"]).unwrap_or_default(),
        morphology: get_str(obj, &["morphology", "Morphology"]).unwrap_or_default(),
        constellation_zh: get_str(obj, &["constellation_zh", "ConstellationZh"]).unwrap_or_default(),
        constellation_en: get_str(obj, &["constellation_en", "ConstellationEn"]).unwrap_or_default(),
        ra_text: get_str(obj, &["ra_text", "RAJ2000", "ra_j2000"]).unwrap_or_default(),
        ra_deg: get_f64(obj, &["ra_deg", "RA", "ra"]),
        dec_text: get_str(obj, &["dec_text", "DECJ2000", "dec_j2000"]).unwrap_or_default(),
        dec_deg: get_f64(obj, &["dec_deg", "Dec", "dec"]),
        visual_magnitude: get_f64(obj, &["visual_magnitude", "VisualMagnitudeV"]),
        photographic_magnitude: get_f64(obj, &["photographic_magnitude", "PhotographicMagnitude"]),
        b_minus_v: get_f64(obj, &["b_minus_v", "BMinusV"]),
        surface_brightness: get_f64(obj, &["surface_brightness", "SurfaceBrightness"]),
        major_axis: get_f64(obj, &["major_axis", "MajorAxis"]),
        minor_axis: get_f64(obj, &["minor_axis", "MinorAxis"]),
        position_angle: get_f64(obj, &["position_angle", "PositionAngle"]),
        detailed_description: get_str(obj, &["detailed_description", "DetailedDescription"]).unwrap_or_default(),
        brief_description: get_str(obj, &["brief_description", "BriefDescription"]).unwrap_or_default(),
        aliases: get_aliases(obj),
        click_count: get_i64(obj, &["click_count", "ClickCount"]),
        created_at: 0,
        updated_at: 0,
    })
}

/// Parses a top-level JSON array of records (§6.1 "JSON import").
pub fn parse_json_array(text: &str) -> Result<Vec<Value>, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}

/// Renders objects as a snake_case JSON array, 2-space indented (§6.1 "JSON export").
pub fn export_json(objects: &[CelestialObject], options: &ImportExportOptions) -> serde_json::Result<String> {
    let values: Vec<Value> = objects
        .iter()
        .map(|obj| {
            let mut value = serde_json::to_value(obj).expect("CelestialObject always serializes");
            if let Value::Object(map) = &mut value {
                if options.include_aliases {
                    let aliases: Vec<Value> = obj
                        .alias_list()
                        .into_iter()
                        .map(|a| Value::String(a.to_string()))
                        .collect();
                    map.insert("aliases".to_string(), Value::Array(aliases));
                } else {
                    map.remove("aliases");
                }
            }
            value
        })
        .collect();
    serde_json::to_string_pretty(&Value::Array(values))
}

/// Recognized CSV columns (§6.1 "CSV").
const CSV_COLUMNS: &[&str] = &[
    "identifier",
    "type",
    "morphology",
    "chinese_name",
    "constellation_en",
    "ra_j2000",
    "dec_j2000",
    "rad_j2000",
    "dec_d_j2000",
    "visual_magnitude_v",
    "click_count",
    "aliases",
];

pub fn export_csv(
    objects: &[CelestialObject],
    options: &ImportExportOptions,
) -> Result<String, csv::Error> {
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(options.delimiter);
    let mut writer = builder.from_writer(Vec::new());

    if options.has_header {
        writer.write_record(CSV_COLUMNS)?;
    }

    for obj in objects {
        let aliases = if options.include_aliases {
            obj.aliases.clone()
        } else {
            String::new()
        };
        writer.write_record([
            &obj.identifier,
            &obj.object_type,
            &obj.morphology,
            &obj.chinese_name,
            &obj.constellation_en,
            &obj.ra_text,
            &obj.dec_text,
            &obj.ra_deg.to_string(),
            &obj.dec_deg.to_string(),
            &obj.visual_magnitude.to_string(),
            &obj.click_count.to_string(),
            &aliases,
        ])?;
    }
    let bytes = writer.into_inner().expect("in-memory writer never fails to flush");
    Ok(String::from_utf8(bytes).expect("CSV output is always valid UTF-8"))
}

pub fn parse_csv(text: &str, options: &ImportExportOptions) -> Result<Vec<CelestialObject>, csv::Error> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true);
    let mut reader = builder.from_reader(text.as_bytes());

    let mut out = Vec::new();
    for result in reader.records() {
        let record = result?;
        let get = |idx: usize| record.get(idx).unwrap_or("").to_string();
        let identifier = get(0);
        if identifier.is_empty() {
            continue;
        }
        out.push(CelestialObject {
            id: 0,
            identifier,
            m_identifier: String::new(),
            extension_name: String::new(),
            component: String::new(),
            class_name: String::new(),
            amateur_rank: 0,
            chinese_name: get(3),
            object_type: get(1),
            duplicate_type: String::new(),
            morphology: get(2),
            constellation_zh: String::new(),
            constellation_en: get(4),
            ra_text: get(5),
            ra_deg: get(7).parse().unwrap_or(0.0),
            dec_text: get(6),
            dec_deg: get(8).parse().unwrap_or(0.0),
            visual_magnitude: get(9).parse().unwrap_or(0.0),
            photographic_magnitude: 0.0,
            b_minus_v: 0.0,
            surface_brightness: 0.0,
            major_axis: 0.0,
            minor_axis: 0.0,
            position_angle: 0.0,
            detailed_description: String::new(),
            brief_description: String::new(),
            aliases: get(11),
            click_count: get(10).parse().unwrap_or(0),
            created_at: 0,
            updated_at: 0,
        });
    }
    let _ = CSV_COLUMNS;
    Ok(out)
}
