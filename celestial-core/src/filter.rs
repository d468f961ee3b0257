//! Faceted filter definition and the in-memory predicate evaluator (§4.E).

use crate::error::ValidationError;
use crate::model::CelestialObject;

/// Sort key accepted by `orderBy`; anything else normalizes to `Identifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Identifier,
    Magnitude,
    Ra,
    Dec,
}

impl OrderBy {
    pub fn parse(s: &str) -> Self {
        match s {
            "magnitude" => Self::Magnitude,
            "ra" => Self::Ra,
            "dec" => Self::Dec,
            _ => Self::Identifier,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Magnitude => "visual_magnitude",
            Self::Ra => "ra_deg",
            Self::Dec => "dec_deg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CelestialSearchFilter {
    pub name_pattern: String,
    pub object_type: String,
    pub morphology: String,
    pub constellation: String,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub min_ra: f64,
    pub max_ra: f64,
    pub min_dec: f64,
    pub max_dec: f64,
    pub limit: i64,
    pub offset: i64,
    pub order_by: OrderBy,
    pub ascending: bool,
}

impl Default for CelestialSearchFilter {
    fn default() -> Self {
        Self {
            name_pattern: String::new(),
            object_type: String::new(),
            morphology: String::new(),
            constellation: String::new(),
            min_magnitude: -30.0,
            max_magnitude: 30.0,
            min_ra: 0.0,
            max_ra: 360.0,
            min_dec: -90.0,
            max_dec: 90.0,
            limit: 100,
            offset: 0,
            order_by: OrderBy::Identifier,
            ascending: true,
        }
    }
}

/// Translates SQL-LIKE `namePattern` (with `%`/`_` wildcards) into a regex-free matcher.
fn like_matches(pattern: &str, value: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    fn rec(p: &[char], v: &[char]) -> bool {
        match p.first() {
            None => v.is_empty(),
            Some('%') => rec(&p[1..], v) || (!v.is_empty() && rec(p, &v[1..])),
            Some('_') => !v.is_empty() && rec(&p[1..], &v[1..]),
            Some(c) => v.first() == Some(c) && rec(&p[1..], &v[1..]),
        }
    }
    rec(&pattern, &value)
}

pub struct FilterEvaluator;

/// Predicate evaluation.
impl FilterEvaluator {
    /// Short-circuits on the first failing predicate (§4.E `matches`).
    pub fn matches(obj: &CelestialObject, filter: &CelestialSearchFilter) -> bool {
        Self::explain_mismatch(obj, filter).is_none()
    }

    /// Returns the description of the first failing predicate, or `None` if `obj` matches.
    pub fn explain_mismatch(obj: &CelestialObject, filter: &CelestialSearchFilter) -> Option<String> {
        if !like_matches(&filter.name_pattern, &obj.identifier) {
            return Some(format!(
                "identifier '{}' does not match pattern '{}'",
                obj.identifier, filter.name_pattern
            ));
        }
        if !filter.object_type.is_empty() && obj.object_type != filter.object_type {
            return Some(format!("type '{}' != '{}'", obj.object_type, filter.object_type));
        }
        if !filter.morphology.is_empty() && obj.morphology != filter.morphology {
            return Some(format!(
                "morphology '{}' != '{}'",
                obj.morphology, filter.morphology
            ));
        }
        if !filter.constellation.is_empty() && obj.constellation_en != filter.constellation {
            return Some(format!(
                "constellation '{}' != '{}'",
                obj.constellation_en, filter.constellation
            ));
        }
        if obj.visual_magnitude < filter.min_magnitude || obj.visual_magnitude > filter.max_magnitude {
            return Some(format!(
                "magnitude {} outside [{}, {}]",
                obj.visual_magnitude, filter.min_magnitude, filter.max_magnitude
            ));
        }
        if obj.ra_deg < filter.min_ra || obj.ra_deg > filter.max_ra {
            return Some(format!(
                "ra_deg {} outside [{}, {}]",
                obj.ra_deg, filter.min_ra, filter.max_ra
            ));
        }
        if obj.dec_deg < filter.min_dec || obj.dec_deg > filter.max_dec {
            return Some(format!(
                "dec_deg {} outside [{}, {}]",
                obj.dec_deg, filter.min_dec, filter.max_dec
            ));
        }
        None
    }
}

/// Structural operations (filter, sort, paginate — kept separate from `matches`
/// because limit/offset/orderBy are not predicates).
impl FilterEvaluator {
    pub fn filter_results(rows: &[CelestialObject], filter: &CelestialSearchFilter) -> Vec<CelestialObject> {
        rows.iter()
            .filter(|obj| Self::matches(obj, filter))
            .cloned()
            .collect()
    }

    pub fn sort_results(rows: &mut [CelestialObject], filter: &CelestialSearchFilter) {
        rows.sort_by(|a, b| {
            let ord = match filter.order_by {
                OrderBy::Identifier => a.identifier.cmp(&b.identifier),
                OrderBy::Magnitude => a.visual_magnitude.total_cmp(&b.visual_magnitude),
                OrderBy::Ra => a.ra_deg.total_cmp(&b.ra_deg),
                OrderBy::Dec => a.dec_deg.total_cmp(&b.dec_deg),
            };
            if filter.ascending { ord } else { ord.reverse() }
        });
    }

    pub fn paginate(rows: &[CelestialObject], offset: i64, limit: i64) -> Vec<CelestialObject> {
        if offset < 0 || limit <= 0 {
            return Vec::new();
        }
        let offset = offset as usize;
        if offset >= rows.len() {
            return Vec::new();
        }
        let end = (offset + limit as usize).min(rows.len());
        rows[offset..end].to_vec()
    }

    pub fn validate_filter(filter: &CelestialSearchFilter) -> Result<(), ValidationError> {
        if filter.min_magnitude > filter.max_magnitude {
            return Err(ValidationError::MagnitudeRangeInverted {
                min: filter.min_magnitude,
                max: filter.max_magnitude,
            });
        }
        if filter.min_ra > filter.max_ra {
            return Err(ValidationError::RaRangeInverted {
                min: filter.min_ra,
                max: filter.max_ra,
            });
        }
        if filter.min_dec > filter.max_dec {
            return Err(ValidationError::DecRangeInverted {
                min: filter.min_dec,
                max: filter.max_dec,
            });
        }
        Ok(())
    }
}
