//! Flat grid index over (RA, Dec), for coordinate-radius queries (§4.C).
//!
//! Objects are bucketed into 1-degree cells keyed by `(floor(ra), floor(dec))`.
//! A radius search only has to visit the handful of cells that could possibly
//! hold a match, then filters by exact angular distance.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Below this `cos(dec)`, a degree of RA covers a vanishingly small angular
/// distance (near the poles), so RA bucketing is meaningless and a search
/// must fall back to scanning every RA bucket at that declination.
const POLE_COS_THRESHOLD: f64 = 1e-6;

fn bucket_key(ra_deg: f64, dec_deg: f64) -> (i32, i32) {
    (ra_deg.rem_euclid(360.0).floor() as i32, dec_deg.floor() as i32)
}

/// Great-circle angular separation between two (RA, Dec) points, in degrees.
fn angular_distance_deg(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (ra1, dec1, ra2, dec2) = (
        ra1.to_radians(),
        dec1.to_radians(),
        ra2.to_radians(),
        dec2.to_radians(),
    );
    let cos_d = dec1.sin() * dec2.sin() + dec1.cos() * dec2.cos() * (ra1 - ra2).cos();
    cos_d.clamp(-1.0, 1.0).acos().to_degrees()
}

struct Entry {
    object_id: i64,
    ra_deg: f64,
    dec_deg: f64,
}

struct Inner {
    buckets: HashMap<(i32, i32), Vec<Entry>>,
    size: usize,
}

/// Thread-safe spatial grid over object coordinates.
pub struct SpatialIndex {
    inner: RwLock<Inner>,
}

/// Create operations.
impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                buckets: HashMap::new(),
                size: 0,
            }),
        }
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutation operations.
impl SpatialIndex {
    pub fn insert(&self, object_id: i64, ra_deg: f64, dec_deg: f64) {
        let mut inner = self.inner.write();
        inner
            .buckets
            .entry(bucket_key(ra_deg, dec_deg))
            .or_default()
            .push(Entry {
                object_id,
                ra_deg,
                dec_deg,
            });
        inner.size += 1;
    }

    pub fn remove(&self, object_id: i64, ra_deg: f64, dec_deg: f64) {
        let mut inner = self.inner.write();
        let key = bucket_key(ra_deg, dec_deg);
        if let Some(bucket) = inner.buckets.get_mut(&key) {
            let before = bucket.len();
            bucket.retain(|e| e.object_id != object_id);
            let removed = before - bucket.len();
            if bucket.is_empty() {
                inner.buckets.remove(&key);
            }
            inner.size = inner.size.saturating_sub(removed);
        }
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.buckets.clear();
        inner.size = 0;
    }
}

/// Search operations.
impl SpatialIndex {
    /// Returns `(object_id, distance_deg)` pairs within `radius_deg` of the
    /// given center, ordered by ascending distance.
    pub fn search_radius(&self, center_ra: f64, center_dec: f64, radius_deg: f64) -> Vec<(i64, f64)> {
        let inner = self.inner.read();

        let dec_lo_deg = (center_dec - radius_deg).max(-90.0);
        let dec_hi_deg = (center_dec + radius_deg).min(90.0);
        let dec_lo = dec_lo_deg.floor() as i32;
        let dec_hi = dec_hi_deg.floor() as i32;

        // Use whichever edge of the declination band sits closest to a pole: a
        // point living there can have an arbitrarily large RA offset yet a tiny
        // angular distance, so the RA half-width must be conservative for it,
        // not just for the query center's own declination.
        let extreme_dec = if dec_lo_deg.abs() > dec_hi_deg.abs() { dec_lo_deg } else { dec_hi_deg };
        let cos_dec = extreme_dec.to_radians().cos().abs();
        let scan_all_ra = cos_dec < POLE_COS_THRESHOLD;
        let ra_delta = if scan_all_ra {
            180.0
        } else {
            (radius_deg / cos_dec).min(180.0)
        };

        let mut hits = Vec::new();
        for dec_bucket in dec_lo..=dec_hi {
            if scan_all_ra {
                for ra_bucket in 0..360 {
                    Self::collect_bucket(
                        &inner,
                        (ra_bucket, dec_bucket),
                        center_ra,
                        center_dec,
                        radius_deg,
                        &mut hits,
                    );
                }
                continue;
            }
            let ra_lo = (center_ra - ra_delta).floor() as i32;
            let ra_hi = (center_ra + ra_delta).floor() as i32;
            for raw in ra_lo..=ra_hi {
                let ra_bucket = raw.rem_euclid(360);
                Self::collect_bucket(
                    &inner,
                    (ra_bucket, dec_bucket),
                    center_ra,
                    center_dec,
                    radius_deg,
                    &mut hits,
                );
            }
        }

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.dedup_by_key(|(id, _)| *id);
        hits
    }

    fn collect_bucket(
        inner: &Inner,
        key: (i32, i32),
        center_ra: f64,
        center_dec: f64,
        radius_deg: f64,
        out: &mut Vec<(i64, f64)>,
    ) {
        let Some(bucket) = inner.buckets.get(&key) else {
            return;
        };
        for entry in bucket {
            let d = angular_distance_deg(center_ra, center_dec, entry.ra_deg, entry.dec_deg);
            if d <= radius_deg {
                out.push((entry.object_id, d));
            }
        }
    }
}

/// Maintenance operations.
impl SpatialIndex {
    pub fn size(&self) -> usize {
        self.inner.read().size
    }
}
