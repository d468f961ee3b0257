//! In-memory indices layered on top of the repository: prefix (autocomplete),
//! fuzzy (typo-tolerant lookup), and spatial (coordinate range queries).

mod fuzzy;
mod prefix;
mod spatial;

pub use fuzzy::{FuzzyIndex, FuzzyIndexStats};
pub use prefix::PrefixIndex;
pub use spatial::SpatialIndex;
