use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Store-assigned identifier of a [`Mapping`].
///
/// Ids increase with insertion order within a single store, which is what
/// breaks ties between mappings created in the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingId(i64);

impl MappingId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for MappingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored association between an original URL and its short code.
///
/// Mappings are created once by the shortener and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub id: MappingId,
    /// The destination URL, exactly as it was submitted.
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
}

impl Mapping {
    /// Ordering used by history listings: newest first, later insertions
    /// first among equal timestamps.
    pub fn newest_first(a: &Mapping, b: &Mapping) -> std::cmp::Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}
