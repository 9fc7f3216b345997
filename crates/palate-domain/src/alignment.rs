//! Taste alignment - precomputed viewer-to-author similarity

use crate::UserId;
use std::collections::HashMap;

/// Validated taste alignments from one viewer's perspective
///
/// An author with no entry has no computed signal. That is not the same as a
/// known similarity of 0.0, so lookups return `Option`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasteAlignments {
    values: HashMap<UserId, f64>,
}

impl TasteAlignments {
    /// Create an empty alignment map (no signal for anyone)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw store rows
    ///
    /// Non-finite values are dropped; finite values are clamped into [0, 1].
    pub fn from_raw<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (UserId, f64)>,
    {
        let values = rows
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(user, v)| (user, v.clamp(0.0, 1.0)))
            .collect();
        Self { values }
    }

    /// Alignment with `author`, if one has been computed
    pub fn get(&self, author: &UserId) -> Option<f64> {
        self.values.get(author).copied()
    }

    /// True if a signal exists for `author` (even a zero one)
    pub fn is_known(&self, author: &UserId) -> bool {
        self.values.contains_key(author)
    }

    /// Number of authors with a signal
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no signal exists for anyone
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Convert an alignment into a whole percentage (0-100)
pub fn match_percent(alignment: f64) -> u32 {
    (alignment.clamp(0.0, 1.0) * 100.0).round() as u32
}
