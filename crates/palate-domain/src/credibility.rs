//! Credibility profiles - reputation derived from a user's own recommendations

use crate::rounding::round_to;

/// Default number of specialties kept in a profile
pub const MAX_SPECIALTIES: usize = 3;

/// One authored recommendation as seen by the credibility builder
#[derive(Debug, Clone, PartialEq)]
pub struct AuthoredRecord {
    /// Stored trust score of the recommendation [0.0, 1.0]
    pub trust_score: f64,

    /// Cuisine or venue category, if known
    pub category: Option<String>,
}

impl AuthoredRecord {
    /// Create a record
    pub fn new(trust_score: f64, category: Option<&str>) -> Self {
        Self {
            trust_score,
            category: category.map(str::to_string),
        }
    }
}

/// Derived, request-scoped reputation snapshot. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredibilityProfile {
    /// Number of recommendations authored
    pub total_recommendations: usize,

    /// Mean trust score, rounded to 1 decimal
    pub avg_trust_score: f64,

    /// Most frequent categories, most frequent first
    pub specialties: Vec<String>,
}

impl CredibilityProfile {
    /// Profile for a user with no readable history
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// Build a credibility profile from authored records
///
/// Categories are grouped by their exact stored string; only empty ones are
/// ignored. Category ties keep the order in which each category was first seen.
pub fn build_profile(records: &[AuthoredRecord], max_specialties: usize) -> CredibilityProfile {
    if records.is_empty() {
        return CredibilityProfile::zeroed();
    }

    let sum: f64 = records
        .iter()
        .map(|r| if r.trust_score.is_finite() { r.trust_score.clamp(0.0, 1.0) } else { 0.0 })
        .sum();
    let avg_trust_score = round_to(sum / records.len() as f64, 1);

    // (category, count) in first-seen order
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for category in records.iter().filter_map(|r| r.category.as_deref()) {
        if category.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    CredibilityProfile {
        total_recommendations: records.len(),
        avg_trust_score,
        specialties: counts
            .into_iter()
            .take(max_specialties)
            .map(|(c, _)| c.to_string())
            .collect(),
    }
}
