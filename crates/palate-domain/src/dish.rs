//! Dish aggregation - ranked per-dish summaries for a restaurant

use crate::rounding::round_to;
use crate::{Recommendation, TasteAlignments, UserId};
use std::collections::HashMap;

/// Default number of named recommenders shown per dish
pub const MAX_TOP_RECOMMENDERS: usize = 3;

/// Aggregated view of one dish across recommendations
#[derive(Debug, Clone, PartialEq)]
pub struct DishSummary {
    /// Exact dish name
    pub name: String,

    /// Mean rating, rounded to 1 decimal
    pub avg_rating: f64,

    /// Number of contributing dish entries (not distinct authors)
    pub recommendation_count: usize,

    /// Ratings in the order they were read
    pub ratings: Vec<f64>,

    /// Up to the configured number of names, plus an "N other(s)" entry
    pub top_recommenders: Vec<String>,
}

#[derive(Debug, Default)]
struct DishGroup {
    ratings: Vec<f64>,
    sum: f64,
    recommenders: Vec<String>,
}

/// Aggregate dish entries into ranked summaries
///
/// With a viewer, the viewer's own recommendations are skipped and only
/// authors with a known taste alignment contribute. Entries with no usable
/// rating or a blank name are skipped. Output is sorted by average rating,
/// highest first; equal averages keep first-seen order.
pub fn aggregate_dishes(
    recommendations: &[Recommendation],
    viewer: Option<&UserId>,
    alignments: &TasteAlignments,
    max_top_recommenders: usize,
) -> Vec<DishSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, DishGroup> = HashMap::new();

    let contributing = recommendations.iter().filter(|rec| match viewer {
        Some(viewer) => rec.author_id != *viewer && alignments.is_known(&rec.author_id),
        None => true,
    });

    for rec in contributing {
        for dish in &rec.dishes {
            let Some(rating) = dish.usable_rating() else {
                continue;
            };
            let group = groups.entry(dish.name.clone()).or_insert_with(|| {
                order.push(dish.name.clone());
                DishGroup::default()
            });
            group.ratings.push(rating);
            group.sum += rating;
            if !group.recommenders.contains(&rec.author_name) {
                group.recommenders.push(rec.author_name.clone());
            }
        }
    }

    let mut summaries: Vec<DishSummary> = order
        .into_iter()
        .filter_map(|name| {
            let group = groups.remove(&name)?;
            let count = group.ratings.len();
            Some(DishSummary {
                avg_rating: round_to(group.sum / count as f64, 1),
                recommendation_count: count,
                top_recommenders: top_recommenders(&group.recommenders, max_top_recommenders),
                ratings: group.ratings,
                name,
            })
        })
        .collect();

    summaries.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating));
    summaries
}

/// First `limit` names, plus "1 other" / "N others" for the remainder
fn top_recommenders(names: &[String], limit: usize) -> Vec<String> {
    let mut top: Vec<String> = names.iter().take(limit).cloned().collect();
    let remaining = names.len().saturating_sub(limit);
    match remaining {
        0 => {}
        1 => top.push("1 other".to_string()),
        n => top.push(format!("{} others", n)),
    }
    top
}
