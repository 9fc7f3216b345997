//! Recommendation module - a diner's endorsement of a restaurant

use crate::{RecommendationId, RestaurantId, UserId};

/// A dish entry nested under a recommendation
///
/// Dishes are grouped by exact (case-sensitive) name. The rating is optional
/// because storage rows may be incomplete; entries without a usable rating
/// are skipped during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    /// Dish name as written by the author
    pub name: String,

    /// Rating given by the author, if recorded
    pub rating: Option<f64>,
}

impl Dish {
    /// Create a rated dish entry
    pub fn new(name: impl Into<String>, rating: f64) -> Self {
        Self {
            name: name.into(),
            rating: Some(rating),
        }
    }

    /// Create a dish entry with no rating
    pub fn unrated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: None,
        }
    }

    /// The rating if this entry is consistent enough to aggregate
    ///
    /// Blank names and missing or non-finite ratings are rejected.
    pub fn usable_rating(&self) -> Option<f64> {
        if self.name.trim().is_empty() {
            return None;
        }
        self.rating.filter(|r| r.is_finite())
    }
}

/// A recommendation of a restaurant by one author
///
/// Read from the recommendation store per request; never mutated by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Unique identifier
    pub id: RecommendationId,

    /// Author of the recommendation
    pub author_id: UserId,

    /// Author display name (joined from the user record)
    pub author_name: String,

    /// Restaurant being recommended
    pub restaurant_id: RestaurantId,

    /// Stored, non-personalized trust score [0.0, 1.0]
    pub base_trust_score: f64,

    /// Upvote counter
    pub upvotes: u32,

    /// Save counter
    pub saves: u32,

    /// Creation timestamp (milliseconds since Unix epoch)
    pub created_at: u64,

    /// Dishes mentioned, in author order
    pub dishes: Vec<Dish>,
}

impl Recommendation {
    /// Create a recommendation with zeroed counters and no dishes
    pub fn new(
        id: RecommendationId,
        author_id: UserId,
        author_name: impl Into<String>,
        restaurant_id: RestaurantId,
        base_trust_score: f64,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            author_id,
            author_name: author_name.into(),
            restaurant_id,
            base_trust_score,
            upvotes: 0,
            saves: 0,
            created_at,
            dishes: Vec::new(),
        }
    }

    /// Set engagement counters
    pub fn with_engagement(mut self, upvotes: u32, saves: u32) -> Self {
        self.upvotes = upvotes;
        self.saves = saves;
        self
    }

    /// Append a dish entry
    pub fn with_dish(mut self, dish: Dish) -> Self {
        self.dishes.push(dish);
        self
    }
}
