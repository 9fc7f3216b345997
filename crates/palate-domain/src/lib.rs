//! Palate Domain Layer
//!
//! This crate contains the domain model and the deterministic ranking logic of
//! Palate's trust-and-ranking engine. Apart from UUIDv7 identifiers it has no
//! external dependencies, and it defines the read traits that infrastructure
//! crates implement.
//!
//! ## Key Concepts
//!
//! - **Recommendation**: a diner's endorsement of a restaurant, with nested dishes
//! - **Trust Score**: a [0, 1] confidence in a recommendation, personalized per viewer
//! - **Taste Alignment**: a precomputed [0, 1] similarity between a viewer and an author
//! - **Classification**: flat (flagged) or tiered (anonymizing) views of a restaurant
//! - **Credibility Profile**: reputation derived from a user's own recommendations
//! - **Dish Summary**: per-dish ratings aggregated across recommendations
//!
//! ## Architecture
//!
//! - Pure functions over fully materialized inputs
//! - No I/O; all reads go through the traits in [`traits`]
//! - Orchestration and concurrency live in palate-engine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alignment;
pub mod classification;
pub mod connection;
pub mod credibility;
pub mod dish;
pub mod ids;
pub mod recommendation;
pub mod rounding;
pub mod tier;
pub mod traits;
pub mod trust_computation;

// Re-exports for convenience
pub use alignment::TasteAlignments;
pub use classification::{
    AuthorView, ClassificationInput, ClassificationMode, ClassificationStrategy,
    ClassifiedRecommendation, FlatStrategy, NetworkFlags, Placement, RelationshipSets,
    TierThresholds, TieredStrategy,
};
pub use connection::{ConnectionKind, SocialConnection};
pub use credibility::{AuthoredRecord, CredibilityProfile};
pub use dish::DishSummary;
pub use ids::{RecommendationId, RestaurantId, UserId};
pub use recommendation::{Dish, Recommendation};
pub use tier::Tier;
pub use trust_computation::{DuplicateEdgePolicy, SocialDistance, TrustConfig, ViewerGraph};
