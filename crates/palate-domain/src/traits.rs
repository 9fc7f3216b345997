//! Trait definitions for external reads
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! The ranking engine only ever reads through them; writes belong to the
//! systems that own the data. Implementations live in other crates.

use crate::{AuthoredRecord, Recommendation, RecommendationId, RestaurantId, SocialConnection, UserId};
use std::collections::{HashMap, HashSet};

/// Read access to the "follows" graph
///
/// Implemented by the infrastructure layer (palate-store)
pub trait SocialGraphStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Users that `user` actively follows
    fn following(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error>;

    /// Users actively following `user`
    fn followers(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error>;

    /// Every edge where `user` is the follower, oldest first
    fn outgoing_connections(&self, user: &UserId) -> Result<Vec<SocialConnection>, Self::Error>;

    /// Users who follow someone `user` follows (`user -> x <- other`), active edges only
    fn second_degree(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error>;
}

/// Read access to the precomputed taste similarity matrix
///
/// Implemented by the infrastructure layer (palate-store)
pub trait TasteAlignmentStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Raw similarity of `viewer` to every other user with a computed value
    fn alignments(&self, viewer: &UserId) -> Result<HashMap<UserId, f64>, Self::Error>;
}

/// Read access to recommendations
///
/// Implemented by the infrastructure layer (palate-store)
pub trait RecommendationStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Recommendations of a restaurant, newest first, with nested dishes
    ///
    /// When `exclude_author` is given, that author's recommendations are omitted.
    fn list_for_restaurant(
        &self,
        restaurant: &RestaurantId,
        exclude_author: Option<&UserId>,
    ) -> Result<Vec<Recommendation>, Self::Error>;

    /// Get a recommendation by ID
    fn get_recommendation(&self, id: RecommendationId) -> Result<Option<Recommendation>, Self::Error>;
}

/// Read access to a user's authored history
///
/// Implemented by the infrastructure layer (palate-store)
pub trait CredibilityStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Trust score and category of every recommendation authored by `user`
    fn list_authored(&self, user: &UserId) -> Result<Vec<AuthoredRecord>, Self::Error>;
}
