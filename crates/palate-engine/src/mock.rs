//! In-memory store with failure injection for engine tests

use palate_domain::traits::{
    CredibilityStore, RecommendationStore, SocialGraphStore, TasteAlignmentStore,
};
use palate_domain::{
    AuthoredRecord, Recommendation, RecommendationId, RestaurantId, SocialConnection, UserId,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub(crate) struct MockError(&'static str);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected failure in {}", self.0)
    }
}

/// Operations are named after their trait methods for `failing` and `slow`
#[derive(Default)]
pub(crate) struct MockStore {
    connections: Vec<SocialConnection>,
    alignments: HashMap<UserId, HashMap<UserId, f64>>,
    recommendations: Vec<Recommendation>,
    categories: HashMap<RestaurantId, String>,
    failing: HashSet<&'static str>,
    slow: HashSet<&'static str>,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_connection(mut self, connection: SocialConnection) -> Self {
        self.connections.push(connection);
        self
    }

    pub(crate) fn with_follow(self, follower: &str, following: &str) -> Self {
        self.with_connection(SocialConnection::follow(
            UserId::new(follower),
            UserId::new(following),
            0,
        ))
    }

    pub(crate) fn with_alignment(mut self, viewer: &str, other: &str, value: f64) -> Self {
        self.alignments
            .entry(UserId::new(viewer))
            .or_default()
            .insert(UserId::new(other), value);
        self
    }

    pub(crate) fn with_recommendation(mut self, recommendation: Recommendation) -> Self {
        self.recommendations.push(recommendation);
        self
    }

    pub(crate) fn with_category(mut self, restaurant: &str, category: &str) -> Self {
        self.categories
            .insert(RestaurantId::new(restaurant), category.to_string());
        self
    }

    pub(crate) fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub(crate) fn slow(mut self, operation: &'static str) -> Self {
        self.slow.insert(operation);
        self
    }

    fn enter(&self, operation: &'static str) -> Result<(), MockError> {
        if self.slow.contains(operation) {
            std::thread::sleep(Duration::from_millis(200));
        }
        if self.failing.contains(operation) {
            return Err(MockError(operation));
        }
        Ok(())
    }

    fn active(&self) -> impl Iterator<Item = &SocialConnection> {
        self.connections.iter().filter(|c| c.active)
    }
}

impl SocialGraphStore for MockStore {
    type Error = MockError;

    fn following(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error> {
        self.enter("following")?;
        Ok(self
            .active()
            .filter(|c| c.follower_id == *user)
            .map(|c| c.following_id.clone())
            .collect())
    }

    fn followers(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error> {
        self.enter("followers")?;
        Ok(self
            .active()
            .filter(|c| c.following_id == *user)
            .map(|c| c.follower_id.clone())
            .collect())
    }

    fn outgoing_connections(&self, user: &UserId) -> Result<Vec<SocialConnection>, Self::Error> {
        self.enter("outgoing_connections")?;
        Ok(self
            .connections
            .iter()
            .filter(|c| c.follower_id == *user)
            .cloned()
            .collect())
    }

    fn second_degree(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error> {
        self.enter("second_degree")?;
        let first: HashSet<&UserId> = self
            .active()
            .filter(|c| c.follower_id == *user)
            .map(|c| &c.following_id)
            .collect();
        Ok(self
            .active()
            .filter(|c| first.contains(&c.following_id) && c.follower_id != *user)
            .map(|c| c.follower_id.clone())
            .collect())
    }
}

impl TasteAlignmentStore for MockStore {
    type Error = MockError;

    fn alignments(&self, viewer: &UserId) -> Result<HashMap<UserId, f64>, Self::Error> {
        self.enter("alignments")?;
        Ok(self.alignments.get(viewer).cloned().unwrap_or_default())
    }
}

impl RecommendationStore for MockStore {
    type Error = MockError;

    fn list_for_restaurant(
        &self,
        restaurant: &RestaurantId,
        exclude_author: Option<&UserId>,
    ) -> Result<Vec<Recommendation>, Self::Error> {
        self.enter("list_for_restaurant")?;
        let mut recs: Vec<Recommendation> = self
            .recommendations
            .iter()
            .filter(|r| r.restaurant_id == *restaurant)
            .filter(|r| exclude_author != Some(&r.author_id))
            .cloned()
            .collect();
        recs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recs)
    }

    fn get_recommendation(&self, id: RecommendationId) -> Result<Option<Recommendation>, Self::Error> {
        self.enter("get_recommendation")?;
        Ok(self.recommendations.iter().find(|r| r.id == id).cloned())
    }
}

impl CredibilityStore for MockStore {
    type Error = MockError;

    fn list_authored(&self, user: &UserId) -> Result<Vec<AuthoredRecord>, Self::Error> {
        self.enter("list_authored")?;
        Ok(self
            .recommendations
            .iter()
            .filter(|r| r.author_id == *user)
            .map(|r| AuthoredRecord {
                trust_score: r.base_trust_score,
                category: self.categories.get(&r.restaurant_id).cloned(),
            })
            .collect())
    }
}
