//! Trust computation module
//!
//! Implements the deterministic, personalized trust formula for a
//! recommendation as seen by one viewer:
//! 1. Base score from the stored recommendation
//! 2. Social weighting (direct connection weight, or friend-of-friend discount)
//! 3. Additive engagement boost (upvotes and saves, capped)
//! 4. Clamp to [0, 1] and round to 3 decimals

use crate::rounding::round_to;
use crate::{Recommendation, SocialConnection, UserId};
use std::collections::{HashMap, HashSet};

/// Weight applied for a direct connection with no recorded weight (default: 0.75)
pub const DEFAULT_CONNECTION_WEIGHT: f64 = 0.75;

/// Multiplier applied when viewer and author share a followee (default: 0.25)
pub const FRIEND_OF_FRIEND_MULTIPLIER: f64 = 0.25;

/// Boost per upvote (default: 0.1)
pub const UPVOTE_BOOST: f64 = 0.1;

/// Boost per save (default: 0.05)
pub const SAVE_BOOST: f64 = 0.05;

/// Cap on the total engagement boost (default: 0.2)
pub const MAX_ENGAGEMENT_BOOST: f64 = 0.2;

/// Decimal places of a computed trust score
pub const TRUST_DECIMALS: u32 = 3;

/// How to resolve several active edges between the same viewer and author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateEdgePolicy {
    /// Use the first active row in storage order (legacy behavior)
    First,

    /// Use the highest weight among active rows
    #[default]
    MaxWeight,
}

/// Configuration for trust computation
#[derive(Debug, Clone, PartialEq)]
pub struct TrustConfig {
    /// Weight used when a direct edge carries none
    pub default_connection_weight: f64,
    /// Multiplier for a shared followee
    pub friend_of_friend_multiplier: f64,
    /// Boost per upvote
    pub upvote_boost: f64,
    /// Boost per save
    pub save_boost: f64,
    /// Cap on the engagement boost
    pub max_engagement_boost: f64,
    /// Resolution rule for duplicate edges
    pub duplicate_policy: DuplicateEdgePolicy,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            default_connection_weight: DEFAULT_CONNECTION_WEIGHT,
            friend_of_friend_multiplier: FRIEND_OF_FRIEND_MULTIPLIER,
            upvote_boost: UPVOTE_BOOST,
            save_boost: SAVE_BOOST,
            max_engagement_boost: MAX_ENGAGEMENT_BOOST,
            duplicate_policy: DuplicateEdgePolicy::default(),
        }
    }
}

/// Social distance from the viewer to an author
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SocialDistance {
    /// Viewer directly follows the author; carries the resolved edge weight
    Direct(f64),
    /// Viewer and author both follow some third user
    FriendOfFriend,
    /// No path within two hops
    Unconnected,
}

/// Snapshot of the viewer's neighbourhood needed for trust weighting
///
/// Built once per request from the social graph store and shared by every
/// recommendation scored in that request.
#[derive(Debug, Clone)]
pub struct ViewerGraph {
    viewer: UserId,
    direct: HashMap<UserId, Vec<SocialConnection>>,
    second_degree: HashSet<UserId>,
}

impl ViewerGraph {
    /// Graph with no connections at all
    pub fn empty(viewer: UserId) -> Self {
        Self {
            viewer,
            direct: HashMap::new(),
            second_degree: HashSet::new(),
        }
    }

    /// Build from the viewer's outgoing edges and the users sharing a followee with the viewer
    ///
    /// Inactive edges and edges not starting at `viewer` are discarded;
    /// storage order is preserved per author.
    pub fn new(
        viewer: UserId,
        outgoing: Vec<SocialConnection>,
        second_degree: HashSet<UserId>,
    ) -> Self {
        let mut direct: HashMap<UserId, Vec<SocialConnection>> = HashMap::new();
        for edge in outgoing {
            if edge.active && edge.follower_id == viewer {
                direct.entry(edge.following_id.clone()).or_default().push(edge);
            }
        }
        Self {
            viewer,
            direct,
            second_degree,
        }
    }

    /// The viewer this snapshot belongs to
    pub fn viewer(&self) -> &UserId {
        &self.viewer
    }

    /// Resolve the social distance to `author`
    pub fn distance(&self, author: &UserId, config: &TrustConfig) -> SocialDistance {
        if let Some(edges) = self.direct.get(author).filter(|e| !e.is_empty()) {
            let weight_of = |edge: &SocialConnection| {
                edge.weight
                    .unwrap_or(config.default_connection_weight)
                    .clamp(0.0, 1.0)
            };
            let weight = match config.duplicate_policy {
                DuplicateEdgePolicy::First => weight_of(&edges[0]),
                DuplicateEdgePolicy::MaxWeight => edges.iter().map(weight_of).fold(0.0, f64::max),
            };
            return SocialDistance::Direct(weight);
        }

        if self.second_degree.contains(author) {
            SocialDistance::FriendOfFriend
        } else {
            SocialDistance::Unconnected
        }
    }
}

/// Engagement boost: `min(cap, upvotes * upvote_boost + saves * save_boost)`
pub fn engagement_boost(upvotes: u32, saves: u32, config: &TrustConfig) -> f64 {
    let raw = upvotes as f64 * config.upvote_boost + saves as f64 * config.save_boost;
    raw.min(config.max_engagement_boost)
}

/// Compute the personalized trust score of a recommendation
///
/// `graph` is `None` when there is no viewer. When the viewer is the author,
/// no social weighting applies either.
pub fn compute_trust_score(
    recommendation: &Recommendation,
    graph: Option<&ViewerGraph>,
    config: &TrustConfig,
) -> f64 {
    let mut score = if recommendation.base_trust_score.is_finite() {
        recommendation.base_trust_score.clamp(0.0, 1.0)
    } else {
        0.0
    };

    if let Some(graph) = graph.filter(|g| *g.viewer() != recommendation.author_id) {
        match graph.distance(&recommendation.author_id, config) {
            SocialDistance::Direct(weight) => score *= weight,
            SocialDistance::FriendOfFriend => score *= config.friend_of_friend_multiplier,
            SocialDistance::Unconnected => {}
        }
    }

    score += engagement_boost(recommendation.upvotes, recommendation.saves, config);

    round_to(score.clamp(0.0, 1.0), TRUST_DECIMALS)
}
