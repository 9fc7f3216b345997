//! Social connection module - directed "follows" edges between users

use crate::UserId;

/// Kind of social connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// Plain follow
    Follow,

    /// Declared friend
    Friend,

    /// Family member
    Family,

    /// Work colleague
    Colleague,
}

impl ConnectionKind {
    /// Get the kind name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Follow => "follow",
            ConnectionKind::Friend => "friend",
            ConnectionKind::Family => "family",
            ConnectionKind::Colleague => "colleague",
        }
    }

    /// Parse a stored kind; unknown values read as a plain follow
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "friend" => ConnectionKind::Friend,
            "family" => ConnectionKind::Family,
            "colleague" => ConnectionKind::Colleague,
            _ => ConnectionKind::Follow,
        }
    }
}

/// A directed edge `follower -> following`
///
/// Several rows may exist for the same pair in source data; see
/// [`crate::trust_computation::DuplicateEdgePolicy`] for how they resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialConnection {
    /// The user doing the following
    pub follower_id: UserId,

    /// The user being followed
    pub following_id: UserId,

    /// Inactive edges are ignored everywhere
    pub active: bool,

    /// Trust weight [0.0, 1.0]; `None` means the configured default
    pub weight: Option<f64>,

    /// Kind of connection
    pub kind: ConnectionKind,

    /// When this edge was established
    pub created_at: u64,
}

impl SocialConnection {
    /// Create an active follow edge with no explicit weight
    pub fn follow(follower_id: UserId, following_id: UserId, created_at: u64) -> Self {
        Self {
            follower_id,
            following_id,
            active: true,
            weight: None,
            kind: ConnectionKind::Follow,
            created_at,
        }
    }

    /// Set an explicit weight
    ///
    /// # Panics
    /// Panics if weight is outside [0, 1]
    pub fn with_weight(mut self, weight: f64) -> Self {
        assert!((0.0..=1.0).contains(&weight), "Weight must be in [0, 1]");
        self.weight = Some(weight);
        self
    }

    /// Set the connection kind
    pub fn with_kind(mut self, kind: ConnectionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the edge inactive
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}
