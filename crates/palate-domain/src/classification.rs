//! Recommendation classification
//!
//! Turns a restaurant's recommendations into an ordered view for one viewer.
//! Two policies share one interface:
//!
//! - [`FlatStrategy`]: every recommendation is kept and flagged with its
//!   relationship to the viewer, ordered in-network first, then by taste
//!   alignment, then newest first.
//! - [`TieredStrategy`]: recommendations are bucketed into three tiers by
//!   follow status and taste match; strangers with a very strong match are
//!   shown anonymized, everything else outside the tiers is dropped.

use crate::alignment::match_percent;
use crate::credibility::CredibilityProfile;
use crate::trust_computation::{compute_trust_score, TrustConfig, ViewerGraph};
use crate::{Dish, Recommendation, RecommendationId, RestaurantId, TasteAlignments, Tier, UserId};
use std::collections::{HashMap, HashSet};

/// Minimum taste match for a followed author to reach Tier 1 (default: 70)
pub const FRIEND_MIN_MATCH_PERCENT: u32 = 70;

/// Minimum taste match for a stranger to be shown at all (default: 80)
pub const STRANGER_MIN_MATCH_PERCENT: u32 = 80;

/// The viewer's relationship sets
///
/// `mutuals` is always the intersection of `following` and `followers`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipSets {
    following: HashSet<UserId>,
    followers: HashSet<UserId>,
    mutuals: HashSet<UserId>,
}

impl RelationshipSets {
    /// Build from the following and followers sets; mutuals are derived
    pub fn new(following: HashSet<UserId>, followers: HashSet<UserId>) -> Self {
        let mutuals = following.intersection(&followers).cloned().collect();
        Self {
            following,
            followers,
            mutuals,
        }
    }

    /// Users the viewer follows
    pub fn following(&self) -> &HashSet<UserId> {
        &self.following
    }

    /// Users following the viewer
    pub fn followers(&self) -> &HashSet<UserId> {
        &self.followers
    }

    /// Users in both directions
    pub fn mutuals(&self) -> &HashSet<UserId> {
        &self.mutuals
    }
}

/// Selectable classification policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassificationMode {
    /// Flag-based flat view
    #[default]
    Flat,

    /// Three-tier anonymizing view
    Tiered,
}

impl ClassificationMode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMode::Flat => "flat",
            ClassificationMode::Tiered => "tiered",
        }
    }

    /// Parse a mode name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" => Some(ClassificationMode::Flat),
            "tiered" => Some(ClassificationMode::Tiered),
            _ => None,
        }
    }

    /// The strategy implementing this mode
    pub fn strategy(&self) -> &'static dyn ClassificationStrategy {
        match self {
            ClassificationMode::Flat => &FlatStrategy,
            ClassificationMode::Tiered => &TieredStrategy,
        }
    }
}

impl std::str::FromStr for ClassificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid classification mode: {}", s))
    }
}

/// Taste match thresholds for the tiered policy, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThresholds {
    /// Followed authors at or above this reach Tier 1, below it Tier 3
    pub friend_min_percent: u32,
    /// Strangers at or above this reach Tier 2, below it are excluded
    pub stranger_min_percent: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            friend_min_percent: FRIEND_MIN_MATCH_PERCENT,
            stranger_min_percent: STRANGER_MIN_MATCH_PERCENT,
        }
    }
}

impl TierThresholds {
    /// Tier for an author, or `None` if excluded
    pub fn tier_for(&self, is_followed: bool, taste_match_percent: u32) -> Option<Tier> {
        match (is_followed, taste_match_percent) {
            (true, p) if p >= self.friend_min_percent => Some(Tier::Trusted),
            (true, _) => Some(Tier::Network),
            (false, p) if p >= self.stranger_min_percent => Some(Tier::TasteTwin),
            (false, _) => None,
        }
    }
}

/// Everything a strategy needs, fully materialized
#[derive(Debug, Clone, Copy)]
pub struct ClassificationInput<'a> {
    /// The viewer
    pub viewer: &'a UserId,
    /// Restaurant recommendations, newest first
    pub recommendations: &'a [Recommendation],
    /// Viewer relationship sets
    pub relationships: &'a RelationshipSets,
    /// Viewer taste alignments
    pub alignments: &'a TasteAlignments,
    /// Viewer neighbourhood for trust weighting
    pub viewer_graph: &'a ViewerGraph,
    /// Credibility of authors that will be anonymized
    pub credibility: &'a HashMap<UserId, CredibilityProfile>,
    /// Trust formula settings
    pub trust: &'a TrustConfig,
    /// Tier thresholds
    pub thresholds: TierThresholds,
}

impl<'a> ClassificationInput<'a> {
    /// Recommendations not authored by the viewer, in input order
    pub fn others(&self) -> impl Iterator<Item = &'a Recommendation> + 'a {
        let viewer = self.viewer;
        self.recommendations
            .iter()
            .filter(move |r| r.author_id != *viewer)
    }
}

/// How the author of a classified recommendation is presented
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorView {
    /// Author shown as themselves
    Identified {
        /// Author id
        id: UserId,
        /// Author display name
        display_name: String,
    },

    /// Author hidden behind a label; carries no identifying data
    Anonymous {
        /// Display label, includes the match percentage
        label: String,
        /// Taste match with the viewer
        taste_match_percent: u32,
        /// Reputation snapshot of the hidden author
        credibility: CredibilityProfile,
    },
}

impl AuthorView {
    /// Author id, if shown
    pub fn id(&self) -> Option<&UserId> {
        match self {
            AuthorView::Identified { id, .. } => Some(id),
            AuthorView::Anonymous { .. } => None,
        }
    }
}

/// Relationship flags used by the flat policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkFlags {
    /// Viewer follows the author
    pub is_following: bool,
    /// Author follows the viewer
    pub is_followed_by: bool,
    /// Both directions
    pub is_friend: bool,
    /// Raw taste alignment, 0.0 when unknown
    pub taste_alignment: f64,
}

impl NetworkFlags {
    /// Any relationship at all
    pub fn in_network(&self) -> bool {
        self.is_friend || self.is_following || self.is_followed_by
    }
}

/// Where a recommendation landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Flat policy flags
    Flat(NetworkFlags),

    /// Tiered policy bucket
    Tiered {
        /// Assigned tier
        tier: Tier,
        /// Taste match with the viewer
        taste_match_percent: u32,
    },
}

/// One recommendation as presented to a viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecommendation {
    /// Recommendation id
    pub id: RecommendationId,
    /// Restaurant
    pub restaurant_id: RestaurantId,
    /// Author presentation
    pub author: AuthorView,
    /// Personalized trust score
    pub trust_score: f64,
    /// Stored trust score
    pub base_trust_score: f64,
    /// Upvote counter
    pub upvotes: u32,
    /// Save counter
    pub saves: u32,
    /// Creation timestamp
    pub created_at: u64,
    /// Dishes, in author order
    pub dishes: Vec<Dish>,
    /// Classification result
    pub placement: Placement,
}

impl ClassifiedRecommendation {
    fn build(
        rec: &Recommendation,
        author: AuthorView,
        placement: Placement,
        input: &ClassificationInput<'_>,
    ) -> Self {
        Self {
            id: rec.id,
            restaurant_id: rec.restaurant_id.clone(),
            author,
            trust_score: compute_trust_score(rec, Some(input.viewer_graph), input.trust),
            base_trust_score: rec.base_trust_score,
            upvotes: rec.upvotes,
            saves: rec.saves,
            created_at: rec.created_at,
            dishes: rec.dishes.clone(),
            placement,
        }
    }

    /// Tier, if classified by the tiered policy
    pub fn tier(&self) -> Option<Tier> {
        match self.placement {
            Placement::Tiered { tier, .. } => Some(tier),
            Placement::Flat(_) => None,
        }
    }
}

/// A classification policy
pub trait ClassificationStrategy: Send + Sync {
    /// The mode this strategy implements
    fn mode(&self) -> ClassificationMode;

    /// Authors whose credibility must be read before [`classify`](Self::classify)
    fn credibility_subjects(&self, _input: &ClassificationInput<'_>) -> Vec<UserId> {
        Vec::new()
    }

    /// Classify and order the input. Never returns the viewer's own recommendations.
    fn classify(&self, input: &ClassificationInput<'_>) -> Vec<ClassifiedRecommendation>;
}

/// Flag-based flat policy
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatStrategy;

impl ClassificationStrategy for FlatStrategy {
    fn mode(&self) -> ClassificationMode {
        ClassificationMode::Flat
    }

    fn classify(&self, input: &ClassificationInput<'_>) -> Vec<ClassifiedRecommendation> {
        let mut classified: Vec<(NetworkFlags, ClassifiedRecommendation)> = input
            .others()
            .map(|rec| {
                let author = &rec.author_id;
                let flags = NetworkFlags {
                    is_following: input.relationships.following().contains(author),
                    is_followed_by: input.relationships.followers().contains(author),
                    is_friend: input.relationships.mutuals().contains(author),
                    taste_alignment: input.alignments.get(author).unwrap_or(0.0),
                };
                let view = AuthorView::Identified {
                    id: author.clone(),
                    display_name: rec.author_name.clone(),
                };
                (flags, ClassifiedRecommendation::build(rec, view, Placement::Flat(flags), input))
            })
            .collect();

        classified.sort_by(|(fa, a), (fb, b)| {
            fb.in_network()
                .cmp(&fa.in_network())
                .then(fb.taste_alignment.total_cmp(&fa.taste_alignment))
                .then(b.created_at.cmp(&a.created_at))
        });

        classified.into_iter().map(|(_, c)| c).collect()
    }
}

/// Three-tier anonymizing policy
///
/// "Followed" here is one-directional: the viewer follows the author.
#[derive(Debug, Clone, Copy, Default)]
pub struct TieredStrategy;

impl TieredStrategy {
    fn assign<'a>(
        input: &ClassificationInput<'a>,
    ) -> impl Iterator<Item = (&'a Recommendation, Tier, u32)> + 'a {
        let input = *input;
        input.others().filter_map(move |rec| {
            let is_followed = input.relationships.following().contains(&rec.author_id);
            let percent = input.alignments.get(&rec.author_id).map(match_percent).unwrap_or(0);
            input
                .thresholds
                .tier_for(is_followed, percent)
                .map(|tier| (rec, tier, percent))
        })
    }

    fn anonymized_label(taste_match_percent: u32) -> String {
        format!("Diner with {}% taste match", taste_match_percent)
    }
}

impl ClassificationStrategy for TieredStrategy {
    fn mode(&self) -> ClassificationMode {
        ClassificationMode::Tiered
    }

    fn credibility_subjects(&self, input: &ClassificationInput<'_>) -> Vec<UserId> {
        let mut subjects: Vec<UserId> = Vec::new();
        for (rec, tier, _) in Self::assign(input) {
            if tier.is_anonymized() && !subjects.contains(&rec.author_id) {
                subjects.push(rec.author_id.clone());
            }
        }
        subjects
    }

    fn classify(&self, input: &ClassificationInput<'_>) -> Vec<ClassifiedRecommendation> {
        let mut buckets: HashMap<Tier, Vec<(u32, &Recommendation)>> = HashMap::new();
        for (rec, tier, percent) in Self::assign(input) {
            buckets.entry(tier).or_default().push((percent, rec));
        }

        let mut output = Vec::new();
        for tier in Tier::ALL {
            let Some(mut bucket) = buckets.remove(&tier) else {
                continue;
            };
            // Stable: equal percentages keep input (newest first) order
            bucket.sort_by(|a, b| b.0.cmp(&a.0));

            for (percent, rec) in bucket {
                let view = if tier.is_anonymized() {
                    AuthorView::Anonymous {
                        label: Self::anonymized_label(percent),
                        taste_match_percent: percent,
                        credibility: input
                            .credibility
                            .get(&rec.author_id)
                            .cloned()
                            .unwrap_or_default(),
                    }
                } else {
                    AuthorView::Identified {
                        id: rec.author_id.clone(),
                        display_name: rec.author_name.clone(),
                    }
                };
                let placement = Placement::Tiered {
                    tier,
                    taste_match_percent: percent,
                };
                output.push(ClassifiedRecommendation::build(rec, view, placement, input));
            }
        }
        output
    }
}
