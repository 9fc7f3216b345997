//! The ranking engine service
//!
//! Each operation fans out its store reads concurrently, waits for all of
//! them, then hands the materialized inputs to the pure domain functions.

use crate::reads::{blocking_read, or_default};
use crate::{EngineConfig, EngineError, SocialGraphFacade, TasteAlignmentFacade};
use palate_domain::credibility::build_profile;
use palate_domain::traits::{
    CredibilityStore, RecommendationStore, SocialGraphStore, TasteAlignmentStore,
};
use palate_domain::{
    trust_computation, ClassificationInput, ClassificationMode, ClassifiedRecommendation,
    CredibilityProfile, DishSummary, Recommendation, RecommendationId, RestaurantId,
    TasteAlignments, TrustConfig, UserId,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// A store that serves every read the engine needs
///
/// Implemented automatically for any type implementing the four read traits.
pub trait RankingStore:
    SocialGraphStore + TasteAlignmentStore + RecommendationStore + CredibilityStore + Send + Sync + 'static
{
}

impl<S> RankingStore for S where
    S: SocialGraphStore
        + TasteAlignmentStore
        + RecommendationStore
        + CredibilityStore
        + Send
        + Sync
        + 'static
{
}

/// Trust and ranking service
///
/// Construct once at startup and share (`Arc<RankingEngine<_>>`); it holds
/// no mutable state.
///
/// # Examples
///
/// ```no_run
/// use palate_domain::{ClassificationMode, RestaurantId, UserId};
/// use palate_engine::{EngineConfig, RankingEngine};
/// use palate_store::SqliteStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteStore::new("palate.db")?;
/// let engine = RankingEngine::new(store, EngineConfig::default())?;
///
/// let view = engine
///     .classify(&RestaurantId::new("r1"), &UserId::new("ana"), ClassificationMode::Flat)
///     .await?;
/// println!("{} recommendations", view.len());
/// # Ok(())
/// # }
/// ```
pub struct RankingEngine<S> {
    store: Arc<S>,
    config: EngineConfig,
    trust: TrustConfig,
    social: SocialGraphFacade<S>,
    taste: TasteAlignmentFacade<S>,
}

impl<S: RankingStore> RankingEngine<S> {
    /// Create an engine that owns its store
    pub fn new(store: S, config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create an engine over a store shared with other components
    pub fn with_shared_store(store: Arc<S>, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let timeout = config.read_timeout();
        Ok(Self {
            social: SocialGraphFacade::new(Arc::clone(&store), timeout),
            taste: TasteAlignmentFacade::new(Arc::clone(&store), timeout),
            trust: config.trust_config(),
            store,
            config,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Social graph facade backed by the same store
    pub fn social(&self) -> &SocialGraphFacade<S> {
        &self.social
    }

    /// Taste alignment facade backed by the same store
    pub fn taste(&self) -> &TasteAlignmentFacade<S> {
        &self.taste
    }

    /// Personalized trust score of `recommendation` for `viewer`
    ///
    /// Without a viewer, or when the viewer wrote the recommendation, the
    /// social graph is not read.
    pub async fn compute_trust_score(
        &self,
        recommendation: &Recommendation,
        viewer: Option<&UserId>,
    ) -> Result<f64, EngineError> {
        if let Some(viewer) = viewer {
            require("viewer id", viewer.is_blank())?;
        }

        let graph = match viewer {
            Some(viewer) if *viewer != recommendation.author_id => {
                Some(self.social.viewer_graph(viewer).await)
            }
            _ => None,
        };

        let score = trust_computation::compute_trust_score(recommendation, graph.as_ref(), &self.trust);
        debug!(
            "Trust score for {} (viewer: {:?}): {}",
            recommendation.id,
            viewer.map(UserId::as_str),
            score
        );
        Ok(score)
    }

    /// Trust score of a stored recommendation; 0 when it cannot be read
    pub async fn trust_score_by_id(
        &self,
        id: RecommendationId,
        viewer: Option<&UserId>,
    ) -> Result<f64, EngineError> {
        if let Some(viewer) = viewer {
            require("viewer id", viewer.is_blank())?;
        }

        let found = blocking_read(&self.store, self.config.read_timeout(), move |s: &S| {
            s.get_recommendation(id)
        })
        .await;

        match or_default("recommendation", found) {
            Some(recommendation) => self.compute_trust_score(&recommendation, viewer).await,
            None => {
                debug!("Recommendation {} not found, trust score is 0", id);
                Ok(0.0)
            }
        }
    }

    /// Classified view of a restaurant's recommendations for `viewer`
    pub async fn classify(
        &self,
        restaurant: &RestaurantId,
        viewer: &UserId,
        mode: ClassificationMode,
    ) -> Result<Vec<ClassifiedRecommendation>, EngineError> {
        require("restaurant id", restaurant.is_blank())?;
        require("viewer id", viewer.is_blank())?;

        let strategy = mode.strategy();
        debug!("Classifying {} for {} ({} mode)", restaurant, viewer, mode.as_str());

        let (relationships, alignments, viewer_graph, recommendations) = tokio::join!(
            self.social.relationships(viewer),
            self.taste.alignments(viewer),
            self.social.viewer_graph(viewer),
            self.restaurant_recommendations(restaurant, Some(viewer)),
        );

        let no_profiles = HashMap::new();
        let input = ClassificationInput {
            viewer,
            recommendations: &recommendations,
            relationships: &relationships,
            alignments: &alignments,
            viewer_graph: &viewer_graph,
            credibility: &no_profiles,
            trust: &self.trust,
            thresholds: self.config.thresholds(),
        };

        let subjects = strategy.credibility_subjects(&input);
        let profiles = self.credibility_profiles(subjects).await;
        let input = ClassificationInput {
            credibility: &profiles,
            ..input
        };

        let classified = strategy.classify(&input);
        debug!(
            "Classified {} of {} recommendations for {}",
            classified.len(),
            recommendations.len(),
            restaurant
        );
        Ok(classified)
    }

    /// Ranked dish summaries, taste-filtered when a viewer is given
    pub async fn aggregate_dishes(
        &self,
        restaurant: &RestaurantId,
        viewer: Option<&UserId>,
    ) -> Result<Vec<DishSummary>, EngineError> {
        require("restaurant id", restaurant.is_blank())?;
        if let Some(viewer) = viewer {
            require("viewer id", viewer.is_blank())?;
        }

        let (recommendations, alignments) = match viewer {
            Some(viewer) => {
                tokio::join!(
                    self.restaurant_recommendations(restaurant, Some(viewer)),
                    self.taste.alignments(viewer),
                )
            }
            None => (
                self.restaurant_recommendations(restaurant, None).await,
                TasteAlignments::new(),
            ),
        };

        let dishes = palate_domain::dish::aggregate_dishes(
            &recommendations,
            viewer,
            &alignments,
            self.config.max_top_recommenders,
        );
        debug!("Aggregated {} dishes for {}", dishes.len(), restaurant);
        Ok(dishes)
    }

    /// Credibility profile of `user`; zeroed when the history cannot be read
    pub async fn build_credibility_profile(
        &self,
        user: &UserId,
    ) -> Result<CredibilityProfile, EngineError> {
        require("user id", user.is_blank())?;
        Ok(load_profile(
            Arc::clone(&self.store),
            user.clone(),
            self.config.read_timeout(),
            self.config.max_specialties,
        )
        .await)
    }

    async fn restaurant_recommendations(
        &self,
        restaurant: &RestaurantId,
        exclude: Option<&UserId>,
    ) -> Vec<Recommendation> {
        let restaurant = restaurant.clone();
        let exclude = exclude.cloned();
        or_default(
            "restaurant recommendations",
            blocking_read(&self.store, self.config.read_timeout(), move |s: &S| {
                s.list_for_restaurant(&restaurant, exclude.as_ref())
            })
            .await,
        )
    }

    /// Profiles for several authors, read concurrently
    async fn credibility_profiles(&self, users: Vec<UserId>) -> HashMap<UserId, CredibilityProfile> {
        let mut tasks = JoinSet::new();
        for user in users {
            let store = Arc::clone(&self.store);
            let limit = self.config.read_timeout();
            let max_specialties = self.config.max_specialties;
            tasks.spawn(async move {
                let profile = load_profile(store, user.clone(), limit, max_specialties).await;
                (user, profile)
            });
        }

        let mut profiles = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((user, profile)) => {
                    profiles.insert(user, profile);
                }
                Err(e) => warn!("Credibility task failed: {}", e),
            }
        }
        profiles
    }
}

async fn load_profile<S: RankingStore>(
    store: Arc<S>,
    user: UserId,
    limit: Option<Duration>,
    max_specialties: usize,
) -> CredibilityProfile {
    let subject = user.clone();
    let records = or_default(
        "authored recommendations",
        blocking_read(&store, limit, move |s: &S| s.list_authored(&subject)).await,
    );
    build_profile(&records, max_specialties)
}

fn require(what: &str, blank: bool) -> Result<(), EngineError> {
    if blank {
        return Err(EngineError::InvalidInput(format!("{} must not be blank", what)));
    }
    Ok(())
}
