//! End-to-end tests: the ranking engine over a seeded SQLite store

use palate_domain::{
    AuthorView, ClassificationMode, Dish, Placement, Recommendation, RecommendationId,
    RestaurantId, SocialConnection, Tier, UserId,
};
use palate_engine::{telemetry, EngineConfig, RankingEngine};
use palate_store::SqliteStore;
use std::sync::Arc;

fn user(id: &str) -> UserId {
    UserId::new(id)
}

fn restaurant() -> RestaurantId {
    RestaurantId::new("casa-do-norte")
}

fn rec(n: u128, author: &str, base: f64, created_at: u64) -> Recommendation {
    Recommendation::new(
        RecommendationId::from_value(n),
        user(author),
        author,
        restaurant(),
        base,
        created_at,
    )
}

/// Seeds the store shared by every scenario
///
/// - ana and bia follow each other; ana also follows dani
/// - caio and edu are strangers to ana
/// - every author has recommended the same restaurant
fn seeded_store() -> SqliteStore {
    let store = SqliteStore::new(":memory:").unwrap();

    for (id, name) in [
        ("ana", "Ana"),
        ("bia", "Bia"),
        ("caio", "Caio"),
        ("dani", "Dani"),
        ("edu", "Edu"),
    ] {
        store.add_user(&user(id), name).unwrap();
    }
    store
        .add_restaurant(&restaurant(), "Casa do Norte", Some("Brazilian"))
        .unwrap();

    for (follower, following) in [("ana", "bia"), ("bia", "ana"), ("ana", "dani")] {
        store
            .add_connection(&SocialConnection::follow(user(follower), user(following), 1))
            .unwrap();
    }

    for (other, similarity) in [("bia", 0.82), ("caio", 0.95), ("dani", 0.4), ("edu", 0.85)] {
        store.set_alignment(&user("ana"), &user(other), similarity).unwrap();
    }

    let recommendations = [
        rec(1, "bia", 0.8, 100).with_dish(Dish::new("Feijoada", 8.0)),
        rec(2, "caio", 0.6, 400).with_dish(Dish::new("Feijoada", 9.0)),
        rec(3, "dani", 0.5, 300).with_dish(Dish::new("Feijoada", 7.0)),
        rec(4, "edu", 0.7, 200)
            .with_dish(Dish::new("Feijoada", 10.0))
            .with_dish(Dish::unrated("Farofa")),
        rec(5, "ana", 0.9, 500).with_dish(Dish::new("Feijoada", 1.0)),
    ];
    for r in &recommendations {
        store.insert_recommendation(r).unwrap();
    }

    store
}

fn engine() -> RankingEngine<SqliteStore> {
    telemetry::init_tracing();
    RankingEngine::new(seeded_store(), EngineConfig::default()).unwrap()
}

#[tokio::test]
async fn test_direct_connection_weighting() {
    let engine = engine();
    let recommendation = rec(99, "bia", 0.2, 0);

    let score = engine
        .compute_trust_score(&recommendation, Some(&user("ana")))
        .await
        .unwrap();
    assert_eq!(score, 0.15);
}

#[tokio::test]
async fn test_trust_score_for_stored_recommendation() {
    let engine = engine();

    // dani follows nobody, so ana's recommendation is unweighted for dani
    let score = engine
        .trust_score_by_id(RecommendationId::from_value(5), Some(&user("dani")))
        .await
        .unwrap();
    assert_eq!(score, 0.9);

    // edu follows nobody ana follows, so no discount applies
    let score = engine
        .trust_score_by_id(RecommendationId::from_value(4), Some(&user("ana")))
        .await
        .unwrap();
    assert_eq!(score, 0.7);

    let missing = engine
        .trust_score_by_id(RecommendationId::from_value(404), Some(&user("ana")))
        .await
        .unwrap();
    assert_eq!(missing, 0.0);
}

#[tokio::test]
async fn test_flat_mode_in_network_before_alignment() {
    let engine = engine();
    let view = engine
        .classify(&restaurant(), &user("ana"), ClassificationMode::Flat)
        .await
        .unwrap();

    let authors: Vec<&str> = view
        .iter()
        .filter_map(|c| c.author.id().map(UserId::as_str))
        .collect();
    assert_eq!(authors, vec!["bia", "dani", "caio", "edu"]);
    assert!(view.iter().all(|c| c.author.id() != Some(&user("ana"))));

    // Display names come from the users table
    match &view[0].author {
        AuthorView::Identified { display_name, .. } => assert_eq!(display_name, "Bia"),
        other => panic!("expected identified author, got {:?}", other),
    }

    // bia is a direct connection: 0.8 * 0.75
    assert_eq!(view[0].trust_score, 0.6);
    assert_eq!(view[0].base_trust_score, 0.8);
}

#[tokio::test]
async fn test_tiered_mode_hides_taste_twins() {
    let engine = engine();
    let view = engine
        .classify(&restaurant(), &user("ana"), ClassificationMode::Tiered)
        .await
        .unwrap();

    let tiers: Vec<Tier> = view.iter().filter_map(|c| c.tier()).collect();
    assert_eq!(
        tiers,
        vec![Tier::Trusted, Tier::TasteTwin, Tier::TasteTwin, Tier::Network]
    );

    // Strangers sorted by match: caio (95%) before edu (85%)
    let edu = &view[2];
    match &edu.author {
        AuthorView::Anonymous {
            label,
            taste_match_percent,
            credibility,
        } => {
            assert!(label.contains("85%"));
            assert_eq!(*taste_match_percent, 85);
            assert_eq!(credibility.total_recommendations, 1);
            assert_eq!(credibility.specialties, vec!["Brazilian"]);
        }
        other => panic!("expected anonymous author, got {:?}", other),
    }
    assert_eq!(
        edu.placement,
        Placement::Tiered {
            tier: Tier::TasteTwin,
            taste_match_percent: 85
        }
    );

    // Neither stranger's identity leaks into the output
    let rendered = format!("{:?}", view);
    assert!(!rendered.contains("edu"));
    assert!(!rendered.contains("caio"));
}

#[tokio::test]
async fn test_dish_ranking_with_and_without_viewer() {
    let engine = engine();

    let everyone = engine.aggregate_dishes(&restaurant(), None).await.unwrap();
    assert_eq!(everyone.len(), 1);
    assert_eq!(everyone[0].name, "Feijoada");
    assert_eq!(everyone[0].recommendation_count, 5);

    let for_ana = engine
        .aggregate_dishes(&restaurant(), Some(&user("ana")))
        .await
        .unwrap();
    assert_eq!(for_ana.len(), 1);
    let feijoada = &for_ana[0];
    assert_eq!(feijoada.avg_rating, 8.5);
    assert_eq!(feijoada.recommendation_count, 4);
    assert_eq!(feijoada.top_recommenders, vec!["Caio", "Dani", "Edu", "1 other"]);
}

#[tokio::test]
async fn test_credibility_profile_from_history() {
    let engine = engine();

    let profile = engine.build_credibility_profile(&user("bia")).await.unwrap();
    assert_eq!(profile.total_recommendations, 1);
    assert_eq!(profile.avg_trust_score, 0.8);
    assert_eq!(profile.specialties, vec!["Brazilian"]);

    let unknown = engine.build_credibility_profile(&user("zeca")).await.unwrap();
    assert_eq!(unknown.total_recommendations, 0);
    assert!(unknown.specialties.is_empty());
}

#[tokio::test]
async fn test_engine_shared_through_arc() {
    let store = Arc::new(seeded_store());
    let engine = RankingEngine::with_shared_store(Arc::clone(&store), EngineConfig::legacy()).unwrap();

    let mutuals = engine.social().mutuals(&user("ana")).await;
    assert_eq!(mutuals.len(), 1);
    assert!(mutuals.contains(&user("bia")));

    let alignments = engine.taste().alignments(&user("ana")).await;
    assert_eq!(alignments.len(), 4);

    // Writes through the shared handle are visible to later reads
    store.set_alignment(&user("ana"), &user("zeca"), 0.5).unwrap();
    assert_eq!(engine.taste().alignments(&user("ana")).await.len(), 5);
}
