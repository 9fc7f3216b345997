//! Social Graph Facade
//!
//! Read-only view of the follows graph. Every read degrades to an empty
//! result on failure.

use crate::reads::{blocking_read, or_default};
use palate_domain::traits::SocialGraphStore;
use palate_domain::{RelationshipSets, UserId, ViewerGraph};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Relationship reads for one viewer at a time
pub struct SocialGraphFacade<S> {
    store: Arc<S>,
    read_timeout: Option<Duration>,
}

impl<S> Clone for SocialGraphFacade<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            read_timeout: self.read_timeout,
        }
    }
}

impl<S> SocialGraphFacade<S>
where
    S: SocialGraphStore + Send + Sync + 'static,
{
    /// Create a facade over a shared store
    pub fn new(store: Arc<S>, read_timeout: Option<Duration>) -> Self {
        Self {
            store,
            read_timeout,
        }
    }

    /// Users `user` actively follows
    pub async fn following(&self, user: &UserId) -> HashSet<UserId> {
        let user = user.clone();
        or_default(
            "following",
            blocking_read(&self.store, self.read_timeout, move |s: &S| s.following(&user)).await,
        )
    }

    /// Users actively following `user`
    pub async fn followers(&self, user: &UserId) -> HashSet<UserId> {
        let user = user.clone();
        or_default(
            "followers",
            blocking_read(&self.store, self.read_timeout, move |s: &S| s.followers(&user)).await,
        )
    }

    /// Users in both directions
    pub async fn mutuals(&self, user: &UserId) -> HashSet<UserId> {
        self.relationships(user).await.mutuals().clone()
    }

    /// Following and followers read concurrently, mutuals derived in-process
    pub async fn relationships(&self, user: &UserId) -> RelationshipSets {
        let (following, followers) = tokio::join!(self.following(user), self.followers(user));
        RelationshipSets::new(following, followers)
    }

    /// Snapshot of the viewer's direct edges and shared-followee neighbours
    pub async fn viewer_graph(&self, viewer: &UserId) -> ViewerGraph {
        let outgoing_viewer = viewer.clone();
        let second_viewer = viewer.clone();
        let (outgoing, second_degree) = tokio::join!(
            blocking_read(&self.store, self.read_timeout, move |s: &S| {
                s.outgoing_connections(&outgoing_viewer)
            }),
            blocking_read(&self.store, self.read_timeout, move |s: &S| {
                s.second_degree(&second_viewer)
            }),
        );
        ViewerGraph::new(
            viewer.clone(),
            or_default("outgoing connections", outgoing),
            or_default("second degree", second_degree),
        )
    }
}
