//! Taste Alignment Facade

use crate::reads::{blocking_read, or_default};
use palate_domain::traits::TasteAlignmentStore;
use palate_domain::{TasteAlignments, UserId};
use std::sync::Arc;
use std::time::Duration;

/// Validated reads of the precomputed similarity matrix
///
/// Raw values are checked here: non-finite entries are dropped and the rest
/// clamped into [0, 1]. A failed read yields an empty mapping, so every
/// author is "unknown" rather than "known-zero".
pub struct TasteAlignmentFacade<S> {
    store: Arc<S>,
    read_timeout: Option<Duration>,
}

impl<S> Clone for TasteAlignmentFacade<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            read_timeout: self.read_timeout,
        }
    }
}

impl<S> TasteAlignmentFacade<S>
where
    S: TasteAlignmentStore + Send + Sync + 'static,
{
    /// Create a facade over a shared store
    pub fn new(store: Arc<S>, read_timeout: Option<Duration>) -> Self {
        Self {
            store,
            read_timeout,
        }
    }

    /// Alignments of `viewer` to every author with a computed signal
    pub async fn alignments(&self, viewer: &UserId) -> TasteAlignments {
        let viewer = viewer.clone();
        let raw = or_default(
            "taste alignments",
            blocking_read(&self.store, self.read_timeout, move |s: &S| s.alignments(&viewer)).await,
        );
        TasteAlignments::from_raw(raw)
    }
}
