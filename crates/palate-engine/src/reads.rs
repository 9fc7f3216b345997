//! Blocking store reads on the tokio blocking pool
//!
//! Every failure mode of a read (store error, panic, timeout) becomes
//! `EngineError::DataUnavailable`, and [`or_default`] turns that into the
//! read's documented default.

use crate::EngineError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Run `read` against the store on the blocking pool
pub(crate) async fn blocking_read<S, T, E, F>(
    store: &Arc<S>,
    limit: Option<Duration>,
    read: F,
) -> Result<T, EngineError>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
    E: fmt::Display,
    F: FnOnce(&S) -> Result<T, E> + Send + 'static,
{
    let store = Arc::clone(store);
    let task = tokio::task::spawn_blocking(move || read(&store).map_err(|e| e.to_string()));

    let joined = match limit {
        Some(limit) => timeout(limit, task).await.map_err(|_| {
            EngineError::DataUnavailable(format!("read timed out after {:?}", limit))
        })?,
        None => task.await,
    };

    joined
        .map_err(|e| EngineError::DataUnavailable(format!("Task join error: {}", e)))?
        .map_err(EngineError::DataUnavailable)
}

/// Unwrap a read, logging and substituting the default on failure
pub(crate) fn or_default<T: Default>(what: &str, result: Result<T, EngineError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{} degraded to default: {}", what, e);
            T::default()
        }
    }
}
