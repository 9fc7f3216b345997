//! Palate Engine
//!
//! Request-scoped trust and ranking service over the Palate read stores.
//!
//! # Overview
//!
//! The engine answers four questions for the API layer:
//! - **Trust score**: how much a viewer should trust one recommendation
//! - **Classification**: a restaurant's recommendations, flagged (flat mode)
//!   or tiered and partly anonymized (tiered mode)
//! - **Dish ranking**: per-dish averages, optionally limited to authors with
//!   a known taste alignment to the viewer
//! - **Credibility**: a reputation snapshot built from a user's own history
//!
//! # Architecture
//!
//! Store traits are synchronous. Each read runs on the tokio blocking pool;
//! independent reads are joined before any computation starts. A failed or
//! timed-out read is logged and replaced by its default (empty set, empty
//! mapping, zeroed profile), so operations only fail on invalid input.
//!
//! # Usage
//!
//! ```no_run
//! use palate_domain::{ClassificationMode, RestaurantId, UserId};
//! use palate_engine::{telemetry, EngineConfig, RankingEngine};
//! use palate_store::SqliteStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     telemetry::init_tracing();
//!
//!     let config = EngineConfig::from_file("palate.toml")?;
//!     let engine = Arc::new(RankingEngine::new(SqliteStore::new("palate.db")?, config)?);
//!
//!     let restaurant = RestaurantId::new("r1");
//!     let viewer = UserId::new("ana");
//!     let tiered = engine.classify(&restaurant, &viewer, ClassificationMode::Tiered).await?;
//!     let dishes = engine.aggregate_dishes(&restaurant, Some(&viewer)).await?;
//!     println!("{} recommendations, {} dishes", tiered.len(), dishes.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod reads;
mod social;
mod taste;
pub mod telemetry;

#[cfg(test)]
mod mock;

pub use config::{EdgePolicy, EngineConfig};
pub use engine::{RankingEngine, RankingStore};
pub use error::EngineError;
pub use social::SocialGraphFacade;
pub use taste::TasteAlignmentFacade;
