//! Palate Storage Layer
//!
//! Implements the read traits of palate-domain on top of SQLite.
//!
//! # Architecture
//!
//! - One SQLite connection guarded by a mutex, so the store can be shared
//!   across the engine's blocking read tasks
//! - Loosely typed rows are validated into domain types here, before they
//!   reach the engine (counters floored at zero, weights clamped to [0, 1])
//! - Inherent write helpers for seeding; the engine itself never writes
//!
//! # Examples
//!
//! ```no_run
//! use palate_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for reads
//! ```

#![warn(missing_docs)]

use palate_domain::traits::{
    CredibilityStore, RecommendationStore, SocialGraphStore, TasteAlignmentStore,
};
use palate_domain::{
    AuthoredRecord, ConnectionKind, Dish, Recommendation, RecommendationId, RestaurantId,
    SocialConnection, UserId,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Duplicate recommendation id
    #[error("Duplicate recommendation: {0}")]
    Duplicate(RecommendationId),

    /// A thread panicked while holding the connection
    #[error("Connection lock poisoned")]
    LockPoisoned,
}

const RECOMMENDATION_COLUMNS: &str =
    "r.id, r.author_id, COALESCE(u.display_name, r.author_id), r.restaurant_id,
     r.trust_score, r.upvotes, r.saves, r.created_at";

/// SQLite-based implementation of the Palate read traits
///
/// # Thread Safety
///
/// The connection sits behind a mutex; concurrent readers serialize on it.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Convert RecommendationId to bytes for storage
    fn id_to_bytes(id: RecommendationId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to RecommendationId
    fn bytes_to_id(bytes: &[u8]) -> Result<RecommendationId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!(
                "Expected 16 bytes for RecommendationId, got {}",
                bytes.len()
            ))
        })?;
        Ok(RecommendationId::from_value(u128::from_be_bytes(arr)))
    }

    fn blob_to_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<RecommendationId> {
        let bytes: Vec<u8> = row.get(idx)?;
        Self::bytes_to_id(&bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Blob, Box::new(e))
        })
    }

    /// Map a row selected with `RECOMMENDATION_COLUMNS` (dishes filled in later)
    fn row_to_recommendation(row: &Row<'_>) -> rusqlite::Result<Recommendation> {
        let counter = |v: i64| v.clamp(0, u32::MAX as i64) as u32;
        Ok(Recommendation {
            id: Self::blob_to_id(row, 0)?,
            author_id: UserId::new(row.get::<_, String>(1)?),
            author_name: row.get(2)?,
            restaurant_id: RestaurantId::new(row.get::<_, String>(3)?),
            base_trust_score: row.get(4)?,
            upvotes: counter(row.get(5)?),
            saves: counter(row.get(6)?),
            created_at: row.get::<_, i64>(7)?.max(0) as u64,
            dishes: Vec::new(),
        })
    }

    /// Load dishes for the given recommendations, keyed by id, in position order
    fn load_dishes(
        conn: &Connection,
        ids: &[RecommendationId],
    ) -> Result<HashMap<RecommendationId, Vec<Dish>>, StoreError> {
        let mut dishes: HashMap<RecommendationId, Vec<Dish>> = HashMap::new();
        let mut stmt = conn.prepare(
            "SELECT name, rating FROM recommendation_dishes
             WHERE recommendation_id = ?1 ORDER BY position",
        )?;
        for id in ids {
            let rows = stmt
                .query_map(params![Self::id_to_bytes(*id)], |row| {
                    Ok(Dish {
                        name: row.get(0)?,
                        rating: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            dishes.insert(*id, rows);
        }
        Ok(dishes)
    }

    fn attach_dishes(
        conn: &Connection,
        mut recommendations: Vec<Recommendation>,
    ) -> Result<Vec<Recommendation>, StoreError> {
        let ids: Vec<RecommendationId> = recommendations.iter().map(|r| r.id).collect();
        let mut dishes = Self::load_dishes(conn, &ids)?;
        for rec in &mut recommendations {
            rec.dishes = dishes.remove(&rec.id).unwrap_or_default();
        }
        Ok(recommendations)
    }

    fn user_set(conn: &Connection, sql: &str, user: &UserId) -> Result<HashSet<UserId>, StoreError> {
        let mut stmt = conn.prepare(sql)?;
        let users = stmt
            .query_map(params![user.as_str()], |row| row.get::<_, String>(0))?
            .map(|r| r.map(UserId::new))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(users)
    }

    /// Insert or rename a user
    pub fn add_user(&self, id: &UserId, display_name: &str) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO users (id, display_name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name",
            params![id.as_str(), display_name],
        )?;
        Ok(())
    }

    /// Insert or update a restaurant
    pub fn add_restaurant(
        &self,
        id: &RestaurantId,
        name: &str,
        category: Option<&str>,
    ) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO restaurants (id, name, category) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, category = excluded.category",
            params![id.as_str(), name, category],
        )?;
        Ok(())
    }

    /// Append a connection row (duplicates per pair are kept)
    pub fn add_connection(&self, connection: &SocialConnection) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO social_connections (follower_id, following_id, active, weight, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                connection.follower_id.as_str(),
                connection.following_id.as_str(),
                connection.active,
                connection.weight,
                connection.kind.as_str(),
                connection.created_at as i64,
            ],
        )?;
        Ok(())
    }

    /// Set the similarity of `viewer` to `other`
    pub fn set_alignment(&self, viewer: &UserId, other: &UserId, similarity: f64) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO taste_alignments (viewer_id, other_user_id, similarity) VALUES (?1, ?2, ?3)
             ON CONFLICT(viewer_id, other_user_id) DO UPDATE SET similarity = excluded.similarity",
            params![viewer.as_str(), other.as_str(), similarity],
        )?;
        Ok(())
    }

    /// Insert a recommendation and its dishes atomically
    pub fn insert_recommendation(&self, recommendation: &Recommendation) -> Result<RecommendationId, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let id_bytes = Self::id_to_bytes(recommendation.id);

        let exists = tx
            .query_row(
                "SELECT 1 FROM recommendations WHERE id = ?1",
                params![&id_bytes],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Duplicate(recommendation.id));
        }

        tx.execute(
            "INSERT INTO recommendations (id, author_id, restaurant_id, trust_score, upvotes, saves, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &id_bytes,
                recommendation.author_id.as_str(),
                recommendation.restaurant_id.as_str(),
                recommendation.base_trust_score,
                recommendation.upvotes,
                recommendation.saves,
                recommendation.created_at as i64,
            ],
        )?;

        for (position, dish) in recommendation.dishes.iter().enumerate() {
            tx.execute(
                "INSERT INTO recommendation_dishes (recommendation_id, position, name, rating)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&id_bytes, position as i64, &dish.name, dish.rating],
            )?;
        }

        tx.commit()?;
        Ok(recommendation.id)
    }
}

impl SocialGraphStore for SqliteStore {
    type Error = StoreError;

    fn following(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error> {
        let conn = self.conn()?;
        Self::user_set(
            &conn,
            "SELECT DISTINCT following_id FROM social_connections
             WHERE follower_id = ?1 AND active = 1",
            user,
        )
    }

    fn followers(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error> {
        let conn = self.conn()?;
        Self::user_set(
            &conn,
            "SELECT DISTINCT follower_id FROM social_connections
             WHERE following_id = ?1 AND active = 1",
            user,
        )
    }

    fn outgoing_connections(&self, user: &UserId) -> Result<Vec<SocialConnection>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT follower_id, following_id, active, weight, kind, created_at
             FROM social_connections WHERE follower_id = ?1
             ORDER BY created_at, id",
        )?;
        let connections = stmt
            .query_map(params![user.as_str()], |row| {
                let weight: Option<f64> = row.get(3)?;
                let kind: String = row.get(4)?;
                Ok(SocialConnection {
                    follower_id: UserId::new(row.get::<_, String>(0)?),
                    following_id: UserId::new(row.get::<_, String>(1)?),
                    active: row.get(2)?,
                    weight: weight.filter(|w| w.is_finite()).map(|w| w.clamp(0.0, 1.0)),
                    kind: ConnectionKind::parse_lenient(&kind),
                    created_at: row.get::<_, i64>(5)?.max(0) as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(connections)
    }

    fn second_degree(&self, user: &UserId) -> Result<HashSet<UserId>, Self::Error> {
        let conn = self.conn()?;
        Self::user_set(
            &conn,
            "SELECT DISTINCT hop.follower_id
             FROM social_connections first
             JOIN social_connections hop ON hop.following_id = first.following_id
             WHERE first.follower_id = ?1 AND first.active = 1 AND hop.active = 1
               AND hop.follower_id != ?1",
            user,
        )
    }
}

impl TasteAlignmentStore for SqliteStore {
    type Error = StoreError;

    fn alignments(&self, viewer: &UserId) -> Result<HashMap<UserId, f64>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT other_user_id, similarity FROM taste_alignments WHERE viewer_id = ?1",
        )?;
        let alignments = stmt
            .query_map(params![viewer.as_str()], |row| {
                Ok((UserId::new(row.get::<_, String>(0)?), row.get::<_, f64>(1)?))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(alignments)
    }
}

impl RecommendationStore for SqliteStore {
    type Error = StoreError;

    fn list_for_restaurant(
        &self,
        restaurant: &RestaurantId,
        exclude_author: Option<&UserId>,
    ) -> Result<Vec<Recommendation>, Self::Error> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM recommendations r
             LEFT JOIN users u ON u.id = r.author_id
             WHERE r.restaurant_id = ?1 AND (?2 IS NULL OR r.author_id != ?2)
             ORDER BY r.created_at DESC, r.id DESC",
            RECOMMENDATION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let recommendations = stmt
            .query_map(
                params![restaurant.as_str(), exclude_author.map(UserId::as_str)],
                Self::row_to_recommendation,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Self::attach_dishes(&conn, recommendations)
    }

    fn get_recommendation(&self, id: RecommendationId) -> Result<Option<Recommendation>, Self::Error> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM recommendations r
             LEFT JOIN users u ON u.id = r.author_id
             WHERE r.id = ?1",
            RECOMMENDATION_COLUMNS
        );
        let found = conn
            .query_row(&sql, params![Self::id_to_bytes(id)], Self::row_to_recommendation)
            .optional()?;
        match found {
            Some(rec) => Ok(Self::attach_dishes(&conn, vec![rec])?.pop()),
            None => Ok(None),
        }
    }
}

impl CredibilityStore for SqliteStore {
    type Error = StoreError;

    fn list_authored(&self, user: &UserId) -> Result<Vec<AuthoredRecord>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT r.trust_score, rest.category
             FROM recommendations r
             LEFT JOIN restaurants rest ON rest.id = r.restaurant_id
             WHERE r.author_id = ?1
             ORDER BY r.created_at DESC, r.id DESC",
        )?;
        let records = stmt
            .query_map(params![user.as_str()], |row| {
                Ok(AuthoredRecord {
                    trust_score: row.get(0)?,
                    category: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
