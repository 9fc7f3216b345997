//! Identifier types for users, restaurants and recommendations

use std::fmt;

/// Identifier of a platform user (viewer or author)
///
/// Users are owned by the account system; the engine only ever compares and
/// hashes these values, so any opaque string is accepted here. Blank values
/// are rejected at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw user identifier
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of a restaurant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Wrap a raw restaurant identifier
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Unique identifier for a recommendation based on UUIDv7
///
/// UUIDv7 gives chronological sortability, which keeps "newest first"
/// listings cheap for the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecommendationId(u128);

impl RecommendationId {
    /// Generate a new UUIDv7-based RecommendationId
    ///
    /// # Examples
    ///
    /// ```
    /// use palate_domain::RecommendationId;
    ///
    /// let id = RecommendationId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RecommendationId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a RecommendationId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use palate_domain::RecommendationId;
    ///
    /// let id = RecommendationId::new();
    /// let parsed = RecommendationId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid recommendation id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RecommendationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_ids() {
        assert!(UserId::new("").is_blank());
        assert!(UserId::new("  \t").is_blank());
        assert!(!UserId::new("u-1").is_blank());
        assert!(RestaurantId::new(" ").is_blank());
        assert!(!RestaurantId::new("r-1").is_blank());
    }

    #[test]
    fn test_recommendation_id_chronological() {
        let id1 = RecommendationId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = RecommendationId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should sort first");
    }

    #[test]
    fn test_recommendation_id_display_and_parse() {
        let id = RecommendationId::new();
        let id_str = id.to_string();
        assert_eq!(id_str.len(), 36);
        assert_eq!(RecommendationId::from_string(&id_str).unwrap(), id);
    }

    #[test]
    fn test_recommendation_id_invalid_string() {
        assert!(RecommendationId::from_string("not-a-uuid").is_err());
        assert!(RecommendationId::from_string("").is_err());
    }
}
