//! Configuration for the ranking engine
//!
//! Trust formula constants, tier thresholds, display limits and the per-read
//! timeout.

use crate::EngineError;
use palate_domain::classification::{FRIEND_MIN_MATCH_PERCENT, STRANGER_MIN_MATCH_PERCENT};
use palate_domain::credibility::MAX_SPECIALTIES;
use palate_domain::dish::MAX_TOP_RECOMMENDERS;
use palate_domain::trust_computation::{
    DEFAULT_CONNECTION_WEIGHT, FRIEND_OF_FRIEND_MULTIPLIER, MAX_ENGAGEMENT_BOOST, SAVE_BOOST,
    UPVOTE_BOOST,
};
use palate_domain::{DuplicateEdgePolicy, TierThresholds, TrustConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which row wins when a viewer has several active edges to one author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// First active row in storage order
    First,
    /// Highest weight among active rows
    #[default]
    MaxWeight,
}

impl From<EdgePolicy> for DuplicateEdgePolicy {
    fn from(policy: EdgePolicy) -> Self {
        match policy {
            EdgePolicy::First => DuplicateEdgePolicy::First,
            EdgePolicy::MaxWeight => DuplicateEdgePolicy::MaxWeight,
        }
    }
}

/// Configuration for the ranking engine
///
/// # Examples
///
/// ```
/// use palate_engine::{EdgePolicy, EngineConfig};
///
/// let config = EngineConfig::default();
/// assert_eq!(config.duplicate_edge_policy, EdgePolicy::MaxWeight);
/// assert_eq!(config.read_timeout_ms, 2000);
///
/// // First-row resolution, no read timeout
/// let config = EngineConfig::legacy();
/// assert_eq!(config.duplicate_edge_policy, EdgePolicy::First);
/// assert!(config.read_timeout().is_none());
/// ```
///
/// Every field may be omitted from TOML:
///
/// ```toml
/// default_connection_weight = 0.75
/// friend_of_friend_multiplier = 0.25
/// upvote_boost = 0.1
/// save_boost = 0.05
/// max_engagement_boost = 0.2
/// duplicate_edge_policy = "max_weight"
/// friend_min_match_percent = 70
/// stranger_min_match_percent = 80
/// max_top_recommenders = 3
/// max_specialties = 3
/// read_timeout_ms = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier for a direct edge without a stored weight
    pub default_connection_weight: f64,

    /// Multiplier when viewer and author only share a followee
    pub friend_of_friend_multiplier: f64,

    /// Trust added per upvote
    pub upvote_boost: f64,

    /// Trust added per save
    pub save_boost: f64,

    /// Cap on the total engagement boost
    pub max_engagement_boost: f64,

    /// Resolution of duplicate direct edges
    pub duplicate_edge_policy: EdgePolicy,

    /// Tiered mode: minimum match for followed authors to reach Tier 1
    pub friend_min_match_percent: u32,

    /// Tiered mode: minimum match for strangers to reach Tier 2
    pub stranger_min_match_percent: u32,

    /// Names listed per dish before the "N others" entry
    pub max_top_recommenders: usize,

    /// Categories kept in a credibility profile
    pub max_specialties: usize,

    /// Per-read timeout in milliseconds; 0 disables it
    pub read_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_connection_weight: DEFAULT_CONNECTION_WEIGHT,
            friend_of_friend_multiplier: FRIEND_OF_FRIEND_MULTIPLIER,
            upvote_boost: UPVOTE_BOOST,
            save_boost: SAVE_BOOST,
            max_engagement_boost: MAX_ENGAGEMENT_BOOST,
            duplicate_edge_policy: EdgePolicy::MaxWeight,
            friend_min_match_percent: FRIEND_MIN_MATCH_PERCENT,
            stranger_min_match_percent: STRANGER_MIN_MATCH_PERCENT,
            max_top_recommenders: MAX_TOP_RECOMMENDERS,
            max_specialties: MAX_SPECIALTIES,
            read_timeout_ms: 2000,
        }
    }
}

impl EngineConfig {
    /// Legacy behavior: first active edge wins, reads never time out
    pub fn legacy() -> Self {
        Self {
            duplicate_edge_policy: EdgePolicy::First,
            read_timeout_ms: 0,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load configuration from a TOML string and validate it
    pub fn from_toml_str(toml_str: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = toml::from_str(toml_str)
            .map_err(|e| EngineError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Reject values outside their meaningful range
    pub fn validate(&self) -> Result<(), EngineError> {
        let unit = [
            ("default_connection_weight", self.default_connection_weight),
            ("friend_of_friend_multiplier", self.friend_of_friend_multiplier),
            ("upvote_boost", self.upvote_boost),
            ("save_boost", self.save_boost),
            ("max_engagement_boost", self.max_engagement_boost),
        ];
        for (name, value) in unit {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(EngineError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("friend_min_match_percent", self.friend_min_match_percent),
            ("stranger_min_match_percent", self.stranger_min_match_percent),
        ] {
            if value > 100 {
                return Err(EngineError::Config(format!(
                    "{} must be at most 100, got {}",
                    name, value
                )));
            }
        }

        if self.max_top_recommenders == 0 {
            return Err(EngineError::Config(
                "max_top_recommenders must be at least 1".to_string(),
            ));
        }
        if self.max_specialties == 0 {
            return Err(EngineError::Config(
                "max_specialties must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Trust formula settings for the domain calculator
    pub fn trust_config(&self) -> TrustConfig {
        TrustConfig {
            default_connection_weight: self.default_connection_weight,
            friend_of_friend_multiplier: self.friend_of_friend_multiplier,
            upvote_boost: self.upvote_boost,
            save_boost: self.save_boost,
            max_engagement_boost: self.max_engagement_boost,
            duplicate_policy: self.duplicate_edge_policy.into(),
        }
    }

    /// Tier thresholds for the tiered strategy
    pub fn thresholds(&self) -> TierThresholds {
        TierThresholds {
            friend_min_percent: self.friend_min_match_percent,
            stranger_min_percent: self.stranger_min_match_percent,
        }
    }

    /// Per-read timeout, if enabled
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trust_config(), TrustConfig::default());
        assert_eq!(config.thresholds(), TierThresholds::default());
        assert_eq!(config.max_top_recommenders, 3);
        assert_eq!(config.max_specialties, 3);
        assert_eq!(config.read_timeout(), Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_legacy_config() {
        let config = EngineConfig::legacy();
        assert!(config.validate().is_ok());
        assert_eq!(config.trust_config().duplicate_policy, DuplicateEdgePolicy::First);
        assert_eq!(config.read_timeout(), None);
        assert_eq!(config.upvote_boost, EngineConfig::default().upvote_boost);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            duplicate_edge_policy = "first"
            stranger_min_match_percent = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.duplicate_edge_policy, EdgePolicy::First);
        assert_eq!(config.thresholds().stranger_min_percent, 90);
        assert_eq!(config.thresholds().friend_min_percent, 70);
        assert_eq!(config.default_connection_weight, 0.75);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = EngineConfig::from_toml_str("duplicate_edge_policy = \"newest\"");
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = EngineConfig {
            default_connection_weight: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));

        let config = EngineConfig {
            save_boost: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            friend_min_match_percent: 101,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            max_top_recommenders: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig::legacy();
        let serialized = config.to_toml().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&serialized).unwrap(), config);
    }

    #[test]
    fn test_serde_json_roundtrip() {
        let config = EngineConfig::default();
        let serialized = serde_json::to_string(&config).unwrap();
        assert!(serialized.contains("\"max_weight\""));
        let deserialized: EngineConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "read_timeout_ms = 250").unwrap();
        writeln!(file, "max_specialties = 5").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.read_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.max_specialties, 5);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
