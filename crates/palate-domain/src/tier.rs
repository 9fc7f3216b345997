//! Tier module - visibility buckets of the tiered classification

/// Tier of a classified recommendation
///
/// - Trusted: someone the viewer follows, with a strong taste match
/// - TasteTwin: a stranger with a very strong taste match, shown anonymized
/// - Network: someone the viewer follows, with a weaker taste match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Tier 1
    Trusted,

    /// Tier 2 (author identity hidden)
    TasteTwin,

    /// Tier 3
    Network,
}

impl Tier {
    /// All tiers in display order
    pub const ALL: [Tier; 3] = [Tier::Trusted, Tier::TasteTwin, Tier::Network];

    /// Tier number (1, 2 or 3)
    pub fn number(&self) -> u8 {
        match self {
            Tier::Trusted => 1,
            Tier::TasteTwin => 2,
            Tier::Network => 3,
        }
    }

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Trusted => "trusted",
            Tier::TasteTwin => "taste_twin",
            Tier::Network => "network",
        }
    }

    /// Whether recommendations in this tier hide the author
    pub fn is_anonymized(&self) -> bool {
        matches!(self, Tier::TasteTwin)
    }

    /// Parse a tier from its name or number
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trusted" | "1" => Some(Tier::Trusted),
            "taste_twin" | "2" => Some(Tier::TasteTwin),
            "network" | "3" => Some(Tier::Network),
            _ => None,
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}
