use serde::{Deserialize, Serialize};

use crate::model::ids::TierId;

/// A spend threshold paired with the reward it unlocks.
///
/// Accepted as-is: a zero threshold or empty description is the admin's call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RewardTier {
    pub threshold: u64,
    pub description: String,
}

impl RewardTier {
    #[must_use]
    pub fn new(threshold: u64, description: impl Into<String>) -> Self {
        Self {
            threshold,
            description: description.into(),
        }
    }

    /// True when `spend` meets or exceeds the threshold.
    #[must_use]
    pub fn is_achieved_by(&self, spend: u64) -> bool {
        spend >= self.threshold
    }
}

/// A reward tier as configured by the administrator, with its storage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRecord {
    pub id: TierId,
    pub tier: RewardTier,
}

impl TierRecord {
    #[must_use]
    pub fn new(id: TierId, tier: RewardTier) -> Self {
        Self { id, tier }
    }
}
