//! Reward progress: where a customer's spend sits on the tier ladder.
//!
//! `rank` is pure and total over `u64` inputs. Callers may invoke it on every
//! request without coordination; it never mutates its inputs.

use serde::Serialize;

use crate::model::RewardTier;

/// Achievement state of a single tier for a given spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierStatus {
    pub tier: RewardTier,
    pub achieved: bool,
}

/// Result of ranking a spend against a tier list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardProgress {
    /// Progress toward `next_tier`, in `[0, 100]`.
    pub progress_percent: u8,
    /// Lowest tier whose threshold is strictly above the spend.
    pub next_tier: Option<RewardTier>,
    /// Amount still missing for `next_tier`; 0 when every tier is attained.
    pub remaining: u64,
    /// Every tier in ascending threshold order.
    pub tier_statuses: Vec<TierStatus>,
}

impl RewardProgress {
    #[must_use]
    pub fn achieved_count(&self) -> usize {
        self.tier_statuses.iter().filter(|s| s.achieved).count()
    }

    /// True when no pending tier is left (vacuously true for an empty tier list).
    #[must_use]
    pub fn all_attained(&self) -> bool {
        self.next_tier.is_none()
    }
}

/// Ranks `spend` against `tiers`.
///
/// Tiers are sorted ascending by threshold with a stable sort, so equal
/// thresholds keep their input order. Progress is measured from the highest
/// threshold at or below `spend` (0 if none) to the next pending threshold,
/// rounded half-up.
#[must_use]
pub fn rank(spend: u64, tiers: &[RewardTier]) -> RewardProgress {
    let mut sorted = tiers.to_vec();
    sorted.sort_by_key(|tier| tier.threshold);

    // Sorted thresholds split into an achieved prefix and a pending suffix.
    let split = sorted.partition_point(|tier| tier.is_achieved_by(spend));
    let prev_threshold = split
        .checked_sub(1)
        .map_or(0, |idx| sorted[idx].threshold);
    let next_tier = sorted.get(split).cloned();

    let (progress_percent, remaining) = match &next_tier {
        None => (100, 0),
        Some(next) => (
            step_percent(spend, prev_threshold, next.threshold),
            next.threshold.saturating_sub(spend),
        ),
    };

    let tier_statuses = sorted
        .into_iter()
        .map(|tier| TierStatus {
            achieved: tier.is_achieved_by(spend),
            tier,
        })
        .collect();

    RewardProgress {
        progress_percent,
        next_tier,
        remaining,
        tier_statuses,
    }
}

fn step_percent(spend: u64, prev_threshold: u64, next_threshold: u64) -> u8 {
    let range = u128::from(next_threshold.saturating_sub(prev_threshold));
    if range == 0 {
        return 100;
    }
    let within = u128::from(spend.saturating_sub(prev_threshold));
    let rounded = (within * 200 + range) / (range * 2);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
