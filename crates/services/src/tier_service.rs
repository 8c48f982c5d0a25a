use std::sync::Arc;

use loyalty_core::model::{RewardTier, TierId, TierRecord};
use storage::repository::{StorageError, TierRepository};
use tracing::{info, warn};

use crate::error::TierServiceError;

/// Description given to tiers added without one.
pub const PLACEHOLDER_DESCRIPTION: &str = "Nuevo beneficio";

/// Administrative operations over the reward tier configuration.
#[derive(Clone)]
pub struct TierService {
    tiers: Arc<dyn TierRepository>,
}

impl TierService {
    #[must_use]
    pub fn new(tiers: Arc<dyn TierRepository>) -> Self {
        Self { tiers }
    }

    /// Configured tiers in ascending threshold order.
    ///
    /// # Errors
    ///
    /// Returns `TierServiceError::Storage` if repository access fails.
    pub async fn list(&self) -> Result<Vec<TierRecord>, TierServiceError> {
        Ok(self.tiers.list_tiers().await?)
    }

    /// Configured tiers without their storage ids.
    ///
    /// # Errors
    ///
    /// Returns `TierServiceError::Storage` if repository access fails.
    pub async fn reward_tiers(&self) -> Result<Vec<RewardTier>, TierServiceError> {
        Ok(self.list().await?.into_iter().map(|r| r.tier).collect())
    }

    /// Add a tier.
    ///
    /// # Errors
    ///
    /// Returns `TierServiceError::Storage` if persistence fails.
    pub async fn add(
        &self,
        threshold: u64,
        description: impl Into<String>,
    ) -> Result<TierRecord, TierServiceError> {
        let tier = RewardTier::new(threshold, description);
        let id = self.tiers.insert_tier(&tier).await?;
        info!(tier = %id, threshold, "tier added");
        self.warn_on_duplicate(threshold).await?;
        Ok(TierRecord::new(id, tier))
    }

    /// Add a zero-threshold tier for the admin to fill in.
    ///
    /// # Errors
    ///
    /// Returns `TierServiceError::Storage` if persistence fails.
    pub async fn add_placeholder(&self) -> Result<TierRecord, TierServiceError> {
        self.add(0, PLACEHOLDER_DESCRIPTION).await
    }

    /// Replace threshold and description of an existing tier.
    ///
    /// # Errors
    ///
    /// Returns `TierServiceError::Storage` with `NotFound` if the tier is missing.
    pub async fn update(
        &self,
        id: TierId,
        threshold: u64,
        description: impl Into<String>,
    ) -> Result<TierRecord, TierServiceError> {
        if !self.list().await?.iter().any(|r| r.id == id) {
            return Err(StorageError::NotFound.into());
        }
        let record = TierRecord::new(id, RewardTier::new(threshold, description));
        self.tiers.upsert_tier(&record).await?;
        info!(tier = %id, threshold, "tier updated");
        self.warn_on_duplicate(threshold).await?;
        Ok(record)
    }

    /// Delete a tier.
    ///
    /// # Errors
    ///
    /// Returns `TierServiceError::Storage` with `NotFound` if the tier is missing.
    pub async fn remove(&self, id: TierId) -> Result<(), TierServiceError> {
        self.tiers.delete_tier(id).await?;
        info!(tier = %id, "tier removed");
        Ok(())
    }

    // Duplicates are allowed; ranking keeps them in id order.
    async fn warn_on_duplicate(&self, threshold: u64) -> Result<(), TierServiceError> {
        let count = self
            .list()
            .await?
            .iter()
            .filter(|r| r.tier.threshold == threshold)
            .count();
        if count > 1 {
            warn!(threshold, count, "several tiers share a threshold");
        }
        Ok(())
    }
}

/// Thresholds configured on more than one tier, ascending.
#[must_use]
pub fn duplicate_thresholds(records: &[TierRecord]) -> Vec<u64> {
    let mut thresholds: Vec<u64> = records.iter().map(|r| r.tier.threshold).collect();
    thresholds.sort_unstable();
    let mut dups: Vec<u64> = thresholds
        .windows(2)
        .filter(|w| w[0] == w[1])
        .map(|w| w[0])
        .collect();
    dups.dedup();
    dups
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::InMemoryRepository;

    fn service() -> TierService {
        TierService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn list_is_sorted_by_threshold() {
        let service = service();
        service.add(30_000_000, "Envío gratis").await.unwrap();
        service.add(10_000_000, "2% OFF").await.unwrap();
        service.add_placeholder().await.unwrap();

        let thresholds: Vec<u64> = service
            .reward_tiers()
            .await
            .unwrap()
            .iter()
            .map(|t| t.threshold)
            .collect();
        assert_eq!(thresholds, vec![0, 10_000_000, 30_000_000]);

        let first = &service.list().await.unwrap()[0];
        assert_eq!(first.tier.description, PLACEHOLDER_DESCRIPTION);
    }

    #[tokio::test]
    async fn update_moves_tier_in_order() {
        let service = service();
        let low = service.add(10, "low").await.unwrap();
        service.add(20, "high").await.unwrap();

        service.update(low.id, 30, "now highest").await.unwrap();
        let listed = service.list().await.unwrap();
        assert_eq!(listed.last().unwrap().id, low.id);
        assert_eq!(listed.last().unwrap().tier.description, "now highest");
    }

    #[tokio::test]
    async fn update_and_remove_unknown_tier_fail() {
        let service = service();
        let err = service.update(TierId::new(42), 1, "x").await.unwrap_err();
        assert!(matches!(
            err,
            TierServiceError::Storage(StorageError::NotFound)
        ));
        assert!(service.remove(TierId::new(42)).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_thresholds_are_kept() {
        let service = service();
        service.add(100, "a").await.unwrap();
        service.add(100, "b").await.unwrap();
        service.add(200, "c").await.unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(duplicate_thresholds(&listed), vec![100]);
    }
}
