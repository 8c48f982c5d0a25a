use async_trait::async_trait;
use loyalty_core::model::{RewardTier, TierId, TierRecord};

use super::rows::{NewTierRow, TierRow};
use super::{RemoteTableRepository, TIERS_TABLE, send};
use crate::repository::{StorageError, TierRepository};

async fn decode(response: reqwest::Response) -> Result<Vec<TierRow>, StorageError> {
    response
        .json::<Vec<TierRow>>()
        .await
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

#[async_trait]
impl TierRepository for RemoteTableRepository {
    async fn list_tiers(&self) -> Result<Vec<TierRecord>, StorageError> {
        let request = self
            .get(TIERS_TABLE)
            .query(&[("select", "*"), ("order", "threshold.asc,id.asc")]);
        let rows = decode(send(request).await?).await?;
        Ok(rows.into_iter().map(TierRow::into_record).collect())
    }

    async fn insert_tier(&self, tier: &RewardTier) -> Result<TierId, StorageError> {
        let request = self
            .post(TIERS_TABLE)
            .header("Prefer", "return=representation")
            .json(&[NewTierRow {
                threshold: tier.threshold,
                description: &tier.description,
            }]);
        let created = decode(send(request).await?).await?;
        created
            .into_iter()
            .next()
            .map(|row| TierId::new(row.id))
            .ok_or_else(|| StorageError::Serialization("insert returned no row".into()))
    }

    async fn upsert_tier(&self, record: &TierRecord) -> Result<(), StorageError> {
        let request = self
            .post(TIERS_TABLE)
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[TierRow::from_record(record)]);
        send(request).await?;
        Ok(())
    }

    async fn delete_tier(&self, id: TierId) -> Result<(), StorageError> {
        let request = self
            .delete(TIERS_TABLE)
            .query(&[("id", format!("eq.{}", id.value()))])
            .header("Prefer", "return=representation");
        let deleted = decode(send(request).await?).await?;
        if deleted.is_empty() {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_tiers(&self) -> Result<(), StorageError> {
        let request = self.delete(TIERS_TABLE).query(&[("id", "gte.0")]);
        send(request).await?;
        Ok(())
    }
}
