use async_trait::async_trait;
use loyalty_core::model::{RewardTier, TierId, TierRecord};

use super::SqliteRepository;
use super::mapping::{conn, map_tier_row, tier_id_from_i64, u64_to_i64};
use crate::repository::{StorageError, TierRepository};

#[async_trait]
impl TierRepository for SqliteRepository {
    async fn list_tiers(&self) -> Result<Vec<TierRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, threshold, description
            FROM reward_tiers
            ORDER BY threshold ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_tier_row).collect()
    }

    async fn insert_tier(&self, tier: &RewardTier) -> Result<TierId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO reward_tiers (threshold, description)
            VALUES (?1, ?2)
            ",
        )
        .bind(u64_to_i64("threshold", tier.threshold)?)
        .bind(tier.description.as_str())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        tier_id_from_i64(res.last_insert_rowid())
    }

    async fn upsert_tier(&self, record: &TierRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO reward_tiers (id, threshold, description)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                threshold = excluded.threshold,
                description = excluded.description
            ",
        )
        .bind(u64_to_i64("tier_id", record.id.value())?)
        .bind(u64_to_i64("threshold", record.tier.threshold)?)
        .bind(record.tier.description.as_str())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn delete_tier(&self, id: TierId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM reward_tiers WHERE id = ?1")
            .bind(u64_to_i64("tier_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_tiers(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM reward_tiers")
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
