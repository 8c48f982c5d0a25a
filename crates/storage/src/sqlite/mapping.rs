use loyalty_core::model::{Customer, CustomerId, RewardTier, TierId, TierRecord};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn tier_id_from_i64(v: i64) -> Result<TierId, StorageError> {
    Ok(TierId::new(i64_to_u64("tier_id", v)?))
}

pub(crate) fn map_customer_row(row: &SqliteRow) -> Result<Customer, StorageError> {
    let id = CustomerId::new(row.try_get::<String, _>("account_number").map_err(ser)?)
        .map_err(ser)?;
    let name: String = row.try_get("name").map_err(ser)?;
    let spend = i64_to_u64(
        "monthly_spend",
        row.try_get::<i64, _>("monthly_spend").map_err(ser)?,
    )?;
    Customer::new(id, name, spend).map_err(ser)
}

pub(crate) fn map_tier_row(row: &SqliteRow) -> Result<TierRecord, StorageError> {
    let id = tier_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let threshold = i64_to_u64("threshold", row.try_get::<i64, _>("threshold").map_err(ser)?)?;
    let description: String = row.try_get("description").map_err(ser)?;
    Ok(TierRecord::new(id, RewardTier::new(threshold, description)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_ids_are_rejected() {
        assert!(tier_id_from_i64(-1).is_err());
        assert_eq!(tier_id_from_i64(3).unwrap(), TierId::new(3));
    }

    #[test]
    fn spend_above_i64_range_is_rejected() {
        assert!(u64_to_i64("monthly_spend", u64::MAX).is_err());
        assert_eq!(u64_to_i64("monthly_spend", 42).unwrap(), 42);
    }
}
