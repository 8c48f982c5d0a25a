use async_trait::async_trait;
use loyalty_core::model::{Customer, CustomerId, RewardTier, TierId, TierRecord};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for customers, keyed by account number.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// List every customer in backend order (insertion order for local backends).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_customers(&self) -> Result<Vec<Customer>, StorageError>;

    /// Fetch a customer by account number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing customer is `Ok(None)`.
    async fn get_customer(&self, id: &CustomerId) -> Result<Option<Customer>, StorageError>;

    /// Insert a customer that must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the account number is taken.
    async fn insert_customer(&self, customer: &Customer) -> Result<(), StorageError>;

    /// Persist or replace a customer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the customer cannot be stored.
    async fn upsert_customer(&self, customer: &Customer) -> Result<(), StorageError>;

    /// Remove a customer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such customer exists.
    async fn delete_customer(&self, id: &CustomerId) -> Result<(), StorageError>;

    /// Remove every customer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_all_customers(&self) -> Result<(), StorageError>;
}

/// Repository contract for configured reward tiers.
#[async_trait]
pub trait TierRepository: Send + Sync {
    /// List tiers ordered by threshold, then id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_tiers(&self) -> Result<Vec<TierRecord>, StorageError>;

    /// Insert a tier and return its new id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the tier cannot be stored.
    async fn insert_tier(&self, tier: &RewardTier) -> Result<TierId, StorageError>;

    /// Persist or replace a tier under its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the tier cannot be stored.
    async fn upsert_tier(&self, record: &TierRecord) -> Result<(), StorageError>;

    /// Remove a tier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such tier exists.
    async fn delete_tier(&self, id: TierId) -> Result<(), StorageError>;

    /// Remove every tier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_all_tiers(&self) -> Result<(), StorageError>;
}

#[derive(Default)]
struct TierTable {
    next_id: u64,
    rows: BTreeMap<TierId, RewardTier>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    customers: Arc<Mutex<Vec<Customer>>>,
    tiers: Arc<Mutex<TierTable>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CustomerRepository for InMemoryRepository {
    async fn list_customers(&self) -> Result<Vec<Customer>, StorageError> {
        let guard = self.customers.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn get_customer(&self, id: &CustomerId) -> Result<Option<Customer>, StorageError> {
        let guard = self.customers.lock().map_err(poisoned)?;
        Ok(guard.iter().find(|c| c.id() == id).cloned())
    }

    async fn insert_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        let mut guard = self.customers.lock().map_err(poisoned)?;
        if guard.iter().any(|c| c.id() == customer.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(customer.clone());
        Ok(())
    }

    async fn upsert_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        let mut guard = self.customers.lock().map_err(poisoned)?;
        match guard.iter_mut().find(|c| c.id() == customer.id()) {
            Some(existing) => *existing = customer.clone(),
            None => guard.push(customer.clone()),
        }
        Ok(())
    }

    async fn delete_customer(&self, id: &CustomerId) -> Result<(), StorageError> {
        let mut guard = self.customers.lock().map_err(poisoned)?;
        let before = guard.len();
        guard.retain(|c| c.id() != id);
        if guard.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_customers(&self) -> Result<(), StorageError> {
        self.customers.lock().map_err(poisoned)?.clear();
        Ok(())
    }
}

#[async_trait]
impl TierRepository for InMemoryRepository {
    async fn list_tiers(&self) -> Result<Vec<TierRecord>, StorageError> {
        let guard = self.tiers.lock().map_err(poisoned)?;
        let mut records: Vec<TierRecord> = guard
            .rows
            .iter()
            .map(|(id, tier)| TierRecord::new(*id, tier.clone()))
            .collect();
        // BTreeMap iteration is id-ordered, so a stable sort yields (threshold, id).
        records.sort_by_key(|r| r.tier.threshold);
        Ok(records)
    }

    async fn insert_tier(&self, tier: &RewardTier) -> Result<TierId, StorageError> {
        let mut guard = self.tiers.lock().map_err(poisoned)?;
        guard.next_id += 1;
        let id = TierId::new(guard.next_id);
        guard.rows.insert(id, tier.clone());
        Ok(id)
    }

    async fn upsert_tier(&self, record: &TierRecord) -> Result<(), StorageError> {
        let mut guard = self.tiers.lock().map_err(poisoned)?;
        guard.next_id = guard.next_id.max(record.id.value());
        guard.rows.insert(record.id, record.tier.clone());
        Ok(())
    }

    async fn delete_tier(&self, id: TierId) -> Result<(), StorageError> {
        let mut guard = self.tiers.lock().map_err(poisoned)?;
        guard
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn delete_all_tiers(&self) -> Result<(), StorageError> {
        self.tiers.lock().map_err(poisoned)?.rows.clear();
        Ok(())
    }
}

/// Aggregates customer and tier repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub customers: Arc<dyn CustomerRepository>,
    pub tiers: Arc<dyn TierRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let customers: Arc<dyn CustomerRepository> = Arc::new(repo.clone());
        let tiers: Arc<dyn TierRepository> = Arc::new(repo);
        Self { customers, tiers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, name: &str, spend: u64) -> Customer {
        Customer::new(CustomerId::new(id).unwrap(), name, spend).unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_account_number() {
        let repo = InMemoryRepository::new();
        repo.insert_customer(&customer("1001", "A", 0)).await.unwrap();
        let err = repo
            .insert_customer(&customer("1001", "B", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn upsert_replaces_in_place() {
        let repo = InMemoryRepository::new();
        repo.insert_customer(&customer("1001", "A", 1)).await.unwrap();
        repo.insert_customer(&customer("1002", "B", 2)).await.unwrap();
        repo.upsert_customer(&customer("1001", "A2", 10)).await.unwrap();

        let all = repo.list_customers().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["1001", "1002"]);
        assert_eq!(all[0].name(), "A2");
        assert_eq!(all[0].monthly_spend(), 10);
    }

    #[tokio::test]
    async fn delete_missing_customer_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .delete_customer(&CustomerId::new("9").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn tiers_list_by_threshold_then_id() {
        let repo = InMemoryRepository::new();
        let high = repo.insert_tier(&RewardTier::new(300, "c")).await.unwrap();
        let low_a = repo.insert_tier(&RewardTier::new(100, "a")).await.unwrap();
        let low_b = repo.insert_tier(&RewardTier::new(100, "b")).await.unwrap();

        let ids: Vec<TierId> = repo
            .list_tiers()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![low_a, low_b, high]);
    }

    #[tokio::test]
    async fn tier_ids_are_not_reused_after_upsert() {
        let repo = InMemoryRepository::new();
        repo.upsert_tier(&TierRecord::new(TierId::new(5), RewardTier::new(1, "x")))
            .await
            .unwrap();
        let id = repo.insert_tier(&RewardTier::new(2, "y")).await.unwrap();
        assert_eq!(id, TierId::new(6));

        repo.delete_tier(id).await.unwrap();
        assert!(matches!(
            repo.delete_tier(id).await.unwrap_err(),
            StorageError::NotFound
        ));
    }
}
