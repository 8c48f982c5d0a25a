//! Demo customers and tiers for a fresh install or a reset.

use loyalty_core::model::{Customer, CustomerError, CustomerId, RewardTier};
use storage::repository::{CustomerRepository, TierRepository};
use tracing::info;

use crate::error::DemoError;

const DEMO_CUSTOMERS: [(&str, &str, u64); 4] = [
    ("1001", "Verdulería San Martín", 8_450_000),
    ("1002", "Carnicería Don José", 12_750_000),
    ("1003", "Kiosco 24 Horas", 21_300_000),
    ("1004", "Panadería La Nueva", 4_100_000),
];

const DEMO_TIERS: [(u64, &str); 3] = [
    (10_000_000, "2% OFF"),
    (20_000_000, "$200 de descuento en 40×50 al retirar"),
    (30_000_000, "Envío gratis"),
];

/// # Errors
///
/// Returns `CustomerError` if a demo entry fails validation.
pub fn demo_customers() -> Result<Vec<Customer>, CustomerError> {
    DEMO_CUSTOMERS
        .iter()
        .map(|(id, name, spend)| Customer::new(CustomerId::new(*id)?, *name, *spend))
        .collect()
}

#[must_use]
pub fn demo_tiers() -> Vec<RewardTier> {
    DEMO_TIERS
        .iter()
        .map(|(threshold, description)| RewardTier::new(*threshold, *description))
        .collect()
}

/// Wipe both stores and reload the demo data.
///
/// # Errors
///
/// Returns `DemoError` if storage access fails.
pub async fn reset_demo(
    customers: &dyn CustomerRepository,
    tiers: &dyn TierRepository,
) -> Result<(), DemoError> {
    customers.delete_all_customers().await?;
    tiers.delete_all_tiers().await?;
    load(customers, tiers).await?;
    info!("demo data restored");
    Ok(())
}

/// Load the demo data only if both stores are empty.
///
/// Returns whether anything was written.
///
/// # Errors
///
/// Returns `DemoError` if storage access fails.
pub async fn seed_if_empty(
    customers: &dyn CustomerRepository,
    tiers: &dyn TierRepository,
) -> Result<bool, DemoError> {
    if !customers.list_customers().await?.is_empty() || !tiers.list_tiers().await?.is_empty() {
        return Ok(false);
    }
    load(customers, tiers).await?;
    info!("demo data seeded");
    Ok(true)
}

async fn load(
    customers: &dyn CustomerRepository,
    tiers: &dyn TierRepository,
) -> Result<(), DemoError> {
    for customer in demo_customers()? {
        customers.upsert_customer(&customer).await?;
    }
    for tier in demo_tiers() {
        tiers.insert_tier(&tier).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::InMemoryRepository;

    #[test]
    fn demo_data_is_valid() {
        assert_eq!(demo_customers().unwrap().len(), 4);
        assert_eq!(demo_tiers().len(), 3);
    }

    #[tokio::test]
    async fn seed_only_touches_empty_stores() {
        let repo = InMemoryRepository::new();
        assert!(seed_if_empty(&repo, &repo).await.unwrap());
        assert!(!seed_if_empty(&repo, &repo).await.unwrap());
        assert_eq!(repo.list_customers().await.unwrap().len(), 4);
        assert_eq!(repo.list_tiers().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn reset_replaces_existing_data() {
        let repo = InMemoryRepository::new();
        repo.insert_customer(
            &Customer::new(CustomerId::new("9").unwrap(), "Extra", 1).unwrap(),
        )
        .await
        .unwrap();
        repo.insert_tier(&RewardTier::new(1, "extra")).await.unwrap();

        reset_demo(&repo, &repo).await.unwrap();

        let customers = repo.list_customers().await.unwrap();
        assert_eq!(customers.len(), 4);
        assert!(customers.iter().all(|c| c.id().as_str() != "9"));
        let thresholds: Vec<u64> = repo
            .list_tiers()
            .await
            .unwrap()
            .iter()
            .map(|r| r.tier.threshold)
            .collect();
        assert_eq!(thresholds, vec![10_000_000, 20_000_000, 30_000_000]);
    }
}
