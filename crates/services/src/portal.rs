use std::sync::Arc;

use loyalty_core::model::{Customer, CustomerId};
use loyalty_core::money::format_ars;
use loyalty_core::rewards::{RewardProgress, rank};
use loyalty_core::time::month_label_es_ar;
use storage::repository::{CustomerRepository, TierRepository};
use tracing::{info, warn};

use crate::Clock;
use crate::error::PortalError;

/// What a signed-in customer sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDashboard {
    pub customer: Customer,
    pub month_label: String,
    pub progress: RewardProgress,
}

impl CustomerDashboard {
    #[must_use]
    pub fn spend_label(&self) -> String {
        format_ars(self.customer.monthly_spend())
    }

    /// One-line summary of what is left to unlock.
    #[must_use]
    pub fn headline(&self) -> String {
        match &self.progress.next_tier {
            Some(next) => format!(
                "Te faltan {} para el próximo beneficio: {}",
                format_ars(self.progress.remaining),
                next.description
            ),
            None => "¡Alcanzaste todos los beneficios del mes!".to_owned(),
        }
    }
}

/// Customer-facing entry point: account-number login and the progress view.
#[derive(Clone)]
pub struct CustomerPortal {
    clock: Clock,
    customers: Arc<dyn CustomerRepository>,
    tiers: Arc<dyn TierRepository>,
}

impl CustomerPortal {
    #[must_use]
    pub fn new(
        clock: Clock,
        customers: Arc<dyn CustomerRepository>,
        tiers: Arc<dyn TierRepository>,
    ) -> Self {
        Self {
            clock,
            customers,
            tiers,
        }
    }

    /// Sign in with a bare account number.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::EmptyAccountNumber` for blank input,
    /// `PortalError::UnknownAccount` if no customer has that number.
    pub async fn login(&self, account_number: &str) -> Result<CustomerDashboard, PortalError> {
        let Ok(id) = CustomerId::new(account_number) else {
            return Err(PortalError::EmptyAccountNumber);
        };
        let dashboard = self.dashboard(&id).await?;
        info!(account = %id, "customer signed in");
        Ok(dashboard)
    }

    /// Build the dashboard for a known customer from current data.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::UnknownAccount` if the customer no longer exists.
    pub async fn dashboard(&self, id: &CustomerId) -> Result<CustomerDashboard, PortalError> {
        let Some(customer) = self.customers.get_customer(id).await? else {
            warn!(account = %id, "unknown account number");
            return Err(PortalError::UnknownAccount(id.to_string()));
        };
        let tiers: Vec<_> = self
            .tiers
            .list_tiers()
            .await?
            .into_iter()
            .map(|record| record.tier)
            .collect();

        let progress = rank(customer.monthly_spend(), &tiers);
        Ok(CustomerDashboard {
            month_label: month_label_es_ar(self.clock.now()),
            progress,
            customer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use loyalty_core::model::RewardTier;
    use loyalty_core::time::fixed_clock;
    use storage::repository::{InMemoryRepository, Storage};

    async fn portal_with(spend: u64, tiers: &[RewardTier]) -> CustomerPortal {
        let repo = InMemoryRepository::new();
        let customer = Customer::new(CustomerId::new("1001").unwrap(), "Verdulería", spend).unwrap();
        repo.insert_customer(&customer).await.unwrap();
        for tier in tiers {
            repo.insert_tier(tier).await.unwrap();
        }
        CustomerPortal::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo))
    }

    fn ladder() -> Vec<RewardTier> {
        vec![
            RewardTier::new(20_000_000, "$200 de descuento"),
            RewardTier::new(10_000_000, "2% OFF"),
            RewardTier::new(30_000_000, "Envío gratis"),
        ]
    }

    #[tokio::test]
    async fn login_ranks_spend_against_tiers() {
        let portal = portal_with(8_450_000, &ladder()).await;
        let dashboard = portal.login(" 1001 ").await.unwrap();

        assert_eq!(dashboard.progress.progress_percent, 85);
        assert_eq!(dashboard.progress.remaining, 1_550_000);
        assert_eq!(dashboard.month_label, "noviembre de 2023");
        assert_eq!(dashboard.spend_label(), "$ 8.450.000");
        assert_eq!(
            dashboard.headline(),
            "Te faltan $ 1.550.000 para el próximo beneficio: 2% OFF"
        );
    }

    #[tokio::test]
    async fn month_label_follows_buenos_aires_calendar() {
        let repo = InMemoryRepository::new();
        let id = CustomerId::new("1001").unwrap();
        repo.insert_customer(&Customer::new(id.clone(), "Verdulería", 0).unwrap())
            .await
            .unwrap();
        // 2023-12-01T01:00:00Z, still November 30th in Argentina.
        let clock = Clock::fixed(chrono::DateTime::from_timestamp(1_701_392_400, 0).unwrap());
        let portal = CustomerPortal::new(clock, Arc::new(repo.clone()), Arc::new(repo));

        let dashboard = portal.dashboard(&id).await.unwrap();
        assert_eq!(dashboard.month_label, "noviembre de 2023");
    }

    #[tokio::test]
    async fn all_tiers_attained_headline() {
        let portal = portal_with(30_000_000, &ladder()).await;
        let dashboard = portal.login("1001").await.unwrap();
        assert_eq!(dashboard.progress.progress_percent, 100);
        assert_eq!(dashboard.progress.achieved_count(), 3);
        assert_eq!(dashboard.headline(), "¡Alcanzaste todos los beneficios del mes!");
    }

    #[tokio::test]
    async fn no_tiers_configured_is_complete() {
        let portal = portal_with(0, &[]).await;
        let dashboard = portal.login("1001").await.unwrap();
        assert_eq!(dashboard.progress.progress_percent, 100);
        assert!(dashboard.progress.tier_statuses.is_empty());
    }

    #[tokio::test]
    async fn login_rejects_blank_and_unknown_accounts() {
        let portal = portal_with(0, &ladder()).await;
        assert!(matches!(
            portal.login("   ").await.unwrap_err(),
            PortalError::EmptyAccountNumber
        ));
        assert!(matches!(
            portal.login("9999").await.unwrap_err(),
            PortalError::UnknownAccount(ref a) if a == "9999"
        ));
    }

    #[tokio::test]
    async fn dashboard_reflects_latest_spend() {
        let storage = Storage::in_memory();
        let id = CustomerId::new("1").unwrap();
        storage
            .customers
            .insert_customer(&Customer::new(id.clone(), "A", 0).unwrap())
            .await
            .unwrap();
        storage
            .tiers
            .insert_tier(&RewardTier::new(100, "x"))
            .await
            .unwrap();
        let portal = CustomerPortal::new(
            fixed_clock(),
            Arc::clone(&storage.customers),
            Arc::clone(&storage.tiers),
        );

        assert_eq!(portal.dashboard(&id).await.unwrap().progress.progress_percent, 0);
        storage
            .customers
            .upsert_customer(&Customer::new(id.clone(), "A", 40).unwrap())
            .await
            .unwrap();
        assert_eq!(portal.dashboard(&id).await.unwrap().progress.progress_percent, 40);
    }
}
