use std::sync::Arc;

use storage::repository::Storage;
use tracing::{info, warn};

use crate::auth::AuthorizationCheck;
use crate::customer_service::CustomerService;
use crate::demo;
use crate::error::{AdminError, DemoError, ExportError};
use crate::export::{CsvExport, CustomerCsv};
use crate::tier_service::TierService;
use crate::Clock;

/// Administrative capabilities, only reachable through `AdminGate::unlock`.
#[derive(Clone)]
pub struct AdminSession {
    storage: Storage,
    customers: Arc<CustomerService>,
    tiers: Arc<TierService>,
    export: CsvExport,
}

impl AdminSession {
    #[must_use]
    pub fn customers(&self) -> Arc<CustomerService> {
        Arc::clone(&self.customers)
    }

    #[must_use]
    pub fn tiers(&self) -> Arc<TierService> {
        Arc::clone(&self.tiers)
    }

    /// Render every customer as CSV.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if customers cannot be read or serialized.
    pub async fn export_customers_csv(&self) -> Result<CustomerCsv, ExportError> {
        self.export.export().await
    }

    /// Replace all customers and tiers with the demo data.
    ///
    /// # Errors
    ///
    /// Returns `DemoError` if storage access fails.
    pub async fn reset_demo(&self) -> Result<(), DemoError> {
        demo::reset_demo(self.storage.customers.as_ref(), self.storage.tiers.as_ref()).await
    }
}

/// Holds the admin capabilities behind an injected credential check.
#[derive(Clone)]
pub struct AdminGate {
    check: Arc<dyn AuthorizationCheck>,
    session: AdminSession,
}

impl AdminGate {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage, check: Arc<dyn AuthorizationCheck>) -> Self {
        let session = AdminSession {
            customers: Arc::new(CustomerService::new(Arc::clone(&storage.customers))),
            tiers: Arc::new(TierService::new(Arc::clone(&storage.tiers))),
            export: CsvExport::new(clock, Arc::clone(&storage.customers)),
            storage,
        };
        Self { check, session }
    }

    /// Trade a credential for an admin session.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidPin` if the check rejects the credential.
    pub fn unlock(&self, credential: &str) -> Result<AdminSession, AdminError> {
        if !self.check.verify(credential) {
            warn!("admin unlock rejected");
            return Err(AdminError::InvalidPin);
        }
        info!("admin unlocked");
        Ok(self.session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use loyalty_core::time::fixed_clock;

    use crate::auth::StaticPin;

    struct DenyAll;

    impl AuthorizationCheck for DenyAll {
        fn verify(&self, _credential: &str) -> bool {
            false
        }
    }

    #[test]
    fn wrong_pin_is_rejected() {
        let gate = AdminGate::new(fixed_clock(), Storage::in_memory(), Arc::new(StaticPin::new("1234")));
        assert_eq!(gate.unlock("0000").err(), Some(AdminError::InvalidPin));
    }

    #[test]
    fn custom_check_is_honoured() {
        let gate = AdminGate::new(fixed_clock(), Storage::in_memory(), Arc::new(DenyAll));
        assert!(gate.unlock("2626").is_err());
    }

    #[tokio::test]
    async fn unlocked_session_manages_data() {
        let gate = AdminGate::new(fixed_clock(), Storage::in_memory(), Arc::new(StaticPin::default()));
        let session = gate.unlock("2626").unwrap();

        session.reset_demo().await.unwrap();
        assert_eq!(session.customers().list().await.unwrap().len(), 4);
        assert_eq!(session.tiers().list().await.unwrap().len(), 3);

        let csv = session.export_customers_csv().await.unwrap();
        assert_eq!(csv.contents.lines().count(), 5);
    }
}
