use std::sync::Arc;

use storage::remote::RemoteConfig;
use storage::repository::Storage;

use crate::admin::AdminGate;
use crate::auth::AuthorizationCheck;
use crate::demo;
use crate::error::{AppServicesError, DemoError};
use crate::portal::CustomerPortal;
use crate::Clock;

/// Assembles the customer portal and admin gate over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    portal: Arc<CustomerPortal>,
    admin: Arc<AdminGate>,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage, check: Arc<dyn AuthorizationCheck>) -> Self {
        let portal = Arc::new(CustomerPortal::new(
            clock,
            Arc::clone(&storage.customers),
            Arc::clone(&storage.tiers),
        ));
        let admin = Arc::new(AdminGate::new(clock, storage.clone(), check));
        Self {
            storage,
            portal,
            admin,
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        check: Arc<dyn AuthorizationCheck>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(clock, storage, check))
    }

    /// Build services backed by a remote table service.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the remote client cannot be configured.
    pub fn new_remote(
        config: RemoteConfig,
        clock: Clock,
        check: Arc<dyn AuthorizationCheck>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::remote(config)?;
        Ok(Self::new(clock, storage, check))
    }

    #[must_use]
    pub fn portal(&self) -> Arc<CustomerPortal> {
        Arc::clone(&self.portal)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminGate> {
        Arc::clone(&self.admin)
    }

    /// Load the demo data into empty stores.
    ///
    /// # Errors
    ///
    /// Returns `DemoError` if storage access fails.
    pub async fn seed_if_empty(&self) -> Result<bool, DemoError> {
        demo::seed_if_empty(self.storage.customers.as_ref(), self.storage.tiers.as_ref()).await
    }
}
