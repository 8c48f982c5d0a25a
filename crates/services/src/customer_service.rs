use std::sync::Arc;

use loyalty_core::model::{Customer, CustomerId};
use storage::repository::{CustomerRepository, StorageError};
use tracing::info;

use crate::error::CustomerServiceError;

/// Administrative operations over the customer list.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    #[must_use]
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    /// List every customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerServiceError::Storage` if repository access fails.
    pub async fn list(&self) -> Result<Vec<Customer>, CustomerServiceError> {
        Ok(self.customers.list_customers().await?)
    }

    /// Customers whose name (case-insensitive) or account number contains `query`.
    ///
    /// A blank query returns everyone.
    ///
    /// # Errors
    ///
    /// Returns `CustomerServiceError::Storage` if repository access fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Customer>, CustomerServiceError> {
        let mut customers = self.list().await?;
        customers.retain(|c| c.matches(query));
        Ok(customers)
    }

    /// Fetch a customer by account number.
    ///
    /// # Errors
    ///
    /// Returns `CustomerServiceError::Storage` if repository access fails.
    pub async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, CustomerServiceError> {
        Ok(self.customers.get_customer(id).await?)
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerServiceError::Customer` for an empty account number or name,
    /// `CustomerServiceError::DuplicateAccount` if the account number is taken.
    pub async fn add(
        &self,
        account_number: &str,
        name: &str,
        monthly_spend: u64,
    ) -> Result<Customer, CustomerServiceError> {
        let id = CustomerId::new(account_number)?;
        let customer = Customer::new(id, name, monthly_spend)?;
        match self.customers.insert_customer(&customer).await {
            Ok(()) => {}
            Err(StorageError::Conflict) => {
                return Err(CustomerServiceError::DuplicateAccount(
                    customer.id().to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }
        info!(account = %customer.id(), "customer added");
        Ok(customer)
    }

    /// Replace name and spend of an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerServiceError::Customer` if the name is empty,
    /// `CustomerServiceError::Storage` with `NotFound` if the customer is missing.
    pub async fn update(
        &self,
        id: &CustomerId,
        name: &str,
        monthly_spend: u64,
    ) -> Result<Customer, CustomerServiceError> {
        self.require(id).await?;
        let updated = Customer::new(id.clone(), name, monthly_spend)?;
        self.customers.upsert_customer(&updated).await?;
        info!(account = %id, monthly_spend, "customer updated");
        Ok(updated)
    }

    /// Add a signed amount to a customer's spend, clamping at zero.
    ///
    /// # Errors
    ///
    /// Returns `CustomerServiceError::Storage` with `NotFound` if the customer is missing.
    pub async fn adjust_spend(
        &self,
        id: &CustomerId,
        delta: i64,
    ) -> Result<Customer, CustomerServiceError> {
        let mut customer = self.require(id).await?;
        customer.adjust_spend(delta);
        self.customers.upsert_customer(&customer).await?;
        info!(account = %id, delta, monthly_spend = customer.monthly_spend(), "spend adjusted");
        Ok(customer)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerServiceError::Storage` with `NotFound` if the customer is missing.
    pub async fn remove(&self, id: &CustomerId) -> Result<(), CustomerServiceError> {
        self.customers.delete_customer(id).await?;
        info!(account = %id, "customer removed");
        Ok(())
    }

    async fn require(&self, id: &CustomerId) -> Result<Customer, CustomerServiceError> {
        self.customers
            .get_customer(id)
            .await?
            .ok_or(CustomerServiceError::Storage(StorageError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::InMemoryRepository;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(InMemoryRepository::new()))
    }

    fn id(raw: &str) -> CustomerId {
        CustomerId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn add_rejects_duplicates_and_blank_fields() {
        let service = service();
        service.add("1050", "Supermercado El Centro", 0).await.unwrap();

        let err = service.add("1050", "Other", 0).await.unwrap_err();
        assert!(matches!(err, CustomerServiceError::DuplicateAccount(ref a) if a == "1050"));

        let err = service.add("  ", "Name", 0).await.unwrap_err();
        assert!(matches!(err, CustomerServiceError::Customer(_)));

        let err = service.add("1051", "", 0).await.unwrap_err();
        assert!(matches!(err, CustomerServiceError::Customer(_)));
    }

    #[tokio::test]
    async fn search_matches_name_and_number() {
        let service = service();
        service.add("1001", "Verdulería San Martín", 0).await.unwrap();
        service.add("1002", "Carnicería Don José", 0).await.unwrap();

        let hits = service.search("carni").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id().as_str(), "1002");

        assert_eq!(service.search("100").await.unwrap().len(), 2);
        assert_eq!(service.search("").await.unwrap().len(), 2);
        assert!(service.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn adjust_spend_clamps_at_zero() {
        let service = service();
        service.add("1004", "Panadería La Nueva", 50_000).await.unwrap();

        let c = service.adjust_spend(&id("1004"), -100_000).await.unwrap();
        assert_eq!(c.monthly_spend(), 0);

        let c = service.adjust_spend(&id("1004"), 1_000_000).await.unwrap();
        assert_eq!(c.monthly_spend(), 1_000_000);

        let stored = service.get(&id("1004")).await.unwrap().unwrap();
        assert_eq!(stored.monthly_spend(), 1_000_000);
    }

    #[tokio::test]
    async fn update_requires_existing_customer() {
        let service = service();
        let err = service.update(&id("7"), "Ghost", 1).await.unwrap_err();
        assert!(matches!(
            err,
            CustomerServiceError::Storage(StorageError::NotFound)
        ));

        service.add("7", "Real", 1).await.unwrap();
        let updated = service.update(&id("7"), "  Renamed ", 99).await.unwrap();
        assert_eq!(updated.name(), "Renamed");
        assert_eq!(updated.monthly_spend(), 99);
    }

    #[tokio::test]
    async fn remove_deletes_customer() {
        let service = service();
        service.add("1", "A", 0).await.unwrap();
        service.remove(&id("1")).await.unwrap();
        assert!(service.get(&id("1")).await.unwrap().is_none());
        assert!(service.remove(&id("1")).await.is_err());
    }
}
