use async_trait::async_trait;
use loyalty_core::model::{Customer, CustomerId};

use super::rows::CustomerRow;
use super::{CUSTOMERS_TABLE, RemoteTableRepository, send};
use crate::repository::{CustomerRepository, StorageError};

fn eq(id: &CustomerId) -> String {
    format!("eq.{}", id.as_str())
}

async fn decode(response: reqwest::Response) -> Result<Vec<CustomerRow>, StorageError> {
    response
        .json::<Vec<CustomerRow>>()
        .await
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

#[async_trait]
impl CustomerRepository for RemoteTableRepository {
    async fn list_customers(&self) -> Result<Vec<Customer>, StorageError> {
        let request = self
            .get(CUSTOMERS_TABLE)
            .query(&[("select", "*"), ("order", "account_number.asc")]);
        let rows = decode(send(request).await?).await?;
        rows.into_iter().map(CustomerRow::into_customer).collect()
    }

    async fn get_customer(&self, id: &CustomerId) -> Result<Option<Customer>, StorageError> {
        let request = self
            .get(CUSTOMERS_TABLE)
            .query(&[("select", "*".to_owned()), ("account_number", eq(id))]);
        let rows = decode(send(request).await?).await?;
        rows.into_iter()
            .next()
            .map(CustomerRow::into_customer)
            .transpose()
    }

    async fn insert_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        let request = self
            .post(CUSTOMERS_TABLE)
            .json(&[CustomerRow::from_customer(customer)]);
        send(request).await?;
        Ok(())
    }

    async fn upsert_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        let request = self
            .post(CUSTOMERS_TABLE)
            .query(&[("on_conflict", "account_number")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[CustomerRow::from_customer(customer)]);
        send(request).await?;
        Ok(())
    }

    async fn delete_customer(&self, id: &CustomerId) -> Result<(), StorageError> {
        let request = self
            .delete(CUSTOMERS_TABLE)
            .query(&[("account_number", eq(id))])
            .header("Prefer", "return=representation");
        let deleted = decode(send(request).await?).await?;
        if deleted.is_empty() {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_customers(&self) -> Result<(), StorageError> {
        // The service refuses unfiltered deletes.
        let request = self
            .delete(CUSTOMERS_TABLE)
            .query(&[("account_number", "not.is.null")]);
        send(request).await?;
        Ok(())
    }
}
