use async_trait::async_trait;
use loyalty_core::model::{Customer, CustomerId};

use super::SqliteRepository;
use super::mapping::{conn, map_customer_row, u64_to_i64};
use crate::repository::{CustomerRepository, StorageError};

#[async_trait]
impl CustomerRepository for SqliteRepository {
    async fn list_customers(&self) -> Result<Vec<Customer>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT account_number, name, monthly_spend
            FROM customers
            ORDER BY rowid ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_customer_row).collect()
    }

    async fn get_customer(&self, id: &CustomerId) -> Result<Option<Customer>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT account_number, name, monthly_spend
            FROM customers WHERE account_number = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_customer_row).transpose()
    }

    async fn insert_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO customers (account_number, name, monthly_spend)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(customer.id().as_str())
        .bind(customer.name())
        .bind(u64_to_i64("monthly_spend", customer.monthly_spend())?)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StorageError::Conflict)
            }
            Err(e) => Err(conn(e)),
        }
    }

    async fn upsert_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO customers (account_number, name, monthly_spend)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(account_number) DO UPDATE SET
                name = excluded.name,
                monthly_spend = excluded.monthly_spend
            ",
        )
        .bind(customer.id().as_str())
        .bind(customer.name())
        .bind(u64_to_i64("monthly_spend", customer.monthly_spend())?)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn delete_customer(&self, id: &CustomerId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM customers WHERE account_number = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_customers(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM customers")
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
