use serde::Serialize;
use thiserror::Error;

use crate::model::ids::CustomerId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CustomerError {
    #[error("customer account number cannot be empty")]
    EmptyId,

    #[error("customer name cannot be empty")]
    EmptyName,
}

//
// ─── CUSTOMER ──────────────────────────────────────────────────────────────────
//

/// A loyalty customer and their spend for the current month.
///
/// Spend is replaced wholesale on each update; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    monthly_spend: u64,
}

impl Customer {
    /// Creates a new Customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        monthly_spend: u64,
    ) -> Result<Self, CustomerError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(CustomerError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_owned(),
            monthly_spend,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn monthly_spend(&self) -> u64 {
        self.monthly_spend
    }

    /// Returns a copy with the spend replaced.
    #[must_use]
    pub fn with_monthly_spend(&self, monthly_spend: u64) -> Self {
        Self {
            monthly_spend,
            ..self.clone()
        }
    }

    /// Adds a signed delta to the spend, saturating at zero and `u64::MAX`.
    pub fn adjust_spend(&mut self, delta: i64) {
        self.monthly_spend = self.monthly_spend.saturating_add_signed(delta);
    }

    /// Case-insensitive match on the name, or substring match on the account number.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query.to_lowercase())
            || self.id.as_str().contains(query)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
