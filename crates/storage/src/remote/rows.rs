use loyalty_core::model::{Customer, CustomerId, RewardTier, TierId, TierRecord};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Wire shape of a `customers` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CustomerRow {
    pub account_number: String,
    pub name: String,
    pub monthly_spend: u64,
}

impl CustomerRow {
    pub(crate) fn from_customer(customer: &Customer) -> Self {
        Self {
            account_number: customer.id().as_str().to_owned(),
            name: customer.name().to_owned(),
            monthly_spend: customer.monthly_spend(),
        }
    }

    pub(crate) fn into_customer(self) -> Result<Customer, StorageError> {
        let ser = |e: loyalty_core::model::CustomerError| StorageError::Serialization(e.to_string());
        let id = CustomerId::new(self.account_number).map_err(ser)?;
        Customer::new(id, self.name, self.monthly_spend).map_err(ser)
    }
}

/// Wire shape of a `reward_tiers` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TierRow {
    pub id: u64,
    pub threshold: u64,
    pub description: String,
}

impl TierRow {
    pub(crate) fn from_record(record: &TierRecord) -> Self {
        Self {
            id: record.id.value(),
            threshold: record.tier.threshold,
            description: record.tier.description.clone(),
        }
    }

    pub(crate) fn into_record(self) -> TierRecord {
        TierRecord::new(
            TierId::new(self.id),
            RewardTier::new(self.threshold, self.description),
        )
    }
}

/// Insert payload for a tier; the service assigns the id.
#[derive(Debug, Serialize)]
pub(crate) struct NewTierRow<'a> {
    pub threshold: u64,
    pub description: &'a str,
}
