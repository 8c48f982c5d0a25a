mod customer;
mod ids;
mod tier;

pub use customer::{Customer, CustomerError};
pub use ids::{CustomerId, ParseIdError, TierId};
pub use tier::{RewardTier, TierRecord};
