#![forbid(unsafe_code)]

pub mod model;
pub mod money;
pub mod rewards;
pub mod time;

pub use rewards::{RewardProgress, TierStatus, rank};
pub use time::Clock;
