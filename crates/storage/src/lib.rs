#![forbid(unsafe_code)]

pub mod remote;
pub mod repository;
pub mod sqlite;

pub use repository::{CustomerRepository, InMemoryRepository, Storage, StorageError, TierRepository};
