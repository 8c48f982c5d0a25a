//! Shared error types for the services crate.

use thiserror::Error;

use loyalty_core::model::CustomerError;
use storage::remote::RemoteInitError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `CustomerPortal`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PortalError {
    #[error("enter your account number")]
    EmptyAccountNumber,
    #[error("unknown account number: {0}")]
    UnknownAccount(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AdminGate`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdminError {
    #[error("incorrect PIN")]
    InvalidPin,
}

/// Errors emitted by `CustomerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CustomerServiceError {
    #[error("account number {0} already exists")]
    DuplicateAccount(String),
    #[error(transparent)]
    Customer(#[from] CustomerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `TierService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TierServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CsvExport`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid UTF-8")]
    Encoding,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while seeding or resetting demo data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DemoError {
    #[error(transparent)]
    Customer(#[from] CustomerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Remote(#[from] RemoteInitError),
    #[error(transparent)]
    Demo(#[from] DemoError),
}
