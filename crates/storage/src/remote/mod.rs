//! Customers and tiers held in a hosted table service with a PostgREST-style API.
//!
//! Each table is reached at `{base_url}/rest/v1/{table}`. Filters use the
//! `column=eq.value` syntax and upserts rely on
//! `Prefer: resolution=merge-duplicates`.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::repository::{CustomerRepository, Storage, StorageError, TierRepository};

mod customer_table;
mod rows;
mod tier_table;

pub(crate) const CUSTOMERS_TABLE: &str = "customers";
pub(crate) const TIERS_TABLE: &str = "reward_tiers";

#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl RemoteConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteInitError {
    #[error("remote table url must start with http:// or https://: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct RemoteTableRepository {
    client: Client,
    config: RemoteConfig,
}

impl RemoteTableRepository {
    /// Build a repository for the given service.
    ///
    /// # Errors
    ///
    /// Returns `RemoteInitError` if the URL is not http(s) or the HTTP client
    /// cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteInitError> {
        let url = config.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RemoteInitError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub(crate) fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.config.base_url.trim().trim_end_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    pub(crate) fn get(&self, table: &str) -> RequestBuilder {
        debug!(table, "remote select");
        self.authorize(self.client.get(self.table_url(table)))
    }

    pub(crate) fn post(&self, table: &str) -> RequestBuilder {
        debug!(table, "remote insert");
        self.authorize(self.client.post(self.table_url(table)))
    }

    pub(crate) fn delete(&self, table: &str) -> RequestBuilder {
        debug!(table, "remote delete");
        self.authorize(self.client.delete(self.table_url(table)))
    }
}

pub(crate) fn http(e: reqwest::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Sends the request and maps non-success statuses onto `StorageError`.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, StorageError> {
    let response = request.send().await.map_err(http)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(status_error(status))
}

pub(crate) fn status_error(status: StatusCode) -> StorageError {
    match status {
        StatusCode::NOT_FOUND => StorageError::NotFound,
        StatusCode::CONFLICT => StorageError::Conflict,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            StorageError::Serialization(format!("remote rejected payload: {status}"))
        }
        other => StorageError::Connection(format!("remote table returned {other}")),
    }
}

impl Storage {
    /// Build a `Storage` backed by a remote table service.
    ///
    /// # Errors
    ///
    /// Returns `RemoteInitError` if the client cannot be configured.
    pub fn remote(config: RemoteConfig) -> Result<Self, RemoteInitError> {
        let repo = RemoteTableRepository::new(config)?;
        let customers: Arc<dyn CustomerRepository> = Arc::new(repo.clone());
        let tiers: Arc<dyn TierRepository> = Arc::new(repo);
        Ok(Self { customers, tiers })
    }
}
