#![forbid(unsafe_code)]

pub mod admin;
pub mod app_services;
pub mod auth;
pub mod customer_service;
pub mod demo;
pub mod error;
pub mod export;
pub mod portal;
pub mod tier_service;

pub use loyalty_core::Clock;

pub use admin::{AdminGate, AdminSession};
pub use app_services::AppServices;
pub use auth::{AuthorizationCheck, DEFAULT_ADMIN_PIN, StaticPin};
pub use customer_service::CustomerService;
pub use error::{
    AdminError, AppServicesError, CustomerServiceError, DemoError, ExportError, PortalError,
    TierServiceError,
};
pub use export::{CsvExport, CustomerCsv};
pub use portal::{CustomerDashboard, CustomerPortal};
pub use tier_service::TierService;
