//! Invoicing Module
//!
//! This module exposes a small invoicing REST API (customers, addresses,
//! invoices) on top of two interchangeable storage backends: a SeaORM
//! mapper and a hand-written sqlx one. Both sit behind the repository
//! traits in [`domain::repo`] and must stay observably identical.
//!
//! The public contract (models and HTTP client) lives in the
//! `invoicing-sdk` crate and is re-exported here.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// === PUBLIC API (from SDK) ===
pub use invoicing_sdk::{
    Address, Customer, InvoiceItem, InvoiceSummary, NewCustomer, NewInvoice, NewInvoiceItem,
    Product,
};

// === INTERNAL MODULES ===
// WARNING: These modules are internal implementation details!
// They are exposed only for comprehensive testing and should NOT be used by
// external consumers. Only use the SDK types for stable public APIs.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

// === HOST BOOTSTRAP SURFACE ===
// What a server binary needs to stand the module up: the router, the
// migrator and the repository bundles for each backend.
pub use api::rest::routes::router;
pub use domain::service::InvoicingService;
#[cfg(feature = "db-pg")]
pub use infra::storage::sqlx_repositories;
pub use infra::storage::{migrations::Migrator, sea_orm_repositories};
