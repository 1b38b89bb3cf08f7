//! Infrastructure storage layer - the two persistence backends.
//!
//! ## Architecture
//!
//! This module contains ALL database-specific code:
//! - `entity/` - SeaORM entity definitions (customer, address, invoice,
//!   product, invoice_item)
//! - `mapper.rs` - Conversions between SeaORM models and SDK contract types
//! - `migrations/` - Database schema migrations (shared by both backends)
//! - `db.rs` - Error collapsing and constraint classification helpers
//! - `*_sea_repo.rs` - SeaORM implementations of the repository ports
//! - `*_sqlx_repo.rs` - Hand-written SQL implementations of the same ports
//!   (Postgres, behind the `db-pg` feature)
//!
//! ## Layering Rules
//!
//! The infrastructure layer:
//! - **Contains**: all SeaORM and sqlx imports
//! - **Uses**: `invoicing_sdk` contract types as the domain model
//! - **Provides**: `Repositories` bundles via the constructor functions
//!   below; the domain never sees which backend it talks to
//!
//! Both backends must stay observably identical: same rows written, same
//! errors classified, same transaction boundaries. The shared arithmetic
//! lives in `crate::domain::calc` so totals and dates cannot drift.

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

pub mod addresses_sea_repo;
pub mod customers_sea_repo;
pub mod invoices_sea_repo;

#[cfg(feature = "db-pg")]
pub mod addresses_sqlx_repo;
#[cfg(feature = "db-pg")]
pub mod customers_sqlx_repo;
#[cfg(feature = "db-pg")]
pub mod invoices_sqlx_repo;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::repo::Repositories;

pub use addresses_sea_repo::OrmAddressesRepository;
pub use customers_sea_repo::OrmCustomersRepository;
pub use invoices_sea_repo::OrmInvoicesRepository;

#[cfg(feature = "db-pg")]
pub use addresses_sqlx_repo::SqlxAddressesRepository;
#[cfg(feature = "db-pg")]
pub use customers_sqlx_repo::SqlxCustomersRepository;
#[cfg(feature = "db-pg")]
pub use invoices_sqlx_repo::SqlxInvoicesRepository;

/// Build the repository bundle backed by the SeaORM mapper.
#[must_use]
pub fn sea_orm_repositories(db: DatabaseConnection) -> Repositories {
    Repositories {
        customers: Arc::new(OrmCustomersRepository::new(db.clone())),
        addresses: Arc::new(OrmAddressesRepository::new(db.clone())),
        invoices: Arc::new(OrmInvoicesRepository::new(db)),
    }
}

/// Build the repository bundle backed by hand-written SQL over a Postgres
/// pool.
#[cfg(feature = "db-pg")]
#[must_use]
pub fn sqlx_repositories(pool: sqlx::PgPool) -> Repositories {
    Repositories {
        customers: Arc::new(SqlxCustomersRepository::new(pool.clone())),
        addresses: Arc::new(SqlxAddressesRepository::new(pool.clone())),
        invoices: Arc::new(SqlxInvoicesRepository::new(pool)),
    }
}
