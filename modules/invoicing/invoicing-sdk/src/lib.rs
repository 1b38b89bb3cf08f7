//! Invoicing SDK
//!
//! This crate provides the public contract of the `invoicing` module:
//! - Model types for customers, addresses, invoices and invoice lines
//! - Error type for the HTTP client (`ClientError`)
//! - A thin `reqwest`-based client (`InvoicingClient`) driving the REST API
//!
//! ## Usage
//!
//! ```ignore
//! use invoicing_sdk::{InvoicingClient, NewCustomer};
//!
//! let client = InvoicingClient::new("http://127.0.0.1:8087")?;
//! let customer = client
//!     .create_customer(&NewCustomer {
//!         first_name: "Alice".into(),
//!         last_name: "Smith".into(),
//!         email: "alice@example.com".into(),
//!     })
//!     .await?;
//! let invoices = client.list_invoices(customer.id).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod errors;
pub mod models;

// Re-export main types at crate root for convenience
pub use client::{InvoiceHeader, InvoicingClient};
pub use errors::ClientError;
pub use models::{
    Address, Customer, InvoiceItem, InvoiceSummary, NewCustomer, NewInvoice, NewInvoiceItem,
    Product,
};
