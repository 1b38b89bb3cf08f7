use std::sync::Arc;

use async_trait::async_trait;
use invoicing_sdk::models::{
    Address, Customer, InvoiceItem, InvoiceSummary, NewCustomer, NewInvoice,
};

use crate::domain::error::DomainError;

/// Port for the domain layer: customer persistence.
///
/// Customers are append-only in this system; there is no update or delete.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait CustomersRepository: Send + Sync {
    /// All customers, in store order.
    async fn list_all(&self) -> Result<Vec<Customer>, DomainError>;

    /// Insert a new customer and return the persisted record with its
    /// generated id. A duplicate email surfaces as
    /// [`DomainError::EmailTaken`], never as a generic failure.
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, DomainError>;
}

/// Port for the domain layer: address reads.
#[async_trait]
pub trait AddressesRepository: Send + Sync {
    /// All addresses of one customer, in store order. An unknown customer
    /// id yields an empty list, not an error.
    async fn list_by_customer(&self, customer_id: i32) -> Result<Vec<Address>, DomainError>;
}

/// Port for the domain layer: the invoice read and write paths.
#[async_trait]
pub trait InvoicesRepository: Send + Sync {
    /// All invoice headers of one customer (date and total, no items), in
    /// store order. An unknown customer id yields an empty list.
    async fn list_by_customer(&self, customer_id: i32)
    -> Result<Vec<InvoiceSummary>, DomainError>;

    /// All line items of one invoice, each joined with the current row of
    /// its product. An unknown invoice id yields an empty list.
    async fn list_items(&self, invoice_id: i32) -> Result<Vec<InvoiceItem>, DomainError>;

    /// Create the invoice header, one fresh product row per line and the
    /// line items, all in a single transaction, and return the generated
    /// invoice id. The stored total is the exact decimal sum of
    /// `price * quantity` over all lines; the stored date is the UTC
    /// calendar date of the given timestamp. An empty item list is rejected
    /// as a validation error before anything is written. A missing customer
    /// surfaces as [`DomainError::UnknownCustomer`] and leaves no rows
    /// behind.
    async fn create_invoice(&self, new_invoice: NewInvoice) -> Result<i32, DomainError>;
}

/// The repository bundle one storage backend provides.
///
/// Both backends hand out the same shape, so everything above this point
/// is oblivious to which mapper is in use.
#[derive(Clone)]
pub struct Repositories {
    pub customers: Arc<dyn CustomersRepository>,
    pub addresses: Arc<dyn AddressesRepository>,
    pub invoices: Arc<dyn InvoicesRepository>,
}
