//! Public models for the `invoicing` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `invoicing` module and its consumers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// A customer entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Data for creating a new customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A postal address owned by a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub country: String,
}

/// An invoice header as persisted: a calendar date plus an exact decimal
/// total. `total_amount` is nullable in the store and stays optional here;
/// presentation layers decide how to render the absent case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSummary {
    pub id: i32,
    pub invoice_date: NaiveDate,
    pub total_amount: Option<Decimal>,
}

/// One invoice line, joined with the current row of the product it
/// references at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceItem {
    pub quantity: i32,
    pub product: Product,
}

/// A product as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: Decimal,
}

/// Data for creating a new invoice together with all of its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: i32,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<NewInvoiceItem>,
}

/// One requested invoice line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoiceItem {
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i32,
}
