use invoicing_sdk::{Address, Customer, InvoiceItem, InvoiceSummary, Product};

use crate::infra::storage::entity::{address, customer, invoice, invoice_item, product};

impl From<customer::Model> for Customer {
    fn from(e: customer::Model) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
        }
    }
}

/// Addresses surface without row identifiers; callers only ever see them
/// nested under their owning customer.
impl From<address::Model> for Address {
    fn from(e: address::Model) -> Self {
        Self {
            street: e.street,
            city: e.city,
            country: e.country,
        }
    }
}

impl From<invoice::Model> for InvoiceSummary {
    fn from(e: invoice::Model) -> Self {
        Self {
            id: e.id,
            invoice_date: e.invoice_date,
            total_amount: e.total_amount,
        }
    }
}

/// Join an invoice line with its product row.
///
/// The price shown to callers is the product's current price, not the
/// `unit_price` frozen on the line at invoicing time.
#[must_use]
pub fn item_with_product(item: invoice_item::Model, product: product::Model) -> InvoiceItem {
    InvoiceItem {
        quantity: item.quantity,
        product: Product {
            name: product.product_name,
            price: product.price,
        },
    }
}
