use invoicing_sdk::models::{
    Address, Customer, InvoiceItem, InvoiceSummary, NewCustomer, NewInvoice,
};
use rust_decimal::Decimal;

use crate::domain::error::DomainError;
use crate::domain::repo::Repositories;

/// Application service fronting one storage backend.
///
/// Request validation lives here so that both backends sit behind
/// identical rules; the repositories only enforce what the schema itself
/// enforces (uniqueness, foreign keys).
#[derive(Clone)]
pub struct InvoicingService {
    repos: Repositories,
}

impl InvoicingService {
    #[must_use]
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, DomainError> {
        self.repos.customers.list_all().await
    }

    pub async fn create_customer(
        &self,
        new_customer: NewCustomer,
    ) -> Result<Customer, DomainError> {
        validate_new_customer(&new_customer)?;
        let created = self.repos.customers.create(new_customer).await?;
        tracing::info!(customer_id = created.id, "Customer created");
        Ok(created)
    }

    pub async fn list_addresses(&self, customer_id: i32) -> Result<Vec<Address>, DomainError> {
        self.repos.addresses.list_by_customer(customer_id).await
    }

    pub async fn list_invoices(
        &self,
        customer_id: i32,
    ) -> Result<Vec<InvoiceSummary>, DomainError> {
        self.repos.invoices.list_by_customer(customer_id).await
    }

    pub async fn invoice_items(&self, invoice_id: i32) -> Result<Vec<InvoiceItem>, DomainError> {
        self.repos.invoices.list_items(invoice_id).await
    }

    pub async fn create_invoice(&self, new_invoice: NewInvoice) -> Result<i32, DomainError> {
        validate_new_invoice(&new_invoice)?;
        let line_count = new_invoice.items.len();
        let invoice_id = self.repos.invoices.create_invoice(new_invoice).await?;
        tracing::info!(invoice_id, line_count, "Invoice created");
        Ok(invoice_id)
    }
}

fn validate_new_customer(new_customer: &NewCustomer) -> Result<(), DomainError> {
    if new_customer.first_name.trim().is_empty() {
        return Err(DomainError::validation("firstName", "must not be blank"));
    }
    if new_customer.last_name.trim().is_empty() {
        return Err(DomainError::validation("lastName", "must not be blank"));
    }
    validate_email(&new_customer.email)
}

// Lightweight well-formedness check: one '@' with non-empty sides and no
// whitespace. Real deliverability is out of scope.
fn validate_email(email: &str) -> Result<(), DomainError> {
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
    });
    if well_formed {
        Ok(())
    } else {
        Err(DomainError::validation(
            "email",
            "must be a well-formed email address",
        ))
    }
}

fn validate_new_invoice(new_invoice: &NewInvoice) -> Result<(), DomainError> {
    if new_invoice.items.is_empty() {
        return Err(DomainError::validation(
            "invoiceItemList",
            "must not be empty",
        ));
    }
    for item in &new_invoice.items {
        if item.product_name.trim().is_empty() {
            return Err(DomainError::validation("productName", "must not be blank"));
        }
        if item.quantity < 1 {
            return Err(DomainError::validation("quantity", "must be positive"));
        }
        if item.price < Decimal::ZERO {
            return Err(DomainError::validation("price", "must not be negative"));
        }
    }
    Ok(())
}
