//! Thin `reqwest`-based client for the invoicing REST API.
//!
//! The private wire records mirror the JSON bodies of the service; public
//! methods convert them to the contract models from [`crate::models`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;
use crate::models::{Address, Customer, InvoiceItem, NewCustomer, NewInvoice, Product};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An invoice header as rendered by the list endpoints: the timestamp is
/// midnight UTC of the stored date and the total is a whole number, with
/// absent totals rendered as zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceHeader {
    pub id: i32,
    pub timestamp: DateTime<Utc>,
    pub total_amount: i64,
}

/// HTTP client for the invoicing REST API.
#[derive(Debug, Clone)]
pub struct InvoicingClient {
    http: reqwest::Client,
    base_url: String,
}

impl InvoicingClient {
    /// Build a client for the service at `base_url` (scheme and authority;
    /// a trailing slash is tolerated).
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self::with_http(http, base_url))
    }

    /// Build a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    /// List every customer.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failures or a non-200 answer.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, ClientError> {
        let resp = self.http.get(self.url("/customer")).send().await?;
        let resp = expect_status(resp, StatusCode::OK).await?;
        let wire: Vec<CustomerWire> = resp.json().await?;
        Ok(wire.into_iter().map(Into::into).collect())
    }

    /// Create a customer and return the persisted record.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failures or a non-201 answer,
    /// including 409 when the email is already taken.
    pub async fn create_customer(
        &self,
        new_customer: &NewCustomer,
    ) -> Result<Customer, ClientError> {
        let body = NewCustomerWire {
            first_name: &new_customer.first_name,
            last_name: &new_customer.last_name,
            email: &new_customer.email,
        };
        let resp = self
            .http
            .post(self.url("/customer"))
            .json(&body)
            .send()
            .await?;
        let resp = expect_status(resp, StatusCode::CREATED).await?;
        let wire: CustomerWire = resp.json().await?;
        Ok(wire.into())
    }

    /// List the addresses of one customer. An unknown customer id yields
    /// an empty list, not an error.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failures or a non-200 answer.
    pub async fn list_addresses(&self, customer_id: i32) -> Result<Vec<Address>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/customer/{customer_id}/addresses")))
            .send()
            .await?;
        let resp = expect_status(resp, StatusCode::OK).await?;
        let wire: Vec<AddressWire> = resp.json().await?;
        Ok(wire.into_iter().map(Into::into).collect())
    }

    /// List the invoice headers of one customer. An unknown customer id
    /// yields an empty list, not an error.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failures or a non-200 answer.
    pub async fn list_invoices(&self, customer_id: i32) -> Result<Vec<InvoiceHeader>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/customer/{customer_id}/invoices")))
            .send()
            .await?;
        let resp = expect_status(resp, StatusCode::OK).await?;
        Ok(resp.json().await?)
    }

    /// Fetch the line items of one invoice, each joined with its product.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failures or a non-200 answer.
    pub async fn invoice_items(&self, invoice_id: i32) -> Result<Vec<InvoiceItem>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/invoice/{invoice_id}")))
            .send()
            .await?;
        let resp = expect_status(resp, StatusCode::OK).await?;
        let wire: InvoiceDetailWire = resp.json().await?;
        wire.items.into_iter().map(InvoiceItem::try_from).collect()
    }

    /// Create an invoice with all of its lines and return the generated id,
    /// parsed from the `Location` header.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failures, a non-201 answer
    /// (409 for an unknown customer), or a missing `Location` header.
    pub async fn create_invoice(&self, new_invoice: &NewInvoice) -> Result<i32, ClientError> {
        let items = new_invoice
            .items
            .iter()
            .map(|item| {
                Ok(NewInvoiceItemWire {
                    product_name: &item.product_name,
                    price: decimal_to_wire(item.price)?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;
        let body = NewInvoiceWire {
            customer_id: new_invoice.customer_id,
            timestamp: new_invoice.timestamp,
            items,
        };
        let resp = self
            .http
            .post(self.url("/invoice"))
            .json(&body)
            .send()
            .await?;
        let resp = expect_status(resp, StatusCode::CREATED).await?;
        id_from_location(&resp)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn expect_status(
    resp: reqwest::Response,
    expected: StatusCode,
) -> Result<reqwest::Response, ClientError> {
    if resp.status() == expected {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let problem = resp.json::<ProblemWire>().await.unwrap_or_default();
    let code = problem
        .code
        .or(problem.title)
        .unwrap_or_else(|| "UNKNOWN".to_owned());
    Err(ClientError::unexpected(status, code, problem.detail))
}

fn id_from_location(resp: &reqwest::Response) -> Result<i32, ClientError> {
    resp.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|path| path.rsplit('/').next())
        .and_then(|id| id.parse::<i32>().ok())
        .ok_or(ClientError::BadLocation)
}

fn decimal_from_wire(value: f64) -> Result<Decimal, ClientError> {
    Decimal::from_f64(value)
        .ok_or_else(|| ClientError::decode(format!("non-finite amount: {value}")))
}

fn decimal_to_wire(value: Decimal) -> Result<f64, ClientError> {
    value
        .to_f64()
        .ok_or_else(|| ClientError::decode(format!("amount out of range: {value}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerWire {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<CustomerWire> for Customer {
    fn from(w: CustomerWire) -> Self {
        Self {
            id: w.id,
            first_name: w.first_name,
            last_name: w.last_name,
            email: w.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewCustomerWire<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct AddressWire {
    street: String,
    city: String,
    country: String,
}

impl From<AddressWire> for Address {
    fn from(w: AddressWire) -> Self {
        Self {
            street: w.street,
            city: w.city,
            country: w.country,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InvoiceDetailWire {
    items: Vec<InvoiceItemWire>,
}

#[derive(Debug, Deserialize)]
struct InvoiceItemWire {
    quantity: i32,
    product: ProductWire,
}

#[derive(Debug, Deserialize)]
struct ProductWire {
    name: String,
    price: f64,
}

impl TryFrom<InvoiceItemWire> for InvoiceItem {
    type Error = ClientError;

    fn try_from(w: InvoiceItemWire) -> Result<Self, Self::Error> {
        Ok(Self {
            quantity: w.quantity,
            product: Product {
                name: w.product.name,
                price: decimal_from_wire(w.product.price)?,
            },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewInvoiceWire<'a> {
    customer_id: i32,
    timestamp: DateTime<Utc>,
    #[serde(rename = "invoiceItemList")]
    items: Vec<NewInvoiceItemWire<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewInvoiceItemWire<'a> {
    product_name: &'a str,
    price: f64,
    quantity: i32,
}

/// Subset of the RFC 9457 problem body that error reporting needs.
/// Defaults cover error answers with no parsable body at all.
#[derive(Debug, Default, Deserialize)]
struct ProblemWire {
    title: Option<String>,
    detail: Option<String>,
    code: Option<String>,
}
