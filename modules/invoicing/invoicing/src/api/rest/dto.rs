use chrono::{DateTime, NaiveTime, Utc};
use invoicing_sdk::{
    Address, Customer, InvoiceItem, InvoiceSummary, NewCustomer, NewInvoice, NewInvoiceItem,
};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::DomainError;

/// REST DTO for customer representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// REST DTO for creating a new customer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerReq {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// REST DTO for an address of a customer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressDto {
    pub street: String,
    pub city: String,
    pub country: String,
}

/// REST DTO for one row of a customer's invoice list.
///
/// This is the coarse archive view: the stored day widens to an instant at
/// midnight UTC and the exact decimal total is truncated to a whole amount.
/// The precise figures stay in storage; clients needing them read the
/// invoice detail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: i32,
    pub timestamp: DateTime<Utc>,
    pub total_amount: i64,
}

/// REST DTO for the detail view of one invoice
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceDetailDto {
    pub items: Vec<InvoiceItemDto>,
}

/// REST DTO for an invoice line joined with its product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceItemDto {
    pub quantity: i32,
    pub product: ProductDto,
}

/// REST DTO for the product referenced by an invoice line
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub name: String,
    pub price: f64,
}

/// REST DTO for posting a new invoice
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceReq {
    pub customer_id: i32,
    pub timestamp: DateTime<Utc>,
    pub invoice_item_list: Vec<CreateInvoiceItemReq>,
}

/// One line of a posted invoice
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceItemReq {
    pub product_name: String,
    pub price: f64,
    pub quantity: i32,
}

// Conversion implementations between REST DTOs and contract models

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
        }
    }
}

impl From<CreateCustomerReq> for NewCustomer {
    fn from(req: CreateCustomerReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        }
    }
}

impl From<Address> for AddressDto {
    fn from(address: Address) -> Self {
        Self {
            street: address.street,
            city: address.city,
            country: address.country,
        }
    }
}

impl From<InvoiceSummary> for InvoiceDto {
    fn from(summary: InvoiceSummary) -> Self {
        let total = summary.total_amount.unwrap_or(Decimal::ZERO);
        Self {
            id: summary.id,
            timestamp: summary.invoice_date.and_time(NaiveTime::MIN).and_utc(),
            total_amount: total.trunc().to_i64().unwrap_or_default(),
        }
    }
}

impl From<InvoiceItem> for InvoiceItemDto {
    fn from(item: InvoiceItem) -> Self {
        Self {
            quantity: item.quantity,
            product: ProductDto {
                name: item.product.name,
                price: item.product.price.to_f64().unwrap_or_default(),
            },
        }
    }
}

impl TryFrom<CreateInvoiceReq> for NewInvoice {
    type Error = DomainError;

    fn try_from(req: CreateInvoiceReq) -> Result<Self, Self::Error> {
        let items = req
            .invoice_item_list
            .into_iter()
            .map(NewInvoiceItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            customer_id: req.customer_id,
            timestamp: req.timestamp,
            items,
        })
    }
}

impl TryFrom<CreateInvoiceItemReq> for NewInvoiceItem {
    type Error = DomainError;

    fn try_from(req: CreateInvoiceItemReq) -> Result<Self, Self::Error> {
        // JSON has no NaN or infinity literal, so this only trips on
        // hand-built requests.
        let price = Decimal::from_f64(req.price)
            .ok_or_else(|| DomainError::validation("price", "must be a finite number"))?;
        Ok(Self {
            product_name: req.product_name,
            price,
            quantity: req.quantity,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use chrono::NaiveDate;
    use invoicing_sdk::{InvoiceItem, InvoiceSummary, NewInvoice, Product};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::{CreateInvoiceReq, InvoiceDto, InvoiceItemDto};

    fn summary(total: Option<Decimal>) -> InvoiceSummary {
        InvoiceSummary {
            id: 7,
            invoice_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            total_amount: total,
        }
    }

    #[test]
    fn list_view_widens_day_to_midnight_utc() {
        let dto = InvoiceDto::from(summary(Some(Decimal::new(2575, 2))));
        assert_eq!(
            dto.timestamp.to_rfc3339(),
            "2024-03-07T00:00:00+00:00".to_owned()
        );
    }

    #[test]
    fn list_view_truncates_total_toward_zero() {
        let dto = InvoiceDto::from(summary(Some(Decimal::new(2575, 2))));
        assert_eq!(dto.total_amount, 25);

        let dto = InvoiceDto::from(summary(Some(Decimal::new(-90, 2))));
        assert_eq!(dto.total_amount, 0);
    }

    #[test]
    fn list_view_maps_missing_total_to_zero() {
        let dto = InvoiceDto::from(summary(None));
        assert_eq!(dto.total_amount, 0);
    }

    #[test]
    fn list_view_serializes_camel_case() {
        let dto = InvoiceDto::from(summary(Some(Decimal::new(100, 0))));
        let value = serde_json::to_value(dto).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "timestamp": "2024-03-07T00:00:00Z",
                "totalAmount": 100,
            })
        );
    }

    #[test]
    fn item_view_carries_product_price_as_number() {
        let dto = InvoiceItemDto::from(InvoiceItem {
            quantity: 3,
            product: Product {
                name: "Pencil".to_owned(),
                price: Decimal::new(125, 1),
            },
        });
        let value = serde_json::to_value(dto).unwrap();
        assert_eq!(
            value,
            json!({
                "quantity": 3,
                "product": {"name": "Pencil", "price": 12.5},
            })
        );
    }

    #[test]
    fn create_invoice_request_parses_item_list_exactly() {
        let req: CreateInvoiceReq = serde_json::from_value(json!({
            "customerId": 4,
            "timestamp": "2024-03-07T14:23:05Z",
            "invoiceItemList": [
                {"productName": "Pencil", "price": 0.1, "quantity": 3}
            ]
        }))
        .unwrap();

        let new_invoice = NewInvoice::try_from(req).unwrap();
        assert_eq!(new_invoice.customer_id, 4);
        assert_eq!(new_invoice.items.len(), 1);
        // 0.1 arrives as the shortest round-trip decimal, not a binary
        // artifact like 0.1000000000000000055511151231257827.
        assert_eq!(new_invoice.items[0].price, Decimal::new(1, 1));
    }
}
