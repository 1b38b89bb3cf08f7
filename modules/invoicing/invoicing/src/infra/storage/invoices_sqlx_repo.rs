use async_trait::async_trait;
use chrono::NaiveDate;
use invoicing_sdk::{InvoiceItem, InvoiceSummary, NewInvoice, Product};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::calc;
use crate::domain::error::DomainError;
use crate::domain::repo::InvoicesRepository;
use crate::infra::storage::db::{sqlx_err, sqlx_is_foreign_key_violation};

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: i32,
    invoice_date: NaiveDate,
    total_amount: Option<Decimal>,
}

impl From<InvoiceRow> for InvoiceSummary {
    fn from(r: InvoiceRow) -> Self {
        Self {
            id: r.id,
            invoice_date: r.invoice_date,
            total_amount: r.total_amount,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    quantity: i32,
    product_name: String,
    price: Decimal,
}

impl From<ItemRow> for InvoiceItem {
    fn from(r: ItemRow) -> Self {
        Self {
            quantity: r.quantity,
            product: Product {
                name: r.product_name,
                price: r.price,
            },
        }
    }
}

/// Query-builder implementation of the `InvoicesRepository` trait on Postgres.
#[derive(Clone)]
pub struct SqlxInvoicesRepository {
    pool: PgPool,
}

impl SqlxInvoicesRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoicesRepository for SqlxInvoicesRepository {
    async fn list_by_customer(
        &self,
        customer_id: i32,
    ) -> Result<Vec<InvoiceSummary>, DomainError> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(
            "SELECT id, invoice_date, total_amount FROM invoice \
             WHERE customer_id = $1 ORDER BY id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_items(&self, invoice_id: i32) -> Result<Vec<InvoiceItem>, DomainError> {
        // The item view joins the current product row; the unit_price frozen
        // on the line is not surfaced here.
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT ii.quantity, p.product_name, p.price \
             FROM invoice_item ii \
             JOIN product p ON p.id = ii.product_id \
             WHERE ii.invoice_id = $1 ORDER BY ii.id",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_invoice(&self, new_invoice: NewInvoice) -> Result<i32, DomainError> {
        // The service rejects empty item lists already; repeating the check
        // here keeps a zero-line header out of the store no matter who calls.
        if new_invoice.items.is_empty() {
            return Err(DomainError::validation(
                "invoiceItemList",
                "must not be empty",
            ));
        }

        let customer_id = new_invoice.customer_id;
        let total = calc::invoice_total(&new_invoice.items);
        let invoice_date = calc::invoice_date(new_invoice.timestamp);

        let mut txn = self.pool.begin().await.map_err(sqlx_err)?;

        let invoice_id: i32 = sqlx::query_scalar(
            "INSERT INTO invoice (invoice_date, total_amount, customer_id) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(invoice_date)
        .bind(total)
        .bind(customer_id)
        .fetch_one(&mut *txn)
        .await
        .map_err(|e| {
            if sqlx_is_foreign_key_violation(&e) {
                DomainError::unknown_customer(customer_id)
            } else {
                sqlx_err(e)
            }
        })?;

        // One product row per line, even when names repeat.
        for item in &new_invoice.items {
            let product_id: i32 = sqlx::query_scalar(
                "INSERT INTO product (product_name, price) VALUES ($1, $2) RETURNING id",
            )
            .bind(&item.product_name)
            .bind(item.price)
            .fetch_one(&mut *txn)
            .await
            .map_err(sqlx_err)?;

            sqlx::query(
                "INSERT INTO invoice_item (quantity, unit_price, invoice_id, product_id) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(item.quantity)
            .bind(item.price)
            .bind(invoice_id)
            .bind(product_id)
            .execute(&mut *txn)
            .await
            .map_err(sqlx_err)?;
        }

        txn.commit().await.map_err(sqlx_err)?;

        Ok(invoice_id)
    }
}
