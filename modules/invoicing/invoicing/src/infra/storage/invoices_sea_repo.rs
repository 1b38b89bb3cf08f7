use async_trait::async_trait;
use invoicing_sdk::{InvoiceItem, InvoiceSummary, NewInvoice};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::calc;
use crate::domain::error::DomainError;
use crate::domain::repo::InvoicesRepository;
use crate::infra::storage::db::{db_err, is_foreign_key_violation};
use crate::infra::storage::entity::{invoice, invoice_item, product};
use crate::infra::storage::mapper;

/// ORM-based implementation of the `InvoicesRepository` trait.
#[derive(Clone)]
pub struct OrmInvoicesRepository {
    db: DatabaseConnection,
}

impl OrmInvoicesRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvoicesRepository for OrmInvoicesRepository {
    async fn list_by_customer(
        &self,
        customer_id: i32,
    ) -> Result<Vec<InvoiceSummary>, DomainError> {
        let rows = invoice::Entity::find()
            .filter(invoice::Column::CustomerId.eq(customer_id))
            .order_by_asc(invoice::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_items(&self, invoice_id: i32) -> Result<Vec<InvoiceItem>, DomainError> {
        let rows = invoice_item::Entity::find()
            .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(invoice_item::Column::Id)
            .find_also_related(product::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|(item, product)| {
                let product = product.ok_or_else(|| {
                    DomainError::database(format!("invoice item {} has no product row", item.id))
                })?;
                Ok(mapper::item_with_product(item, product))
            })
            .collect()
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

        let txn = self.db.begin().await.map_err(db_err)?;

        let header = invoice::ActiveModel {
            invoice_date: Set(invoice_date),
            total_amount: Set(Some(total)),
            customer_id: Set(customer_id),
            ..Default::default()
        };
        let header = header.insert(&txn).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::unknown_customer(customer_id)
            } else {
                db_err(e)
            }
        })?;

        // One product row per line, even when names repeat. Lines on older
        // invoices keep pointing at the exact row they were priced from.
        for item in new_invoice.items {
            let product_row = product::ActiveModel {
                product_name: Set(item.product_name),
                price: Set(item.price),
                ..Default::default()
            };
            let product_row = product_row.insert(&txn).await.map_err(db_err)?;

            let line = invoice_item::ActiveModel {
                quantity: Set(item.quantity),
                unit_price: Set(item.price),
                invoice_id: Set(header.id),
                product_id: Set(product_row.id),
                ..Default::default()
            };
            line.insert(&txn).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;

        Ok(header.id)
    }
}
