use async_trait::async_trait;
use invoicing_sdk::{Customer, NewCustomer};
use sqlx::PgPool;

use crate::domain::error::DomainError;
use crate::domain::repo::CustomersRepository;
use crate::infra::storage::db::{sqlx_err, sqlx_is_unique_violation};

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
        }
    }
}

/// Query-builder implementation of the `CustomersRepository` trait on Postgres.
#[derive(Clone)]
pub struct SqlxCustomersRepository {
    pool: PgPool,
}

impl SqlxCustomersRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomersRepository for SqlxCustomersRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, DomainError> {
        let rows: Vec<CustomerRow> =
            sqlx::query_as("SELECT id, first_name, last_name, email FROM customer ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(sqlx_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, DomainError> {
        let row: CustomerRow = sqlx::query_as(
            "INSERT INTO customer (first_name, last_name, email) \
             VALUES ($1, $2, $3) \
             RETURNING id, first_name, last_name, email",
        )
        .bind(&new_customer.first_name)
        .bind(&new_customer.last_name)
        .bind(&new_customer.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if sqlx_is_unique_violation(&e) {
                DomainError::email_taken(new_customer.email.clone())
            } else {
                sqlx_err(e)
            }
        })?;

        Ok(row.into())
    }
}
