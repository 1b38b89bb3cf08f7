use async_trait::async_trait;
use invoicing_sdk::Address;
use sqlx::PgPool;

use crate::domain::error::DomainError;
use crate::domain::repo::AddressesRepository;
use crate::infra::storage::db::sqlx_err;

#[derive(sqlx::FromRow)]
struct AddressRow {
    street: String,
    city: String,
    country: String,
}

impl From<AddressRow> for Address {
    fn from(r: AddressRow) -> Self {
        Self {
            street: r.street,
            city: r.city,
            country: r.country,
        }
    }
}

/// Query-builder implementation of the `AddressesRepository` trait on Postgres.
#[derive(Clone)]
pub struct SqlxAddressesRepository {
    pool: PgPool,
}

impl SqlxAddressesRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressesRepository for SqlxAddressesRepository {
    async fn list_by_customer(&self, customer_id: i32) -> Result<Vec<Address>, DomainError> {
        let rows: Vec<AddressRow> = sqlx::query_as(
            "SELECT street, city, country FROM address WHERE customer_id = $1 ORDER BY id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
