use async_trait::async_trait;
use invoicing_sdk::Address;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::error::DomainError;
use crate::domain::repo::AddressesRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::address;

/// ORM-based implementation of the `AddressesRepository` trait.
#[derive(Clone)]
pub struct OrmAddressesRepository {
    db: DatabaseConnection,
}

impl OrmAddressesRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressesRepository for OrmAddressesRepository {
    async fn list_by_customer(&self, customer_id: i32) -> Result<Vec<Address>, DomainError> {
        let rows = address::Entity::find()
            .filter(address::Column::CustomerId.eq(customer_id))
            .order_by_asc(address::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
