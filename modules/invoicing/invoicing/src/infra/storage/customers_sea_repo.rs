use async_trait::async_trait;
use invoicing_sdk::{Customer, NewCustomer};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::error::DomainError;
use crate::domain::repo::CustomersRepository;
use crate::infra::storage::db::{db_err, is_unique_violation};
use crate::infra::storage::entity::customer;

/// ORM-based implementation of the `CustomersRepository` trait.
#[derive(Clone)]
pub struct OrmCustomersRepository {
    db: DatabaseConnection,
}

impl OrmCustomersRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomersRepository for OrmCustomersRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, DomainError> {
        let rows = customer::Entity::find()
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, DomainError> {
        let email = new_customer.email.clone();
        let m = customer::ActiveModel {
            first_name: Set(new_customer.first_name),
            last_name: Set(new_customer.last_name),
            email: Set(new_customer.email),
            ..Default::default()
        };

        let inserted = m.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::email_taken(email)
            } else {
                db_err(e)
            }
        })?;

        Ok(inserted.into())
    }
}
