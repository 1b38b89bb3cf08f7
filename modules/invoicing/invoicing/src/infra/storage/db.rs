//! Error collapsing and constraint classification shared by both backends.
//!
//! Repositories surface two constraint failures as distinguishable domain
//! errors (duplicate customer email, missing invoice customer); everything
//! else collapses into an opaque `DomainError::Database`.

use sea_orm::{DbErr, SqlErr};

use crate::domain::error::DomainError;

/// Collapse a SeaORM error into an opaque domain database error.
#[must_use]
pub fn db_err(e: DbErr) -> DomainError {
    DomainError::database(e.to_string())
}

/// True when the SeaORM error is a unique-constraint violation, on any of
/// the supported engines.
#[must_use]
pub fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True when the SeaORM error is a foreign-key violation, on any of the
/// supported engines.
#[must_use]
pub fn is_foreign_key_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Collapse a sqlx error into an opaque domain database error.
#[must_use]
pub fn sqlx_err(e: sqlx::Error) -> DomainError {
    DomainError::database(e.to_string())
}

/// True when the sqlx error is a unique-constraint violation.
#[must_use]
pub fn sqlx_is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation))
}

/// True when the sqlx error is a foreign-key violation.
#[must_use]
pub fn sqlx_is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation))
}
