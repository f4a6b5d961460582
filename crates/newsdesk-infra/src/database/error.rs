//! Mapping of SeaORM errors onto repository errors.

use sea_orm::{DbErr, SqlErr};

use newsdesk_core::error::RepoError;

/// Classify a database error for the domain layer.
pub(crate) fn repo_err(err: DbErr) -> RepoError {
    if matches!(err, DbErr::ConnectionAcquire(_) | DbErr::Conn(_)) {
        return RepoError::Connection(err.to_string());
    }

    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => RepoError::Query(err.to_string()),
    }
}
