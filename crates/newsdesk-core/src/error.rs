//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// `Storage` carries no detail; the underlying cause is logged where the
/// repository error is converted.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage is temporarily unavailable")]
    StorageUnavailable,

    #[error("Storage failure")]
    Storage,
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: impl Into<i64>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }
}

/// Result alias for service operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    /// No pooled connection could be acquired, or the connection broke.
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    /// Unique or foreign-key constraint violation.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity_type, id } => DomainError::NotFound { entity_type, id },
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!(error = %msg, "Database connection unavailable");
                DomainError::StorageUnavailable
            }
            RepoError::Query(msg) => {
                tracing::error!(error = %msg, "Database query failed");
                DomainError::Storage
            }
        }
    }
}
