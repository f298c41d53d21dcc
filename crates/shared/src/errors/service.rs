use crate::errors::repository::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid card number: {0}")]
    InvalidCardNumber(String),

    #[error("{0} not found")]
    NotFound(String),

    /// A conditional ledger update touched zero rows. Deliberately coarse:
    /// wrong owner, blocked card, non-active status and insufficient funds
    /// all surface the same way.
    #[error("Operation rejected")]
    OperationRejected,

    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Custom error: {0}")]
    Custom(String),
}
