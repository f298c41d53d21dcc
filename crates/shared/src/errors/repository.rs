use crate::model::card::{CardStatus, StatusTransitionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error(transparent)]
    Transition(#[from] StatusTransitionError),

    #[error("card is {0}, only BLOCKED or EXPIRED cards can be deleted")]
    NotDeletable(CardStatus),

    #[error("Custom error: {0}")]
    Custom(String),
}
