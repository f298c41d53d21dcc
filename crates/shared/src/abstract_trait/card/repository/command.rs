use crate::{
    domain::requests::{CreateCardRecord, TransferCardBalance, UpdateCardBalance},
    errors::RepositoryError,
    model::card::{CardModel, CardStatus},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCardCommandRepository = Arc<dyn CardCommandRepositoryTrait + Send + Sync>;

/// The write side of the card ledger. Every balance mutation goes through
/// here, and nothing else is allowed to touch `balance`, `status` or
/// `to_block`.
#[async_trait]
pub trait CardCommandRepositoryTrait {
    async fn create(&self, req: &CreateCardRecord) -> Result<CardModel, RepositoryError>;

    /// Conditional debit. Returns the number of rows changed (0 or 1); zero
    /// means some precondition (owner, status, block flag, funds) failed.
    async fn withdraw(&self, req: &UpdateCardBalance) -> Result<u64, RepositoryError>;

    /// Conditional credit under the same owner/status/block predicate.
    async fn deposit(&self, req: &UpdateCardBalance) -> Result<u64, RepositoryError>;

    /// Both transfer legs in one transaction. `false` means a leg was
    /// rejected and the whole transfer rolled back.
    async fn transfer(&self, req: &TransferCardBalance) -> Result<bool, RepositoryError>;

    /// Flags the card for blocking by an administrator; does not change the
    /// status itself. `None` when the card/owner predicate did not match.
    async fn set_to_block(
        &self,
        card_id: i32,
        user_id: i32,
    ) -> Result<Option<CardModel>, RepositoryError>;

    /// Status change under a row lock, checked against the transition table.
    async fn update_status(
        &self,
        card_id: i32,
        new_status: CardStatus,
    ) -> Result<CardModel, RepositoryError>;

    /// Deletes a card that is out of circulation (BLOCKED or EXPIRED).
    async fn delete(&self, card_id: i32) -> Result<CardModel, RepositoryError>;
}
