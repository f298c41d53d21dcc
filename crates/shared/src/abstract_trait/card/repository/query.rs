use crate::{errors::RepositoryError, model::card::CardModel};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCardQueryRepository = Arc<dyn CardQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait CardQueryRepositoryTrait {
    async fn find_by_id(&self, card_id: i32) -> Result<CardModel, RepositoryError>;

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<CardModel>, RepositoryError>;

    /// Advisory aggregate over one owner's cards; not used to gate writes.
    async fn sum_balance(&self, user_id: i32) -> Result<i64, RepositoryError>;
}
