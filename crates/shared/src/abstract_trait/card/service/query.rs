use crate::{
    domain::responses::{ApiResponse, CardResponse},
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCardQueryService = Arc<dyn CardQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait CardQueryServiceTrait {
    async fn find_by_id(&self, card_id: i32) -> Result<ApiResponse<CardResponse>, ServiceError>;

    async fn find_by_user(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<CardResponse>>, ServiceError>;

    /// Total balance across one owner's cards, as a scale-2 decimal string.
    async fn total_balance(&self, user_id: i32) -> Result<ApiResponse<String>, ServiceError>;
}
