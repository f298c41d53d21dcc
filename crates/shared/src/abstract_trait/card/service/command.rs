use crate::{
    domain::requests::{
        CreateCardRequest, DepositBalanceRequest, TransferBalanceRequest, UpdateCardStatusRequest,
        WithdrawBalanceRequest,
    },
    domain::responses::{ApiResponse, CardResponse},
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCardCommandService = Arc<dyn CardCommandServiceTrait + Send + Sync>;

/// Mutating card operations. Every owner-scoped method takes the
/// authenticated owner id and refuses to touch cards that belong to anyone
/// else (the check is part of the storage predicate, not a separate step).
#[async_trait]
pub trait CardCommandServiceTrait {
    /// A fresh Luhn-valid demo card number with the configured BIN prefix.
    fn generate_number(&self) -> String;

    async fn create(&self, req: &CreateCardRequest)
    -> Result<ApiResponse<CardResponse>, ServiceError>;

    async fn block_request(
        &self,
        user_id: i32,
        card_id: i32,
    ) -> Result<ApiResponse<CardResponse>, ServiceError>;

    async fn withdraw(
        &self,
        user_id: i32,
        req: &WithdrawBalanceRequest,
    ) -> Result<ApiResponse<bool>, ServiceError>;

    async fn deposit(
        &self,
        user_id: i32,
        req: &DepositBalanceRequest,
    ) -> Result<ApiResponse<bool>, ServiceError>;

    async fn transfer(
        &self,
        user_id: i32,
        req: &TransferBalanceRequest,
    ) -> Result<ApiResponse<bool>, ServiceError>;

    async fn change_status(
        &self,
        card_id: i32,
        req: &UpdateCardStatusRequest,
    ) -> Result<ApiResponse<CardResponse>, ServiceError>;

    async fn delete(&self, card_id: i32) -> Result<ApiResponse<bool>, ServiceError>;
}
