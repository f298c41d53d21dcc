use crate::{
    domain::requests::CreateUserRequest, errors::RepositoryError, model::user::UserModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynUserCommandRepository = Arc<dyn UserCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait UserCommandRepositoryTrait {
    async fn create(&self, req: &CreateUserRequest) -> Result<UserModel, RepositoryError>;
}
