use crate::{
    abstract_trait::card::{
        repository::query::DynCardQueryRepository, service::query::CardQueryServiceTrait,
    },
    domain::responses::{ApiResponse, CardResponse},
    errors::{RepositoryError, ServiceError},
    model::card::CardModel,
    utils::{CardCipher, mask, money},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

pub struct CardQueryService {
    query: DynCardQueryRepository,
    cipher: Arc<CardCipher>,
}

impl CardQueryService {
    pub async fn new(query: DynCardQueryRepository, cipher: Arc<CardCipher>) -> Self {
        Self { query, cipher }
    }

    fn to_response(&self, card: &CardModel) -> Result<CardResponse, ServiceError> {
        let plain = self.cipher.decrypt(&card.card_number).map_err(|e| {
            error!(
                "💥 Failed to decrypt stored number of card {}: {e:?}",
                card.card_id
            );
            ServiceError::Internal("card number decryption failed".into())
        })?;

        Ok(CardResponse::from_model(card, mask(&plain)))
    }
}

#[async_trait]
impl CardQueryServiceTrait for CardQueryService {
    async fn find_by_id(&self, card_id: i32) -> Result<ApiResponse<CardResponse>, ServiceError> {
        info!("🔍 Fetching card {card_id}");

        let card = match self.query.find_by_id(card_id).await {
            Ok(card) => card,
            Err(RepositoryError::NotFound) => {
                return Err(ServiceError::NotFound(format!("card {card_id}")));
            }
            Err(e) => {
                error!("❌ Failed to fetch card {card_id}: {e:?}");
                return Err(ServiceError::Repo(e));
            }
        };

        Ok(ApiResponse {
            status: "success".into(),
            message: "Card fetched successfully".into(),
            data: self.to_response(&card)?,
        })
    }

    async fn find_by_user(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<CardResponse>>, ServiceError> {
        info!("🔍 Listing cards of user {user_id}");

        let cards = self.query.find_by_user(user_id).await.map_err(|e| {
            error!("❌ Failed to list cards of user {user_id}: {e:?}");
            ServiceError::Repo(e)
        })?;

        let responses = cards
            .iter()
            .map(|card| self.to_response(card))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ApiResponse {
            status: "success".into(),
            message: "Cards fetched successfully".into(),
            data: responses,
        })
    }

    async fn total_balance(&self, user_id: i32) -> Result<ApiResponse<String>, ServiceError> {
        info!("🧮 Summing balance of user {user_id}");

        let total = self.query.sum_balance(user_id).await.map_err(|e| {
            error!("❌ Failed to sum balance of user {user_id}: {e:?}");
            ServiceError::Repo(e)
        })?;

        Ok(ApiResponse {
            status: "success".into(),
            message: "Total balance fetched successfully".into(),
            data: money::to_decimal(total).to_string(),
        })
    }
}
