use crate::{
    abstract_trait::card::repository::query::CardQueryRepositoryTrait, config::ConnectionPool,
    errors::RepositoryError, model::card::CardModel,
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

pub struct CardQueryRepository {
    db: ConnectionPool,
}

impl CardQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn get_conn(
        &self,
    ) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, RepositoryError> {
        self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {e:?}");
            RepositoryError::from(e)
        })
    }
}

#[async_trait]
impl CardQueryRepositoryTrait for CardQueryRepository {
    async fn find_by_id(&self, card_id: i32) -> Result<CardModel, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let card = sqlx::query_as::<_, CardModel>(
            r#"
            SELECT
                card_id,
                user_id,
                card_holder,
                card_number,
                expiry_date,
                status,
                to_block,
                balance,
                created_at,
                updated_at
            FROM cards
            WHERE card_id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch card {card_id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        card.ok_or(RepositoryError::NotFound)
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<CardModel>, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let cards = sqlx::query_as::<_, CardModel>(
            r#"
            SELECT
                card_id,
                user_id,
                card_holder,
                card_number,
                expiry_date,
                status,
                to_block,
                balance,
                created_at,
                updated_at
            FROM cards
            WHERE user_id = $1
            ORDER BY card_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to list cards for user {user_id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(cards)
    }

    async fn sum_balance(&self, user_id: i32) -> Result<i64, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(balance), 0)::BIGINT FROM cards WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to sum balance for user {user_id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(total)
    }
}
