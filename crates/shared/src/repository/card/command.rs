use crate::{
    abstract_trait::card::repository::command::CardCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{CreateCardRecord, TransferCardBalance, UpdateCardBalance},
    errors::RepositoryError,
    model::card::{CardModel, CardStatus},
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};
use tracing::error;

/// Conditional debit. The predicate carries every precondition (owner,
/// status, block flag, funds) so the statement itself is the concurrency
/// control: the row-level write lock serializes concurrent attempts and
/// only one of them can still observe `balance >= amount`.
const WITHDRAW_SQL: &str = r#"
    UPDATE cards
    SET balance = balance - $3, updated_at = CURRENT_TIMESTAMP
    WHERE card_id = $1
      AND user_id = $2
      AND status = 'ACTIVE'
      AND to_block = FALSE
      AND balance >= $3
"#;

/// Mirror credit; no balance floor is needed for a deposit.
const DEPOSIT_SQL: &str = r#"
    UPDATE cards
    SET balance = balance + $3, updated_at = CURRENT_TIMESTAMP
    WHERE card_id = $1
      AND user_id = $2
      AND status = 'ACTIVE'
      AND to_block = FALSE
"#;

pub struct CardCommandRepository {
    db: ConnectionPool,
}

impl CardCommandRepository {
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

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin transaction: {e:?}");
            RepositoryError::from(e)
        })
    }

    /// Locks the card row for the rest of the enclosing transaction. Used
    /// by the read-then-write sequences (status change, delete) that a
    /// single conditional UPDATE predicate cannot express.
    async fn find_by_id_for_update(
        conn: &mut PgConnection,
        card_id: i32,
    ) -> Result<CardModel, RepositoryError> {
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
            FOR UPDATE
            "#,
        )
        .bind(card_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to lock card {card_id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        card.ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl CardCommandRepositoryTrait for CardCommandRepository {
    async fn create(&self, req: &CreateCardRecord) -> Result<CardModel, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let card = sqlx::query_as::<_, CardModel>(
            r#"
            INSERT INTO cards (
                user_id,
                card_holder,
                card_number,
                expiry_date,
                balance,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING
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
            "#,
        )
        .bind(req.user_id)
        .bind(&req.card_holder)
        .bind(&req.card_number)
        .bind(req.expiry_date)
        .bind(req.balance)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    error!("❌ Card already registered for user {}", req.user_id);
                    return RepositoryError::Conflict("Card already registered".into());
                }
                if db.is_foreign_key_violation() {
                    error!("❌ Owner {} does not exist", req.user_id);
                    return RepositoryError::ForeignKey(format!(
                        "user {} does not exist",
                        req.user_id
                    ));
                }
            }
            error!("❌ Failed to create card: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(card)
    }

    async fn withdraw(&self, req: &UpdateCardBalance) -> Result<u64, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let result = sqlx::query(WITHDRAW_SQL)
            .bind(req.card_id)
            .bind(req.user_id)
            .bind(req.amount)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to withdraw from card {}: {e:?}", req.card_id);
                RepositoryError::Sqlx(e)
            })?;

        Ok(result.rows_affected())
    }

    async fn deposit(&self, req: &UpdateCardBalance) -> Result<u64, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let result = sqlx::query(DEPOSIT_SQL)
            .bind(req.card_id)
            .bind(req.user_id)
            .bind(req.amount)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to deposit to card {}: {e:?}", req.card_id);
                RepositoryError::Sqlx(e)
            })?;

        Ok(result.rows_affected())
    }

    async fn transfer(&self, req: &TransferCardBalance) -> Result<bool, RepositoryError> {
        let mut tx = self.begin().await?;

        // Both legs commit or neither does. They run in ascending card id
        // order so two opposing transfers cannot deadlock on row locks.
        let mut legs = [
            (req.from_card_id, WITHDRAW_SQL),
            (req.to_card_id, DEPOSIT_SQL),
        ];
        legs.sort_by_key(|(card_id, _)| *card_id);

        for (card_id, sql) in legs {
            let result = sqlx::query(sql)
                .bind(card_id)
                .bind(req.user_id)
                .bind(req.amount)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("❌ Transfer leg failed for card {card_id}: {e:?}");
                    RepositoryError::Sqlx(e)
                })?;

            if result.rows_affected() == 0 {
                tx.rollback().await.map_err(|e| {
                    error!("❌ Failed to roll back rejected transfer: {e:?}");
                    RepositoryError::Sqlx(e)
                })?;
                return Ok(false);
            }
        }

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit transfer: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(true)
    }

    async fn set_to_block(
        &self,
        card_id: i32,
        user_id: i32,
    ) -> Result<Option<CardModel>, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let card = sqlx::query_as::<_, CardModel>(
            r#"
            UPDATE cards
            SET to_block = TRUE, updated_at = CURRENT_TIMESTAMP
            WHERE card_id = $1 AND user_id = $2
            RETURNING
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
            "#,
        )
        .bind(card_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to flag card {card_id} for blocking: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(card)
    }

    async fn update_status(
        &self,
        card_id: i32,
        new_status: CardStatus,
    ) -> Result<CardModel, RepositoryError> {
        let mut tx = self.begin().await?;

        // The lock keeps the transition check from racing a concurrent
        // transfer or another status change on the same row.
        let card = Self::find_by_id_for_update(&mut tx, card_id).await?;

        card.status.transition_to(new_status).map_err(|e| {
            error!("❌ Rejected status change for card {card_id}: {e}");
            RepositoryError::from(e)
        })?;

        let updated = sqlx::query_as::<_, CardModel>(
            r#"
            UPDATE cards
            SET status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE card_id = $1
            RETURNING
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
            "#,
        )
        .bind(card_id)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Failed to update status of card {card_id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit status change: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(updated)
    }

    async fn delete(&self, card_id: i32) -> Result<CardModel, RepositoryError> {
        let mut tx = self.begin().await?;

        let card = Self::find_by_id_for_update(&mut tx, card_id).await?;

        if !card.status.is_deletable() {
            error!(
                "❌ Refusing to delete card {card_id} in status {}",
                card.status
            );
            return Err(RepositoryError::NotDeletable(card.status));
        }

        sqlx::query("DELETE FROM cards WHERE card_id = $1")
            .bind(card_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete card {card_id}: {e:?}");
                RepositoryError::Sqlx(e)
            })?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit card deletion: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(card)
    }
}
