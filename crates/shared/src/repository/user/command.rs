use crate::{
    abstract_trait::user::repository::command::UserCommandRepositoryTrait, config::ConnectionPool,
    domain::requests::CreateUserRequest, errors::RepositoryError, model::user::UserModel,
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

pub struct UserCommandRepository {
    db: ConnectionPool,
}

impl UserCommandRepository {
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
impl UserCommandRepositoryTrait for UserCommandRepository {
    async fn create(&self, req: &CreateUserRequest) -> Result<UserModel, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let user = sqlx::query_as::<_, UserModel>(
            r#"
            INSERT INTO users (email, first_name, last_name, created_at, updated_at)
            VALUES ($1, $2, $3, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING user_id, email, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    error!("❌ User already registered: {}", req.email);
                    return RepositoryError::Conflict("Email already registered".into());
                }
            }
            error!("❌ Failed to create user: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(user)
    }
}
