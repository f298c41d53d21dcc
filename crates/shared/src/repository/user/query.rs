use crate::{
    abstract_trait::user::repository::query::UserQueryRepositoryTrait, config::ConnectionPool,
    errors::RepositoryError, model::user::UserModel,
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::error;

pub struct UserQueryRepository {
    db: ConnectionPool,
}

impl UserQueryRepository {
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
impl UserQueryRepositoryTrait for UserQueryRepository {
    async fn find_by_id(&self, user_id: i32) -> Result<UserModel, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let user = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT user_id, email, first_name, last_name, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch user {user_id}: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        user.ok_or(RepositoryError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        let mut conn = self.get_conn().await?;

        let user = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT user_id, email, first_name, last_name, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch user by email: {e:?}");
            RepositoryError::Sqlx(e)
        })?;

        Ok(user)
    }
}
