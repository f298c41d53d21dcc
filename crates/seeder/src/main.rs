mod di;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use shared::{
    config::{Config, ConnectionManager},
    domain::requests::{CreateCardRequest, CreateUserRequest},
    errors::{RepositoryError, ServiceError},
    utils::{CardCipher, Logger},
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::di::DependenciesInject;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let _logger = Logger::new("seeder", is_dev);

    let config = Config::init().context("Failed to load configuration")?;

    let cipher =
        Arc::new(CardCipher::new(&config.crypto).context("Failed to initialize card cipher")?);

    let db_pool = ConnectionManager::new_pool(&config.database_url, config.run_migrations)
        .await
        .context("Failed to initialize database pool")?;

    let deps = DependenciesInject::new(db_pool, cipher, config.card.clone()).await;

    seed(&deps).await?;

    info!("🌱 Seeding finished");
    Ok(())
}

async fn seed(deps: &DependenciesInject) -> Result<()> {
    let users = [
        CreateUserRequest {
            email: "email@email.com".into(),
            first_name: "Tom".into(),
            last_name: "Smith".into(),
        },
        CreateUserRequest {
            email: "email1@email.com".into(),
            first_name: "Kate".into(),
            last_name: "Brown".into(),
        },
    ];

    for req in &users {
        req.validate().context("invalid seed user")?;

        let user = match deps.user_query.find_by_email(&req.email).await? {
            Some(user) => {
                info!("👤 User {} already present, skipping", user.email);
                user
            }
            None => {
                let user = deps.user_command.create(req).await?;
                info!("👤 Seeded user {}", user.email);
                user
            }
        };

        for _ in 0..2 {
            let card_req = CreateCardRequest {
                user_id: user.user_id,
                card_number: deps.card_command.generate_number(),
                expiry_date: "12/29".into(),
                balance: Decimal::from_str("100.00")?,
            };

            match deps.card_command.create(&card_req).await {
                Ok(response) => {
                    info!("💳 Seeded card {} for {}", response.data.card_number, user.email);
                }
                Err(ServiceError::Repo(RepositoryError::Conflict(_))) => {
                    warn!("💳 Generated card number already taken, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let total = deps.card_query.total_balance(user.user_id).await?;
        info!("💰 Total balance of {}: {}", user.email, total.data);
    }

    Ok(())
}
