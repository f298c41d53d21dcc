use std::sync::Arc;

use shared::{
    abstract_trait::{
        card::{
            repository::{command::DynCardCommandRepository, query::DynCardQueryRepository},
            service::{command::DynCardCommandService, query::DynCardQueryService},
        },
        user::repository::{command::DynUserCommandRepository, query::DynUserQueryRepository},
    },
    config::{CardConfig, ConnectionPool},
    repository::{
        card::{CardCommandRepository, CardQueryRepository},
        user::{UserCommandRepository, UserQueryRepository},
    },
    service::card::{CardCommandService, CardQueryService},
    utils::CardCipher,
};

#[derive(Clone)]
pub struct DependenciesInject {
    pub card_command: DynCardCommandService,
    pub card_query: DynCardQueryService,
    pub user_query: DynUserQueryRepository,
    pub user_command: DynUserCommandRepository,
}

impl DependenciesInject {
    pub async fn new(
        db: ConnectionPool,
        cipher: Arc<CardCipher>,
        card_config: CardConfig,
    ) -> Self {
        let user_query = Arc::new(UserQueryRepository::new(db.clone())) as DynUserQueryRepository;
        let user_command =
            Arc::new(UserCommandRepository::new(db.clone())) as DynUserCommandRepository;

        let card_command_repo =
            Arc::new(CardCommandRepository::new(db.clone())) as DynCardCommandRepository;
        let card_query_repo = Arc::new(CardQueryRepository::new(db)) as DynCardQueryRepository;

        let card_command = Arc::new(
            CardCommandService::new(
                user_query.clone(),
                card_command_repo,
                cipher.clone(),
                card_config,
            )
            .await,
        ) as DynCardCommandService;

        let card_query =
            Arc::new(CardQueryService::new(card_query_repo, cipher).await) as DynCardQueryService;

        Self {
            card_command,
            card_query,
            user_query,
            user_command,
        }
    }
}
