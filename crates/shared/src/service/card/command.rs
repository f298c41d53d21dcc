use crate::{
    abstract_trait::{
        card::{
            repository::command::DynCardCommandRepository,
            service::command::CardCommandServiceTrait,
        },
        user::repository::query::DynUserQueryRepository,
    },
    config::CardConfig,
    domain::requests::{
        CreateCardRecord, CreateCardRequest, DepositBalanceRequest, TransferBalanceRequest,
        TransferCardBalance, UpdateCardBalance, UpdateCardStatusRequest, WithdrawBalanceRequest,
    },
    domain::responses::{ApiResponse, CardResponse},
    errors::{RepositoryError, ServiceError, format_validation_errors},
    model::card::CardModel,
    utils::{CardCipher, card_number, expiry, mask, money},
};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

pub struct CardCommandService {
    user_query: DynUserQueryRepository,
    command: DynCardCommandRepository,
    cipher: Arc<CardCipher>,
    card_config: CardConfig,
}

impl CardCommandService {
    pub async fn new(
        user_query: DynUserQueryRepository,
        command: DynCardCommandRepository,
        cipher: Arc<CardCipher>,
        card_config: CardConfig,
    ) -> Self {
        Self {
            user_query,
            command,
            cipher,
            card_config,
        }
    }

    /// Decrypts a stored number and masks it for display. A failing
    /// decrypt means broken key material or corrupted storage, never a
    /// business condition.
    fn display_number(&self, card: &CardModel) -> Result<String, ServiceError> {
        let plain = self.cipher.decrypt(&card.card_number).map_err(|e| {
            error!(
                "💥 Failed to decrypt stored number of card {}: {e:?}",
                card.card_id
            );
            ServiceError::Internal("card number decryption failed".into())
        })?;

        Ok(mask(&plain))
    }

    fn minor_units(amount: Decimal) -> Result<i64, ServiceError> {
        money::to_minor_units(amount).map_err(|e| ServiceError::InvalidAmount(e.to_string()))
    }
}

#[async_trait]
impl CardCommandServiceTrait for CardCommandService {
    fn generate_number(&self) -> String {
        card_number::generate(&self.card_config.bin)
    }

    async fn create(
        &self,
        req: &CreateCardRequest,
    ) -> Result<ApiResponse<CardResponse>, ServiceError> {
        info!("🆕 Creating card for user {}", req.user_id);

        if let Err(validation_errors) = req.validate() {
            let error_msg = format_validation_errors(&validation_errors);
            error!("Validation failed: {error_msg}");
            return Err(ServiceError::Validation(error_msg));
        }

        if !card_number::validate(&req.card_number) {
            error!("❌ Card number failed the Luhn check");
            return Err(ServiceError::InvalidCardNumber(
                "number failed the Luhn check".into(),
            ));
        }

        let expiry_date = expiry::parse_expiry(&req.expiry_date)
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let balance = Self::minor_units(req.balance)?;
        if balance < 0 {
            return Err(ServiceError::InvalidAmount(
                "initial balance must not be negative".into(),
            ));
        }

        let user = self.user_query.find_by_id(req.user_id).await.map_err(|e| {
            error!("❌ Owner lookup failed: {e:?}");
            match e {
                RepositoryError::NotFound => ServiceError::NotFound(format!("user {}", req.user_id)),
                other => ServiceError::Repo(other),
            }
        })?;

        let card_holder = format!(
            "{} {}",
            user.first_name.to_uppercase(),
            user.last_name.to_uppercase()
        );

        let encrypted = self.cipher.encrypt(&req.card_number).map_err(|e| {
            error!("💥 Card number encryption failed: {e:?}");
            ServiceError::Internal("card number encryption failed".into())
        })?;

        let record = CreateCardRecord {
            user_id: user.user_id,
            card_holder,
            card_number: encrypted,
            expiry_date,
            balance,
        };

        let card = self.command.create(&record).await.map_err(|e| {
            error!("❌ Failed to create card: {e:?}");
            ServiceError::Repo(e)
        })?;

        info!("✅ Card {} created for user {}", card.card_id, card.user_id);

        // the plaintext is still at hand here, no decrypt round-trip needed
        let response = CardResponse::from_model(&card, mask(&req.card_number));
        Ok(ApiResponse {
            status: "success".into(),
            message: "Card created successfully".into(),
            data: response,
        })
    }

    async fn block_request(
        &self,
        user_id: i32,
        card_id: i32,
    ) -> Result<ApiResponse<CardResponse>, ServiceError> {
        info!("🔒 Block request for card {card_id} by user {user_id}");

        let card = self
            .command
            .set_to_block(card_id, user_id)
            .await
            .map_err(ServiceError::Repo)?;

        let Some(card) = card else {
            error!("🚫 Block request for card {card_id} by user {user_id} rejected");
            return Err(ServiceError::OperationRejected);
        };

        let display = self.display_number(&card)?;
        Ok(ApiResponse {
            status: "success".into(),
            message: "Card flagged for blocking".into(),
            data: CardResponse::from_model(&card, display),
        })
    }

    async fn withdraw(
        &self,
        user_id: i32,
        req: &WithdrawBalanceRequest,
    ) -> Result<ApiResponse<bool>, ServiceError> {
        info!("💸 Withdraw from card {} by user {user_id}", req.card_id);

        if let Err(validation_errors) = req.validate() {
            let error_msg = format_validation_errors(&validation_errors);
            error!("Validation failed: {error_msg}");
            return Err(ServiceError::Validation(error_msg));
        }

        let amount = Self::minor_units(req.amount)?;

        let changed = self
            .command
            .withdraw(&UpdateCardBalance {
                card_id: req.card_id,
                user_id,
                amount,
            })
            .await
            .map_err(ServiceError::Repo)?;

        if changed == 0 {
            error!("🚫 Withdraw from card {} rejected", req.card_id);
            return Err(ServiceError::OperationRejected);
        }

        info!("✅ Withdrew {amount} minor units from card {}", req.card_id);
        Ok(ApiResponse {
            status: "success".into(),
            message: "Withdrawal applied".into(),
            data: true,
        })
    }

    async fn deposit(
        &self,
        user_id: i32,
        req: &DepositBalanceRequest,
    ) -> Result<ApiResponse<bool>, ServiceError> {
        info!("💰 Deposit to card {} by user {user_id}", req.card_id);

        if let Err(validation_errors) = req.validate() {
            let error_msg = format_validation_errors(&validation_errors);
            error!("Validation failed: {error_msg}");
            return Err(ServiceError::Validation(error_msg));
        }

        let amount = Self::minor_units(req.amount)?;

        let changed = self
            .command
            .deposit(&UpdateCardBalance {
                card_id: req.card_id,
                user_id,
                amount,
            })
            .await
            .map_err(ServiceError::Repo)?;

        if changed == 0 {
            error!("🚫 Deposit to card {} rejected", req.card_id);
            return Err(ServiceError::OperationRejected);
        }

        info!("✅ Deposited {amount} minor units to card {}", req.card_id);
        Ok(ApiResponse {
            status: "success".into(),
            message: "Deposit applied".into(),
            data: true,
        })
    }

    async fn transfer(
        &self,
        user_id: i32,
        req: &TransferBalanceRequest,
    ) -> Result<ApiResponse<bool>, ServiceError> {
        info!(
            "🔁 Transfer from card {} to card {} by user {user_id}",
            req.from_card_id, req.to_card_id
        );

        if let Err(validation_errors) = req.validate() {
            let error_msg = format_validation_errors(&validation_errors);
            error!("Validation failed: {error_msg}");
            return Err(ServiceError::Validation(error_msg));
        }

        let amount = Self::minor_units(req.amount)?;

        let applied = self
            .command
            .transfer(&TransferCardBalance {
                from_card_id: req.from_card_id,
                to_card_id: req.to_card_id,
                user_id,
                amount,
            })
            .await
            .map_err(ServiceError::Repo)?;

        if !applied {
            error!(
                "🚫 Transfer from card {} to card {} rejected",
                req.from_card_id, req.to_card_id
            );
            return Err(ServiceError::OperationRejected);
        }

        info!(
            "✅ Transferred {amount} minor units from card {} to card {}",
            req.from_card_id, req.to_card_id
        );
        Ok(ApiResponse {
            status: "success".into(),
            message: "Transfer applied".into(),
            data: true,
        })
    }

    async fn change_status(
        &self,
        card_id: i32,
        req: &UpdateCardStatusRequest,
    ) -> Result<ApiResponse<CardResponse>, ServiceError> {
        info!("🔄 Changing status of card {card_id} to {}", req.status);

        let card = match self.command.update_status(card_id, req.status).await {
            Ok(card) => card,
            Err(RepositoryError::NotFound) => {
                return Err(ServiceError::NotFound(format!("card {card_id}")));
            }
            Err(RepositoryError::Transition(e)) => {
                return Err(ServiceError::BusinessRule(e.to_string()));
            }
            Err(e) => return Err(ServiceError::Repo(e)),
        };

        info!("✅ Card {card_id} is now {}", card.status);

        let display = self.display_number(&card)?;
        Ok(ApiResponse {
            status: "success".into(),
            message: "Card status updated".into(),
            data: CardResponse::from_model(&card, display),
        })
    }

    async fn delete(&self, card_id: i32) -> Result<ApiResponse<bool>, ServiceError> {
        info!("🗑️ Deleting card {card_id}");

        match self.command.delete(card_id).await {
            Ok(card) => {
                info!("✅ Card {card_id} deleted (was {})", card.status);
                Ok(ApiResponse {
                    status: "success".into(),
                    message: "Card deleted".into(),
                    data: true,
                })
            }
            Err(RepositoryError::NotFound) => {
                Err(ServiceError::NotFound(format!("card {card_id}")))
            }
            Err(e @ RepositoryError::NotDeletable(_)) => {
                Err(ServiceError::BusinessRule(e.to_string()))
            }
            Err(e) => Err(ServiceError::Repo(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::{
        card::repository::command::CardCommandRepositoryTrait,
        user::repository::query::UserQueryRepositoryTrait,
    };
    use crate::config::CryptoConfig;
    use crate::model::card::{CardStatus, StatusTransitionError};
    use crate::model::user::UserModel;
    use chrono::NaiveDate;
    use std::str::FromStr;

    const PLAIN_NUMBER: &str = "4000006806224829";

    fn test_cipher() -> Arc<CardCipher> {
        let config = CryptoConfig {
            key: b"0123456789abcdef".to_vec(),
            iv: b"fedcba9876543210".to_vec(),
        };
        Arc::new(CardCipher::new(&config).unwrap())
    }

    fn sample_user() -> UserModel {
        UserModel {
            user_id: 1,
            email: "email@email.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_card(cipher: &CardCipher, status: CardStatus) -> CardModel {
        CardModel {
            card_id: 10,
            user_id: 1,
            card_holder: "JOHN DOE".into(),
            card_number: cipher.encrypt(PLAIN_NUMBER).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2029, 12, 31).unwrap(),
            status,
            to_block: false,
            balance: 10_000,
            created_at: None,
            updated_at: None,
        }
    }

    struct StubUserQuery {
        user: Option<UserModel>,
    }

    #[async_trait]
    impl UserQueryRepositoryTrait for StubUserQuery {
        async fn find_by_id(&self, _user_id: i32) -> Result<UserModel, RepositoryError> {
            self.user.clone().ok_or(RepositoryError::NotFound)
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<UserModel>, RepositoryError> {
            Ok(self.user.clone())
        }
    }

    struct StubCardCommand {
        card: CardModel,
        withdraw_rows: u64,
        deposit_rows: u64,
        transfer_applied: bool,
        create_conflict: bool,
        block_matches: bool,
        status_denied: bool,
        delete_denied: bool,
    }

    impl StubCardCommand {
        fn new(card: CardModel) -> Self {
            Self {
                card,
                withdraw_rows: 1,
                deposit_rows: 1,
                transfer_applied: true,
                create_conflict: false,
                block_matches: true,
                status_denied: false,
                delete_denied: false,
            }
        }
    }

    #[async_trait]
    impl CardCommandRepositoryTrait for StubCardCommand {
        async fn create(&self, req: &CreateCardRecord) -> Result<CardModel, RepositoryError> {
            if self.create_conflict {
                return Err(RepositoryError::Conflict("Card already registered".into()));
            }
            Ok(CardModel {
                card_id: self.card.card_id,
                user_id: req.user_id,
                card_holder: req.card_holder.clone(),
                card_number: req.card_number.clone(),
                expiry_date: req.expiry_date,
                status: CardStatus::Active,
                to_block: false,
                balance: req.balance,
                created_at: None,
                updated_at: None,
            })
        }

        async fn withdraw(&self, _req: &UpdateCardBalance) -> Result<u64, RepositoryError> {
            Ok(self.withdraw_rows)
        }

        async fn deposit(&self, _req: &UpdateCardBalance) -> Result<u64, RepositoryError> {
            Ok(self.deposit_rows)
        }

        async fn transfer(&self, _req: &TransferCardBalance) -> Result<bool, RepositoryError> {
            Ok(self.transfer_applied)
        }

        async fn set_to_block(
            &self,
            _card_id: i32,
            _user_id: i32,
        ) -> Result<Option<CardModel>, RepositoryError> {
            if self.block_matches {
                let mut card = self.card.clone();
                card.to_block = true;
                Ok(Some(card))
            } else {
                Ok(None)
            }
        }

        async fn update_status(
            &self,
            _card_id: i32,
            new_status: CardStatus,
        ) -> Result<CardModel, RepositoryError> {
            if self.status_denied {
                return Err(RepositoryError::Transition(StatusTransitionError {
                    from: CardStatus::Expired,
                    to: new_status,
                }));
            }
            let mut card = self.card.clone();
            card.status = new_status;
            Ok(card)
        }

        async fn delete(&self, _card_id: i32) -> Result<CardModel, RepositoryError> {
            if self.delete_denied {
                return Err(RepositoryError::NotDeletable(CardStatus::Active));
            }
            Ok(self.card.clone())
        }
    }

    async fn service(command: StubCardCommand, user: Option<UserModel>) -> CardCommandService {
        CardCommandService::new(
            Arc::new(StubUserQuery { user }),
            Arc::new(command),
            test_cipher(),
            CardConfig {
                bin: "400000".into(),
            },
        )
        .await
    }

    fn create_request() -> CreateCardRequest {
        CreateCardRequest {
            user_id: 1,
            card_number: PLAIN_NUMBER.to_string(),
            expiry_date: "12/29".to_string(),
            balance: Decimal::from_str("100.00").unwrap(),
        }
    }

    #[tokio::test]
    async fn create_derives_holder_and_masks_number() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let response = service.create(&create_request()).await.unwrap();

        assert_eq!(response.data.card_holder, "JOHN DOE");
        assert_eq!(response.data.card_number, "**** **** **** 4829");
        assert_eq!(response.data.balance.to_string(), "100.00");
        assert_eq!(response.data.expiry_date, "12/29");
    }

    #[tokio::test]
    async fn create_rejects_luhn_failures() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let mut req = create_request();
        req.card_number = "4000006806224820".to_string();

        let err = service.create(&req).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCardNumber(_)));
    }

    #[tokio::test]
    async fn create_rejects_wrong_amount_scale() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let mut req = create_request();
        req.balance = Decimal::from_str("100.5").unwrap();

        let err = service.create(&req).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn create_requires_an_existing_owner() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, None).await;

        let err = service.create(&create_request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_surfaces_duplicate_cards_as_conflict() {
        let cipher = test_cipher();
        let mut stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        stub.create_conflict = true;
        let service = service(stub, Some(sample_user())).await;

        let err = service.create(&create_request()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repo(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn withdraw_applies_when_preconditions_hold() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let req = WithdrawBalanceRequest {
            card_id: 10,
            amount: Decimal::from_str("50.00").unwrap(),
        };

        let response = service.withdraw(1, &req).await.unwrap();
        assert!(response.data);
    }

    #[tokio::test]
    async fn withdraw_with_zero_rows_is_rejected() {
        let cipher = test_cipher();
        let mut stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        stub.withdraw_rows = 0;
        let service = service(stub, Some(sample_user())).await;

        let req = WithdrawBalanceRequest {
            card_id: 10,
            amount: Decimal::from_str("60.00").unwrap(),
        };

        let err = service.withdraw(1, &req).await.unwrap_err();
        assert!(matches!(err, ServiceError::OperationRejected));
    }

    #[tokio::test]
    async fn withdraw_rejects_non_positive_amounts() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let req = WithdrawBalanceRequest {
            card_id: 10,
            amount: Decimal::from_str("-5.00").unwrap(),
        };

        let err = service.withdraw(1, &req).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn transfer_reports_success() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let req = TransferBalanceRequest {
            from_card_id: 10,
            to_card_id: 11,
            amount: Decimal::from_str("20.00").unwrap(),
        };

        let response = service.transfer(1, &req).await.unwrap();
        assert!(response.data);
    }

    #[tokio::test]
    async fn rejected_transfer_surfaces_as_operation_rejected() {
        let cipher = test_cipher();
        let mut stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        stub.transfer_applied = false;
        let service = service(stub, Some(sample_user())).await;

        let req = TransferBalanceRequest {
            from_card_id: 10,
            to_card_id: 11,
            amount: Decimal::from_str("20.00").unwrap(),
        };

        let err = service.transfer(1, &req).await.unwrap_err();
        assert!(matches!(err, ServiceError::OperationRejected));
    }

    #[tokio::test]
    async fn block_request_flags_the_card() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let response = service.block_request(1, 10).await.unwrap();
        assert!(response.data.to_block);
        assert_eq!(response.data.card_number, "**** **** **** 4829");
    }

    #[tokio::test]
    async fn block_request_for_foreign_card_is_rejected() {
        let cipher = test_cipher();
        let mut stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        stub.block_matches = false;
        let service = service(stub, Some(sample_user())).await;

        let err = service.block_request(2, 10).await.unwrap_err();
        assert!(matches!(err, ServiceError::OperationRejected));
    }

    #[tokio::test]
    async fn change_status_applies_legal_transitions() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let req = UpdateCardStatusRequest {
            status: CardStatus::Blocked,
        };

        let response = service.change_status(10, &req).await.unwrap();
        assert_eq!(response.data.status, CardStatus::Blocked);
    }

    #[tokio::test]
    async fn illegal_transition_is_a_business_rule_error() {
        let cipher = test_cipher();
        let mut stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Expired));
        stub.status_denied = true;
        let service = service(stub, Some(sample_user())).await;

        let req = UpdateCardStatusRequest {
            status: CardStatus::Active,
        };

        let err = service.change_status(10, &req).await.unwrap_err();
        match err {
            ServiceError::BusinessRule(msg) => {
                assert!(msg.contains("EXPIRED"));
                assert!(msg.contains("ACTIVE"));
            }
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_requires_an_inactive_card() {
        let cipher = test_cipher();
        let mut stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        stub.delete_denied = true;
        let service = service(stub, Some(sample_user())).await;

        let err = service.delete(10).await.unwrap_err();
        assert!(matches!(err, ServiceError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn delete_succeeds_for_blocked_cards() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Blocked));
        let service = service(stub, Some(sample_user())).await;

        let response = service.delete(10).await.unwrap();
        assert!(response.data);
    }

    #[tokio::test]
    async fn generated_numbers_carry_the_configured_bin() {
        let cipher = test_cipher();
        let stub = StubCardCommand::new(sample_card(&cipher, CardStatus::Active));
        let service = service(stub, Some(sample_user())).await;

        let number = service.generate_number();
        assert!(number.starts_with("400000"));
        assert!(card_number::validate(&number));
    }
}
