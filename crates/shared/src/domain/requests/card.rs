use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::model::card::CardStatus;
use crate::utils::expiry;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(range(min = 1, message = "User id must be positive"))]
    pub user_id: i32,

    #[validate(length(equal = 16, message = "Card number must be 16 digits"))]
    pub card_number: String,

    #[validate(custom(function = validate_expiry_date))]
    pub expiry_date: String,

    #[validate(custom(function = validate_amount_scale))]
    pub balance: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WithdrawBalanceRequest {
    #[validate(range(min = 1, message = "Card id must be positive"))]
    pub card_id: i32,

    #[validate(custom(function = validate_positive_amount))]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DepositBalanceRequest {
    #[validate(range(min = 1, message = "Card id must be positive"))]
    pub card_id: i32,

    #[validate(custom(function = validate_positive_amount))]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransferBalanceRequest {
    #[validate(range(min = 1, message = "Source card id must be positive"))]
    pub from_card_id: i32,

    #[validate(range(min = 1, message = "Destination card id must be positive"))]
    pub to_card_id: i32,

    #[validate(custom(function = validate_positive_amount))]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCardStatusRequest {
    pub status: CardStatus,
}

/// Repository-side insert payload. Edge validation has already happened:
/// the number is ciphertext, the balance is minor units.
#[derive(Debug, Clone)]
pub struct CreateCardRecord {
    pub user_id: i32,
    pub card_holder: String,
    pub card_number: String,
    pub expiry_date: chrono::NaiveDate,
    pub balance: i64,
}

/// One conditional balance mutation (withdraw or deposit leg), owner-scoped.
#[derive(Debug, Clone)]
pub struct UpdateCardBalance {
    pub card_id: i32,
    pub user_id: i32,
    pub amount: i64,
}

/// A compound transfer between two cards of the same owner.
#[derive(Debug, Clone)]
pub struct TransferCardBalance {
    pub from_card_id: i32,
    pub to_card_id: i32,
    pub user_id: i32,
    pub amount: i64,
}

fn validate_amount_scale(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.scale() != 2 {
        let mut err = ValidationError::new("two_decimal_places");
        err.message = Some("Amount must have exactly two decimal places".into());
        return Err(err);
    }

    Ok(())
}

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    validate_amount_scale(amount)?;

    if amount.is_sign_negative() || amount.is_zero() {
        let mut err = ValidationError::new("positive_amount");
        err.message = Some("Amount must be positive".into());
        return Err(err);
    }

    Ok(())
}

fn validate_expiry_date(value: &str) -> Result<(), ValidationError> {
    let Ok(last_day) = expiry::parse_expiry(value) else {
        let mut err = ValidationError::new("expiry_format");
        err.message = Some("Expiry date must be in MM/yy format".into());
        return Err(err);
    };

    if last_day < Utc::now().date_naive() {
        let mut err = ValidationError::new("expired");
        err.message = Some("Expiry date must not be in the past".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_request(balance: &str, expiry_date: &str) -> CreateCardRequest {
        CreateCardRequest {
            user_id: 1,
            card_number: "4000006806224829".to_string(),
            expiry_date: expiry_date.to_string(),
            balance: Decimal::from_str(balance).unwrap(),
        }
    }

    #[test]
    fn accepts_well_formed_create_request() {
        assert!(create_request("100.00", "12/39").validate().is_ok());
    }

    #[test]
    fn rejects_wrong_amount_scale() {
        assert!(create_request("100", "12/39").validate().is_err());
        assert!(create_request("100.5", "12/39").validate().is_err());
    }

    #[test]
    fn rejects_bad_expiry() {
        assert!(create_request("100.00", "13/39").validate().is_err());
        assert!(create_request("100.00", "12/20").validate().is_err());
    }

    #[test]
    fn transfer_amount_must_be_positive() {
        let req = TransferBalanceRequest {
            from_card_id: 1,
            to_card_id: 2,
            amount: Decimal::from_str("-5.00").unwrap(),
        };
        assert!(req.validate().is_err());

        let req = TransferBalanceRequest {
            from_card_id: 1,
            to_card_id: 2,
            amount: Decimal::from_str("0.00").unwrap(),
        };
        assert!(req.validate().is_err());

        let req = TransferBalanceRequest {
            from_card_id: 1,
            to_card_id: 2,
            amount: Decimal::from_str("20.00").unwrap(),
        };
        assert!(req.validate().is_ok());
    }
}
