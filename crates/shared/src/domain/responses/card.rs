use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::card::{CardModel, CardStatus};
use crate::utils::{expiry, money};

/// Presentation form of a card. The number is already decrypted and masked
/// by the service layer; neither the ciphertext nor the full plaintext ever
/// reaches a display path.
#[derive(Debug, Serialize, Deserialize)]
pub struct CardResponse {
    pub id: i32,
    pub user_id: i32,
    pub card_holder: String,
    pub card_number: String,
    pub expiry_date: String,
    pub status: CardStatus,
    pub to_block: bool,
    pub balance: Decimal,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl CardResponse {
    pub fn from_model(card: &CardModel, masked_number: String) -> Self {
        Self {
            id: card.card_id,
            user_id: card.user_id,
            card_holder: card.card_holder.clone(),
            card_number: masked_number,
            expiry_date: expiry::format_expiry(card.expiry_date),
            status: card.status,
            to_block: card.to_block,
            balance: money::to_decimal(card.balance),
            created_at: card.created_at.map(|at| at.to_string()),
            updated_at: card.updated_at.map(|at| at.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn serializes_masked_number_and_decimal_balance() {
        let card = CardModel {
            card_id: 10,
            user_id: 1,
            card_holder: "JOHN DOE".into(),
            card_number: "opaque-ciphertext".into(),
            expiry_date: NaiveDate::from_ymd_opt(2029, 12, 31).unwrap(),
            status: CardStatus::Active,
            to_block: false,
            balance: 123_456,
            created_at: None,
            updated_at: None,
        };

        let response = CardResponse::from_model(&card, "**** **** **** 4829".into());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["card_number"], "**** **** **** 4829");
        assert_eq!(json["expiry_date"], "12/29");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["balance"], "1234.56");
    }
}
