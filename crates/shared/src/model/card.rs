use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CardModel {
    pub card_id: i32,
    pub user_id: i32,
    pub card_holder: String,
    /// Ciphertext. The plaintext number only exists in memory while a card
    /// is created or prepared for display.
    pub card_number: String,
    pub expiry_date: NaiveDate,
    pub status: CardStatus,
    pub to_block: bool,
    /// Minor currency units (cents). Never a floating type.
    pub balance: i64,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "card_status", rename_all = "UPPERCASE")]
pub enum CardStatus {
    Active,
    Blocked,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot change card status from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: CardStatus,
    pub to: CardStatus,
}

impl CardStatus {
    /// The full transition table. EXPIRED is terminal.
    pub fn allowed_transitions(self) -> &'static [CardStatus] {
        match self {
            CardStatus::Active => &[CardStatus::Blocked, CardStatus::Expired],
            CardStatus::Blocked => &[CardStatus::Active, CardStatus::Expired],
            CardStatus::Expired => &[],
        }
    }

    pub fn can_transition_to(self, next: CardStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn transition_to(self, next: CardStatus) -> Result<CardStatus, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError {
                from: self,
                to: next,
            })
        }
    }

    /// Cards are only ever deleted once they are out of circulation.
    pub fn is_deletable(self) -> bool {
        matches!(self, CardStatus::Blocked | CardStatus::Expired)
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardStatus::Active => "ACTIVE",
            CardStatus::Blocked => "BLOCKED",
            CardStatus::Expired => "EXPIRED",
        };
        write!(f, "{name}")
    }
}
