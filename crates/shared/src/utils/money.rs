//! Exact conversion between decimal currency amounts and integer minor
//! units. All balance arithmetic happens on the integer side; the decimal
//! form only appears at the request/response edges.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount must have exactly two decimal places")]
    Scale,
    #[error("amount is out of range")]
    OutOfRange,
}

/// Converts a scale-2 decimal amount to minor units, e.g. `1234.56` → `123456`.
/// Inputs with any other scale are rejected rather than rounded.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    if amount.scale() != 2 {
        return Err(MoneyError::Scale);
    }

    (amount * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or(MoneyError::OutOfRange)
}

/// Converts minor units back to a scale-2 decimal, e.g. `5000` → `50.00`.
/// Exact by construction.
pub fn to_decimal(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, 2)
}
