//! `MM/yy` expiry handling. A card expires at the end of the named month,
//! so `"12/29"` resolves to 2029-12-31.

use chrono::{Datelike, Months, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid expiry date format, expected MM/yy")]
pub struct ExpiryError;

/// Parses `MM/yy` to the last day of that month.
pub fn parse_expiry(value: &str) -> Result<NaiveDate, ExpiryError> {
    if !EXPIRY_RE.is_match(value) {
        return Err(ExpiryError);
    }

    let (month, year) = value.split_once('/').ok_or(ExpiryError)?;
    let month: u32 = month.parse().map_err(|_| ExpiryError)?;
    let year: i32 = year.parse::<i32>().map_err(|_| ExpiryError)? + 2000;

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .ok_or(ExpiryError)
}

/// Formats a date back to `MM/yy`.
pub fn format_expiry(date: NaiveDate) -> String {
    format!("{:02}/{:02}", date.month(), date.year() % 100)
}
