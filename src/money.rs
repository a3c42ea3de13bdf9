//! Fixed-point money amounts.
//!
//! All balances and transfer amounts in this crate are `i64` minor units at
//! scale 2 (cents), in a single implicit currency. Integer minor units make
//! the conservation invariant exact; floats are never used for money.

use crate::errors::{Error, Result};

/// Number of minor units per major unit (scale 2).
pub const MINOR_PER_MAJOR: i64 = 100;

/// Parses a decimal string such as `"500.00"`, `"0.05"`, or `"42"` into
/// minor units. At most two fractional digits are accepted; negative amounts
/// are rejected.
pub fn parse(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let invalid = || Error::InvalidTransferRequest {
        reason: format!("invalid amount: {trimmed:?}"),
    };

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() || frac.len() > 2 {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let major: i64 = whole.parse().map_err(|_| invalid())?;
    let minor: i64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<2}");
        padded.parse().map_err(|_| invalid())?
    };

    major
        .checked_mul(MINOR_PER_MAJOR)
        .and_then(|m| m.checked_add(minor))
        .ok_or_else(invalid)
}

/// Formats minor units as a scale-2 decimal string, e.g. `50000` -> `"500.00"`.
pub fn format(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!(
        "{sign}{}.{:02}",
        abs / MINOR_PER_MAJOR.unsigned_abs(),
        abs % MINOR_PER_MAJOR.unsigned_abs()
    )
}

/// Rejects zero and negative amounts. Transfer amounts must be strictly
/// positive before any account lookup happens.
pub fn require_positive(minor_units: i64) -> Result<i64> {
    if minor_units <= 0 {
        return Err(Error::InvalidTransferRequest {
            reason: "amount must be greater than zero".to_string(),
        });
    }
    Ok(minor_units)
}
