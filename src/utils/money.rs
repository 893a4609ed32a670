// Utilitários para manipulação de valores monetários

use crate::error::PaymentError;
use crate::models::payment::AmountUnit;

/// Converts a major-unit amount (e.g. dollars) to integer subunits (cents),
/// rounding to the nearest subunit.
pub fn to_subunits(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Resolves the amount sent on the wire.
///
/// With no explicit unit, a non-integral value is taken as major units and an
/// integral value as already being in subunits.
pub fn resolve_amount(amount: f64, unit: Option<AmountUnit>) -> Result<i64, PaymentError> {
    if !amount.is_finite() {
        return Err(PaymentError::InvalidAmount(format!("{amount} is not a finite number")));
    }

    match unit {
        Some(AmountUnit::Major) => checked_subunits(amount),
        Some(AmountUnit::Subunits) if amount.fract() != 0.0 => Err(PaymentError::InvalidAmount(
            format!("{amount} is not a whole number of subunits"),
        )),
        Some(AmountUnit::Subunits) => checked_whole(amount),
        None if amount.fract() != 0.0 => checked_subunits(amount),
        None => checked_whole(amount),
    }
}

fn checked_subunits(amount: f64) -> Result<i64, PaymentError> {
    checked_whole((amount * 100.0).round())
}

// `i64::MAX as f64` rounds up to 2^63, which is already out of range.
fn checked_whole(value: f64) -> Result<i64, PaymentError> {
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(PaymentError::InvalidAmount(format!(
            "{value} does not fit in integer subunits"
        )));
    }
    Ok(value as i64)
}

pub fn format_currency(subunits: i64) -> String {
    let sign = if subunits < 0 { "-" } else { "" };
    let abs = subunits.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Parses `"$1,234.50"`-style text into a major-unit amount.
pub fn parse_currency(currency_str: &str) -> Result<f64, std::num::ParseFloatError> {
    let cleaned = currency_str.trim().replace(['$', ','], "");
    cleaned.parse()
}
