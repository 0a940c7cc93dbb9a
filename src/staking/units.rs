//! Conversion between human decimal amounts and 18-decimal fixed point.

use alloy::primitives::utils::parse_units;
use alloy::primitives::U256;
use thiserror::Error;

/// Decimals of the staked token.
pub const DECIMALS: u8 = 18;

/// 10^18.
pub const WEI_PER_TOKEN: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative")]
    Negative,
    #[error("'{0}' is not a decimal number")]
    Invalid(String),
    #[error("at most {DECIMALS} decimal places are supported")]
    TooPrecise,
    #[error("amount is too large")]
    Overflow,
    #[error("amount must be greater than zero")]
    Zero,
}

/// Parse a decimal string (e.g. `"1.5"`) into its fixed-point value.
pub fn parse_amount(input: &str) -> Result<U256, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return Err(AmountError::Invalid(trimmed.to_string()));
    }
    if fraction.len() > DECIMALS as usize {
        return Err(AmountError::TooPrecise);
    }

    let canonical = format!(
        "{}.{}",
        if whole.is_empty() { "0" } else { whole },
        if fraction.is_empty() { "0" } else { fraction }
    );
    let parsed = parse_units(&canonical, DECIMALS).map_err(|_| AmountError::Overflow)?;
    Ok(parsed.get_absolute())
}

/// Parse an amount that will be sent in a transaction; zero is refused.
pub fn parse_nonzero_amount(input: &str) -> Result<U256, AmountError> {
    let value = parse_amount(input)?;
    if value.is_zero() {
        return Err(AmountError::Zero);
    }
    Ok(value)
}

/// Format a fixed-point value as a decimal string.
///
/// Trailing zeros are trimmed but one fractional digit is kept, so
/// `10^18` renders as `"1.0"`.
pub fn format_amount(value: U256) -> String {
    let whole = value / WEI_PER_TOKEN;
    let fraction = value % WEI_PER_TOKEN;

    let padded = format!("{:0>width$}", fraction.to_string(), width = DECIMALS as usize);
    let trimmed = padded.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };

    format!("{}.{}", whole, fraction)
}
