//! Decimal scaling between human amounts and base-unit integers.
//!
//! All arithmetic is exact: amounts are handled as decimal digit strings
//! and 256-bit integers, never floats. Excess fractional digits are
//! truncated, not rounded.

use alloy_primitives::U256;

use crate::error::ChainError;

/// Decimals of the native coin (wei per coin = 10^18).
pub const NATIVE_DECIMALS: u8 = 18;

/// Fixed decimal scale applied to token amounts. Tokens that use a
/// different scale would need `decimals()` queried on-chain, which this
/// tool does not do.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Wei per gwei, for gas-price conversion.
pub const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Converts a decimal amount string into base units (`amount * 10^decimals`).
///
/// Fractional digits beyond `decimals` are silently dropped (truncation,
/// not rounding): `"0.0000000000000000015"` at 18 decimals yields 1.
/// Accepts only unsigned decimal notation; signs, exponents, and grouping
/// separators are rejected.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, ChainError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ChainError::InvalidAmount("empty amount".into()));
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ChainError::InvalidAmount("no digits in amount".into()));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ChainError::InvalidAmount(format!(
            "'{amount}' is not an unsigned decimal number"
        )));
    }

    let decimals = decimals as usize;
    let kept_frac = &frac_part[..frac_part.len().min(decimals)];

    let mut digits = String::with_capacity(int_part.len() + decimals);
    digits.push_str(int_part);
    digits.push_str(kept_frac);
    digits.push_str(&"0".repeat(decimals - kept_frac.len()));
    if digits.is_empty() {
        digits.push('0');
    }

    U256::from_str_radix(&digits, 10)
        .map_err(|_| ChainError::InvalidAmount(format!("'{amount}' exceeds 256 bits")))
}

/// Formats base units as a decimal string with trailing zeros trimmed.
pub fn format_units(value: U256, decimals: u8) -> String {
    let (whole, frac) = split_scaled(&value.to_string(), decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole
    } else {
        format!("{whole}.{frac}")
    }
}

/// Formats base units with exactly `places` fractional digits, truncating
/// excess precision.
pub fn format_units_dp(value: U256, decimals: u8, places: usize) -> String {
    let (whole, mut frac) = split_scaled(&value.to_string(), decimals as usize);
    if places == 0 {
        return whole;
    }
    frac.truncate(places);
    while frac.len() < places {
        frac.push('0');
    }
    format!("{whole}.{frac}")
}

/// Splits a base-unit digit string into whole and fractional digit strings.
fn split_scaled(digits: &str, decimals: usize) -> (String, String) {
    if decimals == 0 {
        return (digits.to_string(), String::new());
    }
    if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{digits:0>decimals$}"))
    }
}
