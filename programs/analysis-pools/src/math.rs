//! Fixed-point helpers.
//!
//! Amounts are `u64` scaled by 10^6. Every proportional split goes through
//! `mul_div_floor`, which widens to `u128` and truncates, so a sum of shares can
//! never exceed the amount being shared.

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, DECIMALS, PRECISION};
use crate::errors::AnalysisPoolError;

/// `floor(value * numerator / denominator)`.
///
/// A zero denominator yields zero: an empty side has nobody to pay.
pub fn mul_div_floor(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return Ok(0);
    }
    let product = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(AnalysisPoolError::Overflow)?;
    u64::try_from(product / denominator as u128).map_err(|_| error!(AnalysisPoolError::Overflow))
}

/// `floor(value * bps / 10_000)`.
pub fn apply_bps(value: u64, bps: u16) -> Result<u64> {
    mul_div_floor(value, bps as u64, BPS_DENOMINATOR)
}

/// Render a fixed-point amount with all six decimals, e.g. `39.200000`.
pub fn format_amount(amount: u64) -> String {
    format!(
        "{}.{:0width$}",
        amount / PRECISION,
        amount % PRECISION,
        width = DECIMALS
    )
}

/// Parse a non-negative decimal string into a fixed-point amount.
///
/// Rejects signs, empty parts, non-digits, and more than six decimals rather
/// than rounding them away.
pub fn parse_amount(input: &str) -> Result<u64> {
    let input = input.trim();
    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    require!(
        !whole.is_empty() && all_digits(whole) && all_digits(frac),
        AnalysisPoolError::InvalidAmount
    );
    require!(
        frac.len() <= DECIMALS && !input.ends_with('.'),
        AnalysisPoolError::InvalidAmount
    );

    // Digits were checked above, so the only parse failure left is range.
    let whole: u64 = whole
        .parse()
        .map_err(|_| error!(AnalysisPoolError::Overflow))?;
    let frac_units: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = DECIMALS);
        padded
            .parse()
            .map_err(|_| error!(AnalysisPoolError::InvalidAmount))?
    };

    whole
        .checked_mul(PRECISION)
        .and_then(|units| units.checked_add(frac_units))
        .ok_or_else(|| error!(AnalysisPoolError::Overflow))
}
