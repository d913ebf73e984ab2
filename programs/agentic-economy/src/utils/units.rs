//! Ether/wei conversions without floating point

use crate::errors::{EconomyError, Result};
use crate::instructions::constants::WEI_PER_ETHER;

const ETHER_DECIMALS: usize = 18;

/// Parses a decimal ether amount such as `"0.0025"` into wei.
///
/// Digits beyond 18 decimals are truncated.
pub fn parse_ether(input: &str) -> Result<u128> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EconomyError::InvalidInput("ether amount"));
    }
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(EconomyError::InvalidInput("ether amount"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EconomyError::InvalidInput("ether amount"));
    }

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| EconomyError::ArithmeticOverflow)?
            .checked_mul(WEI_PER_ETHER)
            .ok_or(EconomyError::ArithmeticOverflow)?
    };

    let kept = &fraction[..fraction.len().min(ETHER_DECIMALS)];
    let fraction_wei = if kept.is_empty() {
        0
    } else {
        let padded = format!("{kept:0<width$}", width = ETHER_DECIMALS);
        padded
            .parse::<u128>()
            .map_err(|_| EconomyError::InvalidInput("ether amount"))?
    };

    whole_wei
        .checked_add(fraction_wei)
        .ok_or(EconomyError::ArithmeticOverflow)
}

/// Formats wei as ether with at most `max_decimals` digits, trailing zeros trimmed.
pub fn format_ether(wei: u128, max_decimals: usize) -> String {
    let whole = wei / WEI_PER_ETHER;
    let remainder = wei % WEI_PER_ETHER;
    let digits = format!("{remainder:0>width$}", width = ETHER_DECIMALS);
    let shown = &digits[..max_decimals.min(ETHER_DECIMALS)];
    let shown = shown.trim_end_matches('0');
    if shown.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{shown}")
    }
}
