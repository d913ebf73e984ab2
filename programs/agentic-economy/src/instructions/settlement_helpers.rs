//! Payment split shared by `approveWork` and `releasePayment`

use crate::errors::{EconomyError, Result};
use crate::instructions::constants::{BASIS_POINTS_DIVISOR, MAX_PLATFORM_FEE_BPS};

/// Worker payout and platform fee for one budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub payout: u128,
    pub fee: u128,
}

/// Splits `budget` into `(payout, fee)` with `fee = floor(budget * bps / 10000)`.
///
/// `payout + fee == budget` always holds.
pub fn calculate_fee_split(budget: u128, fee_bps: u16) -> Result<FeeSplit> {
    validate_fee_bps(fee_bps)?;
    // budget * bps may exceed u128 for huge budgets, so split the budget first:
    // budget = q * 10000 + r  =>  budget * bps / 10000 = q * bps + r * bps / 10000
    let bps = u128::from(fee_bps);
    let quotient = budget / BASIS_POINTS_DIVISOR;
    let remainder = budget % BASIS_POINTS_DIVISOR;
    let fee = quotient
        .checked_mul(bps)
        .and_then(|whole| whole.checked_add(remainder * bps / BASIS_POINTS_DIVISOR))
        .ok_or(EconomyError::ArithmeticOverflow)?;
    let payout = budget
        .checked_sub(fee)
        .ok_or(EconomyError::ArithmeticOverflow)?;
    Ok(FeeSplit { payout, fee })
}

pub fn validate_fee_bps(fee_bps: u16) -> Result<()> {
    if fee_bps > MAX_PLATFORM_FEE_BPS {
        return Err(EconomyError::OutOfRange {
            field: "platform_fee_bps",
            value: u128::from(fee_bps),
            min: 0,
            max: u128::from(MAX_PLATFORM_FEE_BPS),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fee_keeps_ninety_nine_percent() {
        let split = calculate_fee_split(10_000_000_000_000_000, 100).unwrap();
        assert_eq!(split.payout, 10_000_000_000_000_000 * 9_900 / 10_000);
        assert_eq!(split.fee, 100_000_000_000_000);
    }

    #[test]
    fn test_zero_fee() {
        let split = calculate_fee_split(12_345, 0).unwrap();
        assert_eq!(split, FeeSplit { payout: 12_345, fee: 0 });
    }

    #[test]
    fn test_fee_rounds_down() {
        // 9999 * 100 / 10000 = 99.99
        let split = calculate_fee_split(9_999, 100).unwrap();
        assert_eq!(split.fee, 99);
        assert_eq!(split.payout, 9_900);
    }

    #[test]
    fn test_small_budget_pays_no_fee() {
        let split = calculate_fee_split(1, MAX_PLATFORM_FEE_BPS).unwrap();
        assert_eq!(split, FeeSplit { payout: 1, fee: 0 });
    }

    #[test]
    fn test_round_trip_every_bps() {
        let budget = 1_000_000_007u128;
        for bps in 0..=MAX_PLATFORM_FEE_BPS {
            let split = calculate_fee_split(budget, bps).unwrap();
            assert_eq!(split.payout + split.fee, budget, "bps = {bps}");
            assert_eq!(split.fee, budget * u128::from(bps) / 10_000);
        }
    }

    #[test]
    fn test_max_budget_does_not_overflow() {
        let split = calculate_fee_split(u128::MAX, MAX_PLATFORM_FEE_BPS).unwrap();
        assert_eq!(split.payout + split.fee, u128::MAX);
        assert_eq!(split.fee, u128::MAX / 10);
    }

    #[test]
    fn test_rejects_fee_above_cap() {
        assert!(matches!(
            calculate_fee_split(1_000, 1001),
            Err(EconomyError::OutOfRange { field: "platform_fee_bps", value: 1001, .. })
        ));
    }
}
