//! Fuzz target for the payment split
//!
//! Tests invariants:
//! - payout + fee == budget for every budget up to u128::MAX
//! - fee == floor(budget * bps / 10000)
//! - rates above the cap are rejected
//!
//! Run with: cargo test --release -p agentic-economy-fuzz settlement

use crate::*;
use agentic_economy::instructions::settlement_helpers::calculate_fee_split;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5000))]

    #[test]
    fn fuzz_fee_split(input in any::<SettlementInput>()) {
        let result = simulate_settlement(&input);
        prop_assert_eq!(result, SettlementInvariantResult::Valid, "Input: {:?}", input);
    }

    #[test]
    fn fuzz_fee_is_monotonic_in_rate(
        budget in any::<u128>(),
        low in 0u16..=1000u16,
        high in 0u16..=1000u16,
    ) {
        let (low, high) = (low.min(high), low.max(high));
        let low_fee = calculate_fee_split(budget, low).unwrap().fee;
        let high_fee = calculate_fee_split(budget, high).unwrap().fee;
        prop_assert!(low_fee <= high_fee);
    }
}

#[test]
fn test_every_rate_round_trips() {
    for bps in 0..=1000u16 {
        for budget in [0u128, 1, 9_999, 10_000, 1_000_000_000_000_000_000, u128::MAX] {
            let input = SettlementInput { budget, fee_bps: bps };
            assert_eq!(simulate_settlement(&input), SettlementInvariantResult::Valid, "{input:?}");
        }
    }
}
