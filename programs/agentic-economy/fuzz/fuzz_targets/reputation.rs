//! Fuzz target for the reputation update rule
//!
//! Tests invariants:
//! - Every outcome moves reputation by at most one step
//! - Reputation stays within 0..=100 however long the walk
//!
//! Run with: cargo test --release -p agentic-economy-fuzz reputation

use crate::*;
use agentic_economy::instructions::reputation_helpers::{penalized, rewarded};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn fuzz_reputation_walk(input in any::<ReputationInput>()) {
        prop_assert_eq!(simulate_reputation_walk(&input), ReputationInvariantResult::Valid);
    }

    #[test]
    fn fuzz_step_saturates(start in 0u8..=100u8) {
        prop_assert!(rewarded(start) <= 100);
        prop_assert_eq!(penalized(0), 0);
        prop_assert_eq!(rewarded(100), 100);
        if start > 0 && start < 100 {
            prop_assert_eq!(rewarded(penalized(start)), start);
        }
    }
}
