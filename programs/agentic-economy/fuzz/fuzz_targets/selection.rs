//! Fuzz target for candidate ranking and best-agent selection
//!
//! Tests invariants:
//! - Only affordable candidates of the requested category are returned
//! - No affordable candidate is dropped
//! - Results are ordered under the configured policy and deterministic
//! - The engine's best-agent view agrees with the pure selector
//!
//! Run with: cargo test --release -p agentic-economy-fuzz selection

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn fuzz_selection(input in any::<SelectionInput>()) {
        let result = simulate_selection(&input);
        prop_assert!(result.is_ok(), "{:?}\nInput: {:?}", result, input);
    }
}
