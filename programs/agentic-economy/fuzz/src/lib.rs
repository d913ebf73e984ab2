//! Property-based fuzz testing library for the agentic economy engine
//!
//! This crate drives the real engine with generated call sequences and
//! checks ledger, settlement, state machine, reputation and selection
//! invariants after every call.
//!
//! # Usage
//!
//! ```bash
//! # Run all property-based tests
//! cargo test --release
//!
//! # Run the fuzz test runner
//! cargo run --release
//!
//! # Run with more iterations
//! PROPTEST_CASES=10000 cargo test --release
//! ```

pub mod arbitrary;
pub mod invariants;
pub mod scenarios;

pub use arbitrary::*;
pub use invariants::*;
pub use scenarios::*;

// Include fuzz targets as test modules
#[cfg(test)]
#[path = "../fuzz_targets/job_lifecycle.rs"]
mod job_lifecycle_tests;

#[cfg(test)]
#[path = "../fuzz_targets/settlement.rs"]
mod settlement_tests;

#[cfg(test)]
#[path = "../fuzz_targets/selection.rs"]
mod selection_tests;

#[cfg(test)]
#[path = "../fuzz_targets/reputation.rs"]
mod reputation_tests;
