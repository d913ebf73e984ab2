//! Fuzz test runner for the agentic economy engine
//!
//! Run with: cargo run --release
//! Or: cargo test (for property-based tests)
//!
//! Iterations per target default to 200; override with FUZZ_ITERATIONS.

use agentic_economy::instructions::constants::MAX_PLATFORM_FEE_BPS;
use agentic_economy::{Category, SelectionPolicy};
use agentic_economy_fuzz::*;
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use rand::Rng;
use std::time::Instant;

fn main() {
    println!("=== Agentic Economy Fuzz Testing ===\n");

    let iterations = std::env::var("FUZZ_ITERATIONS")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(200);

    let start = Instant::now();
    let mut total_tests = 0;
    let mut passed = 0;
    let mut failed = 0;

    let targets: [(&str, fn(usize) -> (usize, usize)); 5] = [
        ("job_lifecycle", run_job_lifecycle_fuzz),
        ("settlement", run_settlement_fuzz),
        ("selection", run_selection_fuzz),
        ("reputation", run_reputation_fuzz),
        ("random_walk", run_random_walk),
    ];
    for (name, target) in targets {
        println!("Running {} fuzz tests...", name);
        let (p, f) = target(iterations);
        passed += p;
        failed += f;
        total_tests += p + f;
    }

    println!("Running edge case tests...");
    let (p, f) = run_edge_case_tests();
    passed += p;
    failed += f;
    total_tests += p + f;

    let duration = start.elapsed();

    println!("\n=== Fuzz Testing Complete ===");
    println!("Total tests: {}", total_tests);
    println!("Passed: {}", passed);
    println!("Failed: {}", failed);
    println!("Duration: {:?}", duration);

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Draws `iterations` values from `T`'s strategy and counts the failures of `check`
fn run_generated<T, F>(name: &str, iterations: usize, check: F) -> (usize, usize)
where
    T: Arbitrary + std::fmt::Debug,
    F: Fn(&T) -> Result<(), String>,
{
    let mut passed = 0;
    let mut failed = 0;
    let mut runner = TestRunner::default();
    let strategy = any::<T>();

    for i in 0..iterations {
        let input = match strategy.new_tree(&mut runner) {
            Ok(tree) => tree.current(),
            Err(reason) => {
                println!("  [FAIL] Iteration {}: could not generate input: {}", i, reason);
                failed += 1;
                continue;
            }
        };
        match check(&input) {
            Ok(()) => passed += 1,
            Err(violation) => {
                println!("  [FAIL] Iteration {}: {}\n    input: {:?}", i, violation, input);
                failed += 1;
            }
        }
    }

    println!("  {}: {} passed, {} failed", name, passed, failed);
    (passed, failed)
}

fn run_job_lifecycle_fuzz(iterations: usize) -> (usize, usize) {
    run_generated::<OperationSequence, _>("job_lifecycle", iterations, |seq| {
        let report = run_sequence(seq);
        if report.violations.is_empty() {
            Ok(())
        } else {
            Err(report.violations.join("; "))
        }
    })
}

fn run_settlement_fuzz(iterations: usize) -> (usize, usize) {
    run_generated::<SettlementInput, _>("settlement", iterations, |input| {
        match simulate_settlement(input) {
            SettlementInvariantResult::Valid => Ok(()),
            other => Err(format!("{:?}", other)),
        }
    })
}

fn run_selection_fuzz(iterations: usize) -> (usize, usize) {
    run_generated::<SelectionInput, _>("selection", iterations, simulate_selection)
}

fn run_reputation_fuzz(iterations: usize) -> (usize, usize) {
    run_generated::<ReputationInput, _>("reputation", iterations, |input| {
        match simulate_reputation_walk(input) {
            ReputationInvariantResult::Valid => Ok(()),
            other => Err(format!("{:?}", other)),
        }
    })
}

/// Unshrunk random sequences built with `rand`, heavier on lifecycle calls
fn run_random_walk(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;
    let mut rng = rand::thread_rng();

    for i in 0..iterations {
        let mut harness = match Harness::new(agentic_economy::ProtocolConfig::new(owner())) {
            Ok(harness) => harness,
            Err(err) => {
                println!("  [FAIL] Walk {}: deployment failed: {}", i, err);
                failed += 1;
                continue;
            }
        };
        let mut violation = None;
        for _ in 0..100 {
            let caller = rng.gen_range(0..PARTICIPANTS);
            let job_id = rng.gen_range(0..=harness.economy.next_job_id());
            let operation = match rng.gen_range(0..8) {
                0 => Operation::Seed {
                    caller: 0,
                    who: rng.gen_range(1..PARTICIPANTS),
                    category: Category::ALL[rng.gen_range(0..Category::ALL.len())],
                    base_fee: rng.gen_range(0..1_000),
                    reputation: rng.gen_range(0..=100),
                },
                1 => Operation::CreateJobByCategory {
                    employer: caller,
                    category: Category::ALL[rng.gen_range(0..Category::ALL.len())],
                    budget: rng.gen_range(1..2_000),
                    timeout: rng.gen_range(1..600),
                },
                2 => Operation::Accept { caller, job_id },
                3 => Operation::Submit { caller, job_id },
                4 => Operation::Release { caller, job_id },
                5 => Operation::Refund { caller, job_id },
                6 => Operation::Feedback {
                    caller,
                    job_id,
                    positive: rng.gen_bool(0.5),
                },
                _ => Operation::AdvanceTime {
                    seconds: rng.gen_range(0..300),
                },
            };
            if let SimulationResult::InvariantViolation(found) = harness.apply(&operation) {
                violation = Some(found);
                break;
            }
        }
        match violation {
            Some(found) => {
                println!("  [FAIL] Walk {}: {}", i, found);
                failed += 1;
            }
            None => passed += 1,
        }
    }

    println!("  random_walk: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_edge_case_tests() -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    // Largest budget at the highest allowed rate
    let input = SettlementInput {
        budget: u128::MAX,
        fee_bps: MAX_PLATFORM_FEE_BPS,
    };
    if simulate_settlement(&input) == SettlementInvariantResult::Valid {
        passed += 1;
    } else {
        println!("  [FAIL] u128::MAX budget at max fee");
        failed += 1;
    }

    // One above the cap must be rejected
    let input = SettlementInput {
        budget: 10_000,
        fee_bps: MAX_PLATFORM_FEE_BPS + 1,
    };
    if simulate_settlement(&input) == SettlementInvariantResult::Valid {
        passed += 1;
    } else {
        println!("  [FAIL] fee above cap was accepted");
        failed += 1;
    }

    // Reputation cannot leave 0..=100 from either end
    for start in [0u8, 100u8] {
        let input = ReputationInput {
            start,
            steps: vec![start == 100; 10],
        };
        if simulate_reputation_walk(&input) == ReputationInvariantResult::Valid {
            passed += 1;
        } else {
            println!("  [FAIL] reputation walk from {}", start);
            failed += 1;
        }
    }

    // Equal candidates, both policies
    for policy in [SelectionPolicy::QualityFirst, SelectionPolicy::EfficiencyFirst] {
        let input = SelectionInput {
            candidates: (1..=4)
                .map(|id| CandidateInput {
                    id,
                    category: Category::Development,
                    base_fee: 1_000,
                    reputation: 70,
                })
                .collect(),
            category: Category::Development,
            budget: 1_000,
            policy,
        };
        match simulate_selection(&input) {
            Ok(()) => passed += 1,
            Err(violation) => {
                println!("  [FAIL] tied candidates under {:?}: {}", policy, violation);
                failed += 1;
            }
        }
    }

    println!("  edge_cases: {} passed, {} failed", passed, failed);
    (passed, failed)
}
