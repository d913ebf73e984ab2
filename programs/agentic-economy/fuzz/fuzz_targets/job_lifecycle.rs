//! Fuzz target for whole call sequences against one engine
//!
//! Tests invariants:
//! - Locked funds equal the budgets of jobs still in escrow
//! - Value accepted minus value delivered equals what the engine holds
//! - Failed calls leave jobs, ledger, reputation and event log untouched
//! - Jobs only move along Open -> Taken -> Submitted -> Resolved, or to Refunded
//! - Terminal jobs never change except for the one feedback record
//!
//! Run with: cargo test --release -p agentic-economy-fuzz job_lifecycle

use crate::*;
use agentic_economy::{Category, ContractVersion, EconomyError, JobStatus, ProtocolConfig};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_job_lifecycle(seq in any::<OperationSequence>()) {
        let report = run_sequence(&seq);
        prop_assert!(
            report.violations.is_empty(),
            "Invariant violations: {:?}\nSeq: {:?}",
            report.violations,
            seq
        );
        prop_assert_eq!(report.successes + report.errors, seq.operations.len());
    }

    #[test]
    fn fuzz_refund_is_idempotent(
        budget in 1u128..1_000_000_000_000u128,
        timeout in 1u64..10_000u64,
        accept in any::<bool>(),
    ) {
        let mut harness = Harness::new(ProtocolConfig::new(owner())).unwrap();
        for (who, category) in [(1u8, Category::Research), (2u8, Category::Development)] {
            let op = Operation::Seed { caller: 0, who, category, base_fee: 0, reputation: 50 };
            prop_assert!(harness.apply(&op).is_success());
        }
        let create = Operation::CreateJob { employer: 1, worker: 2, budget, timeout };
        prop_assert!(harness.apply(&create).is_success());
        if accept {
            let accept_op = Operation::Accept { caller: 2, job_id: 0 };
            prop_assert!(harness.apply(&accept_op).is_success());
        }

        // Not before the deadline has passed
        let early = harness.apply(&Operation::Refund { caller: 3, job_id: 0 });
        prop_assert!(early.is_error());

        let seconds = u32::try_from(timeout + 1).unwrap();
        harness.apply(&Operation::AdvanceTime { seconds });
        let refund = Operation::Refund { caller: 3, job_id: 0 };
        prop_assert!(harness.apply(&refund).is_success());
        let refund_again = Operation::Refund { caller: 4, job_id: 0 };
        prop_assert!(harness.apply(&refund_again).is_error());

        prop_assert_eq!(harness.balances.balance_of(&participant(1)), budget);
        prop_assert_eq!(harness.economy.get_job(0).unwrap().status, JobStatus::Refunded);
        prop_assert_eq!(harness.economy.locked_funds(), 0);
        let reputation = harness.economy.get_agent_profile(&participant(2)).unwrap().reputation;
        prop_assert_eq!(reputation, if accept { 49 } else { 50 });
    }

    #[test]
    fn fuzz_v1_rejects_v2_entry_points(seq in any::<OperationSequence>()) {
        let seq = OperationSequence { version: ContractVersion::V1, ..seq };
        let mut harness =
            Harness::new(ProtocolConfig::new(owner()).with_version(ContractVersion::V1)).unwrap();
        for operation in &seq.operations {
            let result = harness.apply(operation);
            prop_assert!(!result.is_invariant_violation(), "{:?}", result);
            let v2_only = matches!(
                operation,
                Operation::RegisterV2 { .. }
                    | Operation::Seed { .. }
                    | Operation::CreateJobByCategory { .. }
                    | Operation::Feedback { .. }
                    | Operation::SetReputation { .. }
            );
            if v2_only {
                prop_assert!(
                    matches!(
                        result,
                        SimulationResult::Error(EconomyError::UnsupportedEntryPoint { .. })
                    ),
                    "{:?} on v1 gave {:?}",
                    operation,
                    result
                );
            }
        }
    }
}
