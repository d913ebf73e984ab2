//! Engine invariant checking for fuzz testing
//!
//! Each check returns a `*InvariantResult` so that failures carry the
//! offending values instead of a bare boolean.

use agentic_economy::instructions::constants::{
    BASIS_POINTS_DIVISOR, MAX_PLATFORM_FEE_BPS, MAX_REPUTATION,
};
use agentic_economy::instructions::settlement_helpers::FeeSplit;
use agentic_economy::{Category, Job, JobStatus, Ledger, RankingEntry};

/// Ledger invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerInvariantResult {
    Valid,
    /// `locked_funds` differs from the budgets of jobs still in escrow
    LockedFundsMismatch { expected: u128, actual: u128 },
    /// Value accepted minus value delivered differs from what the engine holds
    ConservationViolation { expected: u128, actual: u128 },
}

/// Settlement invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementInvariantResult {
    Valid,
    SplitDoesNotSumToBudget { budget: u128, payout: u128, fee: u128 },
    FeeNotFloored { expected: u128, actual: u128 },
    FeeAboveCap { budget: u128, fee: u128 },
    /// An out-of-range rate produced a split
    AcceptedInvalidRate { fee_bps: u16 },
    RejectedValidRate { fee_bps: u16 },
}

/// Job state machine invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobInvariantResult {
    Valid,
    InvalidStateTransition { job_id: u64, from: JobStatus, to: JobStatus },
    TerminalStateModified { job_id: u64, status: JobStatus },
    IdMismatch { index: usize, job_id: u64 },
    JobRemoved { before: usize, after: usize },
    HistoryRewritten { job_id: u64 },
}

/// Reputation invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReputationInvariantResult {
    Valid,
    OutOfBounds { reputation: u8 },
    StepTooLarge { before: u8, after: u8 },
}

/// Selection invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInvariantResult {
    Valid,
    OverBudget { base_fee: u128, budget: u128 },
    WrongCategory { expected: Category, actual: Category },
    /// An affordable candidate in the category was left out
    CandidateMissing { expected: usize, actual: usize },
    NotInRankedOrder { position: usize },
}

// ============================================================================
// Ledger Invariants
// ============================================================================

/// Locked funds equal the sum of budgets of jobs that still hold escrow.
pub fn check_locked_funds(ledger: &Ledger, jobs: &[Job]) -> LedgerInvariantResult {
    let expected = jobs
        .iter()
        .filter(|job| job.status.holds_escrow())
        .fold(0u128, |sum, job| sum.saturating_add(job.budget));
    if expected != ledger.locked_funds {
        LedgerInvariantResult::LockedFundsMismatch {
            expected,
            actual: ledger.locked_funds,
        }
    } else {
        LedgerInvariantResult::Valid
    }
}

/// Everything that came in and was not delivered back out is still held.
pub fn check_value_conservation(
    ledger: &Ledger,
    accepted: u128,
    delivered: u128,
) -> LedgerInvariantResult {
    let expected = accepted.saturating_sub(delivered);
    if expected != ledger.balance() {
        LedgerInvariantResult::ConservationViolation {
            expected,
            actual: ledger.balance(),
        }
    } else {
        LedgerInvariantResult::Valid
    }
}

// ============================================================================
// Settlement Invariants
// ============================================================================

/// Reference fee computed through a wider intermediate: floor(budget * bps / 10000).
/// `fee_bps` must not exceed 10000.
pub fn reference_fee(budget: u128, fee_bps: u16) -> u128 {
    let bps = u128::from(fee_bps);
    match budget.checked_mul(bps) {
        Some(product) => product / BASIS_POINTS_DIVISOR,
        None => {
            // Split into 64-bit halves: budget = hi * 2^64 + lo
            let hi = budget >> 64;
            let lo = budget & u128::from(u64::MAX);
            let hi_product = hi * bps;
            let lo_product = lo * bps;
            // (hi_product * 2^64 + lo_product) / 10000
            let hi_quotient = hi_product / BASIS_POINTS_DIVISOR;
            let hi_remainder = hi_product % BASIS_POINTS_DIVISOR;
            (hi_quotient << 64) + ((hi_remainder << 64) + lo_product) / BASIS_POINTS_DIVISOR
        }
    }
}

pub fn check_fee_split(budget: u128, fee_bps: u16, split: &FeeSplit) -> SettlementInvariantResult {
    if fee_bps > MAX_PLATFORM_FEE_BPS {
        return SettlementInvariantResult::AcceptedInvalidRate { fee_bps };
    }
    if split.payout.checked_add(split.fee) != Some(budget) {
        return SettlementInvariantResult::SplitDoesNotSumToBudget {
            budget,
            payout: split.payout,
            fee: split.fee,
        };
    }
    let expected = reference_fee(budget, fee_bps);
    if split.fee != expected {
        return SettlementInvariantResult::FeeNotFloored {
            expected,
            actual: split.fee,
        };
    }
    if split.fee > reference_fee(budget, MAX_PLATFORM_FEE_BPS) {
        return SettlementInvariantResult::FeeAboveCap { budget, fee: split.fee };
    }
    SettlementInvariantResult::Valid
}

// ============================================================================
// Job State Machine Invariants
// ============================================================================

/// Ids are dense and equal to the job's index.
pub fn check_job_ids(jobs: &[Job]) -> JobInvariantResult {
    for (index, job) in jobs.iter().enumerate() {
        if job.job_id != index as u64 {
            return JobInvariantResult::IdMismatch {
                index,
                job_id: job.job_id,
            };
        }
    }
    JobInvariantResult::Valid
}

/// Compares the job table before and after one call.
pub fn check_job_transitions(before: &[Job], after: &[Job]) -> JobInvariantResult {
    if after.len() < before.len() {
        return JobInvariantResult::JobRemoved {
            before: before.len(),
            after: after.len(),
        };
    }
    for (old, new) in before.iter().zip(after) {
        if old.status.is_terminal() {
            let untouched = old.status == new.status
                && old.budget == new.budget
                && old.worker == new.worker
                && old.employer == new.employer;
            // Feedback is the only thing allowed to touch a resolved job
            let feedback_only =
                old.status == JobStatus::Resolved && !old.feedback_applied && new.feedback_applied;
            if !untouched || (old.history != new.history && !feedback_only) {
                return JobInvariantResult::TerminalStateModified {
                    job_id: old.job_id,
                    status: old.status,
                };
            }
        }
        if old.status != new.status && !old.status.can_transition_to(new.status) {
            return JobInvariantResult::InvalidStateTransition {
                job_id: old.job_id,
                from: old.status,
                to: new.status,
            };
        }
        if !new.history.starts_with(&old.history) {
            return JobInvariantResult::HistoryRewritten { job_id: old.job_id };
        }
    }
    JobInvariantResult::Valid
}

// ============================================================================
// Reputation Invariants
// ============================================================================

pub fn check_reputation_bounds(reputation: u8) -> ReputationInvariantResult {
    if reputation > MAX_REPUTATION {
        ReputationInvariantResult::OutOfBounds { reputation }
    } else {
        ReputationInvariantResult::Valid
    }
}

/// Outcome-driven updates move reputation by at most one step.
pub fn check_reputation_step(before: u8, after: u8) -> ReputationInvariantResult {
    if before.abs_diff(after) > 1 {
        ReputationInvariantResult::StepTooLarge { before, after }
    } else {
        check_reputation_bounds(after)
    }
}

// ============================================================================
// Selection Invariants
// ============================================================================

/// `ranked` must hold exactly the affordable candidates of `category`, each
/// ordered no worse than its successor under `compare`.
pub fn check_selection<F>(
    candidates: &[RankingEntry],
    category: Category,
    budget: u128,
    ranked: &[RankingEntry],
    compare: F,
) -> SelectionInvariantResult
where
    F: Fn(&RankingEntry, &RankingEntry) -> std::cmp::Ordering,
{
    for entry in ranked {
        if entry.category != category {
            return SelectionInvariantResult::WrongCategory {
                expected: category,
                actual: entry.category,
            };
        }
        if entry.base_fee > budget {
            return SelectionInvariantResult::OverBudget {
                base_fee: entry.base_fee,
                budget,
            };
        }
    }
    let expected = candidates
        .iter()
        .filter(|entry| entry.category == category && entry.base_fee <= budget)
        .count();
    if expected != ranked.len() {
        return SelectionInvariantResult::CandidateMissing {
            expected,
            actual: ranked.len(),
        };
    }
    for (position, pair) in ranked.windows(2).enumerate() {
        if compare(&pair[0], &pair[1]) == std::cmp::Ordering::Greater {
            return SelectionInvariantResult::NotInRankedOrder { position };
        }
    }
    SelectionInvariantResult::Valid
}
