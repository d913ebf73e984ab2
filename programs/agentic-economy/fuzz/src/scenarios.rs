//! Fuzz testing scenarios that drive the engine
//!
//! Unlike a simulated model, the harness calls the real `Economy` entry
//! points and checks the invariants around every call.

use std::collections::{BTreeMap, HashSet};

use agentic_economy::instructions::constants::MAX_PLATFORM_FEE_BPS;
use agentic_economy::instructions::reputation_helpers::{penalized, rewarded};
use agentic_economy::instructions::selection_helpers::{
    compare_efficiency_first, compare_quality_first, select,
};
use agentic_economy::instructions::settlement_helpers::calculate_fee_split;
use agentic_economy::state::ADDRESS_LEN;
use agentic_economy::{
    Address, Balances, CallContext, ContractVersion, Economy, EconomyError, Job, Ledger,
    ProtocolConfig, RankingEntry, SelectionPolicy,
};

use crate::arbitrary::*;
use crate::invariants::*;

/// Start of simulated time
pub const GENESIS: i64 = 1_700_000_000;

/// Result of one simulated call
#[derive(Debug, Clone)]
pub enum SimulationResult {
    Success,
    Error(EconomyError),
    InvariantViolation(String),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SimulationResult::Error(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimulationResult::InvariantViolation(_))
    }
}

/// State captured before a call
struct Snapshot {
    jobs: Vec<Job>,
    ledger: Ledger,
    reputations: BTreeMap<Address, u8>,
    events: usize,
    sequence: u64,
    owner: Address,
    fee_bps: u16,
}

impl Snapshot {
    fn take(economy: &Economy) -> Self {
        Self {
            jobs: economy.jobs().to_vec(),
            ledger: *economy.ledger(),
            reputations: reputations(economy),
            events: economy.events().len(),
            sequence: economy.sequence(),
            owner: economy.owner(),
            fee_bps: economy.platform_fee_bps(),
        }
    }

    /// What changed, if anything
    fn diff(&self, economy: &Economy) -> Option<&'static str> {
        if self.jobs != economy.jobs() {
            Some("jobs")
        } else if self.ledger != *economy.ledger() {
            Some("ledger")
        } else if self.reputations != reputations(economy) {
            Some("reputation")
        } else if self.events != economy.events().len() {
            Some("event log")
        } else if self.sequence != economy.sequence() {
            Some("sequence")
        } else if self.owner != economy.owner() || self.fee_bps != economy.platform_fee_bps() {
            Some("config")
        } else {
            None
        }
    }
}

fn reputations(economy: &Economy) -> BTreeMap<Address, u8> {
    economy
        .agents()
        .map(|profile| (profile.address, profile.reputation))
        .collect()
}

/// An engine plus the outside world it pays into
pub struct Harness {
    pub economy: Economy,
    pub balances: Balances,
    pub now: i64,
    /// Value attached to calls that succeeded
    pub accepted: u128,
    rejecting: HashSet<u8>,
}

impl Harness {
    pub fn new(config: ProtocolConfig) -> Result<Self, EconomyError> {
        Ok(Self {
            economy: Economy::new(config)?,
            balances: Balances::new(),
            now: GENESIS,
            accepted: 0,
            rejecting: HashSet::new(),
        })
    }

    /// Total value delivered to the participant pool
    pub fn delivered(&self) -> u128 {
        (0..PARTICIPANTS)
            .map(|index| self.balances.balance_of(&participant(index)))
            .fold(0u128, u128::saturating_add)
    }

    /// Runs one operation and checks every invariant around it.
    pub fn apply(&mut self, operation: &Operation) -> SimulationResult {
        let before = Snapshot::take(&self.economy);
        let (outcome, attached, steps_reputation) = self.execute(operation);

        let result = match outcome {
            Err(err) => {
                if let Some(what) = before.diff(&self.economy) {
                    return SimulationResult::InvariantViolation(format!(
                        "failed call changed {what}: {operation:?} -> {err}"
                    ));
                }
                SimulationResult::Error(err)
            }
            Ok(()) => {
                self.accepted = self.accepted.saturating_add(attached);
                if let Some(violation) = check_call(&before, &self.economy, steps_reputation) {
                    return SimulationResult::InvariantViolation(format!(
                        "{violation} after {operation:?}"
                    ));
                }
                SimulationResult::Success
            }
        };

        if let Some(violation) = self.check_global() {
            return SimulationResult::InvariantViolation(format!("{violation} after {operation:?}"));
        }
        result
    }

    /// Outcome, value attached, and whether the call may only step reputation
    fn execute(&mut self, operation: &Operation) -> (Result<(), EconomyError>, u128, bool) {
        let now = self.now;
        let ctx = move |who: u8| CallContext::new(participant(who), now);
        match *operation {
            Operation::Register { who } => (
                self.economy.register_agent(&ctx(who), "agent", "fuzz"),
                0,
                false,
            ),
            Operation::RegisterV2 { who, category, base_fee, stake } => (
                self.economy.register_agent_v2(
                    &ctx(who).with_value(stake),
                    "agent",
                    "fuzz",
                    category,
                    base_fee,
                ),
                stake,
                false,
            ),
            Operation::Seed { caller, who, category, base_fee, reputation } => (
                self.economy.seed_synthetic_agent(
                    &ctx(caller),
                    participant(who),
                    "synthetic",
                    "fuzz",
                    category,
                    base_fee,
                    reputation,
                ),
                0,
                false,
            ),
            Operation::CreateJob { employer, worker, budget, timeout } => (
                self.economy
                    .create_job(&ctx(employer).with_value(budget), participant(worker), timeout)
                    .map(|_| ()),
                budget,
                false,
            ),
            Operation::CreateJobByCategory { employer, category, budget, timeout } => (
                self.economy
                    .create_job_by_category(&ctx(employer).with_value(budget), category, timeout)
                    .map(|_| ()),
                budget,
                false,
            ),
            Operation::Accept { caller, job_id } => {
                (self.economy.accept_job(&ctx(caller), job_id), 0, true)
            }
            Operation::Submit { caller, job_id } => (
                self.economy.submit_work(&ctx(caller), job_id, "ipfs://fuzz"),
                0,
                true,
            ),
            Operation::Release { caller, job_id } => {
                let ctx = ctx(caller);
                let outcome = match self.economy.version() {
                    ContractVersion::V1 => {
                        self.economy.approve_work(&ctx, job_id, &mut self.balances)
                    }
                    ContractVersion::V2 => {
                        self.economy.release_payment(&ctx, job_id, &mut self.balances)
                    }
                };
                (outcome.map(|_| ()), 0, true)
            }
            Operation::Refund { caller, job_id } => {
                let ctx = ctx(caller);
                (
                    self.economy
                        .refund_after_timeout(&ctx, job_id, &mut self.balances)
                        .map(|_| ()),
                    0,
                    true,
                )
            }
            Operation::Feedback { caller, job_id, positive } => (
                self.economy
                    .apply_synthetic_feedback(&ctx(caller), job_id, positive)
                    .map(|_| ()),
                0,
                true,
            ),
            Operation::SetReputation { caller, who, score } => (
                self.economy
                    .set_agent_reputation(&ctx(caller), participant(who), score),
                0,
                false,
            ),
            Operation::SetFee { caller, fee_bps } => (
                self.economy.set_platform_fee_bps(&ctx(caller), fee_bps),
                0,
                true,
            ),
            Operation::Withdraw { caller, to, amount } => {
                let ctx = ctx(caller);
                (
                    self.economy
                        .withdraw_fees(&ctx, participant(to), amount, &mut self.balances),
                    0,
                    true,
                )
            }
            Operation::Deposit { from, amount } => (
                self.economy.receive(&ctx(from).with_value(amount)),
                amount,
                true,
            ),
            Operation::ToggleRejection { who } => {
                if self.rejecting.remove(&who) {
                    self.balances.accept_transfers_to(&participant(who));
                } else {
                    self.rejecting.insert(who);
                    self.balances.reject_transfers_to(participant(who));
                }
                (Ok(()), 0, true)
            }
            Operation::AdvanceTime { seconds } => {
                self.now = self.now.saturating_add(i64::from(seconds));
                (Ok(()), 0, true)
            }
        }
    }

    fn check_global(&self) -> Option<String> {
        let ledger = self.economy.ledger();
        let locked = check_locked_funds(ledger, self.economy.jobs());
        if locked != LedgerInvariantResult::Valid {
            return Some(format!("{locked:?}"));
        }
        let conservation = check_value_conservation(ledger, self.accepted, self.delivered());
        if conservation != LedgerInvariantResult::Valid {
            return Some(format!("{conservation:?}"));
        }
        let ids = check_job_ids(self.economy.jobs());
        if ids != JobInvariantResult::Valid {
            return Some(format!("{ids:?}"));
        }
        self.economy
            .agents()
            .map(|profile| check_reputation_bounds(profile.reputation))
            .find(|result| *result != ReputationInvariantResult::Valid)
            .map(|result| format!("{result:?}"))
    }
}

/// Invariants between the state before and after a successful call
fn check_call(before: &Snapshot, economy: &Economy, steps_reputation: bool) -> Option<String> {
    let transitions = check_job_transitions(&before.jobs, economy.jobs());
    if transitions != JobInvariantResult::Valid {
        return Some(format!("{transitions:?}"));
    }
    if steps_reputation {
        for (address, after) in reputations(economy) {
            if let Some(&old) = before.reputations.get(&address) {
                let step = check_reputation_step(old, after);
                if step != ReputationInvariantResult::Valid {
                    return Some(format!("{step:?} for {address}"));
                }
            }
        }
    }
    if economy.sequence() < before.sequence {
        return Some("sequence went backwards".to_string());
    }
    None
}

/// Summary of one operation sequence
#[derive(Debug, Clone, Default)]
pub struct SequenceReport {
    pub successes: usize,
    pub errors: usize,
    pub violations: Vec<String>,
}

pub fn run_sequence(sequence: &OperationSequence) -> SequenceReport {
    let config = ProtocolConfig::new(owner())
        .with_version(sequence.version)
        .with_platform_fee_bps(sequence.fee_bps)
        .with_selection_policy(sequence.policy);
    let mut report = SequenceReport::default();
    let mut harness = match Harness::new(config) {
        Ok(harness) => harness,
        Err(err) => {
            report.violations.push(format!("deployment failed: {err}"));
            return report;
        }
    };

    for operation in &sequence.operations {
        match harness.apply(operation) {
            SimulationResult::Success => report.successes += 1,
            SimulationResult::Error(_) => report.errors += 1,
            SimulationResult::InvariantViolation(violation) => report.violations.push(violation),
        }
    }
    report
}

// ============================================================================
// Focused scenarios
// ============================================================================

pub fn simulate_settlement(input: &SettlementInput) -> SettlementInvariantResult {
    match calculate_fee_split(input.budget, input.fee_bps) {
        Ok(split) => check_fee_split(input.budget, input.fee_bps, &split),
        Err(_) if input.fee_bps > MAX_PLATFORM_FEE_BPS => {
            SettlementInvariantResult::Valid
        }
        Err(_) => SettlementInvariantResult::RejectedValidRate {
            fee_bps: input.fee_bps,
        },
    }
}

pub fn policy_comparator(
    policy: SelectionPolicy,
) -> fn(&RankingEntry, &RankingEntry) -> std::cmp::Ordering {
    match policy {
        SelectionPolicy::QualityFirst => compare_quality_first,
        SelectionPolicy::EfficiencyFirst => compare_efficiency_first,
    }
}

/// Checks the pure selector, then that the engine's view agrees with it.
pub fn simulate_selection(input: &SelectionInput) -> Result<(), String> {
    let mut economy = Economy::new(ProtocolConfig::new(owner()).with_selection_policy(input.policy))
        .map_err(|err| err.to_string())?;
    let ctx = CallContext::new(owner(), GENESIS);

    // Only candidates the engine accepted take part
    let mut candidates = Vec::new();
    for candidate in &input.candidates {
        let address = Address::new([candidate.id; ADDRESS_LEN]);
        if economy
            .seed_synthetic_agent(
                &ctx,
                address,
                "candidate",
                "",
                candidate.category,
                candidate.base_fee,
                candidate.reputation,
            )
            .is_ok()
        {
            candidates.push(RankingEntry {
                address,
                category: candidate.category,
                base_fee: candidate.base_fee,
                reputation: candidate.reputation,
            });
        }
    }

    let selection = select(candidates.iter().cloned(), input.category, input.budget, input.policy);
    let result = check_selection(
        &candidates,
        input.category,
        input.budget,
        &selection.affordable,
        policy_comparator(input.policy),
    );
    if result != SelectionInvariantResult::Valid {
        return Err(format!("{result:?}"));
    }

    let again = select(candidates.iter().cloned(), input.category, input.budget, input.policy);
    if again != selection {
        return Err("selection is not deterministic".to_string());
    }

    let view = economy
        .get_best_agent(input.category, input.budget)
        .map_err(|err| err.to_string())?;
    if view.as_ref() != selection.best() {
        return Err(format!("view picked {view:?}, selector picked {:?}", selection.best()));
    }
    Ok(())
}

/// Applies a walk of outcome steps and checks each one.
pub fn simulate_reputation_walk(input: &ReputationInput) -> ReputationInvariantResult {
    let mut reputation = input.start;
    for positive in &input.steps {
        let next = if *positive {
            rewarded(reputation)
        } else {
            penalized(reputation)
        };
        let result = check_reputation_step(reputation, next);
        if result != ReputationInvariantResult::Valid {
            return result;
        }
        reputation = next;
    }
    ReputationInvariantResult::Valid
}
