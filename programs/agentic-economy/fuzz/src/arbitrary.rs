//! Arbitrary input generators for fuzz testing
//!
//! Generates random inputs for the engine's entry points. Callers are drawn
//! from a small pool so that sequences hit the same agents and jobs often.

use agentic_economy::instructions::constants::{
    DEFAULT_MIN_STAKE, MAX_JOB_TIMEOUT_SECS, MAX_PLATFORM_FEE_BPS, MAX_REPUTATION,
};
use agentic_economy::state::ADDRESS_LEN;
use agentic_economy::{Address, Category, ContractVersion, SelectionPolicy};
use proptest::prelude::*;

/// Pool size for callers and recipients; index 0 is the owner
pub const PARTICIPANTS: u8 = 6;

pub fn participant(index: u8) -> Address {
    Address::new([0x10 + index % PARTICIPANTS; ADDRESS_LEN])
}

pub fn owner() -> Address {
    participant(0)
}

/// Index into the participant pool
pub fn arb_participant() -> impl Strategy<Value = u8> {
    0u8..PARTICIPANTS
}

/// Arbitrary 20-byte address
pub fn arb_address() -> impl Strategy<Value = Address> {
    prop::array::uniform20(any::<u8>()).prop_map(Address::new)
}

/// Budget in wei with edge cases
pub fn arb_budget() -> impl Strategy<Value = u128> {
    prop_oneof![
        // Edge cases
        Just(0u128),
        Just(1u128),
        Just(9_999u128),
        Just(10_000u128),
        Just(u128::MAX),
        Just(u128::MAX / 2),
        // Realistic budgets, 1 gwei to 10 ether
        1_000_000_000u128..10_000_000_000_000_000_000u128,
        // Anything
        any::<u128>(),
    ]
}

/// Budget that the scenario harness can actually fund repeatedly
pub fn arb_job_budget() -> impl Strategy<Value = u128> {
    prop_oneof![
        Just(0u128),
        Just(1u128),
        1u128..1_000_000u128,
        1_000_000u128..1_000_000_000_000_000_000u128,
    ]
}

/// Base fee used by registrations and seeds
pub fn arb_base_fee() -> impl Strategy<Value = u128> {
    prop_oneof![
        Just(0u128),
        Just(1u128),
        1u128..1_000_000u128,
        80_000_000_000_000u128..=250_000_000_000_000u128,
    ]
}

/// Fee in basis points, mostly within the cap
pub fn arb_fee_bps() -> impl Strategy<Value = u16> {
    prop_oneof![
        Just(0u16),
        Just(1u16),
        Just(100u16),
        Just(MAX_PLATFORM_FEE_BPS),
        0u16..=MAX_PLATFORM_FEE_BPS,
    ]
}

/// Fee in basis points including values above the cap
pub fn arb_any_fee_bps() -> impl Strategy<Value = u16> {
    prop_oneof![
        arb_fee_bps(),
        Just(MAX_PLATFORM_FEE_BPS + 1),
        Just(u16::MAX),
        any::<u16>(),
    ]
}

/// Reputation, including values above the 0..=100 scale
pub fn arb_reputation() -> impl Strategy<Value = u8> {
    prop_oneof![
        Just(0u8),
        Just(50u8),
        Just(MAX_REPUTATION),
        0u8..=MAX_REPUTATION,
        Just(MAX_REPUTATION + 1),
        Just(u8::MAX),
    ]
}

/// Timeout in seconds around the accepted range
pub fn arb_timeout() -> impl Strategy<Value = u64> {
    prop_oneof![
        Just(0u64),
        Just(1u64),
        Just(MAX_JOB_TIMEOUT_SECS),
        Just(MAX_JOB_TIMEOUT_SECS + 1),
        Just(u64::MAX),
        1u64..3_600u64,
    ]
}

/// Stake attached to a registration
pub fn arb_stake() -> impl Strategy<Value = u128> {
    prop_oneof![
        Just(0u128),
        Just(DEFAULT_MIN_STAKE - 1),
        Just(DEFAULT_MIN_STAKE),
        DEFAULT_MIN_STAKE..DEFAULT_MIN_STAKE * 10,
    ]
}

pub fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Development),
        Just(Category::Research),
        Just(Category::DataMining),
        Just(Category::ContentGen),
    ]
}

pub fn arb_policy() -> impl Strategy<Value = SelectionPolicy> {
    prop_oneof![
        Just(SelectionPolicy::QualityFirst),
        Just(SelectionPolicy::EfficiencyFirst),
    ]
}

pub fn arb_version() -> impl Strategy<Value = ContractVersion> {
    prop_oneof![
        1 => Just(ContractVersion::V1),
        3 => Just(ContractVersion::V2),
    ]
}

/// Job reference; mostly existing ids, sometimes past the end
pub fn arb_job_ref() -> impl Strategy<Value = u64> {
    prop_oneof![
        8 => 0u64..6u64,
        1 => Just(u64::MAX),
    ]
}

// ============================================================================
// Operation sequences
// ============================================================================

/// One call against the engine. Participants are pool indices.
#[derive(Debug, Clone)]
pub enum Operation {
    Register { who: u8 },
    RegisterV2 { who: u8, category: Category, base_fee: u128, stake: u128 },
    Seed { caller: u8, who: u8, category: Category, base_fee: u128, reputation: u8 },
    CreateJob { employer: u8, worker: u8, budget: u128, timeout: u64 },
    CreateJobByCategory { employer: u8, category: Category, budget: u128, timeout: u64 },
    Accept { caller: u8, job_id: u64 },
    Submit { caller: u8, job_id: u64 },
    Release { caller: u8, job_id: u64 },
    Refund { caller: u8, job_id: u64 },
    Feedback { caller: u8, job_id: u64, positive: bool },
    SetReputation { caller: u8, who: u8, score: u8 },
    SetFee { caller: u8, fee_bps: u16 },
    Withdraw { caller: u8, to: u8, amount: u128 },
    Deposit { from: u8, amount: u128 },
    /// Toggles whether transfers to `who` fail
    ToggleRejection { who: u8 },
    AdvanceTime { seconds: u32 },
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    let p = arb_participant;
    prop_oneof![
        1 => p().prop_map(|who| Operation::Register { who }),
        1 => (p(), arb_category(), arb_base_fee(), arb_stake()).prop_map(
            |(who, category, base_fee, stake)| Operation::RegisterV2 {
                who,
                category,
                base_fee,
                stake,
            }
        ),
        1 => (p(), p(), arb_category(), arb_base_fee(), arb_reputation()).prop_map(
            |(caller, who, category, base_fee, reputation)| Operation::Seed {
                caller,
                who,
                category,
                base_fee,
                reputation,
            }
        ),
        3 => (p(), p(), arb_job_budget(), arb_timeout()).prop_map(
            |(employer, worker, budget, timeout)| Operation::CreateJob {
                employer,
                worker,
                budget,
                timeout,
            }
        ),
        3 => (p(), arb_category(), arb_job_budget(), arb_timeout()).prop_map(
            |(employer, category, budget, timeout)| Operation::CreateJobByCategory {
                employer,
                category,
                budget,
                timeout,
            }
        ),
        3 => (p(), arb_job_ref()).prop_map(|(caller, job_id)| Operation::Accept { caller, job_id }),
        3 => (p(), arb_job_ref()).prop_map(|(caller, job_id)| Operation::Submit { caller, job_id }),
        3 => (p(), arb_job_ref())
            .prop_map(|(caller, job_id)| Operation::Release { caller, job_id }),
        2 => (p(), arb_job_ref()).prop_map(|(caller, job_id)| Operation::Refund { caller, job_id }),
        2 => (p(), arb_job_ref(), any::<bool>())
            .prop_map(|(caller, job_id, positive)| {
                Operation::Feedback { caller, job_id, positive }
            }),
        1 => (p(), p(), arb_reputation())
            .prop_map(|(caller, who, score)| Operation::SetReputation { caller, who, score }),
        1 => (p(), arb_any_fee_bps())
            .prop_map(|(caller, fee_bps)| Operation::SetFee { caller, fee_bps }),
        1 => (p(), p(), arb_job_budget())
            .prop_map(|(caller, to, amount)| Operation::Withdraw { caller, to, amount }),
        1 => (p(), arb_job_budget()).prop_map(|(from, amount)| Operation::Deposit { from, amount }),
        1 => p().prop_map(|who| Operation::ToggleRejection { who }),
        2 => prop_oneof![Just(0u32), Just(1u32), 1u32..4_000u32, Just(400 * 24 * 3_600)]
            .prop_map(|seconds| Operation::AdvanceTime { seconds }),
    ]
}

/// Deployment parameters plus a run of operations
#[derive(Debug, Clone)]
pub struct OperationSequence {
    pub version: ContractVersion,
    pub fee_bps: u16,
    pub policy: SelectionPolicy,
    pub operations: Vec<Operation>,
}

impl Arbitrary for OperationSequence {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_version(),
            arb_fee_bps(),
            arb_policy(),
            prop::collection::vec(arb_operation(), 1..60),
        )
            .prop_map(|(version, fee_bps, policy, operations)| OperationSequence {
                version,
                fee_bps,
                policy,
                operations,
            })
            .boxed()
    }
}

// ============================================================================
// Focused inputs
// ============================================================================

/// Input for settlement fuzz testing
#[derive(Debug, Clone)]
pub struct SettlementInput {
    pub budget: u128,
    pub fee_bps: u16,
}

impl Arbitrary for SettlementInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (arb_budget(), arb_any_fee_bps())
            .prop_map(|(budget, fee_bps)| SettlementInput { budget, fee_bps })
            .boxed()
    }
}

/// One candidate in a selection input
#[derive(Debug, Clone)]
pub struct CandidateInput {
    pub id: u8,
    pub category: Category,
    pub base_fee: u128,
    pub reputation: u8,
}

/// Input for selection fuzz testing
#[derive(Debug, Clone)]
pub struct SelectionInput {
    pub candidates: Vec<CandidateInput>,
    pub category: Category,
    pub budget: u128,
    pub policy: SelectionPolicy,
}

impl Arbitrary for SelectionInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let candidate = (
            any::<u8>(),
            arb_category(),
            prop_oneof![Just(0u128), 1u128..10_000u128, any::<u128>()],
            0u8..=MAX_REPUTATION,
        )
            .prop_map(|(id, category, base_fee, reputation)| CandidateInput {
                id,
                category,
                base_fee,
                reputation,
            });
        (
            prop::collection::vec(candidate, 0..24),
            arb_category(),
            prop_oneof![Just(0u128), 1u128..20_000u128, Just(u128::MAX)],
            arb_policy(),
        )
            .prop_map(|(candidates, category, budget, policy)| SelectionInput {
                candidates,
                category,
                budget,
                policy,
            })
            .boxed()
    }
}

/// Input for reputation step fuzz testing
#[derive(Debug, Clone)]
pub struct ReputationInput {
    pub start: u8,
    pub steps: Vec<bool>,
}

impl Arbitrary for ReputationInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0u8..=MAX_REPUTATION, prop::collection::vec(any::<bool>(), 0..250))
            .prop_map(|(start, steps)| ReputationInput { start, steps })
            .boxed()
    }
}
