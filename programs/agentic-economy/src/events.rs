//! Events emitted by the agentic economy engine
//!
//! Events are appended to the engine log only after a call commits, so a
//! failed or rolled-back call never leaves an event behind.

use serde::{Deserialize, Serialize};

use crate::state::{Address, Category};

/// Why a reputation score moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReputationReason {
    Payment,
    Refund,
    Feedback,
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum EconomyEvent {
    /// Emitted when an uncategorized agent registers
    AgentRegistered {
        agent: Address,
        name: String,
        timestamp: i64,
    },

    /// Emitted when a categorized agent registers or is seeded
    AgentRegisteredV2 {
        agent: Address,
        name: String,
        category: Category,
        base_fee: u128,
        stake: u128,
        reputation: u8,
        timestamp: i64,
    },

    ReputationUpdated {
        agent: Address,
        old_reputation: u8,
        new_reputation: u8,
        reason: ReputationReason,
        timestamp: i64,
    },

    /// Emitted when a budget is locked in escrow
    JobCreated {
        job_id: u64,
        employer: Address,
        worker: Address,
        budget: u128,
        deadline: i64,
        timestamp: i64,
    },

    /// Emitted alongside `JobCreated` when the worker was picked by category
    AgentSelected {
        job_id: u64,
        agent: Address,
        category: Category,
        base_fee: u128,
        reputation: u8,
        timestamp: i64,
    },

    JobAccepted {
        job_id: u64,
        worker: Address,
        timestamp: i64,
    },

    WorkSubmitted {
        job_id: u64,
        worker: Address,
        delivery: String,
        timestamp: i64,
    },

    PaymentReleased {
        job_id: u64,
        worker: Address,
        payout: u128,
        fee: u128,
        timestamp: i64,
    },

    JobRefunded {
        job_id: u64,
        employer: Address,
        amount: u128,
        timestamp: i64,
    },

    FeedbackApplied {
        job_id: u64,
        worker: Address,
        positive: bool,
        reputation: u8,
        timestamp: i64,
    },

    PlatformFeeUpdated {
        old_fee_bps: u16,
        new_fee_bps: u16,
        updated_by: Address,
        timestamp: i64,
    },

    FeesWithdrawn {
        to: Address,
        amount: u128,
        timestamp: i64,
    },

    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
        timestamp: i64,
    },

    /// Emitted when value is sent directly to the engine
    FundsReceived {
        from: Address,
        amount: u128,
        timestamp: i64,
    },
}

impl EconomyEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EconomyEvent::AgentRegistered { .. } => "AgentRegistered",
            EconomyEvent::AgentRegisteredV2 { .. } => "AgentRegisteredV2",
            EconomyEvent::ReputationUpdated { .. } => "ReputationUpdated",
            EconomyEvent::JobCreated { .. } => "JobCreated",
            EconomyEvent::AgentSelected { .. } => "AgentSelected",
            EconomyEvent::JobAccepted { .. } => "JobAccepted",
            EconomyEvent::WorkSubmitted { .. } => "WorkSubmitted",
            EconomyEvent::PaymentReleased { .. } => "PaymentReleased",
            EconomyEvent::JobRefunded { .. } => "JobRefunded",
            EconomyEvent::FeedbackApplied { .. } => "FeedbackApplied",
            EconomyEvent::PlatformFeeUpdated { .. } => "PlatformFeeUpdated",
            EconomyEvent::FeesWithdrawn { .. } => "FeesWithdrawn",
            EconomyEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
            EconomyEvent::FundsReceived { .. } => "FundsReceived",
        }
    }
}
