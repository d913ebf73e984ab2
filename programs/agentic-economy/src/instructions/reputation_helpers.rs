//! Reputation update rule: fixed-step, saturating, clamped to 0..=100

use tracing::debug;

use crate::errors::{EconomyError, Result};
use crate::events::{EconomyEvent, ReputationReason};
use crate::instructions::constants::{MAX_REPUTATION, MIN_REPUTATION, REPUTATION_STEP};
use crate::state::AgentProfile;

/// Reputation after a positive outcome, capped at MAX_REPUTATION
pub fn rewarded(current: u8) -> u8 {
    current.saturating_add(REPUTATION_STEP).min(MAX_REPUTATION)
}

/// Reputation after a negative outcome, floored at MIN_REPUTATION
pub fn penalized(current: u8) -> u8 {
    current
        .saturating_sub(REPUTATION_STEP)
        .clamp(MIN_REPUTATION, MAX_REPUTATION)
}

/// Validates an explicit score supplied by an owner override or a seed
pub fn validate_reputation(score: u8) -> Result<()> {
    if score > MAX_REPUTATION {
        return Err(EconomyError::OutOfRange {
            field: "reputation",
            value: u128::from(score),
            min: u128::from(MIN_REPUTATION),
            max: u128::from(MAX_REPUTATION),
        });
    }
    Ok(())
}

/// Moves `agent` one step up or down and returns the matching event.
pub fn apply_step(
    agent: &mut AgentProfile,
    positive: bool,
    reason: ReputationReason,
    timestamp: i64,
) -> EconomyEvent {
    let old_reputation = agent.reputation;
    agent.reputation = if positive {
        rewarded(old_reputation)
    } else {
        penalized(old_reputation)
    };
    debug!(
        agent = %agent.address,
        old_reputation,
        new_reputation = agent.reputation,
        ?reason,
        "reputation step"
    );
    EconomyEvent::ReputationUpdated {
        agent: agent.address,
        old_reputation,
        new_reputation: agent.reputation,
        reason,
        timestamp,
    }
}
