//! Owner override of an agent's reputation

use tracing::info;

use crate::context::CallContext;
use crate::errors::Result;
use crate::events::{EconomyEvent, ReputationReason};
use crate::instructions::reputation_helpers::validate_reputation;
use crate::state::Address;
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(economy: &mut Economy, ctx: &CallContext, agent: Address, score: u8) -> Result<()> {
    economy.begin(EntryPoint::SetAgentReputation)?;
    economy.require_owner(ctx, EntryPoint::SetAgentReputation)?;
    validate_reputation(score)?;

    let profile = economy.agent_mut(&agent)?;
    let old_reputation = profile.reputation;
    profile.reputation = score;

    info!(%agent, old_reputation, new_reputation = score, "reputation overridden");
    economy.commit(
        EntryPoint::SetAgentReputation,
        vec![EconomyEvent::ReputationUpdated {
            agent,
            old_reputation,
            new_reputation: score,
            reason: ReputationReason::Override,
            timestamp: ctx.now,
        }],
    );
    Ok(())
}
