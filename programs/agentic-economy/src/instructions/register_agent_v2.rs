//! Register a categorized agent with a base fee and a stake

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::instructions::register_agent::{insert_profile, validate_registration};
use crate::state::{AgentProfile, Category};
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    name: &str,
    expertise: &str,
    category: Category,
    base_fee: u128,
) -> Result<()> {
    economy.begin(EntryPoint::RegisterAgentV2)?;
    validate_registration(economy, &ctx.caller, name, expertise)?;

    // Attached value is the stake
    if ctx.value < economy.config.min_stake {
        return Err(EconomyError::InsufficientStake {
            provided: ctx.value,
            required: economy.config.min_stake,
        });
    }

    let mut profile =
        AgentProfile::new(ctx.caller, name.to_string(), expertise.to_string(), ctx.now);
    profile.category = Some(category);
    profile.base_fee = base_fee;
    profile.stake = ctx.value;
    let reputation = profile.reputation;
    insert_profile(economy, profile)?;

    info!(
        agent = %ctx.caller,
        %category,
        base_fee = %base_fee,
        stake = %ctx.value,
        "agent registered"
    );
    economy.commit(
        EntryPoint::RegisterAgentV2,
        vec![EconomyEvent::AgentRegisteredV2 {
            agent: ctx.caller,
            name: name.to_string(),
            category,
            base_fee,
            stake: ctx.value,
            reputation,
            timestamp: ctx.now,
        }],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::constants::DEFAULT_MIN_STAKE;
    use crate::state::ContractVersion;
    use crate::test_utils::*;

    #[test]
    fn test_register_with_minimum_stake() {
        let mut economy = economy();
        let ctx = call(WORKER).with_value(DEFAULT_MIN_STAKE);
        economy
            .register_agent_v2(&ctx, "Dev Agent", "backend", Category::Development, 2_000)
            .unwrap();

        let profile = economy.get_agent_profile(&WORKER).unwrap();
        assert_eq!(profile.category, Some(Category::Development));
        assert_eq!(profile.base_fee, 2_000);
        assert_eq!(profile.reputation, 50);
        assert_eq!(profile.stake, DEFAULT_MIN_STAKE);
        assert_eq!(economy.ledger().total_staked, DEFAULT_MIN_STAKE);
        assert_eq!(economy.category_agents(Category::Development), &[WORKER]);
    }

    #[test]
    fn test_stake_below_minimum() {
        let mut economy = economy();
        let ctx = call(WORKER).with_value(DEFAULT_MIN_STAKE - 1);
        assert_eq!(
            economy.register_agent_v2(&ctx, "Dev Agent", "", Category::Development, 0),
            Err(EconomyError::InsufficientStake {
                provided: DEFAULT_MIN_STAKE - 1,
                required: DEFAULT_MIN_STAKE,
            })
        );
        assert_eq!(economy.ledger().total_staked, 0);
        assert!(economy.events().is_empty());
    }

    #[test]
    fn test_duplicate_keeps_first_category() {
        let mut economy = economy();
        register(&mut economy, WORKER, Category::Development, 100);
        let ctx = call(WORKER).with_value(DEFAULT_MIN_STAKE);
        assert_eq!(
            economy.register_agent_v2(&ctx, "Again", "", Category::Research, 1),
            Err(EconomyError::AlreadyRegistered(WORKER))
        );
        let profile = economy.get_agent_profile(&WORKER).unwrap();
        assert_eq!(profile.category, Some(Category::Development));
        assert_eq!(profile.base_fee, 100);
        assert!(economy.category_agents(Category::Research).is_empty());
    }

    #[test]
    fn test_unavailable_on_v1() {
        let mut economy = economy_v1();
        let ctx = call(WORKER).with_value(DEFAULT_MIN_STAKE);
        assert_eq!(
            economy.register_agent_v2(&ctx, "Dev", "", Category::Development, 0),
            Err(EconomyError::UnsupportedEntryPoint {
                entry_point: EntryPoint::RegisterAgentV2,
                version: ContractVersion::V1,
            })
        );
    }
}
