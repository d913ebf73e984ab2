//! Owner-only registration of synthetic agents for demos and tests

use tracing::info;

use crate::context::CallContext;
use crate::errors::Result;
use crate::events::EconomyEvent;
use crate::instructions::register_agent::{insert_profile, validate_registration};
use crate::instructions::reputation_helpers::validate_reputation;
use crate::state::{Address, AgentProfile, Category};
use crate::utils::version::EntryPoint;
use crate::Economy;

#[allow(clippy::too_many_arguments)]
pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    agent: Address,
    name: &str,
    expertise: &str,
    category: Category,
    base_fee: u128,
    reputation: u8,
) -> Result<()> {
    economy.begin(EntryPoint::SeedSyntheticAgent)?;
    economy.require_owner(ctx, EntryPoint::SeedSyntheticAgent)?;
    validate_registration(economy, &agent, name, expertise)?;
    validate_reputation(reputation)?;

    let mut profile = AgentProfile::new(agent, name.to_string(), expertise.to_string(), ctx.now);
    profile.category = Some(category);
    profile.base_fee = base_fee;
    profile.reputation = reputation;
    insert_profile(economy, profile)?;

    info!(%agent, %category, base_fee = %base_fee, reputation, "synthetic agent seeded");
    economy.commit(
        EntryPoint::SeedSyntheticAgent,
        vec![EconomyEvent::AgentRegisteredV2 {
            agent,
            name: name.to_string(),
            category,
            base_fee,
            stake: 0,
            reputation,
            timestamp: ctx.now,
        }],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EconomyError;
    use crate::test_utils::*;

    #[test]
    fn test_owner_seeds_agent() {
        let mut economy = economy();
        economy
            .seed_synthetic_agent(
                &call(OWNER),
                agent(0x21),
                "Research-high",
                "",
                Category::Research,
                250,
                92,
            )
            .unwrap();
        let profile = economy.get_agent_profile(&agent(0x21)).unwrap();
        assert_eq!(profile.reputation, 92);
        assert_eq!(profile.stake, 0);
        let best = economy.get_best_agent(Category::Research, 250).unwrap();
        assert_eq!(best.map(|entry| entry.address), Some(agent(0x21)));
    }

    #[test]
    fn test_non_owner_rejected() {
        let mut economy = economy();
        assert_eq!(
            economy.seed_synthetic_agent(
                &call(OUTSIDER),
                agent(0x21),
                "Seed",
                "",
                Category::Research,
                1,
                10,
            ),
            Err(EconomyError::Unauthorized {
                caller: OUTSIDER,
                entry_point: EntryPoint::SeedSyntheticAgent,
            })
        );
    }

    #[test]
    fn test_reputation_above_max_rejected() {
        let mut economy = economy();
        assert!(matches!(
            economy.seed_synthetic_agent(
                &call(OWNER),
                agent(0x21),
                "Seed",
                "",
                Category::Research,
                1,
                101,
            ),
            Err(EconomyError::OutOfRange { field: "reputation", .. })
        ));
        assert!(!economy.is_registered(&agent(0x21)));
    }
}
