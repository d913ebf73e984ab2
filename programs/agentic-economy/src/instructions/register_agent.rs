//! Register an agent without a category

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::instructions::constants::{MAX_EXPERTISE_LEN, MAX_NAME_LEN};
use crate::state::{Address, AgentProfile};
use crate::utils::validation::{require_optional_text, require_text};
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    name: &str,
    expertise: &str,
) -> Result<()> {
    economy.begin(EntryPoint::RegisterAgent)?;
    // Not payable: v1 agents carry no stake
    if ctx.value != 0 {
        return Err(EconomyError::InvalidInput("value"));
    }
    validate_registration(economy, &ctx.caller, name, expertise)?;

    let profile = AgentProfile::new(ctx.caller, name.to_string(), expertise.to_string(), ctx.now);
    insert_profile(economy, profile)?;

    info!(agent = %ctx.caller, name, "agent registered");
    economy.commit(
        EntryPoint::RegisterAgent,
        vec![EconomyEvent::AgentRegistered {
            agent: ctx.caller,
            name: name.to_string(),
            timestamp: ctx.now,
        }],
    );
    Ok(())
}

/// Checks shared by every registration path
pub(crate) fn validate_registration(
    economy: &Economy,
    agent: &Address,
    name: &str,
    expertise: &str,
) -> Result<()> {
    if agent.is_zero() {
        return Err(EconomyError::InvalidAddress(agent.to_string()));
    }
    if economy.is_registered(agent) {
        return Err(EconomyError::AlreadyRegistered(*agent));
    }
    require_text(name, MAX_NAME_LEN, "name")?;
    require_optional_text(expertise, MAX_EXPERTISE_LEN, "expertise")?;
    Ok(())
}

/// Stores a validated profile and indexes it by category
pub(crate) fn insert_profile(economy: &mut Economy, profile: AgentProfile) -> Result<()> {
    economy.ledger.total_staked = economy
        .ledger
        .total_staked
        .checked_add(profile.stake)
        .ok_or(EconomyError::ArithmeticOverflow)?;
    if let Some(category) = profile.category {
        economy
            .category_agents
            .entry(category)
            .or_default()
            .push(profile.address);
    }
    economy.registration_order.push(profile.address);
    economy.agents.insert(profile.address, profile);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::constants::INITIAL_REPUTATION;
    use crate::state::Category;
    use crate::test_utils::*;

    #[test]
    fn test_register_uncategorized_agent() {
        let mut economy = economy_v1();
        economy.register_agent(&call(WORKER), "Legacy Worker", "writing").unwrap();

        let profile = economy.get_agent_profile(&WORKER).unwrap();
        assert_eq!(profile.category, None);
        assert_eq!(profile.reputation, INITIAL_REPUTATION);
        assert_eq!(profile.registered_at, T0);
        assert!(economy.ranking_entries(Category::ContentGen).is_empty());
        assert_eq!(economy.events().last().map(EconomyEvent::name), Some("AgentRegistered"));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut economy = economy();
        economy.register_agent(&call(WORKER), "Worker", "").unwrap();
        let before = economy.events().len();
        assert_eq!(
            economy.register_agent(&call(WORKER), "Worker", ""),
            Err(EconomyError::AlreadyRegistered(WORKER))
        );
        assert_eq!(economy.events().len(), before);
    }

    #[test]
    fn test_rejects_bad_names() {
        let mut economy = economy();
        assert_eq!(
            economy.register_agent(&call(WORKER), "", ""),
            Err(EconomyError::InvalidInput("name"))
        );
        assert_eq!(
            economy.register_agent(&call(WORKER), "bad\nname", ""),
            Err(EconomyError::InvalidInput("name"))
        );
        assert!(!economy.is_registered(&WORKER));
    }

    #[test]
    fn test_rejects_attached_value() {
        let mut economy = economy_v1();
        assert_eq!(
            economy.register_agent(&call(WORKER).with_value(ETHER), "Worker", ""),
            Err(EconomyError::InvalidInput("value"))
        );
        assert!(!economy.is_registered(&WORKER));
        assert_eq!(economy.ledger().total_staked, 0);
        assert!(economy.events().is_empty());
    }

    #[test]
    fn test_zero_address_cannot_register() {
        let mut economy = economy();
        assert!(matches!(
            economy.register_agent(&call(Address::ZERO), "Nobody", ""),
            Err(EconomyError::InvalidAddress(_))
        ));
    }
}
