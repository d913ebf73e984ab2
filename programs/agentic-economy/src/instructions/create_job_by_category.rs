//! Create a job whose worker is picked by the selector

use tracing::{debug, info};

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::instructions::create_job::{job_created_event, open_job, validate_employer};
use crate::instructions::selection_helpers::select;
use crate::state::Category;
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    category: Category,
    timeout: u64,
) -> Result<u64> {
    economy.begin(EntryPoint::CreateJobByCategory)?;
    validate_employer(economy, ctx, EntryPoint::CreateJobByCategory, timeout)?;

    let budget = ctx.value;
    let candidates = economy
        .ranking_entries(category)
        .into_iter()
        .filter(|entry| entry.address != ctx.caller);
    let selection = select(candidates, category, budget, economy.config.selection_policy);
    debug!(
        %category,
        budget = %budget,
        affordable = selection.affordable.len(),
        "candidates ranked"
    );
    let chosen = selection
        .into_best()
        .ok_or(EconomyError::NoEligibleAgent { category, budget })?;

    let job = open_job(economy, ctx, chosen.address, timeout, Some(category))?;
    info!(job_id = job, agent = %chosen.address, reputation = chosen.reputation, "agent selected");

    let events = vec![
        job_created_event(economy, job, ctx.now)?,
        EconomyEvent::AgentSelected {
            job_id: job,
            agent: chosen.address,
            category,
            base_fee: chosen.base_fee,
            reputation: chosen.reputation,
            timestamp: ctx.now,
        },
    ];
    let sequence = economy.commit(EntryPoint::CreateJobByCategory, events);
    economy
        .job_mut(job)?
        .record(EntryPoint::CreateJobByCategory, ctx.now, sequence);
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SelectionPolicy;
    use crate::test_utils::*;

    const DEV_TOP: u8 = 0x31;
    const DEV_MID: u8 = 0x32;
    const DEV_LOW: u8 = 0x33;

    fn seeded(policy: SelectionPolicy) -> Economy {
        let config = crate::ProtocolConfig::new(OWNER).with_selection_policy(policy);
        let mut economy = Economy::new(config).unwrap();
        register(&mut economy, EMPLOYER, Category::Research, 0);
        for (id, fee, reputation) in [
            (DEV_TOP, 4_000, 92),
            (DEV_MID, 2_000, 70),
            (DEV_LOW, 1_000, 45),
        ] {
            economy
                .seed_synthetic_agent(
                    &call(OWNER),
                    agent(id),
                    "Dev",
                    "",
                    Category::Development,
                    fee,
                    reputation,
                )
                .unwrap();
        }
        economy
    }

    #[test]
    fn test_selects_highest_reputation_within_budget() {
        let mut economy = seeded(SelectionPolicy::QualityFirst);
        let job_id = economy
            .create_job_by_category(
                &call(EMPLOYER).with_value(2_500),
                Category::Development,
                TIMEOUT,
            )
            .unwrap();

        let job = economy.get_job(job_id).unwrap();
        assert_eq!(job.worker, agent(DEV_MID));
        assert!(job.selected_by_algorithm);
        assert_eq!(job.category, Some(Category::Development));
        assert!(economy.events().iter().any(|event| matches!(
            event,
            EconomyEvent::AgentSelected { agent: selected, reputation: 70, .. }
                if *selected == agent(DEV_MID)
        )));
    }

    #[test]
    fn test_efficiency_first_matches_deployed_contract() {
        let mut economy = seeded(SelectionPolicy::EfficiencyFirst);
        let job_id = economy
            .create_job_by_category(
                &call(EMPLOYER).with_value(2_500),
                Category::Development,
                TIMEOUT,
            )
            .unwrap();
        assert_eq!(economy.get_job(job_id).unwrap().worker, agent(DEV_LOW));
    }

    #[test]
    fn test_no_eligible_agent() {
        let mut economy = seeded(SelectionPolicy::QualityFirst);
        assert_eq!(
            economy.create_job_by_category(
                &call(EMPLOYER).with_value(999),
                Category::Development,
                TIMEOUT,
            ),
            Err(EconomyError::NoEligibleAgent {
                category: Category::Development,
                budget: 999,
            })
        );
        assert_eq!(economy.locked_funds(), 0);
        assert_eq!(economy.next_job_id(), 0);
    }

    #[test]
    fn test_employer_never_selects_itself() {
        let mut economy = seeded(SelectionPolicy::QualityFirst);
        // EMPLOYER is the only research agent
        assert!(matches!(
            economy.create_job_by_category(
                &call(EMPLOYER).with_value(BUDGET),
                Category::Research,
                TIMEOUT,
            ),
            Err(EconomyError::NoEligibleAgent { category: Category::Research, .. })
        ));
    }

    #[test]
    fn test_unavailable_on_v1() {
        let mut economy = economy_v1();
        economy.register_agent(&call(EMPLOYER), "Employer", "").unwrap();
        assert!(matches!(
            economy.create_job_by_category(
                &call(EMPLOYER).with_value(BUDGET),
                Category::Research,
                TIMEOUT,
            ),
            Err(EconomyError::UnsupportedEntryPoint { .. })
        ));
    }
}
