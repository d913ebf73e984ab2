//! One-shot employer feedback on a resolved job

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::{EconomyEvent, ReputationReason};
use crate::instructions::reputation_helpers::apply_step;
use crate::state::JobStatus;
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    job_id: u64,
    positive: bool,
) -> Result<u8> {
    economy.begin(EntryPoint::ApplySyntheticFeedback)?;

    let job = economy.get_job(job_id)?;
    if ctx.caller != job.employer {
        return Err(EconomyError::Unauthorized {
            caller: ctx.caller,
            entry_point: EntryPoint::ApplySyntheticFeedback,
        });
    }
    if job.status != JobStatus::Resolved {
        return Err(EconomyError::InvalidState {
            job_id,
            status: job.status,
            expected: "Resolved",
        });
    }
    if job.feedback_applied {
        return Err(EconomyError::InvalidState {
            job_id,
            status: job.status,
            expected: "Resolved without feedback",
        });
    }
    let worker = job.worker;

    let profile = economy.agent_mut(&worker)?;
    let reputation_event = apply_step(profile, positive, ReputationReason::Feedback, ctx.now);
    let reputation = profile.reputation;
    economy.job_mut(job_id)?.feedback_applied = true;

    info!(job_id, %worker, positive, reputation, "feedback applied");
    let sequence = economy.commit(
        EntryPoint::ApplySyntheticFeedback,
        vec![
            EconomyEvent::FeedbackApplied {
                job_id,
                worker,
                positive,
                reputation,
                timestamp: ctx.now,
            },
            reputation_event,
        ],
    );
    economy
        .job_mut(job_id)?
        .record(EntryPoint::ApplySyntheticFeedback, ctx.now, sequence);
    Ok(reputation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::value_transfer::Balances;
    use crate::test_utils::*;

    #[test]
    fn test_negative_feedback_reverses_payment_bump() {
        let mut economy = economy();
        let mut balances = Balances::new();
        register(&mut economy, WORKER, crate::state::Category::Development, 0);
        economy.set_agent_reputation(&call(OWNER), WORKER, 60).unwrap();
        let job_id = resolved_job(&mut economy, BUDGET, &mut balances);
        assert_eq!(economy.get_agent_profile(&WORKER).unwrap().reputation, 61);

        let reputation = economy
            .apply_synthetic_feedback(&call(EMPLOYER), job_id, false)
            .unwrap();
        assert_eq!(reputation, 60);
        assert!(economy.get_job(job_id).unwrap().feedback_applied);
    }

    #[test]
    fn test_feedback_only_once() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = resolved_job(&mut economy, BUDGET, &mut balances);
        economy.apply_synthetic_feedback(&call(EMPLOYER), job_id, true).unwrap();
        let reputation = economy.get_agent_profile(&WORKER).unwrap().reputation;

        for positive in [true, false] {
            assert!(matches!(
                economy.apply_synthetic_feedback(&call(EMPLOYER), job_id, positive),
                Err(EconomyError::InvalidState { status: JobStatus::Resolved, .. })
            ));
        }
        assert_eq!(economy.get_agent_profile(&WORKER).unwrap().reputation, reputation);
    }

    #[test]
    fn test_feedback_before_resolution() {
        let mut economy = economy();
        let job_id = submitted_job(&mut economy, BUDGET);
        assert_eq!(
            economy.apply_synthetic_feedback(&call(EMPLOYER), job_id, true),
            Err(EconomyError::InvalidState {
                job_id,
                status: JobStatus::Submitted,
                expected: "Resolved",
            })
        );
    }

    #[test]
    fn test_only_employer_gives_feedback() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = resolved_job(&mut economy, BUDGET, &mut balances);
        assert!(matches!(
            economy.apply_synthetic_feedback(&call(WORKER), job_id, true),
            Err(EconomyError::Unauthorized { .. })
        ));
        assert!(!economy.get_job(job_id).unwrap().feedback_applied);
    }
}
