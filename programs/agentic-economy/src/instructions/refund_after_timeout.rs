//! Refund the employer once a job's timeout has elapsed

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::{EconomyEvent, ReputationReason};
use crate::instructions::reputation_helpers::apply_step;
use crate::instructions::value_transfer::{send, Checkpoint, Transfer, TransferKind, ValueSink};
use crate::state::JobStatus;
use crate::utils::version::EntryPoint;
use crate::Economy;

/// Anyone may trigger the refund; the budget always goes to the employer.
pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    job_id: u64,
    sink: &mut dyn ValueSink,
) -> Result<u128> {
    economy.begin(EntryPoint::RefundAfterTimeout)?;

    let job = economy.get_job(job_id)?;
    if !job.status.can_transition_to(JobStatus::Refunded) {
        return Err(EconomyError::InvalidState {
            job_id,
            status: job.status,
            expected: "Open or Taken",
        });
    }
    if !job.is_timed_out(ctx.now) {
        return Err(EconomyError::TimeoutNotElapsed {
            job_id,
            deadline: job.deadline(),
            now: ctx.now,
        });
    }
    let (budget, employer, worker) = (job.budget, job.employer, job.worker);
    // The worker is assigned at creation, so every timed-out job costs it
    let penalize = economy.config.version.tracks_reputation();

    let locked_funds = economy
        .ledger
        .locked_funds
        .checked_sub(budget)
        .ok_or(EconomyError::ArithmeticOverflow)?;
    let total_refunded = economy
        .ledger
        .total_refunded
        .checked_add(budget)
        .ok_or(EconomyError::ArithmeticOverflow)?;

    let checkpoint = Checkpoint::capture(economy, Some(job_id), penalize.then_some(worker));

    // Effects
    let reputation_event = if penalize {
        let profile = economy.agent_mut(&worker)?;
        Some(apply_step(profile, false, ReputationReason::Refund, ctx.now))
    } else {
        None
    };
    economy.job_mut(job_id)?.status = JobStatus::Refunded;
    economy.ledger.locked_funds = locked_funds;
    economy.ledger.total_refunded = total_refunded;

    // Interaction
    send(
        economy,
        sink,
        Transfer {
            recipient: employer,
            amount: budget,
            kind: TransferKind::Refund { job_id },
        },
        checkpoint,
    )?;

    info!(job_id, %employer, amount = %budget, penalize, "job refunded");
    let mut events = vec![EconomyEvent::JobRefunded {
        job_id,
        employer,
        amount: budget,
        timestamp: ctx.now,
    }];
    events.extend(reputation_event);
    let sequence = economy.commit(EntryPoint::RefundAfterTimeout, events);
    economy
        .job_mut(job_id)?
        .record(EntryPoint::RefundAfterTimeout, ctx.now, sequence);
    Ok(budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::value_transfer::Balances;
    use crate::test_utils::*;

    const AFTER_TIMEOUT: i64 = T0 + TIMEOUT as i64 + 1;

    #[test]
    fn test_refund_taken_job_penalizes_worker() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = open_job(&mut economy, BUDGET);
        economy.set_agent_reputation(&call(OWNER), WORKER, 20).unwrap();
        economy.accept_job(&call(WORKER), job_id).unwrap();

        let refunded = economy
            .refund_after_timeout(&at(EMPLOYER, AFTER_TIMEOUT), job_id, &mut balances)
            .unwrap();

        assert_eq!(refunded, BUDGET);
        assert_eq!(balances.balance_of(&EMPLOYER), BUDGET);
        assert_eq!(economy.locked_funds(), 0);
        assert_eq!(economy.get_job(job_id).unwrap().status, JobStatus::Refunded);
        assert_eq!(economy.get_agent_profile(&WORKER).unwrap().reputation, 19);
        assert!(economy.events().iter().any(|event| matches!(
            event,
            EconomyEvent::JobRefunded { employer, amount, .. }
                if *employer == EMPLOYER && *amount == BUDGET
        )));
    }

    #[test]
    fn test_refund_open_job_penalizes_assigned_worker() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = open_job(&mut economy, BUDGET);
        economy
            .refund_after_timeout(&at(OUTSIDER, AFTER_TIMEOUT), job_id, &mut balances)
            .unwrap();
        assert_eq!(balances.balance_of(&EMPLOYER), BUDGET);
        assert_eq!(balances.balance_of(&OUTSIDER), 0);
        assert_eq!(economy.get_agent_profile(&WORKER).unwrap().reputation, 49);
    }

    #[test]
    fn test_refund_at_deadline_is_too_early() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = open_job(&mut economy, BUDGET);
        let deadline = T0 + TIMEOUT as i64;
        assert_eq!(
            economy.refund_after_timeout(&at(EMPLOYER, deadline), job_id, &mut balances),
            Err(EconomyError::TimeoutNotElapsed {
                job_id,
                deadline,
                now: deadline,
            })
        );
        assert_eq!(economy.locked_funds(), BUDGET);
    }

    #[test]
    fn test_refund_is_idempotent() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = open_job(&mut economy, BUDGET);
        economy
            .refund_after_timeout(&at(EMPLOYER, AFTER_TIMEOUT), job_id, &mut balances)
            .unwrap();
        assert!(matches!(
            economy.refund_after_timeout(&at(EMPLOYER, AFTER_TIMEOUT + 60), job_id, &mut balances),
            Err(EconomyError::InvalidState { status: JobStatus::Refunded, .. })
        ));
        assert_eq!(balances.balance_of(&EMPLOYER), BUDGET);
        assert_eq!(economy.ledger().total_refunded, BUDGET);
    }

    #[test]
    fn test_submitted_job_cannot_be_refunded() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = submitted_job(&mut economy, BUDGET);
        assert!(matches!(
            economy.refund_after_timeout(&at(EMPLOYER, AFTER_TIMEOUT), job_id, &mut balances),
            Err(EconomyError::InvalidState { status: JobStatus::Submitted, .. })
        ));
    }

    #[test]
    fn test_failed_refund_restores_worker_reputation() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = open_job(&mut economy, BUDGET);
        economy.accept_job(&call(WORKER), job_id).unwrap();
        balances.reject_transfers_to(EMPLOYER);

        assert!(matches!(
            economy.refund_after_timeout(&at(EMPLOYER, AFTER_TIMEOUT), job_id, &mut balances),
            Err(EconomyError::TransferFailed { .. })
        ));
        assert_eq!(economy.get_job(job_id).unwrap().status, JobStatus::Taken);
        assert_eq!(economy.get_agent_profile(&WORKER).unwrap().reputation, 50);
        assert_eq!(economy.locked_funds(), BUDGET);
    }
}
