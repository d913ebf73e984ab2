//! Employer approves submitted work and releases the payment

use serde::Serialize;
use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::{EconomyEvent, ReputationReason};
use crate::instructions::reputation_helpers::apply_step;
use crate::instructions::settlement_helpers::calculate_fee_split;
use crate::instructions::value_transfer::{send, Checkpoint, Transfer, TransferKind, ValueSink};
use crate::state::{Address, JobStatus};
use crate::utils::version::EntryPoint;
use crate::Economy;

/// Result of a released payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub job_id: u64,
    pub worker: Address,
    pub payout: u128,
    pub fee: u128,
}

/// Shared by `approveWork` and `releasePayment`; `entry_point` names the caller's choice.
pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    job_id: u64,
    sink: &mut dyn ValueSink,
    entry_point: EntryPoint,
) -> Result<Settlement> {
    economy.begin(entry_point)?;

    let job = economy.get_job(job_id)?;
    if ctx.caller != job.employer {
        return Err(EconomyError::Unauthorized {
            caller: ctx.caller,
            entry_point,
        });
    }
    if job.status != JobStatus::Submitted {
        return Err(EconomyError::InvalidState {
            job_id,
            status: job.status,
            expected: "Submitted",
        });
    }
    let (budget, worker) = (job.budget, job.worker);

    let split = calculate_fee_split(budget, economy.config.platform_fee_bps)?;
    let locked_funds = economy
        .ledger
        .locked_funds
        .checked_sub(budget)
        .ok_or(EconomyError::ArithmeticOverflow)?;
    let accrued_fees = economy
        .ledger
        .accrued_fees
        .checked_add(split.fee)
        .ok_or(EconomyError::ArithmeticOverflow)?;
    let total_paid_out = economy
        .ledger
        .total_paid_out
        .checked_add(split.payout)
        .ok_or(EconomyError::ArithmeticOverflow)?;

    let checkpoint = Checkpoint::capture(economy, Some(job_id), Some(worker));
    let tracks_reputation = economy.config.version.tracks_reputation();

    // Effects
    let profile = economy.agent_mut(&worker)?;
    profile.jobs_completed = profile.jobs_completed.saturating_add(1);
    profile.total_earned = profile.total_earned.saturating_add(split.payout);
    let reputation_event =
        tracks_reputation.then(|| apply_step(profile, true, ReputationReason::Payment, ctx.now));

    economy.job_mut(job_id)?.status = JobStatus::Resolved;
    economy.ledger.locked_funds = locked_funds;
    economy.ledger.accrued_fees = accrued_fees;
    economy.ledger.total_paid_out = total_paid_out;

    // Interaction
    send(
        economy,
        sink,
        Transfer {
            recipient: worker,
            amount: split.payout,
            kind: TransferKind::Payout { job_id },
        },
        checkpoint,
    )?;

    info!(
        job_id,
        %worker,
        payout = %split.payout,
        fee = %split.fee,
        locked_funds = %locked_funds,
        "payment released"
    );
    let mut events = vec![EconomyEvent::PaymentReleased {
        job_id,
        worker,
        payout: split.payout,
        fee: split.fee,
        timestamp: ctx.now,
    }];
    events.extend(reputation_event);
    let sequence = economy.commit(entry_point, events);
    economy.job_mut(job_id)?.record(entry_point, ctx.now, sequence);

    Ok(Settlement {
        job_id,
        worker,
        payout: split.payout,
        fee: split.fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::value_transfer::Balances;
    use crate::test_utils::*;

    #[test]
    fn test_release_pays_worker_minus_fee() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = submitted_job(&mut economy, BUDGET);
        let settlement = economy
            .release_payment(&call(EMPLOYER), job_id, &mut balances)
            .unwrap();

        assert_eq!(settlement.payout, BUDGET * 9_900 / 10_000);
        assert_eq!(settlement.fee, BUDGET / 100);
        assert_eq!(balances.balance_of(&WORKER), settlement.payout);
        assert_eq!(economy.locked_funds(), 0);
        assert_eq!(economy.accrued_fees(), settlement.fee);

        let job = economy.get_job(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Resolved);
        let worker = economy.get_agent_profile(&WORKER).unwrap();
        assert_eq!(worker.reputation, 51);
        assert_eq!(worker.jobs_completed, 1);
        assert_eq!(worker.total_earned, settlement.payout);
    }

    #[test]
    fn test_only_employer_releases() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = submitted_job(&mut economy, BUDGET);
        assert_eq!(
            economy.release_payment(&call(WORKER), job_id, &mut balances),
            Err(EconomyError::Unauthorized {
                caller: WORKER,
                entry_point: EntryPoint::ReleasePayment,
            })
        );
        assert_eq!(economy.locked_funds(), BUDGET);
    }

    #[test]
    fn test_release_requires_submission() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = open_job(&mut economy, BUDGET);
        assert!(matches!(
            economy.release_payment(&call(EMPLOYER), job_id, &mut balances),
            Err(EconomyError::InvalidState { status: JobStatus::Open, .. })
        ));
    }

    #[test]
    fn test_release_twice() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = resolved_job(&mut economy, BUDGET, &mut balances);
        assert!(matches!(
            economy.release_payment(&call(EMPLOYER), job_id, &mut balances),
            Err(EconomyError::InvalidState { status: JobStatus::Resolved, .. })
        ));
        assert_eq!(balances.balance_of(&WORKER), BUDGET * 9_900 / 10_000);
    }

    #[test]
    fn test_failed_transfer_rolls_back_everything() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = submitted_job(&mut economy, BUDGET);
        let events_before = economy.events().len();
        let sequence_before = economy.sequence();
        balances.reject_transfers_to(WORKER);

        let err = economy
            .release_payment(&call(EMPLOYER), job_id, &mut balances)
            .unwrap_err();
        assert!(matches!(
            err,
            EconomyError::TransferFailed { recipient, .. } if recipient == WORKER
        ));

        let job = economy.get_job(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Submitted);
        assert_eq!(economy.locked_funds(), BUDGET);
        assert_eq!(economy.accrued_fees(), 0);
        let worker = economy.get_agent_profile(&WORKER).unwrap();
        assert_eq!(worker.reputation, 50);
        assert_eq!(worker.jobs_completed, 0);
        assert_eq!(economy.events().len(), events_before);
        assert_eq!(economy.sequence(), sequence_before);

        // A later retry succeeds
        balances.accept_transfers_to(&WORKER);
        economy
            .release_payment(&call(EMPLOYER), job_id, &mut balances)
            .unwrap();
    }

    #[test]
    fn test_v1_approve_work_leaves_reputation() {
        let mut economy = economy_v1();
        let mut balances = Balances::new();
        economy.register_agent(&call(EMPLOYER), "Employer", "").unwrap();
        economy.register_agent(&call(WORKER), "Worker", "").unwrap();
        let job_id = economy
            .create_job(&call(EMPLOYER).with_value(ETHER), WORKER, TIMEOUT)
            .unwrap();
        economy.accept_job(&call(WORKER), job_id).unwrap();
        economy.submit_work(&call(WORKER), job_id, "ipfs://v1").unwrap();

        let settlement = economy
            .approve_work(&call(EMPLOYER), job_id, &mut balances)
            .unwrap();
        assert_eq!(settlement.payout, ETHER * 9_900 / 10_000);
        assert_eq!(economy.get_agent_profile(&WORKER).unwrap().reputation, 50);
        assert!(matches!(
            economy.release_payment(&call(EMPLOYER), job_id, &mut balances),
            Err(EconomyError::UnsupportedEntryPoint { .. })
        ));
    }
}
