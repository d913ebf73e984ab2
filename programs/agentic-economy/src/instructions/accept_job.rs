//! Worker accepts an open job

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::state::JobStatus;
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(economy: &mut Economy, ctx: &CallContext, job_id: u64) -> Result<()> {
    economy.begin(EntryPoint::AcceptJob)?;

    let job = economy.job_mut(job_id)?;
    if ctx.caller != job.worker {
        return Err(EconomyError::Unauthorized {
            caller: ctx.caller,
            entry_point: EntryPoint::AcceptJob,
        });
    }
    if job.status != JobStatus::Open {
        return Err(EconomyError::InvalidState {
            job_id,
            status: job.status,
            expected: "Open",
        });
    }

    job.status = JobStatus::Taken;
    job.accepted_at = Some(ctx.now);
    let worker = job.worker;

    info!(job_id, %worker, "job accepted");
    let sequence = economy.commit(
        EntryPoint::AcceptJob,
        vec![EconomyEvent::JobAccepted {
            job_id,
            worker,
            timestamp: ctx.now,
        }],
    );
    economy.job_mut(job_id)?.record(EntryPoint::AcceptJob, ctx.now, sequence);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_worker_accepts() {
        let mut economy = economy();
        let job_id = open_job(&mut economy, BUDGET);
        economy.accept_job(&at(WORKER, T0 + 5), job_id).unwrap();

        let job = economy.get_job(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Taken);
        assert_eq!(job.accepted_at, Some(T0 + 5));
        assert_eq!(economy.locked_funds(), BUDGET);
    }

    #[test]
    fn test_only_worker_accepts() {
        let mut economy = economy();
        let job_id = open_job(&mut economy, BUDGET);
        for intruder in [EMPLOYER, OUTSIDER, OWNER] {
            assert_eq!(
                economy.accept_job(&call(intruder), job_id),
                Err(EconomyError::Unauthorized {
                    caller: intruder,
                    entry_point: EntryPoint::AcceptJob,
                })
            );
        }
        assert_eq!(economy.get_job(job_id).unwrap().status, JobStatus::Open);
    }

    #[test]
    fn test_accept_twice() {
        let mut economy = economy();
        let job_id = open_job(&mut economy, BUDGET);
        economy.accept_job(&call(WORKER), job_id).unwrap();
        assert_eq!(
            economy.accept_job(&call(WORKER), job_id),
            Err(EconomyError::InvalidState {
                job_id,
                status: JobStatus::Taken,
                expected: "Open",
            })
        );
    }

    #[test]
    fn test_unknown_job() {
        let mut economy = economy();
        assert_eq!(economy.accept_job(&call(WORKER), 7), Err(EconomyError::JobNotFound(7)));
    }
}
