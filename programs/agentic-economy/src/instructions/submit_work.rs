//! Worker submits the delivery reference of a taken job

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::instructions::constants::MAX_DELIVERY_LEN;
use crate::state::JobStatus;
use crate::utils::validation::require_text;
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    job_id: u64,
    delivery: &str,
) -> Result<()> {
    economy.begin(EntryPoint::SubmitWork)?;

    let job = economy.job_mut(job_id)?;
    if ctx.caller != job.worker {
        return Err(EconomyError::Unauthorized {
            caller: ctx.caller,
            entry_point: EntryPoint::SubmitWork,
        });
    }
    if job.status != JobStatus::Taken {
        return Err(EconomyError::InvalidState {
            job_id,
            status: job.status,
            expected: "Taken",
        });
    }
    require_text(delivery, MAX_DELIVERY_LEN, "delivery")?;

    job.status = JobStatus::Submitted;
    job.delivery = Some(delivery.to_string());
    let worker = job.worker;

    info!(job_id, %worker, delivery, "work submitted");
    let sequence = economy.commit(
        EntryPoint::SubmitWork,
        vec![EconomyEvent::WorkSubmitted {
            job_id,
            worker,
            delivery: delivery.to_string(),
            timestamp: ctx.now,
        }],
    );
    economy.job_mut(job_id)?.record(EntryPoint::SubmitWork, ctx.now, sequence);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_submit_after_accept() {
        let mut economy = economy();
        let job_id = open_job(&mut economy, BUDGET);
        economy.accept_job(&call(WORKER), job_id).unwrap();
        economy
            .submit_work(&call(WORKER), job_id, "mock://delivery/{\"ok\":true}")
            .unwrap();

        let job = economy.get_job(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Submitted);
        assert_eq!(job.delivery.as_deref(), Some("mock://delivery/{\"ok\":true}"));
    }

    #[test]
    fn test_submit_before_accept() {
        let mut economy = economy();
        let job_id = open_job(&mut economy, BUDGET);
        assert_eq!(
            economy.submit_work(&call(WORKER), job_id, "ipfs://x"),
            Err(EconomyError::InvalidState {
                job_id,
                status: JobStatus::Open,
                expected: "Taken",
            })
        );
    }

    #[test]
    fn test_only_worker_submits() {
        let mut economy = economy();
        let job_id = open_job(&mut economy, BUDGET);
        economy.accept_job(&call(WORKER), job_id).unwrap();
        assert!(matches!(
            economy.submit_work(&call(EMPLOYER), job_id, "ipfs://x"),
            Err(EconomyError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_delivery_validation() {
        let mut economy = economy();
        let job_id = open_job(&mut economy, BUDGET);
        economy.accept_job(&call(WORKER), job_id).unwrap();
        assert_eq!(
            economy.submit_work(&call(WORKER), job_id, ""),
            Err(EconomyError::InvalidInput("delivery"))
        );
        let oversized = "x".repeat(MAX_DELIVERY_LEN + 1);
        assert!(matches!(
            economy.submit_work(&call(WORKER), job_id, &oversized),
            Err(EconomyError::OutOfRange { field: "delivery", .. })
        ));
        assert_eq!(economy.get_job(job_id).unwrap().status, JobStatus::Taken);
    }
}
