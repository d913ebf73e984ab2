//! Create a job for a directly chosen worker, locking the budget in escrow

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::instructions::constants::MAX_JOB_TIMEOUT_SECS;
use crate::state::{Address, Category, ContractVersion, Job, JobStatus};
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    worker: Address,
    timeout: u64,
) -> Result<u64> {
    economy.begin(EntryPoint::CreateJob)?;
    validate_employer(economy, ctx, EntryPoint::CreateJob, timeout)?;

    let profile = economy
        .get_agent_profile(&worker)
        .filter(|profile| profile.registered)
        .ok_or(EconomyError::AgentNotFound(worker))?;
    if worker == ctx.caller {
        return Err(EconomyError::InvalidInput("employer cannot hire itself"));
    }
    // v1 agents carry no base fee
    if economy.config.version >= ContractVersion::V2 && ctx.value < profile.base_fee {
        return Err(EconomyError::InsufficientBudget {
            budget: ctx.value,
            required: profile.base_fee,
        });
    }

    let job = open_job(economy, ctx, worker, timeout, None)?;
    let event = job_created_event(economy, job, ctx.now)?;
    let sequence = economy.commit(EntryPoint::CreateJob, vec![event]);
    economy.job_mut(job)?.record(EntryPoint::CreateJob, ctx.now, sequence);
    Ok(job)
}

/// Employer, budget and timeout checks shared by both creation paths
pub(crate) fn validate_employer(
    economy: &Economy,
    ctx: &CallContext,
    entry_point: EntryPoint,
    timeout: u64,
) -> Result<()> {
    if !economy.is_registered(&ctx.caller) {
        return Err(EconomyError::Unauthorized {
            caller: ctx.caller,
            entry_point,
        });
    }
    if ctx.value == 0 {
        return Err(EconomyError::InsufficientBudget {
            budget: 0,
            required: 1,
        });
    }
    if timeout == 0 || timeout > MAX_JOB_TIMEOUT_SECS {
        return Err(EconomyError::OutOfRange {
            field: "timeout",
            value: u128::from(timeout),
            min: 1,
            max: u128::from(MAX_JOB_TIMEOUT_SECS),
        });
    }
    Ok(())
}

/// Locks the attached value and appends an `Open` job.
///
/// # Returns
/// The new job id.
pub(crate) fn open_job(
    economy: &mut Economy,
    ctx: &CallContext,
    worker: Address,
    timeout: u64,
    category: Option<Category>,
) -> Result<u64> {
    let locked_funds = economy
        .ledger
        .locked_funds
        .checked_add(ctx.value)
        .ok_or(EconomyError::ArithmeticOverflow)?;

    let job_id = economy.next_job_id();
    economy.jobs.push(Job {
        job_id,
        employer: ctx.caller,
        worker,
        budget: ctx.value,
        status: JobStatus::Open,
        created_at: ctx.now,
        accepted_at: None,
        timeout,
        delivery: None,
        selected_by_algorithm: category.is_some(),
        category,
        feedback_applied: false,
        history: Vec::new(),
    });
    economy.ledger.locked_funds = locked_funds;

    info!(
        job_id,
        employer = %ctx.caller,
        %worker,
        budget = %ctx.value,
        locked_funds = %locked_funds,
        "budget escrow locked"
    );
    Ok(job_id)
}

pub(crate) fn job_created_event(
    economy: &Economy,
    job_id: u64,
    timestamp: i64,
) -> Result<EconomyEvent> {
    let job = economy.get_job(job_id)?;
    Ok(EconomyEvent::JobCreated {
        job_id,
        employer: job.employer,
        worker: job.worker,
        budget: job.budget,
        deadline: job.deadline(),
        timestamp,
    })
}
