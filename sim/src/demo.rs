//! Live demo run
//!
//! Seeds the synthetic tiers, registers a master and a worker, hires the
//! best candidate by category and drives the job through acceptance,
//! delivery, payment and feedback. The finished job becomes a showcase feed.

use std::fs;
use std::path::Path;

use agentic_economy::deployment::DeploymentRecord;
use agentic_economy::instructions::selection_helpers::select;
use agentic_economy::showcase::{
    explorer_link, receipt_hash, DemoFeed, NetworkInfo, SelectionProof, TaskInfo, Workflow,
    WorkflowStep,
};
use agentic_economy::utils::serde_amount;
use agentic_economy::utils::units::format_ether;
use agentic_economy::{
    Address, Balances, CallContext, Category, ContractVersion, Economy, EntryPoint, JobStatus,
    ProtocolConfig, Selection, Settlement,
};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{DemoConfig, KnownNetwork};
use crate::errors::{Result, SimError};
use crate::mock_worker::{format_delivery_uri, MockWorkResult, MockWorker};
use crate::seed::{derive_address, make_specs, seed_agents, SeededAgent};

/// Entry points the workflow calls
pub const REQUIRED_ENTRY_POINTS: [EntryPoint; 7] = [
    EntryPoint::SeedSyntheticAgent,
    EntryPoint::RegisterAgentV2,
    EntryPoint::CreateJobByCategory,
    EntryPoint::AcceptJob,
    EntryPoint::SubmitWork,
    EntryPoint::ReleasePayment,
    EntryPoint::ApplySyntheticFeedback,
];

pub const POSITIVE_NOTE: &str = "Great job";
pub const NEGATIVE_NOTE: &str = "Delayed delivery";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalState {
    pub job_id: u64,
    pub status: JobStatus,
    pub feedback_applied: bool,
    pub worker: Address,
    pub worker_reputation: u8,
    #[serde(with = "serde_amount")]
    pub locked_funds: u128,
    #[serde(with = "serde_amount")]
    pub accrued_fees: u128,
}

#[derive(Debug, Clone)]
pub struct DemoRun {
    pub category: Category,
    pub master: Address,
    pub seeded: Vec<SeededAgent>,
    pub selection: Selection,
    pub selection_proof: SelectionProof,
    pub work: MockWorkResult,
    pub delivery: String,
    pub settlement: Settlement,
    pub feedback_positive: bool,
    pub feedback_note: &'static str,
    pub final_state: FinalState,
    pub feed: DemoFeed,
    pub economy: Economy,
    pub balances: Balances,
}

/// Checks that `record` can run the workflow on `network`.
pub fn check_deployment(record: &DeploymentRecord, network: &KnownNetwork) -> Result<()> {
    if record.chain_id != network.chain_id {
        warn!(
            network = network.name,
            expected_chain_id = network.chain_id,
            record_chain_id = record.chain_id,
            "deployment record is for another chain"
        );
    }
    match REQUIRED_ENTRY_POINTS
        .into_iter()
        .find(|entry_point| !record.supports(*entry_point))
    {
        Some(missing) => Err(SimError::UnsupportedDeployment(missing)),
        None => Ok(()),
    }
}

/// `hash (link)` when an explorer base is configured, else the hash alone
pub fn tx_display(step: &WorkflowStep, explorer_tx_base: Option<&str>) -> String {
    let hash = step.display_hash();
    match explorer_tx_base.and_then(|base| explorer_link(base, hash)) {
        Some(link) => format!("{hash} ({link})"),
        None => hash.to_string(),
    }
}

pub fn run_demo<R: Rng>(config: &DemoConfig, worker: &MockWorker, rng: &mut R) -> Result<DemoRun> {
    let record = config
        .deployment
        .as_deref()
        .map(DeploymentRecord::load)
        .transpose()?;
    let (version, contract, chain_id) = match &record {
        Some(record) => {
            check_deployment(record, config.network)?;
            (record.version(), record.contract_address, record.chain_id)
        }
        None => (
            ContractVersion::V2,
            derive_address("contract", config.network.name),
            config.network.chain_id,
        ),
    };

    let owner = derive_address("participant", "owner");
    let master = derive_address("participant", &config.master_name);
    let registered_worker = derive_address("participant", &config.worker_name);

    let mut economy = Economy::new(
        ProtocolConfig::new(owner)
            .with_version(version)
            .with_selection_policy(config.policy),
    )?;
    let mut balances = Balances::new();
    let mut clock = Utc::now().timestamp();

    let seeded = seed_agents(&mut economy, &CallContext::new(owner, clock), &make_specs())?;

    let category = config.category.resolve(&config.prompt);
    let stake = economy.min_registration_stake();
    for (address, name, expertise) in [
        (master, &config.master_name, &config.master_expertise),
        (registered_worker, &config.worker_name, &config.worker_expertise),
    ] {
        economy.register_agent_v2(
            &CallContext::new(address, clock).with_value(stake),
            name,
            expertise,
            category,
            config.worker_base_fee_wei,
        )?;
    }
    info!(%category, %master, worker = %registered_worker, "participants registered");

    // Same candidate set the engine ranks: the employer never hires itself
    let selection = select(
        economy
            .ranking_entries(category)
            .into_iter()
            .filter(|entry| entry.address != master),
        category,
        config.budget_wei,
        config.policy,
    );
    let selection_proof = SelectionProof::for_selection(selection.best(), config.policy);
    info!(candidates = selection.affordable.len(), reason = %selection_proof.reason, "selection");

    clock += 1;
    let job_id = economy.create_job_by_category(
        &CallContext::new(master, clock).with_value(config.budget_wei),
        category,
        config.timeout_secs,
    )?;
    let hired = economy.get_job(job_id)?.worker;
    log_step(&economy, &contract, job_id);

    clock += rng.gen_range(1..=3);
    economy.accept_job(&CallContext::new(hired, clock), job_id)?;
    log_step(&economy, &contract, job_id);

    let work = worker.execute(&config.prompt, rng)?;
    let delivery = format_delivery_uri(&work.output)?;
    clock += rng.gen_range(2..=3);
    economy.submit_work(&CallContext::new(hired, clock), job_id, &delivery)?;
    log_step(&economy, &contract, job_id);

    clock += 1;
    let settlement =
        economy.release_payment(&CallContext::new(master, clock), job_id, &mut balances)?;
    log_step(&economy, &contract, job_id);

    let feedback_positive = config.feedback.unwrap_or_else(|| rng.gen_bool(0.5));
    let feedback_note = if feedback_positive { POSITIVE_NOTE } else { NEGATIVE_NOTE };
    clock += 1;
    let worker_reputation = economy.apply_synthetic_feedback(
        &CallContext::new(master, clock),
        job_id,
        feedback_positive,
    )?;
    log_step(&economy, &contract, job_id);
    info!(
        positive = feedback_positive,
        note = feedback_note,
        worker_reputation,
        "feedback applied"
    );

    let job = economy.get_job(job_id)?;
    let final_state = FinalState {
        job_id,
        status: job.status,
        feedback_applied: job.feedback_applied,
        worker: job.worker,
        worker_reputation,
        locked_funds: economy.locked_funds(),
        accrued_fees: economy.accrued_fees(),
    };

    let mut workflow = Workflow::from_job(job, |record| receipt_hash(&contract, job_id, record));
    workflow.feedback_positive = Some(feedback_positive);
    let feed = DemoFeed {
        generated_at: Utc::now(),
        network: NetworkInfo {
            chain_id,
            contract_address: contract,
            explorer_tx_base: config.explorer_tx_base.clone(),
        },
        task: TaskInfo {
            prompt: config.prompt.clone(),
            category,
            budget_wei: config.budget_wei,
            budget_eth: format_ether(config.budget_wei, 6),
            job_id: Some(job_id),
        },
        ranking: selection.affordable.clone(),
        selection_proof: selection_proof.clone(),
        workflow,
    };

    if let Some(path) = &config.export_json {
        export_feed(&feed, path)?;
    }

    Ok(DemoRun {
        category,
        master,
        seeded,
        selection,
        selection_proof,
        work,
        delivery,
        settlement,
        feedback_positive,
        feedback_note,
        final_state,
        feed,
        economy,
        balances,
    })
}

/// Writes the feed as pretty JSON, creating parent directories
pub fn export_feed(feed: &DemoFeed, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut raw = serde_json::to_string_pretty(feed)?;
    raw.push('\n');
    fs::write(path, raw)?;
    info!(path = %path.display(), "showcase feed exported");
    Ok(())
}

fn log_step(economy: &Economy, contract: &Address, job_id: u64) {
    let Ok(job) = economy.get_job(job_id) else {
        return;
    };
    if let Some(record) = job.history.last() {
        info!(
            job_id,
            step = record.entry_point.step_label(),
            status = %job.status,
            tx_hash = %receipt_hash(contract, job_id, record),
            "workflow step"
        );
    }
}
