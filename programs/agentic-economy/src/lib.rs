//! Agentic Economy Engine
//!
//! Agent selection and job lifecycle rules of the agentic economy contract,
//! independent of any blockchain runtime. Agents register with a category, a
//! base fee and a stake; employers lock a budget in escrow for a worker chosen
//! directly or by category; the worker accepts and delivers; the employer
//! releases payment minus the platform fee, or anyone refunds the employer
//! once the timeout elapses. Reputation moves by one step per outcome.
//!
//! Every mutating entry point takes `&mut Economy`, so transitions are
//! serialized by construction. Share an engine across threads behind a mutex.

use std::collections::{BTreeMap, HashMap};

use tracing::info;

pub mod context;
pub mod deployment;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod showcase;
pub mod state;
pub mod utils;

pub use context::CallContext;
pub use errors::{EconomyError, Result};
pub use events::EconomyEvent;
pub use instructions::release_payment::Settlement;
pub use instructions::selection_helpers::{RankingEntry, Selection};
pub use instructions::value_transfer::{Balances, Transfer, TransferError, TransferKind, ValueSink};
pub use state::{
    Address, AgentProfile, Category, ContractVersion, Job, JobStatus, Ledger, ProtocolConfig,
    SelectionPolicy,
};
pub use utils::version::EntryPoint;

use instructions::selection_helpers;
use instructions::settlement_helpers::validate_fee_bps;
use utils::version::check_entry_point_available;

/// The engine: configuration, agent registry, jobs, ledger and event log
#[derive(Debug, Clone)]
pub struct Economy {
    pub(crate) config: ProtocolConfig,
    pub(crate) ledger: Ledger,
    pub(crate) agents: HashMap<Address, AgentProfile>,
    pub(crate) registration_order: Vec<Address>,
    pub(crate) category_agents: BTreeMap<Category, Vec<Address>>,
    pub(crate) jobs: Vec<Job>,
    pub(crate) events: Vec<EconomyEvent>,
    pub(crate) sequence: u64,
    pub(crate) transfer_in_flight: bool,
}

impl Economy {
    /// Deploy a fresh engine. The owner must be non-zero and the fee within cap.
    pub fn new(config: ProtocolConfig) -> Result<Self> {
        if config.owner.is_zero() {
            return Err(EconomyError::InvalidInput("owner"));
        }
        validate_fee_bps(config.platform_fee_bps)?;
        info!(
            owner = %config.owner,
            version = %config.version,
            platform_fee_bps = config.platform_fee_bps,
            "economy initialized"
        );
        Ok(Self {
            config,
            ledger: Ledger::default(),
            agents: HashMap::new(),
            registration_order: Vec::new(),
            category_agents: BTreeMap::new(),
            jobs: Vec::new(),
            events: Vec::new(),
            sequence: 0,
            transfer_in_flight: false,
        })
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register the caller without a category. Such agents can be hired
    /// directly but are never picked by category.
    pub fn register_agent(&mut self, ctx: &CallContext, name: &str, expertise: &str) -> Result<()> {
        instructions::register_agent::handler(self, ctx, name, expertise)
    }

    /// Register the caller in `category` with a base fee; the attached value
    /// is the stake and must reach the minimum registration stake.
    pub fn register_agent_v2(
        &mut self,
        ctx: &CallContext,
        name: &str,
        expertise: &str,
        category: Category,
        base_fee: u128,
    ) -> Result<()> {
        instructions::register_agent_v2::handler(self, ctx, name, expertise, category, base_fee)
    }

    /// Owner-only registration of a synthetic agent at a chosen reputation.
    #[allow(clippy::too_many_arguments)]
    pub fn seed_synthetic_agent(
        &mut self,
        ctx: &CallContext,
        agent: Address,
        name: &str,
        expertise: &str,
        category: Category,
        base_fee: u128,
        reputation: u8,
    ) -> Result<()> {
        instructions::seed_synthetic_agent::handler(
            self, ctx, agent, name, expertise, category, base_fee, reputation,
        )
    }

    // ========================================================================
    // Job lifecycle
    // ========================================================================

    /// Lock the attached value as the budget of a job for `worker`.
    ///
    /// # Returns
    /// The new job id.
    pub fn create_job(&mut self, ctx: &CallContext, worker: Address, timeout: u64) -> Result<u64> {
        instructions::create_job::handler(self, ctx, worker, timeout)
    }

    /// Lock the attached value and let the selector pick the worker.
    pub fn create_job_by_category(
        &mut self,
        ctx: &CallContext,
        category: Category,
        timeout: u64,
    ) -> Result<u64> {
        instructions::create_job_by_category::handler(self, ctx, category, timeout)
    }

    pub fn accept_job(&mut self, ctx: &CallContext, job_id: u64) -> Result<()> {
        instructions::accept_job::handler(self, ctx, job_id)
    }

    pub fn submit_work(&mut self, ctx: &CallContext, job_id: u64, delivery: &str) -> Result<()> {
        instructions::submit_work::handler(self, ctx, job_id, delivery)
    }

    /// Pay the worker `budget - fee` and keep the fee.
    pub fn approve_work(
        &mut self,
        ctx: &CallContext,
        job_id: u64,
        sink: &mut dyn ValueSink,
    ) -> Result<Settlement> {
        instructions::release_payment::handler(self, ctx, job_id, sink, EntryPoint::ApproveWork)
    }

    /// Same settlement as [`Economy::approve_work`], under its v2 name.
    pub fn release_payment(
        &mut self,
        ctx: &CallContext,
        job_id: u64,
        sink: &mut dyn ValueSink,
    ) -> Result<Settlement> {
        instructions::release_payment::handler(self, ctx, job_id, sink, EntryPoint::ReleasePayment)
    }

    /// Return the whole budget to the employer after the timeout.
    ///
    /// # Returns
    /// The refunded amount.
    pub fn refund_after_timeout(
        &mut self,
        ctx: &CallContext,
        job_id: u64,
        sink: &mut dyn ValueSink,
    ) -> Result<u128> {
        instructions::refund_after_timeout::handler(self, ctx, job_id, sink)
    }

    /// One-shot employer feedback on a resolved job.
    ///
    /// # Returns
    /// The worker's new reputation.
    pub fn apply_synthetic_feedback(
        &mut self,
        ctx: &CallContext,
        job_id: u64,
        positive: bool,
    ) -> Result<u8> {
        instructions::apply_synthetic_feedback::handler(self, ctx, job_id, positive)
    }

    // ========================================================================
    // Administration
    // ========================================================================

    pub fn set_agent_reputation(
        &mut self,
        ctx: &CallContext,
        agent: Address,
        score: u8,
    ) -> Result<()> {
        instructions::set_agent_reputation::handler(self, ctx, agent, score)
    }

    pub fn set_platform_fee_bps(&mut self, ctx: &CallContext, fee_bps: u16) -> Result<()> {
        instructions::update_platform_fee::handler(self, ctx, fee_bps)
    }

    pub fn withdraw_fees(
        &mut self,
        ctx: &CallContext,
        to: Address,
        amount: u128,
        sink: &mut dyn ValueSink,
    ) -> Result<()> {
        instructions::withdraw_fees::handler(self, ctx, to, amount, sink)
    }

    pub fn transfer_ownership(&mut self, ctx: &CallContext, new_owner: Address) -> Result<()> {
        instructions::transfer_ownership::handler(self, ctx, new_owner)
    }

    /// Plain deposit, credited to the withdrawable pool.
    pub fn receive(&mut self, ctx: &CallContext) -> Result<()> {
        instructions::receive_funds::handler(self, ctx)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Top-ranked affordable agent in `category`, or `None`.
    pub fn get_best_agent(&self, category: Category, budget: u128) -> Result<Option<RankingEntry>> {
        instructions::get_best_agent::handler(self, category, budget)
    }

    /// Ranked affordable candidates under the configured policy.
    pub fn select_candidates(&self, category: Category, budget: u128) -> Selection {
        selection_helpers::select(
            self.ranking_entries(category),
            category,
            budget,
            self.config.selection_policy,
        )
    }

    /// Ranking entries of `category` in registration order
    pub fn ranking_entries(&self, category: Category) -> Vec<RankingEntry> {
        self.category_agents(category)
            .iter()
            .filter_map(|address| self.agents.get(address))
            .filter(|profile| profile.is_listed_in(category))
            .filter_map(RankingEntry::from_profile)
            .collect()
    }

    pub fn get_agent_profile(&self, agent: &Address) -> Option<&AgentProfile> {
        self.agents.get(agent)
    }

    pub fn is_registered(&self, agent: &Address) -> bool {
        self.agents.get(agent).is_some_and(|profile| profile.registered)
    }

    pub fn category_agents(&self, category: Category) -> &[Address] {
        self.category_agents
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All agents in registration order
    pub fn agents(&self) -> impl Iterator<Item = &AgentProfile> {
        self.registration_order
            .iter()
            .filter_map(|address| self.agents.get(address))
    }

    pub fn get_job(&self, job_id: u64) -> Result<&Job> {
        self.jobs
            .get(job_id as usize)
            .ok_or(EconomyError::JobNotFound(job_id))
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn next_job_id(&self) -> u64 {
        self.jobs.len() as u64
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn owner(&self) -> Address {
        self.config.owner
    }

    pub fn version(&self) -> ContractVersion {
        self.config.version
    }

    pub fn platform_fee_bps(&self) -> u16 {
        self.config.platform_fee_bps
    }

    pub fn min_registration_stake(&self) -> u128 {
        self.config.min_stake
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn locked_funds(&self) -> u128 {
        self.ledger.locked_funds
    }

    pub fn accrued_fees(&self) -> u128 {
        self.ledger.accrued_fees
    }

    pub fn events(&self) -> &[EconomyEvent] {
        &self.events
    }

    /// Takes the event log. Empty while a transfer is in flight.
    pub fn drain_events(&mut self) -> Vec<EconomyEvent> {
        if self.transfer_in_flight {
            return Vec::new();
        }
        std::mem::take(&mut self.events)
    }

    /// Number of committed state-changing calls
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    // ========================================================================
    // Handler plumbing
    // ========================================================================

    /// Gate shared by every state-changing entry point
    pub(crate) fn begin(&self, entry_point: EntryPoint) -> Result<()> {
        if self.transfer_in_flight {
            return Err(EconomyError::ReentrantCall(entry_point));
        }
        check_entry_point_available(self.config.version, entry_point)
    }

    pub(crate) fn require_owner(&self, ctx: &CallContext, entry_point: EntryPoint) -> Result<()> {
        if ctx.caller != self.config.owner {
            return Err(EconomyError::Unauthorized {
                caller: ctx.caller,
                entry_point,
            });
        }
        Ok(())
    }

    pub(crate) fn agent_mut(&mut self, agent: &Address) -> Result<&mut AgentProfile> {
        self.agents
            .get_mut(agent)
            .ok_or(EconomyError::AgentNotFound(*agent))
    }

    pub(crate) fn job_mut(&mut self, job_id: u64) -> Result<&mut Job> {
        self.jobs
            .get_mut(job_id as usize)
            .ok_or(EconomyError::JobNotFound(job_id))
    }

    /// Appends the events of a call that has fully succeeded.
    ///
    /// # Returns
    /// The call's sequence number.
    pub(crate) fn commit(&mut self, entry_point: EntryPoint, events: Vec<EconomyEvent>) -> u64 {
        self.sequence = self.sequence.saturating_add(1);
        for event in events {
            info!(
                entry_point = entry_point.name(),
                sequence = self.sequence,
                event = event.name(),
                "committed"
            );
            self.events.push(event);
        }
        self.sequence
    }
}

#[cfg(test)]
pub(crate) mod test_utils;
