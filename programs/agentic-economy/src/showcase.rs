//! Showcase feed
//!
//! The read model behind the selection showcase: the network the contract
//! lives on, the demo task, the ranked candidates, the selection proof and
//! the workflow timeline. Feeds come from a JSON export and fall back to the
//! bundled dataset when the export is missing or malformed.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::EconomyError;
use crate::instructions::selection_helpers::{self, RankingEntry};
use crate::state::{Address, Category, Job, PhaseRecord, SelectionPolicy};
use crate::utils::classifier::CategoryChoice;
use crate::utils::serde_amount;
use crate::utils::units::parse_ether;
use crate::utils::version::EntryPoint;

const FALLBACK_FEED: &str = include_str!("../data/fallback_feed.json");

/// `selectedAgent` when nobody is eligible
pub const NO_SELECTION: &str = "-";

pub const NO_ELIGIBLE_AGENT_REASON: &str = "No eligible agent found within budget.";

/// Placeholder shown for steps without a transaction
pub const PENDING_TX: &str = "(pending)";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed feed: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Feed model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoFeed {
    pub generated_at: DateTime<Utc>,
    pub network: NetworkInfo,
    pub task: TaskInfo,
    pub ranking: Vec<RankingEntry>,
    pub selection_proof: SelectionProof,
    pub workflow: Workflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub contract_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_tx_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub prompt: String,
    pub category: Category,
    #[serde(with = "serde_amount")]
    pub budget_wei: u128,
    /// Budget as the user typed it
    #[serde(deserialize_with = "string_or_number")]
    pub budget_eth: String,
    /// `None` until the job exists on chain
    #[serde(default)]
    pub job_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionProof {
    /// Selected address, or [`NO_SELECTION`]
    pub selected_agent: String,
    pub reason: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_amount::option"
    )]
    pub selected_base_fee_wei: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_reputation: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_efficiency: Option<f64>,
}

impl SelectionProof {
    pub fn for_selection(best: Option<&RankingEntry>, policy: SelectionPolicy) -> Self {
        match best {
            Some(entry) => Self {
                selected_agent: entry.address.to_string(),
                reason: selection_reason(&entry.address, policy),
                selected_base_fee_wei: Some(entry.base_fee),
                selected_reputation: Some(entry.reputation),
                selected_efficiency: Some(entry.efficiency()),
            },
            None => Self {
                selected_agent: NO_SELECTION.to_string(),
                reason: NO_ELIGIBLE_AGENT_REASON.to_string(),
                selected_base_fee_wei: None,
                selected_reputation: None,
                selected_efficiency: None,
            },
        }
    }

    pub fn selected_address(&self) -> Option<Address> {
        self.selected_agent.parse().ok()
    }
}

pub fn selection_reason(agent: &Address, policy: SelectionPolicy) -> String {
    match policy {
        SelectionPolicy::QualityFirst => format!(
            "Agent {agent} selected because it has the highest quality score (reputation) \
             within this category and budget; ties prefer lower base fee."
        ),
        SelectionPolicy::EfficiencyFirst => format!(
            "Agent {agent} selected because it has the highest efficiency (reputation per wei \
             of base fee) within this category and budget; ties prefer higher reputation."
        ),
    }
}

/// Accepts `"0.001"` as well as `0.001`
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

// ============================================================================
// Workflow timeline
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Waiting,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub key: EntryPoint,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StepStatus>,
    #[serde(default)]
    pub tx_hash: String,
}

impl WorkflowStep {
    pub fn new(key: EntryPoint, tx_hash: impl Into<String>) -> Self {
        Self {
            key,
            label: key.step_label().to_string(),
            status: None,
            tx_hash: tx_hash.into(),
        }
    }

    pub fn display_hash(&self) -> &str {
        if self.tx_hash.is_empty() {
            PENDING_TX
        } else {
            &self.tx_hash
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub steps: Vec<WorkflowStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_positive: Option<bool>,
}

/// The happy path of a category job
pub const STANDARD_STEPS: [EntryPoint; 5] = [
    EntryPoint::CreateJobByCategory,
    EntryPoint::AcceptJob,
    EntryPoint::SubmitWork,
    EntryPoint::ReleasePayment,
    EntryPoint::ApplySyntheticFeedback,
];

impl Workflow {
    /// The five standard steps, none of them run yet
    pub fn pending() -> Self {
        Self {
            steps: STANDARD_STEPS
                .iter()
                .map(|key| WorkflowStep {
                    status: Some(StepStatus::Pending),
                    ..WorkflowStep::new(*key, "")
                })
                .collect(),
            feedback_positive: None,
        }
    }

    /// One step per committed phase of `job`, oldest first
    pub fn from_job<F>(job: &Job, mut tx_hash: F) -> Self
    where
        F: FnMut(&PhaseRecord) -> String,
    {
        Self {
            steps: job
                .history
                .iter()
                .map(|record| WorkflowStep {
                    status: Some(StepStatus::Done),
                    ..WorkflowStep::new(record.entry_point, tx_hash(record))
                })
                .collect(),
            feedback_positive: None,
        }
    }

    /// Marks the first `done` steps done and the rest waiting
    pub fn with_progress(&self, done: usize) -> Self {
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(idx, step)| WorkflowStep {
                status: Some(if idx < done {
                    StepStatus::Done
                } else {
                    StepStatus::Waiting
                }),
                ..step.clone()
            })
            .collect();
        Self {
            steps,
            feedback_positive: self.feedback_positive,
        }
    }

    pub fn done_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == Some(StepStatus::Done))
            .count()
    }
}

/// Explorer URL for a transaction; only real `0x` hashes get a link.
pub fn explorer_link(base: &str, tx_hash: &str) -> Option<String> {
    if !tx_hash.starts_with("0x") {
        return None;
    }
    Some(format!("{}/{}", base.trim_end_matches('/'), tx_hash))
}

/// Deterministic stand-in transaction hash for a committed phase
pub fn receipt_hash(contract: &Address, job_id: u64, record: &PhaseRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contract.as_bytes());
    hasher.update(job_id.to_be_bytes());
    hasher.update(record.entry_point.name().as_bytes());
    hasher.update(record.sequence.to_be_bytes());
    hasher.update(record.at.to_be_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

// ============================================================================
// Loading and re-ranking
// ============================================================================

/// Values of the showcase form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionForm {
    pub prompt: String,
    pub category: CategoryChoice,
    /// Ether amount as typed
    pub budget: String,
}

impl SelectionForm {
    /// Form prefilled from the feed's task
    pub fn from_task(task: &TaskInfo) -> Self {
        Self {
            prompt: task.prompt.clone(),
            category: CategoryChoice::Explicit(task.category),
            budget: task.budget_eth.clone(),
        }
    }
}

impl DemoFeed {
    pub fn from_json(raw: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The bundled dataset
    pub fn fallback() -> Result<Self, FeedError> {
        Self::from_json(FALLBACK_FEED)
    }

    /// Reads the export at `path`, or the bundled dataset if it cannot be used
    pub fn load_or_fallback(path: Option<&Path>) -> Result<Self, FeedError> {
        let Some(path) = path else {
            return Self::fallback();
        };
        match fs::read_to_string(path)
            .map_err(FeedError::from)
            .and_then(|raw| Self::from_json(&raw))
        {
            Ok(feed) => {
                debug!(path = %path.display(), ranking = feed.ranking.len(), "feed loaded");
                Ok(feed)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "feed unusable, using bundled dataset");
                Self::fallback()
            }
        }
    }

    pub fn explorer_link(&self, step: &WorkflowStep) -> Option<String> {
        let base = self.network.explorer_tx_base.as_deref()?;
        explorer_link(base, &step.tx_hash)
    }
}

/// Re-rank the feed's candidates for the form.
///
/// The feed's network, workflow and job id carry over unchanged.
pub fn compute_selection(
    feed: &DemoFeed,
    form: &SelectionForm,
    policy: SelectionPolicy,
) -> Result<DemoFeed, EconomyError> {
    let category = form.category.resolve(&form.prompt);
    let budget_wei = parse_ether(&form.budget)?;
    let selection =
        selection_helpers::select(feed.ranking.iter().cloned(), category, budget_wei, policy);
    let selection_proof = SelectionProof::for_selection(selection.best(), policy);

    debug!(
        %category,
        budget_wei = %budget_wei,
        candidates = selection.affordable.len(),
        selected = %selection_proof.selected_agent,
        "selection computed"
    );

    Ok(DemoFeed {
        generated_at: feed.generated_at,
        network: feed.network.clone(),
        task: TaskInfo {
            prompt: form.prompt.clone(),
            category,
            budget_wei,
            budget_eth: form.budget.clone(),
            job_id: feed.task.job_id,
        },
        ranking: selection.affordable,
        selection_proof,
        workflow: feed.workflow.clone(),
    })
}
