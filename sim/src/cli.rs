//! Command line interface

use std::path::PathBuf;

use agentic_economy::utils::classifier::CategoryChoice;
use agentic_economy::SelectionPolicy;
use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_NETWORK, DEFAULT_PROMPT, EXPLORER_TX_BASE_ENV};

#[derive(Debug, Parser)]
#[command(name = "agentic-economy-sim", version, about = "Agentic economy simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seed agents, run one job end to end and print the final state
    Demo(DemoArgs),
    /// Re-rank a showcase feed for a prompt, category and budget
    Select(SelectArgs),
    /// Show the version and entry points of a deployment record
    Deployment(DeploymentArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DemoArgs {
    #[arg(long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Deployment record to check the workflow against
    #[arg(long)]
    pub deployment: Option<PathBuf>,

    #[arg(long, default_value = "0.01")]
    pub budget_eth: String,

    #[arg(long, default_value_t = 120)]
    pub timeout_sec: u64,

    #[arg(long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Category name or AUTO to classify the prompt
    #[arg(long, default_value = "AUTO")]
    pub category: CategoryChoice,

    #[arg(long, default_value = "quality-first")]
    pub policy: SelectionPolicy,

    #[arg(long, default_value = "Master Agent")]
    pub master_name: String,

    #[arg(long, default_value = "Worker Agent")]
    pub worker_name: String,

    #[arg(long, default_value = "orchestration")]
    pub master_expertise: String,

    #[arg(long, default_value = "execution")]
    pub worker_expertise: String,

    #[arg(long, default_value_t = 100_000_000_000_000)]
    pub worker_base_fee_wei: u128,

    /// Force positive or negative feedback instead of a coin flip
    #[arg(long, action = clap::ArgAction::Set)]
    pub feedback: Option<bool>,

    #[arg(long, default_value_t = 2_000)]
    pub worker_min_delay_ms: u64,

    #[arg(long, default_value_t = 3_000)]
    pub worker_max_delay_ms: u64,

    #[arg(long, env = EXPLORER_TX_BASE_ENV)]
    pub explorer_tx_base: Option<String>,

    /// Write the showcase feed of the run here
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    #[arg(long)]
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct SelectArgs {
    /// Exported feed; the bundled dataset is used when missing or malformed
    #[arg(long)]
    pub feed: Option<PathBuf>,

    /// Defaults to the feed's own task
    #[arg(long)]
    pub prompt: Option<String>,

    #[arg(long)]
    pub category: Option<CategoryChoice>,

    /// Budget in ether
    #[arg(long)]
    pub budget: Option<String>,

    #[arg(long, default_value = "quality-first")]
    pub policy: SelectionPolicy,
}

#[derive(Debug, Clone, Args)]
pub struct DeploymentArgs {
    pub path: PathBuf,
}
