//! Demo configuration and the known network allowlist

use std::path::PathBuf;
use std::time::Duration;

use agentic_economy::utils::classifier::CategoryChoice;
use agentic_economy::utils::units::parse_ether;
use agentic_economy::SelectionPolicy;

use crate::cli::DemoArgs;
use crate::errors::{Result, SimError};

pub const DEFAULT_NETWORK: &str = "monadTestnet";

/// Overrides the network's explorer base for transaction links
pub const EXPLORER_TX_BASE_ENV: &str = "MONAD_EXPLORER_TX_BASE";

pub const DEFAULT_PROMPT: &str = "Analyze market demand for agentic coding services.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownNetwork {
    pub name: &'static str,
    pub chain_id: u64,
    pub explorer_tx_base: Option<&'static str>,
}

pub const KNOWN_NETWORKS: [KnownNetwork; 3] = [
    KnownNetwork {
        name: DEFAULT_NETWORK,
        chain_id: 10143,
        explorer_tx_base: Some("https://testnet.monadscan.com/tx"),
    },
    KnownNetwork {
        name: "hardhat",
        chain_id: 31337,
        explorer_tx_base: None,
    },
    KnownNetwork {
        name: "localhost",
        chain_id: 31337,
        explorer_tx_base: None,
    },
];

pub fn require_known_network(name: &str) -> Result<&'static KnownNetwork> {
    KNOWN_NETWORKS
        .iter()
        .find(|network| network.name == name)
        .ok_or_else(|| SimError::UnknownNetwork(name.to_string()))
}

/// Resolved settings for one demo run
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub network: &'static KnownNetwork,
    pub deployment: Option<PathBuf>,
    pub budget_wei: u128,
    pub timeout_secs: u64,
    pub prompt: String,
    pub category: CategoryChoice,
    pub policy: SelectionPolicy,
    pub master_name: String,
    pub worker_name: String,
    pub master_expertise: String,
    pub worker_expertise: String,
    pub worker_base_fee_wei: u128,
    /// `None` picks the feedback at random
    pub feedback: Option<bool>,
    pub worker_delay: (Duration, Duration),
    pub explorer_tx_base: Option<String>,
    pub export_json: Option<PathBuf>,
    pub rng_seed: Option<u64>,
}

impl DemoConfig {
    pub fn from_args(args: DemoArgs) -> Result<Self> {
        let network = require_known_network(&args.network)?;
        if args.worker_min_delay_ms > args.worker_max_delay_ms {
            return Err(SimError::InvalidDelay {
                min_ms: args.worker_min_delay_ms,
                max_ms: args.worker_max_delay_ms,
            });
        }
        let explorer_tx_base = args
            .explorer_tx_base
            .map(|base| base.trim().to_string())
            .filter(|base| !base.is_empty())
            .or_else(|| network.explorer_tx_base.map(str::to_string));

        Ok(Self {
            network,
            deployment: args.deployment,
            budget_wei: parse_ether(&args.budget_eth)?,
            timeout_secs: args.timeout_sec,
            prompt: args.prompt,
            category: args.category,
            policy: args.policy,
            master_name: args.master_name,
            worker_name: args.worker_name,
            master_expertise: args.master_expertise,
            worker_expertise: args.worker_expertise,
            worker_base_fee_wei: args.worker_base_fee_wei,
            feedback: args.feedback,
            worker_delay: (
                Duration::from_millis(args.worker_min_delay_ms),
                Duration::from_millis(args.worker_max_delay_ms),
            ),
            explorer_tx_base,
            export_json: args.export_json,
            rng_seed: args.rng_seed,
        })
    }
}
