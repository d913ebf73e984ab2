//! Simulator error type

use agentic_economy::deployment::DeploymentError;
use agentic_economy::showcase::FeedError;
use agentic_economy::{EconomyError, EntryPoint};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("network {0} is not in the known network list")]
    UnknownNetwork(String),

    #[error("invalid worker delay: minimum {min_ms}ms exceeds maximum {max_ms}ms")]
    InvalidDelay { min_ms: u64, max_ms: u64 },

    #[error("prompt is required")]
    EmptyPrompt,

    #[error("deployment does not expose {0}")]
    UnsupportedDeployment(EntryPoint),

    #[error(transparent)]
    Economy(#[from] EconomyError),

    #[error(transparent)]
    Deployment(#[from] DeploymentError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}
