//! Agentic Economy Simulator
//!
//! Host-side driver for the engine: seeds the synthetic agent tiers, plays a
//! mock worker through one job, and exports the run as a showcase feed.
//!
//! # Modules
//!
//! - `cli`: Command line arguments
//! - `config`: Known networks and demo settings
//! - `seed`: Synthetic agent tiers
//! - `mock_worker`: Delayed fake task execution
//! - `demo`: The end-to-end workflow and feed export

pub mod cli;
pub mod config;
pub mod demo;
pub mod errors;
pub mod mock_worker;
pub mod seed;

pub use config::{require_known_network, DemoConfig, KnownNetwork, KNOWN_NETWORKS};
pub use demo::{run_demo, DemoRun, FinalState};
pub use errors::{Result, SimError};
pub use mock_worker::MockWorker;
