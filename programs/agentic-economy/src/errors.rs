//! Error codes for the agentic economy engine

use thiserror::Error;

use crate::state::{Address, Category, ContractVersion, JobStatus};
use crate::utils::version::EntryPoint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    // Authorization errors
    #[error("{caller} is not authorized to call {entry_point}")]
    Unauthorized {
        caller: Address,
        entry_point: EntryPoint,
    },

    #[error("reentrant call to {0} rejected while a transfer is in flight")]
    ReentrantCall(EntryPoint),

    #[error("{entry_point} is not available on contract {version}")]
    UnsupportedEntryPoint {
        entry_point: EntryPoint,
        version: ContractVersion,
    },

    // Agent errors
    #[error("agent {0} is not registered")]
    AgentNotFound(Address),

    #[error("agent {0} is already registered")]
    AlreadyRegistered(Address),

    #[error("stake {provided} is below the minimum registration stake {required}")]
    InsufficientStake { provided: u128, required: u128 },

    // Job errors
    #[error("job {0} not found")]
    JobNotFound(u64),

    #[error("job {job_id} is {status}, expected {expected}")]
    InvalidState {
        job_id: u64,
        status: JobStatus,
        expected: &'static str,
    },

    #[error("job {job_id} times out after {deadline}, current time is {now}")]
    TimeoutNotElapsed { job_id: u64, deadline: i64, now: i64 },

    #[error("budget {budget} is below the required {required}")]
    InsufficientBudget { budget: u128, required: u128 },

    #[error("no eligible {category} agent found within budget {budget}")]
    NoEligibleAgent { category: Category, budget: u128 },

    // Value errors
    #[error("transfer of {amount} to {recipient} failed: {reason}")]
    TransferFailed {
        recipient: Address,
        amount: u128,
        reason: String,
    },

    #[error("requested {requested} exceeds the withdrawable {available}")]
    InsufficientFunds { requested: u128, available: u128 },

    // Input errors
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: u128,
        min: u128,
        max: u128,
    },

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

pub type Result<T> = std::result::Result<T, EconomyError>;
