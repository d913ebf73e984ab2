//! Instruction handlers for the agentic economy engine

pub mod constants;
pub mod reputation_helpers;
pub mod selection_helpers;
pub mod settlement_helpers;
pub mod value_transfer;

pub mod accept_job;
pub mod apply_synthetic_feedback;
pub mod create_job;
pub mod create_job_by_category;
pub mod get_best_agent;
pub mod receive_funds;
pub mod refund_after_timeout;
pub mod register_agent;
pub mod register_agent_v2;
pub mod release_payment;
pub mod seed_synthetic_agent;
pub mod set_agent_reputation;
pub mod submit_work;
pub mod transfer_ownership;
pub mod update_platform_fee;
pub mod withdraw_fees;
