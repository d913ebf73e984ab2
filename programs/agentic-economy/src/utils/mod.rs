//! Utility modules shared by instruction handlers

pub mod classifier;
pub mod serde_amount;
pub mod units;
pub mod validation;
pub mod version;
