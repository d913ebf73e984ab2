//! Shared constants for instruction handlers

/// Divisor for basis points calculations (100% = 10000 bps)
pub const BASIS_POINTS_DIVISOR: u128 = 10_000;

/// Maximum platform fee in basis points (10% = 1000 bps)
pub const MAX_PLATFORM_FEE_BPS: u16 = 1000;

/// Platform fee applied by a fresh deployment (1%)
pub const DEFAULT_PLATFORM_FEE_BPS: u16 = 100;

/// One ether in wei
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Minimum stake for a categorized registration (0.01 ether)
pub const DEFAULT_MIN_STAKE: u128 = WEI_PER_ETHER / 100;

// ============================================================================
// Reputation System Constants
// ============================================================================

/// Minimum possible reputation score
pub const MIN_REPUTATION: u8 = 0;

/// Maximum reputation an agent can hold
pub const MAX_REPUTATION: u8 = 100;

/// Reputation assigned at registration
pub const INITIAL_REPUTATION: u8 = 50;

/// Points moved by a payment, a refund or one feedback call
pub const REPUTATION_STEP: u8 = 1;

// ============================================================================
// Job Constants
// ============================================================================

/// Longest accepted job timeout (365 days in seconds)
pub const MAX_JOB_TIMEOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Maximum delivery reference length in bytes
pub const MAX_DELIVERY_LEN: usize = 1024;

// ============================================================================
// Registration Constants
// ============================================================================

pub const MAX_NAME_LEN: usize = 64;

pub const MAX_EXPERTISE_LEN: usize = 128;
