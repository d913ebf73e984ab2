//! State structures for the agentic economy engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::EconomyError;
use crate::instructions::constants::{
    DEFAULT_MIN_STAKE, DEFAULT_PLATFORM_FEE_BPS, INITIAL_REPUTATION,
};
use crate::utils::version::EntryPoint;

// ============================================================================
// Identities
// ============================================================================

/// Length of an account identity in bytes
pub const ADDRESS_LEN: usize = 20;

/// 20-byte account identity, rendered as `0x`-prefixed lower-case hex
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses `0x`-prefixed (or bare) hex; checksum casing is accepted but not enforced.
    pub fn from_hex(s: &str) -> Result<Self, EconomyError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| EconomyError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Abbreviated form used in log lines, `0x1234…cdef`
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Agent specialization. Declaration order is the classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Development,
    Research,
    DataMining,
    ContentGen,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Development,
        Category::Research,
        Category::DataMining,
        Category::ContentGen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Development => "DEVELOPMENT",
            Category::Research => "RESEARCH",
            Category::DataMining => "DATA_MINING",
            Category::ContentGen => "CONTENT_GEN",
        }
    }

    /// Left-aligned, NUL-padded 32-byte word as stored by the contract.
    pub fn to_bytes32(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        let name = self.as_str().as_bytes();
        word[..name.len()].copy_from_slice(name);
        word
    }

    pub fn from_bytes32(word: &[u8; 32]) -> Result<Self, EconomyError> {
        let end = word.iter().position(|b| *b == 0).unwrap_or(word.len());
        if word[end..].iter().any(|b| *b != 0) {
            return Err(EconomyError::UnknownCategory(hex::encode(word)));
        }
        let name = std::str::from_utf8(&word[..end])
            .map_err(|_| EconomyError::UnknownCategory(hex::encode(word)))?;
        name.parse()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EconomyError::UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// Protocol configuration
// ============================================================================

/// Deployed contract generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractVersion {
    /// Direct hiring only, no categories or reputation updates
    V1,
    #[default]
    V2,
}

impl ContractVersion {
    /// Whether payments, refunds and feedback move reputation
    pub fn tracks_reputation(&self) -> bool {
        matches!(self, ContractVersion::V2)
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractVersion::V1 => f.write_str("v1"),
            ContractVersion::V2 => f.write_str("v2"),
        }
    }
}

/// Ordering applied by the candidate ranker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Reputation desc, base fee asc, efficiency desc
    #[default]
    QualityFirst,
    /// Efficiency desc, reputation desc, base fee asc
    EfficiencyFirst,
}

impl FromStr for SelectionPolicy {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quality-first" | "quality" => Ok(SelectionPolicy::QualityFirst),
            "efficiency-first" | "efficiency" => Ok(SelectionPolicy::EfficiencyFirst),
            _ => Err(EconomyError::InvalidInput("unknown selection policy")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Administrator allowed to call owner-only entry points
    pub owner: Address,
    /// Fee withheld from each payment, in basis points (max 1000)
    pub platform_fee_bps: u16,
    /// Minimum stake attached to a v2 registration, in wei
    pub min_stake: u128,
    pub version: ContractVersion,
    pub selection_policy: SelectionPolicy,
}

impl ProtocolConfig {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: ContractVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_platform_fee_bps(mut self, bps: u16) -> Self {
        self.platform_fee_bps = bps;
        self
    }

    pub fn with_min_stake(mut self, min_stake: u128) -> Self {
        self.min_stake = min_stake;
        self
    }

    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            owner: Address::ZERO,
            platform_fee_bps: DEFAULT_PLATFORM_FEE_BPS,
            min_stake: DEFAULT_MIN_STAKE,
            version: ContractVersion::V2,
            selection_policy: SelectionPolicy::QualityFirst,
        }
    }
}

// ============================================================================
// Agents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub address: Address,
    pub name: String,
    pub expertise: String,
    /// `None` for agents registered through the uncategorized entry point
    pub category: Option<Category>,
    pub base_fee: u128,
    /// Quality score in 0..=100
    pub reputation: u8,
    pub stake: u128,
    pub registered: bool,
    pub registered_at: i64,
    pub jobs_completed: u64,
    pub total_earned: u128,
}

impl AgentProfile {
    pub fn new(address: Address, name: String, expertise: String, registered_at: i64) -> Self {
        Self {
            address,
            name,
            expertise,
            category: None,
            base_fee: 0,
            reputation: INITIAL_REPUTATION,
            stake: 0,
            registered: true,
            registered_at,
            jobs_completed: 0,
            total_earned: 0,
        }
    }

    /// Whether this agent can be picked by category
    pub fn is_listed_in(&self, category: Category) -> bool {
        self.registered && self.category == Some(category)
    }
}

// ============================================================================
// Jobs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum JobStatus {
    /// Escrow locked, waiting for the worker
    #[default]
    Open = 0,
    Taken = 1,
    Submitted = 2,
    Resolved = 3,
    Refunded = 4,
}

impl JobStatus {
    /// Validates whether a status transition is allowed.
    ///
    /// Valid transitions:
    /// - Open → Taken (worker accepts)
    /// - Taken → Submitted (worker delivers)
    /// - Submitted → Resolved (employer releases payment)
    /// - Open → Refunded, Taken → Refunded (timeout elapsed)
    ///
    /// Terminal states (Resolved, Refunded) cannot transition to any other state.
    pub fn can_transition_to(&self, new_status: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, new_status),
            (Open, Taken) | (Open, Refunded) | (Taken, Submitted) | (Taken, Refunded) |
            (Submitted, Resolved)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Resolved | JobStatus::Refunded)
    }

    /// Whether the budget is still held in escrow
    pub fn holds_escrow(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Open => "Open",
            JobStatus::Taken => "Taken",
            JobStatus::Submitted => "Submitted",
            JobStatus::Resolved => "Resolved",
            JobStatus::Refunded => "Refunded",
        };
        f.write_str(name)
    }
}

/// One committed transition in a job's life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRecord {
    pub entry_point: EntryPoint,
    pub at: i64,
    /// Engine-wide call sequence number of the committing call
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_id: u64,
    pub employer: Address,
    pub worker: Address,
    pub budget: u128,
    pub status: JobStatus,
    pub created_at: i64,
    pub accepted_at: Option<i64>,
    /// Seconds after `created_at` before a refund is allowed
    pub timeout: u64,
    pub delivery: Option<String>,
    pub selected_by_algorithm: bool,
    pub category: Option<Category>,
    pub feedback_applied: bool,
    pub history: Vec<PhaseRecord>,
}

impl Job {
    pub fn deadline(&self) -> i64 {
        let timeout = i64::try_from(self.timeout).unwrap_or(i64::MAX);
        self.created_at.saturating_add(timeout)
    }

    /// Strictly after the deadline
    pub fn is_timed_out(&self, now: i64) -> bool {
        now > self.deadline()
    }

    pub(crate) fn record(&mut self, entry_point: EntryPoint, at: i64, sequence: u64) {
        self.history.push(PhaseRecord {
            entry_point,
            at,
            sequence,
        });
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// Aggregate balances held by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    /// Sum of budgets of jobs that are neither resolved nor refunded
    pub locked_funds: u128,
    /// Withdrawable pool: platform fees plus direct deposits
    pub accrued_fees: u128,
    pub total_staked: u128,
    pub total_paid_out: u128,
    pub total_refunded: u128,
}

impl Ledger {
    /// Everything the engine currently holds
    pub fn balance(&self) -> u128 {
        self.locked_funds
            .saturating_add(self.accrued_fees)
            .saturating_add(self.total_staked)
    }
}
