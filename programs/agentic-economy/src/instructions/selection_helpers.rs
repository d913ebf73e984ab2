//! Candidate ranking, budget filtering and best-agent selection
//!
//! Shared by `createJobByCategory`, the `getBestAgent` view and the
//! showcase feed so that all three agree on the same ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::state::{Address, AgentProfile, Category, SelectionPolicy};
use crate::utils::serde_amount;

/// Ranking-relevant view of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub address: Address,
    pub category: Category,
    #[serde(rename = "baseFeeWei", with = "serde_amount")]
    pub base_fee: u128,
    pub reputation: u8,
}

impl RankingEntry {
    pub fn from_profile(profile: &AgentProfile) -> Option<Self> {
        Some(Self {
            address: profile.address,
            category: profile.category?,
            base_fee: profile.base_fee,
            reputation: profile.reputation,
        })
    }

    /// Reputation per wei of base fee; zero when the fee is zero.
    pub fn efficiency(&self) -> f64 {
        if self.base_fee == 0 {
            0.0
        } else {
            f64::from(self.reputation) / self.base_fee as f64
        }
    }

    pub fn is_affordable(&self, budget: u128) -> bool {
        self.base_fee <= budget
    }
}

/// Exact descending comparison of `reputation / base_fee`.
///
/// A zero fee counts as zero efficiency.
pub fn compare_efficiency_desc(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    match (a.base_fee == 0, b.base_fee == 0) {
        (true, true) => Ordering::Equal,
        (true, false) => {
            if b.reputation == 0 {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
        (false, true) => {
            if a.reputation == 0 {
                Ordering::Equal
            } else {
                Ordering::Less
            }
        }
        (false, false) => {
            // a.rep / a.fee vs b.rep / b.fee  <=>  a.rep * b.fee vs b.rep * a.fee
            let lhs = widening_mul(b.base_fee, a.reputation);
            let rhs = widening_mul(a.base_fee, b.reputation);
            rhs.cmp(&lhs)
        }
    }
}

/// `x * y` as a (high, low) pair that cannot overflow
fn widening_mul(x: u128, y: u8) -> (u128, u64) {
    let y = u128::from(y);
    let low = (x & u128::from(u64::MAX)) * y;
    let high = (x >> 64) * y + (low >> 64);
    (high, low as u64)
}

/// Reputation desc, then base fee asc, then efficiency desc
pub fn compare_quality_first(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.reputation
        .cmp(&a.reputation)
        .then_with(|| a.base_fee.cmp(&b.base_fee))
        .then_with(|| compare_efficiency_desc(a, b))
}

/// Efficiency desc, then reputation desc, then base fee asc
pub fn compare_efficiency_first(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    compare_efficiency_desc(a, b)
        .then_with(|| b.reputation.cmp(&a.reputation))
        .then_with(|| a.base_fee.cmp(&b.base_fee))
}

/// Filters `entries` to `category` and stable-sorts them under `policy`.
/// Entries that tie on every key keep their input order.
pub fn rank_candidates<I>(
    entries: I,
    category: Category,
    policy: SelectionPolicy,
) -> Vec<RankingEntry>
where
    I: IntoIterator<Item = RankingEntry>,
{
    let mut ranked: Vec<RankingEntry> = entries
        .into_iter()
        .filter(|entry| entry.category == category)
        .collect();
    match policy {
        SelectionPolicy::QualityFirst => ranked.sort_by(compare_quality_first),
        SelectionPolicy::EfficiencyFirst => ranked.sort_by(compare_efficiency_first),
    }
    ranked
}

/// Keeps candidates whose base fee fits the budget, preserving order
pub fn filter_affordable(ranked: Vec<RankingEntry>, budget: u128) -> Vec<RankingEntry> {
    ranked
        .into_iter()
        .filter(|entry| entry.is_affordable(budget))
        .collect()
}

/// Outcome of ranking plus budget filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub category: Category,
    pub budget: u128,
    /// Affordable candidates in ranked order
    pub affordable: Vec<RankingEntry>,
}

impl Selection {
    pub fn best(&self) -> Option<&RankingEntry> {
        self.affordable.first()
    }

    pub fn into_best(self) -> Option<RankingEntry> {
        self.affordable.into_iter().next()
    }
}

pub fn select<I>(entries: I, category: Category, budget: u128, policy: SelectionPolicy) -> Selection
where
    I: IntoIterator<Item = RankingEntry>,
{
    let ranked = rank_candidates(entries, category, policy);
    Selection {
        category,
        budget,
        affordable: filter_affordable(ranked, budget),
    }
}
