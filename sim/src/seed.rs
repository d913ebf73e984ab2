//! Synthetic agent seeding
//!
//! Three price/reputation tiers per category so that every category has a
//! ranking to choose from before any real agent registers.

use agentic_economy::state::ADDRESS_LEN;
use agentic_economy::{Address, CallContext, Category, Economy};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::errors::Result;

pub const SYNTHETIC_EXPERTISE: &str = "synthetic";

/// `(label, base fee in wei, reputation)`
pub const TIERS: [(&str, u128, u8); 3] = [
    ("high", 250_000_000_000_000, 92),
    ("mid", 150_000_000_000_000, 75),
    ("low", 80_000_000_000_000, 45),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSpec {
    pub name: String,
    pub category: Category,
    #[serde(rename = "baseFeeWei")]
    pub base_fee: u128,
    pub reputation: u8,
}

/// What was seeded, in the shape of the seeding report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededAgent {
    pub address: Address,
    #[serde(flatten)]
    pub spec: SeedSpec,
    /// `bytes32` encoding of the category
    pub category_hex: String,
    /// `false` when the address was already registered
    pub created: bool,
}

/// One spec per tier per category, in category order
pub fn make_specs() -> Vec<SeedSpec> {
    Category::ALL
        .iter()
        .flat_map(|category| {
            TIERS.iter().map(move |(label, base_fee, reputation)| SeedSpec {
                name: format!("{}_{}", category.as_str(), label),
                category: *category,
                base_fee: *base_fee,
                reputation: *reputation,
            })
        })
        .collect()
}

/// Stable address for `name` within `domain`
pub fn derive_address(domain: &str, name: &str) -> Address {
    let digest = Sha256::new()
        .chain_update(domain.as_bytes())
        .chain_update(b":")
        .chain_update(name.as_bytes())
        .finalize();
    let mut bytes = [0u8; ADDRESS_LEN];
    bytes.copy_from_slice(&digest[..ADDRESS_LEN]);
    Address::new(bytes)
}

pub fn synthetic_address(name: &str) -> Address {
    derive_address("synthetic-agent", name)
}

/// Seeds every spec through the owner-only entry point, skipping addresses
/// that are already registered.
pub fn seed_agents(
    economy: &mut Economy,
    owner: &CallContext,
    specs: &[SeedSpec],
) -> Result<Vec<SeededAgent>> {
    let mut seeded = Vec::with_capacity(specs.len());
    for spec in specs {
        let address = synthetic_address(&spec.name);
        let created = !economy.is_registered(&address);
        if created {
            economy.seed_synthetic_agent(
                owner,
                address,
                &spec.name,
                SYNTHETIC_EXPERTISE,
                spec.category,
                spec.base_fee,
                spec.reputation,
            )?;
        } else {
            debug!(name = %spec.name, %address, "already registered");
        }
        seeded.push(SeededAgent {
            address,
            spec: spec.clone(),
            category_hex: format!("0x{}", hex::encode(spec.category.to_bytes32())),
            created,
        });
    }
    info!(
        total = seeded.len(),
        created = seeded.iter().filter(|agent| agent.created).count(),
        "synthetic agents seeded"
    );
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentic_economy::{EconomyError, ProtocolConfig};

    fn owner() -> Address {
        Address::new([0xAA; ADDRESS_LEN])
    }

    #[test]
    fn test_specs_cover_every_category_and_tier() {
        let specs = make_specs();
        assert_eq!(specs.len(), 12);
        assert_eq!(specs[0].name, "DEVELOPMENT_high");
        assert_eq!(specs[11].name, "CONTENT_GEN_low");
        for category in Category::ALL {
            let reps: Vec<u8> = specs
                .iter()
                .filter(|spec| spec.category == category)
                .map(|spec| spec.reputation)
                .collect();
            assert_eq!(reps, vec![92, 75, 45]);
        }
    }

    #[test]
    fn test_synthetic_addresses_are_stable_and_distinct() {
        assert_eq!(synthetic_address("RESEARCH_high"), synthetic_address("RESEARCH_high"));
        assert_ne!(synthetic_address("RESEARCH_high"), synthetic_address("RESEARCH_mid"));
        assert_ne!(synthetic_address("owner"), derive_address("participant", "owner"));
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let mut economy = Economy::new(ProtocolConfig::new(owner())).unwrap();
        let ctx = CallContext::new(owner(), 1_700_000_000);
        let specs = make_specs();

        let first = seed_agents(&mut economy, &ctx, &specs).unwrap();
        assert!(first.iter().all(|agent| agent.created));
        assert_eq!(economy.category_agents(Category::DataMining).len(), 3);
        assert!(first[0].category_hex.starts_with("0x444556454c4f504d454e54"));

        let second = seed_agents(&mut economy, &ctx, &specs).unwrap();
        assert!(second.iter().all(|agent| !agent.created));
        assert_eq!(economy.agents().count(), 12);
    }

    #[test]
    fn test_seeding_requires_owner() {
        let mut economy = Economy::new(ProtocolConfig::new(owner())).unwrap();
        let stranger = CallContext::new(Address::new([0x01; ADDRESS_LEN]), 0);
        let err = seed_agents(&mut economy, &stranger, &make_specs()).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::SimError::Economy(EconomyError::Unauthorized { .. })
        ));
        assert_eq!(economy.agents().count(), 0);
    }
}
