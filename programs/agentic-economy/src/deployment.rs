//! Deployment record reader
//!
//! The deploy script writes one JSON artifact per network. Older artifacts
//! name the fields `contract`/`address`, newer ones
//! `contractVersion`/`contractAddress`; both spellings are accepted.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::state::{Address, ContractVersion};
use crate::utils::version::{entry_points_for, EntryPoint};

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("failed to read deployment record: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed deployment record: {0}")]
    Json(#[from] serde_json::Error),
}

/// One ABI item; only functions matter here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub network: String,
    pub chain_id: u64,
    /// Contract name or version tag, e.g. `AgenticMonadEconomyV2` or `v2`
    #[serde(alias = "contract")]
    pub contract_version: String,
    #[serde(alias = "address")]
    pub contract_address: Address,
    pub deployed_at: DateTime<Utc>,
    #[serde(default)]
    pub abi: Vec<AbiItem>,
}

impl DeploymentRecord {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeploymentError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let record = Self::from_json(&raw)?;
        debug!(
            path = %path.as_ref().display(),
            network = %record.network,
            version = %record.version(),
            "deployment record loaded"
        );
        Ok(record)
    }

    pub fn from_json(raw: &str) -> Result<Self, DeploymentError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Version from the tag, falling back to the ABI when the tag is a bare name
    pub fn version(&self) -> ContractVersion {
        let tag = self.contract_version.trim().to_ascii_lowercase();
        if tag == "v2" || tag.ends_with("v2") {
            return ContractVersion::V2;
        }
        if tag == "v1" || tag.ends_with("v1") {
            return ContractVersion::V1;
        }
        if self.abi_entry_points().contains(&EntryPoint::RegisterAgentV2) {
            ContractVersion::V2
        } else {
            ContractVersion::V1
        }
    }

    /// Entry points named by ABI functions, in ABI order
    pub fn abi_entry_points(&self) -> Vec<EntryPoint> {
        self.abi
            .iter()
            .filter(|item| item.kind == "function" || item.kind == "receive")
            .filter_map(|item| match item.kind.as_str() {
                "receive" => Some(EntryPoint::Receive),
                _ => item.name.as_deref().and_then(EntryPoint::from_abi_name),
            })
            .collect()
    }

    /// Entry points callable on this deployment. Without an ABI the
    /// version's full catalogue is assumed.
    pub fn entry_points(&self) -> Vec<EntryPoint> {
        if self.abi.is_empty() {
            entry_points_for(self.version())
        } else {
            self.abi_entry_points()
        }
    }

    pub fn supports(&self, entry_point: EntryPoint) -> bool {
        self.entry_points().contains(&entry_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1_RECORD: &str = r#"{
        "network": "monadTestnet",
        "chainId": 10143,
        "contract": "AgenticMonadEconomy",
        "address": "0x30e335f649d53fB885E83C6d2E3517B4E0E029AF",
        "deployedAt": "2026-02-27T10:00:00.000Z",
        "abi": [
            {"type": "constructor", "inputs": []},
            {"type": "function", "name": "registerAgent", "inputs": []},
            {"type": "function", "name": "createJob"},
            {"type": "function", "name": "approveWork"},
            {"type": "function", "name": "jobs"},
            {"type": "event", "name": "JobCreated"},
            {"type": "receive", "stateMutability": "payable"}
        ]
    }"#;

    const V2_RECORD: &str = r#"{
        "network": "monadTestnet",
        "chainId": 10143,
        "contractVersion": "v2",
        "contractAddress": "0xFA87ee879375bb43d414387d3De1D899ea20fe0F",
        "deployedAt": "2026-02-28T17:40:00Z"
    }"#;

    #[test]
    fn test_legacy_field_names() {
        let record = DeploymentRecord::from_json(V1_RECORD).unwrap();
        assert_eq!(record.contract_version, "AgenticMonadEconomy");
        assert_eq!(record.chain_id, 10143);
        assert_eq!(record.version(), ContractVersion::V1);
        assert_eq!(
            record.entry_points(),
            vec![
                EntryPoint::RegisterAgent,
                EntryPoint::CreateJob,
                EntryPoint::ApproveWork,
                EntryPoint::Receive,
            ]
        );
        assert!(!record.supports(EntryPoint::CreateJobByCategory));
    }

    #[test]
    fn test_version_tag_without_abi() {
        let record = DeploymentRecord::from_json(V2_RECORD).unwrap();
        assert_eq!(record.version(), ContractVersion::V2);
        assert!(record.supports(EntryPoint::CreateJobByCategory));
        assert!(record.supports(EntryPoint::ApproveWork));
    }

    #[test]
    fn test_version_inferred_from_abi() {
        let raw = V1_RECORD.replace(
            r#"{"type": "function", "name": "jobs"}"#,
            r#"{"type": "function", "name": "registerAgentV2"}"#,
        );
        let record = DeploymentRecord::from_json(&raw).unwrap();
        assert_eq!(record.version(), ContractVersion::V2);
    }

    #[test]
    fn test_contract_name_suffix() {
        let mut record = DeploymentRecord::from_json(V2_RECORD).unwrap();
        record.contract_version = "AgenticMonadEconomyV2".into();
        assert_eq!(record.version(), ContractVersion::V2);
    }

    #[test]
    fn test_malformed_record() {
        assert!(matches!(
            DeploymentRecord::from_json(r#"{"network": "x"}"#),
            Err(DeploymentError::Json(_))
        ));
        assert!(matches!(
            DeploymentRecord::load("/nonexistent/deployment.json"),
            Err(DeploymentError::Io(_))
        ));
    }
}
