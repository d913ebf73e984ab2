//! Entry-point catalogue and contract version gating

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{EconomyError, Result};
use crate::state::ContractVersion;

/// Every externally callable operation, named as in the contract ABI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryPoint {
    RegisterAgent,
    RegisterAgentV2,
    SeedSyntheticAgent,
    CreateJob,
    CreateJobByCategory,
    AcceptJob,
    SubmitWork,
    ApproveWork,
    ReleasePayment,
    RefundAfterTimeout,
    ApplySyntheticFeedback,
    SetAgentReputation,
    SetPlatformFeeBps,
    WithdrawFees,
    TransferOwnership,
    Receive,
    GetBestAgent,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 17] = [
        EntryPoint::RegisterAgent,
        EntryPoint::RegisterAgentV2,
        EntryPoint::SeedSyntheticAgent,
        EntryPoint::CreateJob,
        EntryPoint::CreateJobByCategory,
        EntryPoint::AcceptJob,
        EntryPoint::SubmitWork,
        EntryPoint::ApproveWork,
        EntryPoint::ReleasePayment,
        EntryPoint::RefundAfterTimeout,
        EntryPoint::ApplySyntheticFeedback,
        EntryPoint::SetAgentReputation,
        EntryPoint::SetPlatformFeeBps,
        EntryPoint::WithdrawFees,
        EntryPoint::TransferOwnership,
        EntryPoint::Receive,
        EntryPoint::GetBestAgent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntryPoint::RegisterAgent => "registerAgent",
            EntryPoint::RegisterAgentV2 => "registerAgentV2",
            EntryPoint::SeedSyntheticAgent => "seedSyntheticAgent",
            EntryPoint::CreateJob => "createJob",
            EntryPoint::CreateJobByCategory => "createJobByCategory",
            EntryPoint::AcceptJob => "acceptJob",
            EntryPoint::SubmitWork => "submitWork",
            EntryPoint::ApproveWork => "approveWork",
            EntryPoint::ReleasePayment => "releasePayment",
            EntryPoint::RefundAfterTimeout => "refundAfterTimeout",
            EntryPoint::ApplySyntheticFeedback => "applySyntheticFeedback",
            EntryPoint::SetAgentReputation => "setAgentReputation",
            EntryPoint::SetPlatformFeeBps => "setPlatformFeeBps",
            EntryPoint::WithdrawFees => "withdrawFees",
            EntryPoint::TransferOwnership => "transferOwnership",
            EntryPoint::Receive => "receive",
            EntryPoint::GetBestAgent => "getBestAgent",
        }
    }

    /// Maps an ABI function name back to its entry point
    pub fn from_abi_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|entry| entry.name() == name)
    }

    /// First contract generation exposing this entry point
    pub fn introduced_in(&self) -> ContractVersion {
        match self {
            EntryPoint::RegisterAgentV2
            | EntryPoint::SeedSyntheticAgent
            | EntryPoint::CreateJobByCategory
            | EntryPoint::ReleasePayment
            | EntryPoint::ApplySyntheticFeedback
            | EntryPoint::SetAgentReputation
            | EntryPoint::GetBestAgent => ContractVersion::V2,
            _ => ContractVersion::V1,
        }
    }

    pub fn is_available_on(&self, version: ContractVersion) -> bool {
        self.introduced_in() <= version
    }

    /// Timeline label shown for the transition this entry point commits
    pub fn step_label(&self) -> &'static str {
        match self {
            EntryPoint::CreateJob | EntryPoint::CreateJobByCategory => "Budget escrow locked",
            EntryPoint::AcceptJob => "Worker accepted the job",
            EntryPoint::SubmitWork => "Worker submitted delivery proof",
            EntryPoint::ApproveWork | EntryPoint::ReleasePayment => "Payment released to worker",
            EntryPoint::ApplySyntheticFeedback => "Reputation feedback applied",
            EntryPoint::RefundAfterTimeout => "Budget refunded to employer",
            other => other.name(),
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check that `entry_point` exists on the deployed contract generation
///
/// # Returns
/// * `Ok(())` if the entry point is available
/// * `Err(EconomyError::UnsupportedEntryPoint)` otherwise
pub fn check_entry_point_available(
    version: ContractVersion,
    entry_point: EntryPoint,
) -> Result<()> {
    if !entry_point.is_available_on(version) {
        debug!(
            entry_point = entry_point.name(),
            %version,
            introduced_in = %entry_point.introduced_in(),
            "entry point not deployed"
        );
        return Err(EconomyError::UnsupportedEntryPoint {
            entry_point,
            version,
        });
    }
    Ok(())
}

/// Entry points a contract generation exposes, in catalogue order
pub fn entry_points_for(version: ContractVersion) -> Vec<EntryPoint> {
    EntryPoint::ALL
        .into_iter()
        .filter(|entry| entry.is_available_on(version))
        .collect()
}
