//! Outbound value transfers
//!
//! Every payout, refund and fee withdrawal is delivered through a
//! [`ValueSink`] after the engine has already committed its own accounting.
//! The sink receives the engine, so it can attempt to call back in; while a
//! delivery is in flight every state-changing entry point fails with
//! `ReentrantCall`. A failed delivery restores the checkpoint taken before
//! the call mutated anything.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::warn;

use crate::errors::{EconomyError, Result};
use crate::state::{Address, AgentProfile, Job, Ledger};
use crate::Economy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Payout { job_id: u64 },
    Refund { job_id: u64 },
    FeeWithdrawal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub recipient: Address,
    pub amount: u128,
    pub kind: TransferKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct TransferError {
    pub reason: String,
}

impl TransferError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Receiving side of an outbound transfer
pub trait ValueSink {
    fn deliver(
        &mut self,
        transfer: &Transfer,
        economy: &mut Economy,
    ) -> std::result::Result<(), TransferError>;
}

/// In-memory account balances credited by delivered transfers
#[derive(Debug, Clone, Default)]
pub struct Balances {
    credited: HashMap<Address, u128>,
    rejecting: HashSet<Address>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.credited.get(account).copied().unwrap_or(0)
    }

    /// Makes every transfer to `account` fail, like a recipient that reverts
    pub fn reject_transfers_to(&mut self, account: Address) {
        self.rejecting.insert(account);
    }

    pub fn accept_transfers_to(&mut self, account: &Address) {
        self.rejecting.remove(account);
    }
}

impl ValueSink for Balances {
    fn deliver(
        &mut self,
        transfer: &Transfer,
        _economy: &mut Economy,
    ) -> std::result::Result<(), TransferError> {
        if self.rejecting.contains(&transfer.recipient) {
            return Err(TransferError::new("recipient rejected the transfer"));
        }
        let balance = self.credited.entry(transfer.recipient).or_insert(0);
        *balance = balance
            .checked_add(transfer.amount)
            .ok_or_else(|| TransferError::new("recipient balance overflow"))?;
        Ok(())
    }
}

/// State touched by a value-moving call, captured before mutation
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    ledger: Ledger,
    job: Option<Job>,
    agent: Option<AgentProfile>,
}

impl Checkpoint {
    pub(crate) fn capture(economy: &Economy, job_id: Option<u64>, agent: Option<Address>) -> Self {
        Self {
            ledger: economy.ledger,
            job: job_id.and_then(|id| economy.jobs.get(id as usize).cloned()),
            agent: agent.and_then(|address| economy.agents.get(&address).cloned()),
        }
    }

    pub(crate) fn restore(self, economy: &mut Economy) {
        economy.ledger = self.ledger;
        if let Some(job) = self.job {
            if let Some(slot) = economy.jobs.get_mut(job.job_id as usize) {
                *slot = job;
            }
        }
        if let Some(agent) = self.agent {
            economy.agents.insert(agent.address, agent);
        }
    }
}

/// Delivers `transfer` with the reentrancy guard held; rolls back on failure.
pub(crate) fn send(
    economy: &mut Economy,
    sink: &mut dyn ValueSink,
    transfer: Transfer,
    checkpoint: Checkpoint,
) -> Result<()> {
    economy.transfer_in_flight = true;
    let outcome = sink.deliver(&transfer, economy);
    economy.transfer_in_flight = false;

    outcome.map_err(|err| {
        warn!(
            recipient = %transfer.recipient,
            amount = %transfer.amount,
            kind = ?transfer.kind,
            reason = %err,
            "transfer failed, rolling back"
        );
        checkpoint.restore(economy);
        EconomyError::TransferFailed {
            recipient: transfer.recipient,
            amount: transfer.amount,
            reason: err.reason,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ProtocolConfig, ADDRESS_LEN};

    fn transfer_to(recipient: Address, amount: u128) -> Transfer {
        Transfer {
            recipient,
            amount,
            kind: TransferKind::FeeWithdrawal,
        }
    }

    #[test]
    fn test_balances_accumulate() {
        let mut economy =
            Economy::new(ProtocolConfig::new(Address::new([1; ADDRESS_LEN]))).unwrap();
        let mut balances = Balances::new();
        let recipient = Address::new([7; ADDRESS_LEN]);
        balances.deliver(&transfer_to(recipient, 10), &mut economy).unwrap();
        balances.deliver(&transfer_to(recipient, 5), &mut economy).unwrap();
        assert_eq!(balances.balance_of(&recipient), 15);
        assert_eq!(balances.balance_of(&Address::ZERO), 0);
    }

    #[test]
    fn test_rejecting_recipient() {
        let mut economy =
            Economy::new(ProtocolConfig::new(Address::new([1; ADDRESS_LEN]))).unwrap();
        let mut balances = Balances::new();
        let recipient = Address::new([7; ADDRESS_LEN]);
        balances.reject_transfers_to(recipient);
        assert!(balances.deliver(&transfer_to(recipient, 1), &mut economy).is_err());
        balances.accept_transfers_to(&recipient);
        assert!(balances.deliver(&transfer_to(recipient, 1), &mut economy).is_ok());
    }

    #[test]
    fn test_failed_send_restores_ledger_and_clears_guard() {
        let mut economy =
            Economy::new(ProtocolConfig::new(Address::new([1; ADDRESS_LEN]))).unwrap();
        economy.ledger.accrued_fees = 100;
        let checkpoint = Checkpoint::capture(&economy, None, None);
        economy.ledger.accrued_fees = 40;

        let mut balances = Balances::new();
        let recipient = Address::new([9; ADDRESS_LEN]);
        balances.reject_transfers_to(recipient);

        let err =
            send(&mut economy, &mut balances, transfer_to(recipient, 60), checkpoint).unwrap_err();
        assert!(matches!(err, EconomyError::TransferFailed { amount: 60, .. }));
        assert_eq!(economy.ledger.accrued_fees, 100);
        assert!(!economy.transfer_in_flight);
    }
}
