//! Withdraw accrued fees (owner only)

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::instructions::value_transfer::{send, Checkpoint, Transfer, TransferKind, ValueSink};
use crate::state::Address;
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(
    economy: &mut Economy,
    ctx: &CallContext,
    to: Address,
    amount: u128,
    sink: &mut dyn ValueSink,
) -> Result<()> {
    economy.begin(EntryPoint::WithdrawFees)?;
    economy.require_owner(ctx, EntryPoint::WithdrawFees)?;
    if to.is_zero() {
        return Err(EconomyError::InvalidAddress(to.to_string()));
    }
    if amount == 0 {
        return Err(EconomyError::InvalidInput("withdrawal amount"));
    }
    let available = economy.ledger.accrued_fees;
    if amount > available {
        return Err(EconomyError::InsufficientFunds {
            requested: amount,
            available,
        });
    }

    let checkpoint = Checkpoint::capture(economy, None, None);
    // Debited before delivery
    economy.ledger.accrued_fees = available - amount;

    send(
        economy,
        sink,
        Transfer {
            recipient: to,
            amount,
            kind: TransferKind::FeeWithdrawal,
        },
        checkpoint,
    )?;

    info!(%to, amount = %amount, remaining = %economy.ledger.accrued_fees, "fees withdrawn");
    economy.commit(
        EntryPoint::WithdrawFees,
        vec![EconomyEvent::FeesWithdrawn {
            to,
            amount,
            timestamp: ctx.now,
        }],
    );
    Ok(())
}
