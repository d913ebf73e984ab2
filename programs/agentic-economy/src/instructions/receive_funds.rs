//! Plain deposits sent to the engine

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::utils::version::EntryPoint;
use crate::Economy;

/// Credits the attached value to the withdrawable pool.
pub fn handler(economy: &mut Economy, ctx: &CallContext) -> Result<()> {
    economy.begin(EntryPoint::Receive)?;
    if ctx.value == 0 {
        return Err(EconomyError::InvalidInput("deposit amount"));
    }
    economy.ledger.accrued_fees = economy
        .ledger
        .accrued_fees
        .checked_add(ctx.value)
        .ok_or(EconomyError::ArithmeticOverflow)?;

    info!(from = %ctx.caller, amount = %ctx.value, "funds received");
    economy.commit(
        EntryPoint::Receive,
        vec![EconomyEvent::FundsReceived {
            from: ctx.caller,
            amount: ctx.value,
            timestamp: ctx.now,
        }],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_deposit_is_withdrawable() {
        let mut economy = economy();
        economy.receive(&call(OUTSIDER).with_value(ETHER)).unwrap();
        assert_eq!(economy.accrued_fees(), ETHER);
        assert_eq!(economy.locked_funds(), 0);
        assert_eq!(economy.ledger().balance(), ETHER);
    }

    #[test]
    fn test_empty_deposit_rejected() {
        let mut economy = economy();
        assert_eq!(
            economy.receive(&call(OUTSIDER)),
            Err(EconomyError::InvalidInput("deposit amount"))
        );
        assert!(economy.events().is_empty());
    }
}
