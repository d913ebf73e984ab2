//! Hand the owner role to another account

use tracing::info;

use crate::context::CallContext;
use crate::errors::{EconomyError, Result};
use crate::events::EconomyEvent;
use crate::state::Address;
use crate::utils::version::EntryPoint;
use crate::Economy;

pub fn handler(economy: &mut Economy, ctx: &CallContext, new_owner: Address) -> Result<()> {
    economy.begin(EntryPoint::TransferOwnership)?;
    economy.require_owner(ctx, EntryPoint::TransferOwnership)?;
    if new_owner.is_zero() {
        return Err(EconomyError::InvalidAddress(new_owner.to_string()));
    }

    let previous_owner = economy.config.owner;
    economy.config.owner = new_owner;

    info!(%previous_owner, %new_owner, "ownership transferred");
    economy.commit(
        EntryPoint::TransferOwnership,
        vec![EconomyEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
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
    fn test_new_owner_takes_over() {
        let mut economy = economy();
        economy.transfer_ownership(&call(OWNER), OUTSIDER).unwrap();
        assert_eq!(economy.owner(), OUTSIDER);

        assert!(matches!(
            economy.set_platform_fee_bps(&call(OWNER), 50),
            Err(EconomyError::Unauthorized { .. })
        ));
        economy.set_platform_fee_bps(&call(OUTSIDER), 50).unwrap();
    }

    #[test]
    fn test_zero_owner_rejected() {
        let mut economy = economy();
        assert!(matches!(
            economy.transfer_ownership(&call(OWNER), Address::ZERO),
            Err(EconomyError::InvalidAddress(_))
        ));
        assert!(matches!(
            economy.transfer_ownership(&call(WORKER), WORKER),
            Err(EconomyError::Unauthorized { .. })
        ));
        assert_eq!(economy.owner(), OWNER);
    }
}
