//! Update the platform fee (owner only)

use tracing::info;

use crate::context::CallContext;
use crate::errors::Result;
use crate::events::EconomyEvent;
use crate::instructions::settlement_helpers::validate_fee_bps;
use crate::utils::version::EntryPoint;
use crate::Economy;

/// Applies to payments released after the call; jobs already open keep no
/// snapshot of the old rate.
pub fn handler(economy: &mut Economy, ctx: &CallContext, fee_bps: u16) -> Result<()> {
    economy.begin(EntryPoint::SetPlatformFeeBps)?;
    economy.require_owner(ctx, EntryPoint::SetPlatformFeeBps)?;
    validate_fee_bps(fee_bps)?;

    let old_fee_bps = economy.config.platform_fee_bps;
    economy.config.platform_fee_bps = fee_bps;

    info!(old_fee_bps, new_fee_bps = fee_bps, "platform fee updated");
    economy.commit(
        EntryPoint::SetPlatformFeeBps,
        vec![EconomyEvent::PlatformFeeUpdated {
            old_fee_bps,
            new_fee_bps: fee_bps,
            updated_by: ctx.caller,
            timestamp: ctx.now,
        }],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EconomyError;
    use crate::instructions::constants::MAX_PLATFORM_FEE_BPS;
    use crate::instructions::value_transfer::Balances;
    use crate::test_utils::*;

    #[test]
    fn test_fee_cap() {
        let mut economy = economy();
        economy.set_platform_fee_bps(&call(OWNER), MAX_PLATFORM_FEE_BPS).unwrap();
        assert_eq!(economy.platform_fee_bps(), 1000);
        assert!(matches!(
            economy.set_platform_fee_bps(&call(OWNER), 1001),
            Err(EconomyError::OutOfRange { field: "platform_fee_bps", value: 1001, .. })
        ));
        assert_eq!(economy.platform_fee_bps(), 1000);
    }

    #[test]
    fn test_owner_only() {
        let mut economy = economy();
        assert_eq!(
            economy.set_platform_fee_bps(&call(OUTSIDER), 0),
            Err(EconomyError::Unauthorized {
                caller: OUTSIDER,
                entry_point: EntryPoint::SetPlatformFeeBps,
            })
        );
    }

    #[test]
    fn test_new_fee_applies_to_later_release() {
        let mut economy = economy();
        let mut balances = Balances::new();
        let job_id = submitted_job(&mut economy, 10_000);
        economy.set_platform_fee_bps(&call(OWNER), 0).unwrap();
        let settlement = economy
            .release_payment(&call(EMPLOYER), job_id, &mut balances)
            .unwrap();
        assert_eq!(settlement.fee, 0);
        assert_eq!(settlement.payout, 10_000);
    }
}
