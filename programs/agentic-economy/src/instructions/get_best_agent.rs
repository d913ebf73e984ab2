//! Read-only best-agent lookup

use crate::errors::Result;
use crate::instructions::selection_helpers::RankingEntry;
use crate::state::Category;
use crate::utils::version::{check_entry_point_available, EntryPoint};
use crate::Economy;

/// `None` means nobody in `category` is affordable; views never force a pick.
pub fn handler(
    economy: &Economy,
    category: Category,
    budget: u128,
) -> Result<Option<RankingEntry>> {
    check_entry_point_available(economy.config.version, EntryPoint::GetBestAgent)?;
    Ok(economy.select_candidates(category, budget).into_best())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EconomyError;
    use crate::test_utils::*;

    #[test]
    fn test_best_agent_and_empty_result() {
        let mut economy = economy();
        register(&mut economy, agent(0x41), Category::ContentGen, 500);
        register(&mut economy, agent(0x42), Category::ContentGen, 300);

        // Equal reputation, lower fee wins
        let best = economy.get_best_agent(Category::ContentGen, 1_000).unwrap().unwrap();
        assert_eq!(best.address, agent(0x42));
        assert_eq!(economy.get_best_agent(Category::ContentGen, 299).unwrap(), None);
        assert_eq!(economy.get_best_agent(Category::DataMining, u128::MAX).unwrap(), None);
    }

    #[test]
    fn test_view_works_during_transfer() {
        let mut economy = economy();
        register(&mut economy, agent(0x41), Category::ContentGen, 500);
        economy.transfer_in_flight = true;
        assert!(economy.get_best_agent(Category::ContentGen, 500).unwrap().is_some());
    }

    #[test]
    fn test_unavailable_on_v1() {
        let economy = economy_v1();
        assert!(matches!(
            economy.get_best_agent(Category::Research, 1),
            Err(EconomyError::UnsupportedEntryPoint { .. })
        ));
    }
}
