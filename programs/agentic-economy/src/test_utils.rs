//! Shared fixtures for handler tests

use crate::instructions::constants::{DEFAULT_MIN_STAKE, WEI_PER_ETHER};
use crate::state::{Address, Category, ContractVersion, ProtocolConfig, ADDRESS_LEN};
use crate::{Balances, CallContext, Economy};

pub const OWNER: Address = Address([0x01; ADDRESS_LEN]);
pub const EMPLOYER: Address = Address([0x0e; ADDRESS_LEN]);
pub const WORKER: Address = Address([0x0a; ADDRESS_LEN]);
pub const OUTSIDER: Address = Address([0x0f; ADDRESS_LEN]);

pub const T0: i64 = 1_700_000_000;
pub const ETHER: u128 = WEI_PER_ETHER;
pub const BUDGET: u128 = ETHER / 100;
pub const TIMEOUT: u64 = 120;

pub fn economy() -> Economy {
    Economy::new(ProtocolConfig::new(OWNER)).unwrap()
}

pub fn economy_v1() -> Economy {
    Economy::new(ProtocolConfig::new(OWNER).with_version(ContractVersion::V1)).unwrap()
}

pub fn call(caller: Address) -> CallContext {
    CallContext::new(caller, T0)
}

pub fn at(caller: Address, now: i64) -> CallContext {
    CallContext::new(caller, now)
}

pub fn agent(id: u8) -> Address {
    Address::new([id; ADDRESS_LEN])
}

/// Categorized registration with exactly the minimum stake
pub fn register(economy: &mut Economy, address: Address, category: Category, base_fee: u128) {
    economy
        .register_agent_v2(
            &call(address).with_value(DEFAULT_MIN_STAKE),
            "Agent",
            "testing",
            category,
            base_fee,
        )
        .unwrap();
}

/// EMPLOYER (research) hires WORKER (development, no fee) directly
pub fn open_job(economy: &mut Economy, budget: u128) -> u64 {
    if !economy.is_registered(&EMPLOYER) {
        register(economy, EMPLOYER, Category::Research, 0);
    }
    if !economy.is_registered(&WORKER) {
        register(economy, WORKER, Category::Development, 0);
    }
    economy
        .create_job(&call(EMPLOYER).with_value(budget), WORKER, TIMEOUT)
        .unwrap()
}

pub fn submitted_job(economy: &mut Economy, budget: u128) -> u64 {
    let job_id = open_job(economy, budget);
    economy.accept_job(&call(WORKER), job_id).unwrap();
    economy
        .submit_work(&call(WORKER), job_id, "ipfs://delivery")
        .unwrap();
    job_id
}

pub fn resolved_job(economy: &mut Economy, budget: u128, balances: &mut Balances) -> u64 {
    let job_id = submitted_job(economy, budget);
    economy
        .release_payment(&call(EMPLOYER), job_id, balances)
        .unwrap();
    job_id
}
