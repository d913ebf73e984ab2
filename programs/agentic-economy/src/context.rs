//! Per-call execution context

use crate::state::Address;

/// Who is calling, what value is attached and the current unix time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    /// Wei attached to the call
    pub value: u128,
    pub now: i64,
}

impl CallContext {
    pub fn new(caller: Address, now: i64) -> Self {
        Self {
            caller,
            value: 0,
            now,
        }
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }
}
