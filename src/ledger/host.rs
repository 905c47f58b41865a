//! Host Call Context
//!
//! Everything the ledger consumes from its host for one entry-point call.

use serde::{Deserialize, Serialize};

use crate::core::word::Address;

/// Ledger position (block number).
pub type Position = u64;

/// Value attached to a call, in the host's smallest unit.
pub type Amount = u128;

/// Per-call inputs supplied by the host ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Identity of the caller.
    pub caller: Address,
    /// Value attached to the call.
    pub value: Amount,
    /// Current ledger position.
    pub block_number: Position,
}

impl CallContext {
    /// Create a context.
    pub const fn new(caller: Address, value: Amount, block_number: Position) -> Self {
        Self {
            caller,
            value,
            block_number,
        }
    }

    /// Context for a read-only call with no attached value.
    pub const fn view(caller: Address, block_number: Position) -> Self {
        Self::new(caller, 0, block_number)
    }
}
