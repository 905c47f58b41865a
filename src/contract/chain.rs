//! Simulated Host Chain
//!
//! A minimal stand-in for the host ledger: a block counter, caller
//! identities and attached value. Used by the demo binary and the scenario
//! tests.

use tracing::debug;

use crate::config::{ConfigError, EntropyConfig};
use crate::contract::dispatch::{Call, DispatchError, Outcome};
use crate::contract::EntropyContract;
use crate::core::word::{Address, Word};
use crate::ledger::host::{Amount, CallContext, Position};

/// Contract deployed on a simulated chain.
#[derive(Clone, Debug, Default)]
pub struct SimulatedChain {
    contract: EntropyContract,
    block_number: Position,
}

impl SimulatedChain {
    /// Fresh chain at block zero.
    pub fn new(config: EntropyConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            contract: EntropyContract::new(config)?,
            block_number: 0,
        })
    }

    /// Current block number.
    pub fn block_number(&self) -> Position {
        self.block_number
    }

    /// Advance the chain by `blocks`.
    pub fn mine(&mut self, blocks: u64) {
        self.block_number = self.block_number.saturating_add(blocks);
        debug!(block = self.block_number, "mined {} block(s)", blocks);
    }

    /// Send a typed call from `caller` with `value` attached.
    pub fn send(&mut self, caller: Address, value: Amount, call: Call) -> Outcome {
        let ctx = CallContext::new(caller, value, self.block_number);
        self.contract.dispatch(&ctx, call)
    }

    /// Send a call in the host's numeric form and return the word tuple.
    pub fn send_selector(
        &mut self,
        caller: Address,
        value: Amount,
        selector: u8,
        args: &[Word],
    ) -> Result<Vec<Word>, DispatchError> {
        let call = Call::from_selector(selector, args)?;
        Ok(self.send(caller, value, call).to_words())
    }

    /// The deployed contract.
    pub fn contract(&self) -> &EntropyContract {
        &self.contract
    }

    /// Mutable access to the deployed contract.
    pub fn contract_mut(&mut self) -> &mut EntropyContract {
        &mut self.contract
    }
}

// =============================================================================
// TESTS
// =============================================================================
