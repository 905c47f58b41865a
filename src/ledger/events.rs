//! Ledger Events
//!
//! Log entries for successful state transitions, in the order they happened.
//! Rejections never produce an event.

use serde::{Deserialize, Serialize};

use crate::core::word::{Address, Word};
use crate::ledger::host::Position;
use crate::ledger::ticket::TicketId;

/// Event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEventData {
    /// A commitment was accepted.
    Committed {
        /// Position the commitment is bound to.
        target: Position,
        /// Committer identity.
        committer: Address,
        /// Committed digest.
        commit_hash: Word,
    },

    /// A secret was revealed and folded in.
    Revealed {
        /// Position the commitment was bound to.
        target: Position,
        /// Revealer identity.
        revealer: Address,
        /// Accumulator after the fold.
        entropy: Word,
    },

    /// A ticket was issued.
    TicketIssued {
        /// Allocated id.
        ticket_id: TicketId,
        /// Requester.
        owner: Address,
        /// Position supplying the entropy.
        resolution_position: Position,
        /// Position at which the ticket lapses.
        expiry_position: Position,
    },
}

/// An event stamped with the position at which it was emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Ledger position of the call.
    pub block_number: Position,
    /// What happened.
    pub data: LedgerEventData,
}

impl LedgerEvent {
    /// Create an event.
    pub fn new(block_number: Position, data: LedgerEventData) -> Self {
        Self { block_number, data }
    }
}
