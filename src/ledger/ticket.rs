//! Entropy Tickets
//!
//! A ticket is bought with a fee and resolves to the entropy accumulated at
//! the position right after the request. Status is never stored: it is
//! recomputed from the ticket's two positions and the current position on
//! every read.
//!
//! ```text
//! current:  request | request+1 (resolution) | ...  | expiry ..
//! status:   pending | pending                | fulfilled  | expired
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::word::{Address, Word};
use crate::ledger::commit_reveal::EntropySource;
use crate::ledger::host::{Amount, CallContext, Position};
use crate::{EXPIRY_OFFSET, MIN_REQUEST_FEE};

/// Sequential ticket identifier, starting at zero.
pub type TicketId = u64;

// =============================================================================
// TICKET
// =============================================================================

/// An issued ticket. Immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntropyTicket {
    /// Requester. Informational only.
    pub owner: Address,
    /// Position whose accumulator supplies the entropy.
    pub resolution_position: Position,
    /// First position at which the ticket has lapsed.
    pub expiry_position: Position,
}

impl EntropyTicket {
    /// Status at `current`, as a pure function of the stored positions.
    pub fn status_at(&self, current: Position) -> TicketStatus {
        ticket_status(current, self.resolution_position, self.expiry_position)
    }
}

/// Status of a ticket at a given position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TicketStatus {
    /// Resolution position not yet passed.
    Pending = 0,
    /// Entropy readable.
    Fulfilled = 1,
    /// Lapsed, permanently.
    Expired = 2,
    /// No ticket with this id.
    NotFound = 3,
}

impl TicketStatus {
    /// Numeric status code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse a numeric status code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Fulfilled),
            2 => Some(Self::Expired),
            3 => Some(Self::NotFound),
            _ => None,
        }
    }
}

/// Classify `current` against a ticket's resolution and expiry positions.
///
/// Pending while `current <= resolution`, expired once `current >= expiry`,
/// fulfilled in between.
pub fn ticket_status(current: Position, resolution: Position, expiry: Position) -> TicketStatus {
    if current >= expiry {
        TicketStatus::Expired
    } else if current <= resolution {
        TicketStatus::Pending
    } else {
        TicketStatus::Fulfilled
    }
}

/// Returned to the requester of a ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReceipt {
    /// Newly allocated id.
    pub ticket_id: TicketId,
    /// Position at which the ticket lapses.
    pub expiry_position: Position,
}

/// Result of reading a ticket's entropy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResolution {
    /// Status at the time of the read.
    pub status: TicketStatus,
    /// Entropy when fulfilled, zero otherwise.
    pub value: Word,
}

impl TicketResolution {
    /// Resolution carrying no value.
    pub fn empty(status: TicketStatus) -> Self {
        Self {
            status,
            value: Word::ZERO,
        }
    }
}

/// Stored ticket fields in the host's reporting shape.
///
/// `cached_value` and `flag` are always zero: the resolved value is never
/// stored on the ticket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketView {
    /// Requester (zero for unknown ids).
    pub owner: Address,
    /// Always zero.
    pub cached_value: Word,
    /// Resolution position (zero for unknown ids).
    pub resolution_position: Position,
    /// Reserved, always zero.
    pub flag: u64,
}

impl TicketView {
    /// Word tuple `(owner, 0, resolution, flag)`.
    pub fn to_words(&self) -> Vec<Word> {
        vec![
            Word::from(self.owner),
            self.cached_value,
            Word::from_u64(self.resolution_position),
            Word::from_u64(self.flag),
        ]
    }
}

// =============================================================================
// MANAGER
// =============================================================================

/// Issues tickets and resolves them against an [`EntropySource`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicketManager {
    tickets: Vec<EntropyTicket>,
    min_fee: Amount,
    expiry_offset: u64,
}

impl Default for TicketManager {
    fn default() -> Self {
        Self::new(MIN_REQUEST_FEE, EXPIRY_OFFSET)
    }
}

impl TicketManager {
    /// Create a manager with no tickets.
    pub fn new(min_fee: Amount, expiry_offset: u64) -> Self {
        Self {
            tickets: Vec::new(),
            min_fee,
            expiry_offset,
        }
    }

    /// Issue a ticket for the caller.
    ///
    /// Returns `None` without allocating an id when the fee is short or the
    /// resolution position would overflow.
    pub fn request<S: EntropySource>(
        &mut self,
        ctx: &CallContext,
        source: &mut S,
    ) -> Option<TicketReceipt> {
        if ctx.value < self.min_fee {
            debug!(fee = ctx.value, min = self.min_fee, "ticket rejected: fee too low");
            return None;
        }
        let Some(resolution_position) = ctx.block_number.checked_add(1) else {
            debug!(current = ctx.block_number, "ticket rejected: position overflow");
            return None;
        };
        let expiry_position = ctx.block_number.saturating_add(self.expiry_offset);

        let ticket_id = self.tickets.len() as TicketId;
        self.tickets.push(EntropyTicket {
            owner: ctx.caller,
            resolution_position,
            expiry_position,
        });
        source.register_pending_ticket(resolution_position);

        info!(
            ticket_id,
            owner = %ctx.caller,
            resolution_position,
            expiry_position,
            "entropy ticket issued"
        );
        Some(TicketReceipt {
            ticket_id,
            expiry_position,
        })
    }

    /// Look up a ticket.
    pub fn ticket(&self, ticket_id: TicketId) -> Option<&EntropyTicket> {
        usize::try_from(ticket_id)
            .ok()
            .and_then(|index| self.tickets.get(index))
    }

    /// Stored fields, or all zero for an unknown id.
    pub fn view(&self, ticket_id: TicketId) -> TicketView {
        self.ticket(ticket_id)
            .map(|ticket| TicketView {
                owner: ticket.owner,
                cached_value: Word::ZERO,
                resolution_position: ticket.resolution_position,
                flag: 0,
            })
            .unwrap_or_default()
    }

    /// Resolve a ticket at `current`.
    pub fn fetch<S: EntropySource>(
        &self,
        ticket_id: TicketId,
        current: Position,
        source: &S,
    ) -> TicketResolution {
        let Some(ticket) = self.ticket(ticket_id) else {
            debug!(ticket_id, "ticket lookup: not found");
            return TicketResolution::empty(TicketStatus::NotFound);
        };

        match ticket.status_at(current) {
            TicketStatus::Fulfilled => {
                let value = source.entropy_at(ticket.resolution_position);
                debug!(ticket_id, current, entropy = %value, "ticket fulfilled");
                TicketResolution {
                    status: TicketStatus::Fulfilled,
                    value,
                }
            }
            status => {
                debug!(ticket_id, current, ?status, "ticket not readable");
                TicketResolution::empty(status)
            }
        }
    }

    /// Number of tickets ever issued.
    pub fn issued(&self) -> usize {
        self.tickets.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
