//! Entry-Point Calls
//!
//! Typed calls and outcomes for the seven entry points, plus the adapters to
//! the host's numeric calling convention (selector + word arguments in,
//! word tuple out) and a compact binary encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::word::Word;
use crate::ledger::commit_reveal::{PositionAggregate, RevealStatus};
use crate::ledger::host::Position;
use crate::ledger::ticket::{TicketId, TicketReceipt, TicketResolution, TicketView};

// =============================================================================
// SELECTOR
// =============================================================================

/// Numeric entry-point selector used by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Selector {
    /// `request_entropy()` with attached fee.
    RequestEntropy = 0,
    /// `fetch_entropy(ticket_id)`.
    FetchEntropy = 1,
    /// `get_ticket(ticket_id)`.
    GetTicket = 2,
    /// `commit(target, hash)` with attached deposit.
    Commit = 3,
    /// `reveal(target, secret)`.
    Reveal = 4,
    /// `get_block_record(position)`.
    GetBlockRecord = 5,
    /// `hash(secret)`.
    Hash = 6,
}

impl Selector {
    /// Parse a selector byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::RequestEntropy),
            1 => Some(Self::FetchEntropy),
            2 => Some(Self::GetTicket),
            3 => Some(Self::Commit),
            4 => Some(Self::Reveal),
            5 => Some(Self::GetBlockRecord),
            6 => Some(Self::Hash),
            _ => None,
        }
    }

    /// Number of word arguments.
    pub fn arity(self) -> usize {
        match self {
            Self::RequestEntropy => 0,
            Self::FetchEntropy | Self::GetTicket | Self::GetBlockRecord | Self::Hash => 1,
            Self::Commit | Self::Reveal => 2,
        }
    }
}

/// Errors adapting host-convention calls.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No entry point with this selector.
    #[error("unknown selector {0}")]
    UnknownSelector(u8),

    /// Wrong number of word arguments.
    #[error("selector {selector:?} takes {expected} arguments, got {got}")]
    ArgumentCount {
        /// Selector called.
        selector: Selector,
        /// Required arguments.
        expected: usize,
        /// Supplied arguments.
        got: usize,
    },

    /// Binary call encoding failed.
    #[error("call encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

// =============================================================================
// CALL
// =============================================================================

/// A typed entry-point call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    /// Buy a ticket with the attached fee.
    RequestEntropy,
    /// Resolve a ticket.
    FetchEntropy {
        /// Ticket to resolve.
        ticket_id: TicketId,
    },
    /// Read a ticket's stored fields.
    GetTicket {
        /// Ticket to read.
        ticket_id: TicketId,
    },
    /// Commit to a secret for a future position.
    Commit {
        /// Position the commitment is bound to.
        target: Position,
        /// `commit_hash(secret)`.
        hash: Word,
    },
    /// Reveal a committed secret.
    Reveal {
        /// Position the commitment is bound to.
        target: Position,
        /// The preimage.
        secret: Word,
    },
    /// Read a position's aggregate.
    GetBlockRecord {
        /// Position to read.
        position: Position,
    },
    /// Compute a commitment digest.
    Hash {
        /// Value to hash.
        secret: Word,
    },
    /// A position or ticket-id argument wider than 64 bits.
    ///
    /// No such position is ever reached and no such ticket is ever issued,
    /// so the call resolves to the selector's empty answer.
    Unreachable {
        /// Selector called.
        selector: Selector,
    },
}

impl Call {
    /// Selector for this call.
    pub fn selector(&self) -> Selector {
        match self {
            Self::RequestEntropy => Selector::RequestEntropy,
            Self::FetchEntropy { .. } => Selector::FetchEntropy,
            Self::GetTicket { .. } => Selector::GetTicket,
            Self::Commit { .. } => Selector::Commit,
            Self::Reveal { .. } => Selector::Reveal,
            Self::GetBlockRecord { .. } => Selector::GetBlockRecord,
            Self::Hash { .. } => Selector::Hash,
            Self::Unreachable { selector } => *selector,
        }
    }

    /// Does this call leave state untouched?
    pub fn is_view(&self) -> bool {
        matches!(
            self,
            Self::FetchEntropy { .. }
                | Self::GetTicket { .. }
                | Self::GetBlockRecord { .. }
                | Self::Hash { .. }
                | Self::Unreachable { .. }
        )
    }

    /// Build a call from the host's numeric form.
    ///
    /// A position or ticket-id argument that does not fit in 64 bits yields
    /// [`Call::Unreachable`].
    pub fn from_selector(selector: u8, args: &[Word]) -> Result<Self, DispatchError> {
        let selector = Selector::from_u8(selector).ok_or(DispatchError::UnknownSelector(selector))?;
        if args.len() != selector.arity() {
            return Err(DispatchError::ArgumentCount {
                selector,
                expected: selector.arity(),
                got: args.len(),
            });
        }

        let first = args.first().copied().unwrap_or_default();
        let call = match (selector, first.to_u64()) {
            (Selector::RequestEntropy, _) => Self::RequestEntropy,
            (Selector::Hash, _) => Self::Hash { secret: first },
            (_, None) => Self::Unreachable { selector },
            (Selector::FetchEntropy, Some(ticket_id)) => Self::FetchEntropy { ticket_id },
            (Selector::GetTicket, Some(ticket_id)) => Self::GetTicket { ticket_id },
            (Selector::Commit, Some(target)) => Self::Commit {
                target,
                hash: args[1],
            },
            (Selector::Reveal, Some(target)) => Self::Reveal {
                target,
                secret: args[1],
            },
            (Selector::GetBlockRecord, Some(position)) => Self::GetBlockRecord { position },
        };
        Ok(call)
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of an entry-point call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Ticket issued.
    TicketIssued(TicketReceipt),
    /// Ticket request rejected.
    TicketRejected,
    /// Ticket resolution.
    Entropy(TicketResolution),
    /// Ticket fields.
    Ticket(TicketView),
    /// Commit accepted or rejected.
    Committed(bool),
    /// Reveal status.
    Revealed(RevealStatus),
    /// Position aggregate.
    BlockRecord(PositionAggregate),
    /// Commitment digest.
    Digest(Word),
}

impl Outcome {
    /// Word tuple in the host's return convention.
    pub fn to_words(&self) -> Vec<Word> {
        match self {
            Self::TicketIssued(receipt) => vec![
                Word::from_u64(receipt.ticket_id),
                Word::from_u64(receipt.expiry_position),
            ],
            Self::TicketRejected => vec![Word::ZERO],
            Self::Entropy(resolution) => vec![
                Word::from_u64(resolution.status.code() as u64),
                resolution.value,
            ],
            Self::Ticket(view) => view.to_words(),
            Self::Committed(accepted) => vec![Word::from(*accepted)],
            Self::Revealed(status) => vec![Word::from_u64(status.code() as u64)],
            Self::BlockRecord(aggregate) => aggregate.to_words(),
            Self::Digest(digest) => vec![*digest],
        }
    }
}

// =============================================================================
// BINARY ENCODING
// =============================================================================

/// Encode a call with bincode.
pub fn encode_call(call: &Call) -> Result<Vec<u8>, DispatchError> {
    Ok(bincode::serialize(call)?)
}

/// Decode a bincode call.
pub fn decode_call(bytes: &[u8]) -> Result<Call, DispatchError> {
    Ok(bincode::deserialize(bytes)?)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ticket::TicketStatus;

    #[test]
    fn test_selector_parsing() {
        for value in 0..=6u8 {
            let selector = Selector::from_u8(value).unwrap();
            assert_eq!(selector as u8, value);
        }
        assert!(Selector::from_u8(7).is_none());
    }

    #[test]
    fn test_from_selector_builds_typed_calls() {
        let call = Call::from_selector(3, &[Word::from_u64(1), Word::from_u64(99)]).unwrap();
        assert_eq!(
            call,
            Call::Commit {
                target: 1,
                hash: Word::from_u64(99)
            }
        );
        assert_eq!(call.selector(), Selector::Commit);

        assert_eq!(Call::from_selector(0, &[]).unwrap(), Call::RequestEntropy);
    }

    #[test]
    fn test_unknown_selector() {
        assert!(matches!(
            Call::from_selector(9, &[]),
            Err(DispatchError::UnknownSelector(9))
        ));
    }

    #[test]
    fn test_wrong_arity() {
        let err = Call::from_selector(4, &[Word::from_u64(1)]).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::ArgumentCount {
                selector: Selector::Reveal,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_wide_position_is_unreachable() {
        let huge = Word::from_u128(u128::MAX);
        for selector in 1..=5u8 {
            let mut args = vec![huge];
            if selector == 3 || selector == 4 {
                args.push(Word::from_u64(1));
            }
            let call = Call::from_selector(selector, &args).unwrap();
            assert_eq!(call.selector() as u8, selector);
            assert!(matches!(call, Call::Unreachable { .. }));
            assert!(call.is_view());
        }

        // Largest 64-bit value is still a real position.
        let max = Word::from_u64(u64::MAX);
        assert_eq!(
            Call::from_selector(5, &[max]).unwrap(),
            Call::GetBlockRecord { position: u64::MAX }
        );

        // Secrets and hashes are full words.
        assert_eq!(Call::from_selector(6, &[huge]).unwrap(), Call::Hash { secret: huge });
        assert!(matches!(
            Call::from_selector(3, &[Word::from_u64(1), huge]).unwrap(),
            Call::Commit { target: 1, .. }
        ));
    }

    #[test]
    fn test_view_classification() {
        assert!(!Call::RequestEntropy.is_view());
        assert!(Call::FetchEntropy { ticket_id: 0 }.is_view());
        assert!(Call::Hash { secret: Word::ZERO }.is_view());
        assert!(!Call::Reveal {
            target: 1,
            secret: Word::ZERO
        }
        .is_view());
    }

    #[test]
    fn test_outcome_words() {
        assert_eq!(Outcome::TicketRejected.to_words(), vec![Word::ZERO]);
        assert_eq!(
            Outcome::TicketIssued(TicketReceipt {
                ticket_id: 2,
                expiry_position: 4
            })
            .to_words(),
            vec![Word::from_u64(2), Word::from_u64(4)]
        );
        assert_eq!(
            Outcome::Entropy(TicketResolution {
                status: TicketStatus::NotFound,
                value: Word::ZERO
            })
            .to_words(),
            vec![Word::from_u64(3), Word::ZERO]
        );
        assert_eq!(Outcome::Committed(true).to_words(), vec![Word::from_u64(1)]);
        assert_eq!(
            Outcome::Revealed(RevealStatus::AlreadyRevealed).to_words(),
            vec![Word::from_u64(93)]
        );
    }

    #[test]
    fn test_binary_encoding() {
        let call = Call::Reveal {
            target: 12,
            secret: Word::from_u64(0xC0FFEE),
        };
        let bytes = encode_call(&call).unwrap();
        assert_eq!(decode_call(&bytes).unwrap(), call);

        assert!(matches!(decode_call(&[0xFF]), Err(DispatchError::Encoding(_))));
    }

    #[test]
    fn test_json_encoding() {
        let call = Call::GetBlockRecord { position: 3 };
        let json = serde_json::to_string(&call).unwrap();
        assert_eq!(json, r#"{"get_block_record":{"position":3}}"#);
    }
}
