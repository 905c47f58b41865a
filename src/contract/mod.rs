//! Entropy Contract
//!
//! The combined entry-point surface: the commit-reveal ledger and the ticket
//! manager behind one `&mut self`, so every call is an atomic, serialized
//! state transition.

pub mod dispatch;
pub mod chain;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{ConfigError, EntropyConfig};
use crate::core::hash::commit_hash_word;
use crate::core::word::Word;
use crate::ledger::commit_reveal::{CommitRevealLedger, PositionAggregate, RevealStatus};
use crate::ledger::events::{LedgerEvent, LedgerEventData};
use crate::ledger::host::{CallContext, Position};
use crate::ledger::ticket::{
    TicketId, TicketManager, TicketReceipt, TicketResolution, TicketStatus, TicketView,
};

pub use dispatch::{decode_call, encode_call, Call, DispatchError, Outcome, Selector};
pub use chain::SimulatedChain;

/// Commit-reveal ledger plus entropy tickets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntropyContract {
    config: EntropyConfig,
    ledger: CommitRevealLedger,
    tickets: TicketManager,
    events: Vec<LedgerEvent>,
}

impl Default for EntropyContract {
    fn default() -> Self {
        Self::with_config(EntropyConfig::default())
    }
}

impl EntropyContract {
    /// Create an empty contract, rejecting an invalid configuration.
    pub fn new(config: EntropyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: EntropyConfig) -> Self {
        Self {
            config,
            ledger: CommitRevealLedger::new(config.min_commit_deposit, config.reveal_window),
            tickets: TicketManager::new(config.min_request_fee, config.expiry_offset),
            events: Vec::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EntropyConfig {
        &self.config
    }

    /// Execute one typed call.
    pub fn dispatch(&mut self, ctx: &CallContext, call: Call) -> Outcome {
        if call.is_view() {
            trace!(selector = ?call.selector(), block = ctx.block_number, "view");
        } else {
            debug!(selector = ?call.selector(), caller = %ctx.caller, block = ctx.block_number, "dispatch");
        }
        match call {
            Call::RequestEntropy => match self.request_entropy(ctx) {
                Some(receipt) => Outcome::TicketIssued(receipt),
                None => Outcome::TicketRejected,
            },
            Call::FetchEntropy { ticket_id } => {
                Outcome::Entropy(self.fetch_entropy(ticket_id, ctx.block_number))
            }
            Call::GetTicket { ticket_id } => Outcome::Ticket(self.get_ticket(ticket_id)),
            Call::Commit { target, hash } => Outcome::Committed(self.commit(ctx, target, hash)),
            Call::Reveal { target, secret } => Outcome::Revealed(self.reveal(ctx, target, secret)),
            Call::GetBlockRecord { position } => Outcome::BlockRecord(self.block_record(position)),
            Call::Hash { secret } => Outcome::Digest(Self::hash(&secret)),
            Call::Unreachable { selector } => Self::unreachable(selector),
        }
    }

    /// Answer for a position or ticket id beyond 64 bits: nothing was ever
    /// stored there.
    fn unreachable(selector: Selector) -> Outcome {
        debug!(?selector, "argument beyond any reachable position");
        match selector {
            Selector::FetchEntropy => {
                Outcome::Entropy(TicketResolution::empty(TicketStatus::NotFound))
            }
            Selector::GetTicket => Outcome::Ticket(TicketView::default()),
            Selector::Commit => Outcome::Committed(false),
            Selector::Reveal => Outcome::Revealed(RevealStatus::NotCommitted),
            Selector::GetBlockRecord => Outcome::BlockRecord(PositionAggregate::default()),
            Selector::RequestEntropy => Outcome::TicketRejected,
            Selector::Hash => Outcome::Digest(Word::ZERO),
        }
    }

    /// Buy an entropy ticket with the attached fee.
    pub fn request_entropy(&mut self, ctx: &CallContext) -> Option<TicketReceipt> {
        let receipt = self.tickets.request(ctx, &mut self.ledger)?;
        if let Some(ticket) = self.tickets.ticket(receipt.ticket_id) {
            self.events.push(LedgerEvent::new(
                ctx.block_number,
                LedgerEventData::TicketIssued {
                    ticket_id: receipt.ticket_id,
                    owner: ticket.owner,
                    resolution_position: ticket.resolution_position,
                    expiry_position: ticket.expiry_position,
                },
            ));
        }
        Some(receipt)
    }

    /// Resolve a ticket at `current`.
    pub fn fetch_entropy(&self, ticket_id: TicketId, current: Position) -> TicketResolution {
        self.tickets.fetch(ticket_id, current, &self.ledger)
    }

    /// Stored ticket fields (all zero for an unknown id).
    pub fn get_ticket(&self, ticket_id: TicketId) -> TicketView {
        self.tickets.view(ticket_id)
    }

    /// Commit to a secret for a future position.
    pub fn commit(&mut self, ctx: &CallContext, target: Position, hash: Word) -> bool {
        let accepted = self.ledger.commit(ctx, target, hash);
        if accepted {
            self.events.push(LedgerEvent::new(
                ctx.block_number,
                LedgerEventData::Committed {
                    target,
                    committer: ctx.caller,
                    commit_hash: hash,
                },
            ));
        }
        accepted
    }

    /// Reveal a committed secret.
    pub fn reveal(&mut self, ctx: &CallContext, target: Position, secret: Word) -> RevealStatus {
        let status = self.ledger.reveal(ctx, target, secret);
        if status.is_success() {
            self.events.push(LedgerEvent::new(
                ctx.block_number,
                LedgerEventData::Revealed {
                    target,
                    revealer: ctx.caller,
                    entropy: self.ledger.block_record(target).entropy,
                },
            ));
        }
        status
    }

    /// Aggregate for a position.
    pub fn block_record(&self, position: Position) -> PositionAggregate {
        self.ledger.block_record(position)
    }

    /// Commitment digest of a secret.
    pub fn hash(secret: &Word) -> Word {
        commit_hash_word(secret)
    }

    /// Read-only access to the commit-reveal ledger.
    pub fn ledger(&self) -> &CommitRevealLedger {
        &self.ledger
    }

    /// Read-only access to the ticket manager.
    pub fn tickets(&self) -> &TicketManager {
        &self.tickets
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take all events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::word::Address;
    use crate::{MIN_COMMIT_DEPOSIT, MIN_REQUEST_FEE};

    const ALICE: Address = Address::new([0xA1; 20]);

    #[test]
    fn test_events_only_for_successes() {
        let mut contract = EntropyContract::default();
        let secret = Word::from_u64(5);

        // Rejections.
        contract.request_entropy(&CallContext::new(ALICE, 0, 0));
        contract.commit(&CallContext::new(ALICE, 0, 0), 1, EntropyContract::hash(&secret));
        contract.reveal(&CallContext::view(ALICE, 2), 1, secret);
        assert!(contract.events().is_empty());

        // Successes.
        contract.request_entropy(&CallContext::new(ALICE, MIN_REQUEST_FEE, 0));
        contract.commit(
            &CallContext::new(ALICE, MIN_COMMIT_DEPOSIT, 0),
            1,
            EntropyContract::hash(&secret),
        );
        contract.reveal(&CallContext::view(ALICE, 2), 1, secret);

        let events = contract.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0].data,
            LedgerEventData::TicketIssued { ticket_id: 0, resolution_position: 1, expiry_position: 4, .. }
        ));
        assert!(matches!(events[1].data, LedgerEventData::Committed { target: 1, .. }));
        match &events[2].data {
            LedgerEventData::Revealed { entropy, .. } => {
                assert_eq!(*entropy, contract.block_record(1).entropy);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(events[2].block_number, 2);
        assert!(contract.events().is_empty());
    }

    #[test]
    fn test_ticket_resolves_to_revealed_entropy() {
        let mut contract = EntropyContract::default();
        let secret = Word::from_u64(77);

        contract.request_entropy(&CallContext::new(ALICE, MIN_REQUEST_FEE, 0));
        contract.commit(
            &CallContext::new(ALICE, MIN_COMMIT_DEPOSIT, 0),
            1,
            EntropyContract::hash(&secret),
        );
        assert_eq!(contract.reveal(&CallContext::view(ALICE, 2), 1, secret), RevealStatus::Revealed);

        let resolution = contract.fetch_entropy(0, 2);
        assert_eq!(resolution.status, TicketStatus::Fulfilled);
        assert_eq!(resolution.value, contract.block_record(1).entropy);
        assert!(!resolution.value.is_zero());

        let record = contract.block_record(1);
        assert_eq!(record.commit_count, 1);
        assert_eq!(record.reveal_count, 1);
        assert_eq!(record.pending_ticket_count, 1);
    }

    #[test]
    fn test_custom_config_applies() {
        let config = EntropyConfig {
            min_commit_deposit: 1,
            min_request_fee: 1,
            reveal_window: 10,
            expiry_offset: 20,
        };
        let mut contract = EntropyContract::new(config).unwrap();
        let secret = Word::from_u64(1);

        let receipt = contract.request_entropy(&CallContext::new(ALICE, 1, 5)).unwrap();
        assert_eq!(receipt.expiry_position, 25);

        assert!(contract.commit(&CallContext::new(ALICE, 1, 0), 1, EntropyContract::hash(&secret)));
        assert_eq!(contract.reveal(&CallContext::view(ALICE, 11), 1, secret), RevealStatus::Revealed);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let zero_window = EntropyConfig {
            reveal_window: 0,
            ..EntropyConfig::default()
        };
        assert!(matches!(
            EntropyContract::new(zero_window),
            Err(ConfigError::EmptyRevealWindow)
        ));

        let instant_expiry = EntropyConfig {
            expiry_offset: 0,
            ..EntropyConfig::default()
        };
        assert!(matches!(
            EntropyContract::new(instant_expiry),
            Err(ConfigError::ExpiryTooShort(0))
        ));
    }

    #[test]
    fn test_state_serializes() {
        let mut contract = EntropyContract::default();
        contract.request_entropy(&CallContext::new(ALICE, MIN_REQUEST_FEE, 0));
        contract.commit(
            &CallContext::new(ALICE, MIN_COMMIT_DEPOSIT, 0),
            1,
            EntropyContract::hash(&Word::from_u64(3)),
        );

        let bytes = bincode::serialize(&contract).unwrap();
        let restored: EntropyContract = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.get_ticket(0), contract.get_ticket(0));
        assert_eq!(restored.block_record(1), contract.block_record(1));
        assert_eq!(restored.ledger().commit_record(1, &ALICE), contract.ledger().commit_record(1, &ALICE));
        assert_eq!(restored.events(), contract.events());
    }
}
