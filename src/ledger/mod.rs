//! Ledger State Machines
//!
//! The commit-reveal ledger and the entropy ticket manager. Both converge on
//! the per-position aggregate, which the ledger owns. Tickets reach it only
//! through [`EntropySource`].

pub mod host;
pub mod commit_reveal;
pub mod ticket;
pub mod events;

pub use host::{Amount, CallContext, Position};
pub use commit_reveal::{
    CommitRecord, CommitRevealLedger, EntropySource, PositionAggregate, RevealStatus,
};
pub use ticket::{
    ticket_status, EntropyTicket, TicketId, TicketManager, TicketReceipt, TicketResolution,
    TicketStatus, TicketView,
};
pub use events::{LedgerEvent, LedgerEventData};
