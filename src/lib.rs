//! # Commit-Reveal Entropy Ledger
//!
//! Randomness for a block-ordered ledger. Participants commit to a secret for
//! a future block, reveal it once that block has passed, and the ledger folds
//! every revealed secret into a per-block entropy accumulator. Separately, a
//! fee buys an entropy ticket that resolves to the accumulator of the next
//! block and lapses a few blocks later.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 COMMIT-REVEAL ENTROPY                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── word.rs     - 256-bit big-endian words, addresses      │
//! │  └── hash.rs     - Keccak-256 commitments, entropy chaining │
//! │                                                             │
//! │  ledger/         - State machines                           │
//! │  ├── host.rs     - Per-call context from the host           │
//! │  ├── commit_reveal.rs - Commitments + per-block aggregates  │
//! │  ├── ticket.rs   - Entropy tickets (computed status)        │
//! │  └── events.rs   - Event log entries                        │
//! │                                                             │
//! │  contract/       - Entry points                             │
//! │  ├── mod.rs      - Combined contract, event log             │
//! │  ├── dispatch.rs - Typed calls, selector adapter, encoding  │
//! │  └── chain.rs    - Simulated host chain                     │
//! │                                                             │
//! │  config.rs       - Thresholds and windows                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Every transition is a pure function of the current block number, the
//! stored state and the call arguments:
//! - BTreeMap storage for sorted iteration
//! - No system time, no background work
//! - Ticket status recomputed on every read, never cached
//!
//! ## Example
//!
//! ```
//! use commit_reveal_entropy::{Address, Call, Outcome, SimulatedChain, Word};
//! use commit_reveal_entropy::{commit_hash_word, MIN_COMMIT_DEPOSIT};
//!
//! let mut chain = SimulatedChain::default();
//! let alice = Address::new([1; 20]);
//! let secret = Word::from_u64(42);
//!
//! let call = Call::Commit { target: 1, hash: commit_hash_word(&secret) };
//! assert_eq!(chain.send(alice, MIN_COMMIT_DEPOSIT, call), Outcome::Committed(true));
//!
//! chain.mine(2);
//! let outcome = chain.send(alice, 0, Call::Reveal { target: 1, secret });
//! assert_eq!(outcome.to_words(), vec![Word::from_u64(1)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod contract;
pub mod core;
pub mod ledger;

// Re-export commonly used types
pub use config::{ConfigError, EntropyConfig};
pub use contract::{Call, DispatchError, EntropyContract, Outcome, Selector, SimulatedChain};
pub use crate::core::hash::{commit_hash, commit_hash_word};
pub use crate::core::word::{Address, Word};
pub use ledger::{
    CallContext, PositionAggregate, RevealStatus, TicketId, TicketReceipt, TicketResolution,
    TicketStatus, TicketView,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Blocks after the target during which a reveal is accepted.
pub const REVEAL_WINDOW: u64 = 3;

/// Ticket expiry, in blocks after the request.
pub const EXPIRY_OFFSET: u64 = 4;

/// Minimum deposit for a commitment (10^18).
pub const MIN_COMMIT_DEPOSIT: u128 = 1_000_000_000_000_000_000;

/// Minimum fee for an entropy ticket (10^15).
pub const MIN_REQUEST_FEE: u128 = 1_000_000_000_000_000;
