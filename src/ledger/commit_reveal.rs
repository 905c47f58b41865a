//! Commit-Reveal Ledger
//!
//! Participants commit to `keccak256(pad32(secret))` for a future position,
//! then reveal the secret once that position has passed. Revealed secrets are
//! chained into the position's entropy accumulator.
//!
//! ```text
//! position:   ..  target-1 | target | target+1 .. target+W | target+W+1 ..
//! commit:        accepted  |   -    |        rejected (not future)
//! reveal:        90 (early)| 90     |   accepted            | 91 (expired)
//! ```
//!
//! `W` is the configured reveal window.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::hash::{commit_hash_word, fold_entropy};
use crate::core::word::{Address, Word};
use crate::ledger::host::{Amount, CallContext, Position};
use crate::{MIN_COMMIT_DEPOSIT, REVEAL_WINDOW};

// =============================================================================
// RECORDS
// =============================================================================

/// One participant's commitment for one target position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Committed digest. Never zero.
    pub commit_hash: Word,
    /// Set once by a successful reveal.
    pub revealed: bool,
}

/// Aggregate state for one ledger position.
///
/// Positions never written read as the all-zero default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAggregate {
    /// Hash chain over every secret revealed for this position.
    pub entropy: Word,
    /// Distinct committers.
    pub commit_count: u64,
    /// Successful reveals. Never exceeds `commit_count`.
    pub reveal_count: u64,
    /// Tickets issued that resolve at this position.
    pub pending_ticket_count: u64,
}

impl PositionAggregate {
    /// Word tuple `(entropy, commits, reveals, pending)`.
    pub fn to_words(&self) -> Vec<Word> {
        vec![
            self.entropy,
            Word::from_u64(self.commit_count),
            Word::from_u64(self.reveal_count),
            Word::from_u64(self.pending_ticket_count),
        ]
    }
}

// =============================================================================
// REVEAL STATUS
// =============================================================================

/// Outcome of a reveal, with stable caller-visible codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RevealStatus {
    /// Secret accepted and folded into the accumulator.
    Revealed = 1,
    /// Target position not yet passed.
    TooEarly = 90,
    /// Reveal window already closed.
    WindowExpired = 91,
    /// Caller has no commitment for this target.
    NotCommitted = 92,
    /// Commitment already revealed.
    AlreadyRevealed = 93,
    /// Secret does not hash to the commitment.
    HashMismatch = 94,
}

impl RevealStatus {
    /// Numeric status code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse a numeric status code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Revealed),
            90 => Some(Self::TooEarly),
            91 => Some(Self::WindowExpired),
            92 => Some(Self::NotCommitted),
            93 => Some(Self::AlreadyRevealed),
            94 => Some(Self::HashMismatch),
            _ => None,
        }
    }

    /// Did the reveal succeed?
    #[inline]
    pub fn is_success(self) -> bool {
        self == Self::Revealed
    }
}

// =============================================================================
// ENTROPY SOURCE
// =============================================================================

/// The slice of the ledger the ticket manager is allowed to touch.
///
/// Reads entropy, and bumps the pending-ticket counter when a ticket is
/// issued. Commit and reveal counters stay out of reach.
pub trait EntropySource {
    /// Current accumulator for a position (zero if nothing revealed).
    fn entropy_at(&self, position: Position) -> Word;

    /// Record a newly issued ticket resolving at `position`.
    fn register_pending_ticket(&mut self, position: Position);
}

// =============================================================================
// LEDGER
// =============================================================================

/// Per-(target, sender) commitments and per-position aggregates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitRevealLedger {
    commits: BTreeMap<(Position, Address), CommitRecord>,
    aggregates: BTreeMap<Position, PositionAggregate>,
    min_deposit: Amount,
    reveal_window: u64,
}

impl Default for CommitRevealLedger {
    fn default() -> Self {
        Self::new(MIN_COMMIT_DEPOSIT, REVEAL_WINDOW)
    }
}

impl CommitRevealLedger {
    /// Create an empty ledger.
    pub fn new(min_deposit: Amount, reveal_window: u64) -> Self {
        Self {
            commits: BTreeMap::new(),
            aggregates: BTreeMap::new(),
            min_deposit,
            reveal_window,
        }
    }

    /// Commit to a secret for a future `target`.
    ///
    /// Returns `false` without touching state when the target is not in the
    /// future, the hash is zero, the deposit is short, or the caller already
    /// committed for this target.
    pub fn commit(&mut self, ctx: &CallContext, target: Position, hash: Word) -> bool {
        if target == 0 || target <= ctx.block_number {
            debug!(position = target, current = ctx.block_number, "commit rejected: target not in future");
            return false;
        }
        if hash.is_zero() {
            debug!(position = target, "commit rejected: zero hash");
            return false;
        }
        if ctx.value < self.min_deposit {
            debug!(position = target, deposit = ctx.value, min = self.min_deposit, "commit rejected: deposit too low");
            return false;
        }

        let key = (target, ctx.caller);
        if self.commits.contains_key(&key) {
            debug!(position = target, caller = %ctx.caller, "commit rejected: already committed");
            return false;
        }

        self.commits.insert(
            key,
            CommitRecord {
                commit_hash: hash,
                revealed: false,
            },
        );
        let aggregate = self.aggregates.entry(target).or_default();
        aggregate.commit_count += 1;

        info!(
            position = target,
            caller = %ctx.caller,
            commits = aggregate.commit_count,
            "commitment accepted"
        );
        true
    }

    /// Reveal the secret behind an earlier commitment.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// not committed, too early, window expired, already revealed, mismatch.
    pub fn reveal(&mut self, ctx: &CallContext, target: Position, secret: Word) -> RevealStatus {
        let current = ctx.block_number;
        let window_end = target.saturating_add(self.reveal_window);

        let Some(record) = self.commits.get_mut(&(target, ctx.caller)) else {
            debug!(position = target, caller = %ctx.caller, "reveal rejected: no commitment");
            return RevealStatus::NotCommitted;
        };
        if current <= target {
            debug!(position = target, current, "reveal rejected: too early");
            return RevealStatus::TooEarly;
        }
        if current > window_end {
            debug!(position = target, current, window_end, "reveal rejected: window expired");
            return RevealStatus::WindowExpired;
        }
        if record.revealed {
            debug!(position = target, caller = %ctx.caller, "reveal rejected: already revealed");
            return RevealStatus::AlreadyRevealed;
        }
        if commit_hash_word(&secret) != record.commit_hash {
            debug!(position = target, caller = %ctx.caller, "reveal rejected: hash mismatch");
            return RevealStatus::HashMismatch;
        }

        record.revealed = true;
        let aggregate = self.aggregates.entry(target).or_default();
        aggregate.reveal_count += 1;
        aggregate.entropy = fold_entropy(&aggregate.entropy, &secret);

        info!(
            position = target,
            caller = %ctx.caller,
            reveals = aggregate.reveal_count,
            entropy = %aggregate.entropy,
            "secret revealed"
        );
        RevealStatus::Revealed
    }

    /// Aggregate for a position (all zero if never written).
    pub fn block_record(&self, position: Position) -> PositionAggregate {
        self.aggregates.get(&position).copied().unwrap_or_default()
    }

    /// Commitment of `committer` for `target`, if any.
    pub fn commit_record(&self, target: Position, committer: &Address) -> Option<&CommitRecord> {
        self.commits.get(&(target, *committer))
    }

    /// Number of positions with any recorded activity.
    pub fn active_positions(&self) -> usize {
        self.aggregates.len()
    }
}

impl EntropySource for CommitRevealLedger {
    fn entropy_at(&self, position: Position) -> Word {
        self.aggregates
            .get(&position)
            .map(|aggregate| aggregate.entropy)
            .unwrap_or_default()
    }

    fn register_pending_ticket(&mut self, position: Position) {
        let aggregate = self.aggregates.entry(position).or_default();
        aggregate.pending_ticket_count = aggregate.pending_ticket_count.saturating_add(1);
    }
}

// =============================================================================
// TESTS
// =============================================================================
