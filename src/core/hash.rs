//! Commitment Hashing
//!
//! Canonical hashing for the commit-reveal ledger:
//! - Commitment digests (secret left-padded to one word, then Keccak-256)
//! - Entropy accumulator chaining
//!
//! Keccak-256 here is the original Keccak padding (the Ethereum `sha3`),
//! not NIST SHA3-256. Digests must be bit-exact with the host ledger.

use sha3::{Digest, Keccak256};

use super::word::Word;

/// Incremental Keccak-256 hasher producing a [`Word`].
///
/// Order of updates is significant.
pub struct WordHasher {
    hasher: Keccak256,
}

impl WordHasher {
    /// Create an empty hasher.
    pub fn new() -> Self {
        Self {
            hasher: Keccak256::new(),
        }
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a full 32-byte word.
    #[inline]
    pub fn update_word(&mut self, word: &Word) {
        self.hasher.update(word.as_bytes());
    }

    /// Finalize and return the digest as a word.
    pub fn finalize(self) -> Word {
        Word::from_be_bytes(self.hasher.finalize().into())
    }
}

impl Default for WordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Keccak-256 of arbitrary data.
pub fn keccak256(data: &[u8]) -> Word {
    let mut hasher = WordHasher::new();
    hasher.update_bytes(data);
    hasher.finalize()
}

/// Commitment digest of a secret given as raw bytes.
///
/// Secrets shorter than a word are zero-padded on the left. Longer inputs
/// are hashed unchanged.
pub fn commit_hash(secret: &[u8]) -> Word {
    match Word::from_be_slice(secret) {
        Some(padded) => commit_hash_word(&padded),
        None => keccak256(secret),
    }
}

/// Commitment digest of a secret that is already a full word.
#[inline]
pub fn commit_hash_word(secret: &Word) -> Word {
    keccak256(secret.as_bytes())
}

/// Fold a revealed secret into a position's entropy accumulator.
///
/// `next = keccak256(current ‖ secret)`. The chain is order-dependent: the
/// same secrets revealed in a different order give a different result.
pub fn fold_entropy(current: &Word, secret: &Word) -> Word {
    let mut hasher = WordHasher::new();
    hasher.update_word(current);
    hasher.update_word(secret);
    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
