//! Core primitives.
//!
//! Fixed-width ledger words and the canonical commitment hash. Everything
//! else in the crate builds on these.

pub mod word;
pub mod hash;

// Re-export core types
pub use word::{Address, Word, ADDRESS_BYTES, WORD_BYTES};
pub use hash::{commit_hash, commit_hash_word, fold_entropy, keccak256, WordHasher};
