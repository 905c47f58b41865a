//! Ledger Words and Identities
//!
//! The host ledger speaks in 256-bit unsigned integers. A [`Word`] stores one
//! as 32 big-endian bytes so that hashing, comparison and serialization all
//! agree on a single canonical layout.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Word: 32 bytes, big-endian                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [00 00 .. 00][ value bytes ........................ ]      │
//! │   └ left zero padding ┘└──── significant bytes ────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Width of a ledger word in bytes.
pub const WORD_BYTES: usize = 32;

/// Width of a caller address in bytes.
pub const ADDRESS_BYTES: usize = 20;

// =============================================================================
// WORD
// =============================================================================

/// 256-bit unsigned integer in big-endian byte order.
///
/// Ordering compares numerically since the bytes are big-endian.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Word(pub [u8; WORD_BYTES]);

impl Word {
    /// The zero word.
    pub const ZERO: Self = Self([0; WORD_BYTES]);

    /// Create from raw big-endian bytes.
    #[inline]
    pub const fn from_be_bytes(bytes: [u8; WORD_BYTES]) -> Self {
        Self(bytes)
    }

    /// Create from a u64 value.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        bytes[WORD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Create from a u128 value.
    pub fn from_u128(value: u128) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        bytes[WORD_BYTES - 16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Left-pad a short byte string into a word.
    ///
    /// Returns `None` when the input is longer than 32 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > WORD_BYTES {
            return None;
        }
        let mut out = [0u8; WORD_BYTES];
        out[WORD_BYTES - bytes.len()..].copy_from_slice(bytes);
        Some(Self(out))
    }

    /// Parse a hex string, with or without `0x` prefix.
    ///
    /// Short strings are left-padded, so `"0x1"` parses as one.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = if digits.len() % 2 == 1 {
            hex::decode(format!("0{}", digits))?
        } else {
            hex::decode(digits)?
        };
        Self::from_be_slice(&bytes).ok_or(hex::FromHexError::InvalidStringLength)
    }

    /// Narrow to u64 if the value fits.
    pub fn to_u64(&self) -> Option<u64> {
        let (high, low) = self.0.split_at(WORD_BYTES - 8);
        if high.iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(low);
        Some(u64::from_be_bytes(buf))
    }

    /// Is this the zero word?
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Get raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; WORD_BYTES] {
        &self.0
    }

    /// Lowercase hex with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for Word {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<bool> for Word {
    fn from(value: bool) -> Self {
        Self::from_u64(value as u64)
    }
}

impl From<Address> for Word {
    fn from(address: Address) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        bytes[WORD_BYTES - ADDRESS_BYTES..].copy_from_slice(&address.0);
        Self(bytes)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u64() {
            Some(small) => write!(f, "Word({})", small),
            None => write!(f, "Word({})", self.to_hex()),
        }
    }
}

// Hex strings for JSON, raw bytes for bincode.
impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(D::Error::custom)
        } else {
            <[u8; WORD_BYTES]>::deserialize(deserializer).map(Self)
        }
    }
}

// =============================================================================
// ADDRESS
// =============================================================================

/// Caller identity as supplied by the host ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0; ADDRESS_BYTES]);

    /// Create from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Parse exactly 20 bytes of hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(D::Error::custom)
        } else {
            <[u8; ADDRESS_BYTES]>::deserialize(deserializer).map(Self)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_roundtrip() {
        let word = Word::from_u64(0xDEAD_BEEF);
        assert_eq!(word.to_u64(), Some(0xDEAD_BEEF));
        assert_eq!(word.0[31], 0xEF);
        assert!(word.0[..24].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_to_u64_rejects_wide_values() {
        let wide = Word::from_u128(u64::MAX as u128 + 1);
        assert_eq!(wide.to_u64(), None);
    }

    #[test]
    fn test_from_be_slice_pads_left() {
        let word = Word::from_be_slice(b"cow").unwrap();
        assert_eq!(&word.0[29..], b"cow");
        assert!(word.0[..29].iter().all(|b| *b == 0));

        assert!(Word::from_be_slice(&[1u8; 33]).is_none());
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(Word::from_u64(1) < Word::from_u64(2));
        assert!(Word::from_u64(u64::MAX) < Word::from_u128(u64::MAX as u128 + 1));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Word::from_hex("0x1").unwrap(), Word::from_u64(1));
        assert_eq!(Word::from_hex("ff").unwrap(), Word::from_u64(255));
        assert!(Word::from_hex("0xzz").is_err());
        assert!(Word::from_hex(&"11".repeat(33)).is_err());
    }

    #[test]
    fn test_address_to_word() {
        let address = Address::new([0xAB; ADDRESS_BYTES]);
        let word = Word::from(address);
        assert!(word.0[..12].iter().all(|b| *b == 0));
        assert!(word.0[12..].iter().all(|b| *b == 0xAB));
    }

    #[test]
    fn test_json_uses_hex() {
        let word = Word::from_u64(16);
        let json = serde_json::to_string(&word).unwrap();
        assert_eq!(json, format!("\"0x{}10\"", "00".repeat(31)));

        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);
    }

    #[test]
    fn test_address_json_uses_hex() {
        let address = Address::new([0x11; ADDRESS_BYTES]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "11".repeat(ADDRESS_BYTES)));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);

        // Must be exactly 20 bytes.
        assert!(serde_json::from_str::<Address>("\"0x1111\"").is_err());
    }

    #[test]
    fn test_address_bincode_uses_raw_bytes() {
        let address = Address::new([0x22; ADDRESS_BYTES]);
        let encoded = bincode::serialize(&address).unwrap();
        assert_eq!(encoded, vec![0x22; ADDRESS_BYTES]);
        assert_eq!(bincode::deserialize::<Address>(&encoded).unwrap(), address);
    }

    #[test]
    fn test_bincode_uses_raw_bytes() {
        let word = Word::from_u64(7);
        let encoded = bincode::serialize(&word).unwrap();
        assert_eq!(encoded.len(), WORD_BYTES);
        let back: Word = bincode::deserialize(&encoded).unwrap();
        assert_eq!(back, word);
    }
}
