//! Hash utilities and types for the merkle tree.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{MerkleError, MerkleResult, HASH_LENGTH};

/// A 256-bit SHA-256 digest identifying a leaf block or a subtree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HashValue([u8; HASH_LENGTH]);

impl HashValue {
    /// Create a new HashValue from a fixed-size array
    pub fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a HashValue from a slice
    pub fn from_slice(bytes: &[u8]) -> MerkleResult<Self> {
        if bytes.len() != HASH_LENGTH {
            return Err(MerkleError::InvalidHashLength {
                expected: HASH_LENGTH,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; HASH_LENGTH];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Parse a HashValue from a hex string, with or without a `0x` prefix.
    ///
    /// Surrounding whitespace is ignored. Anything that is not exactly 32
    /// hex-encoded bytes is rejected.
    pub fn from_hex(hex_str: &str) -> MerkleResult<Self> {
        let hex_str = hex_str.trim();
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(hex_str)
            .map_err(|e| MerkleError::MalformedHex(format!("{}: {}", hex_str, e)))?;
        Self::from_slice(&bytes)
    }

    /// Lowercase hex encoding without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Convert to a Vec<u8>
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", self)
    }
}

impl AsRef<[u8]> for HashValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LENGTH]> for HashValue {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl std::str::FromStr for HashValue {
    type Err = MerkleError;

    fn from_str(s: &str) -> MerkleResult<Self> {
        Self::from_hex(s)
    }
}

// Digests travel as hex strings in JSON output.
impl Serialize for HashValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash arbitrary data using SHA-256
pub fn sha256(data: &[u8]) -> HashValue {
    let mut hasher = Sha256::new();
    hasher.update(data);
    HashValue(hasher.finalize().into())
}

/// Hash a leaf block. Leaves are hashed without any domain prefix.
pub fn hash_leaf(data: &[u8]) -> HashValue {
    sha256(data)
}

/// Hash two child digests into their parent: `sha256(left ++ right)`.
pub fn hash_internal(left: &HashValue, right: &HashValue) -> HashValue {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    HashValue(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // sha256("abc")
        let hash = sha256(b"abc");
        assert_eq!(
            hash.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_empty_input() {
        assert_eq!(
            sha256(&[]).to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_internal_is_plain_concatenation() {
        let left = sha256(b"a");
        let right = sha256(b"b");

        let mut concat = left.to_vec();
        concat.extend_from_slice(right.as_bytes());

        assert_eq!(hash_internal(&left, &right), sha256(&concat));
        assert_ne!(hash_internal(&left, &right), hash_internal(&right, &left));
    }

    #[test]
    fn test_hex_round_trip() {
        let hash = sha256(b"dirhash");
        let parsed = HashValue::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(parsed, hash);

        let prefixed = HashValue::from_hex(&format!("0x{}", hash)).unwrap();
        assert_eq!(prefixed, hash);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(matches!(
            HashValue::from_hex("not hex"),
            Err(MerkleError::MalformedHex(_))
        ));
        assert!(matches!(
            HashValue::from_hex("abcd"),
            Err(MerkleError::InvalidHashLength { expected: 32, got: 2 })
        ));
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let hash = sha256(b"x");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));

        let back: HashValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
