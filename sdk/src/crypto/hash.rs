//! # Hashing Utilities
//!
//! Two hash functions, each with exactly one job:
//!
//! - **SHA3-256** hashes the canonical transaction bytes. The node computes
//!   the same digest to identify and verify transactions, so this one is not
//!   negotiable.
//! - **SHA-256** pre-hashes secp256k1 messages that are not already a
//!   32-byte digest. ECDSA signs a field-sized digest, not arbitrary bytes.

use sha2::Sha256;
use sha3::{Digest, Sha3_256};

/// Length in bytes of every digest in this module.
pub const HASH_LEN: usize = 32;

/// SHA3-256 of `data`.
///
/// # Example
///
/// ```
/// use iost_sdk::crypto::sha3_256;
///
/// let digest = sha3_256(b"hello");
/// assert_eq!(
///     hex::encode(digest),
///     "3338be694f50c5f338814986cdf0686453a888b84f424d792af4b9202398f392"
/// );
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha3_256_known_vectors() {
        assert_eq!(
            hex::encode(sha3_256(b"")),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
        assert_eq!(
            hex::encode(sha3_256(b"hello")),
            "3338be694f50c5f338814986cdf0686453a888b84f424d792af4b9202398f392"
        );
    }

    #[test]
    fn sha256_known_vector() {
        // Fixture carried over from the secp256k1 self-test: SHA-256 of the
        // raw test secret key.
        let secret =
            hex::decode("c6e193266883a500c6e51a117e012d96ad113d5f21f42b28eb648be92a78f92f")
                .unwrap();
        assert_eq!(
            hex::encode(sha256(&secret)),
            "d4daf0546cb71d90688b45488a8fa000b0821ec14b73677b2fb7788739228c8b"
        );
    }

    #[test]
    fn sha3_is_not_keccak() {
        // Keccak-256("") starts with c5d2...; the NIST padding changes everything.
        assert!(!hex::encode(sha3_256(b"")).starts_with("c5d2"));
    }
}
