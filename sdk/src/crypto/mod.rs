//! # Cryptographic Primitives
//!
//! Everything that touches key material or digests flows through here:
//!
//! - **algorithm**: the two signature schemes the node accepts
//!   (secp256k1 ECDSA and Ed25519) behind one trait and one enum.
//! - **keys**: [`KeyPair`], validated at construction, immutable after.
//! - **signatures**: self-verifying [`Signature`] triples.
//! - **hash**: SHA3-256 for transactions, SHA-256 for ECDSA digests.
//! - **crc32**: the Koopman checksum inside account ids.
//!
//! Nothing here is home-grown cryptography. The curves come from
//! `secp256k1` and `ed25519-dalek`, the digests from `sha2`/`sha3`.

pub mod algorithm;
pub mod crc32;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use algorithm::{Algorithm, Ed25519, Secp256k1, SignatureScheme};
pub use crc32::crc32_koopman;
pub use hash::{sha256, sha3_256};
pub use keys::{KeyError, KeyPair};
pub use signatures::Signature;
