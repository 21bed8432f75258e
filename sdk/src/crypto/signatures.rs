//! # Signatures
//!
//! A [`Signature`] carries everything needed to check it: the algorithm,
//! the signature bytes and the signer's public key. Whoever receives one
//! (a co-signer, the publisher, the node) can verify it without ever seeing
//! the [`KeyPair`] that produced it.
//!
//! Signatures are immutable. Verification is boolean: a signature that does
//! not cover the message, or bytes that are not a signature at all, are both
//! just `false`.

use crate::encoding::{CanonicalEncode, CanonicalEncoder};

use super::algorithm::Algorithm;
use super::keys::KeyPair;

/// `(algorithm, signature bytes, public key)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    algorithm: Algorithm,
    sig: Vec<u8>,
    public_key: Vec<u8>,
}

impl Signature {
    /// Signs `message` with `keypair`.
    pub fn new(message: &[u8], keypair: &KeyPair) -> Self {
        keypair.sign(message)
    }

    /// Reassembles a signature received from elsewhere. Nothing is checked
    /// here; call [`verify`](Self::verify).
    pub fn from_parts(algorithm: Algorithm, sig: Vec<u8>, public_key: Vec<u8>) -> Self {
        Self {
            algorithm,
            sig,
            public_key,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn sig(&self) -> &[u8] {
        &self.sig
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Re-runs the algorithm's verification with the embedded public key.
    pub fn verify(&self, message: &[u8]) -> bool {
        self.algorithm.verify(message, &self.public_key, &self.sig)
    }
}

impl CanonicalEncode for Signature {
    /// `byte(algorithm id) ++ bytes(sig) ++ bytes(public key)`.
    fn encode(&self, enc: &mut CanonicalEncoder) {
        enc.write_byte(self.algorithm.id())
            .write_bytes(&self.sig)
            .write_bytes(&self.public_key);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
