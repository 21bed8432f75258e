//! # Key Management
//!
//! [`KeyPair`] bundles an algorithm, a validated secret key, the derived
//! public key and the account id derived from that public key. Everything
//! is computed once, at construction; afterwards a key pair is an immutable
//! value that is cheap to clone and safe to move across threads.
//!
//! ## Security considerations
//!
//! - Secret keys are generated from the OS RNG (`OsRng`).
//! - `Debug` prints the algorithm and account id, never the secret.
//! - Key bytes are never logged by this crate.

use std::fmt;

use ed25519_dalek::SigningKey;
use thiserror::Error;

use super::algorithm::{Algorithm, Ed25519, Secp256k1, SignatureScheme};
use super::signatures::Signature;
use crate::identity::account_id::derive_account_id;

/// Errors raised while constructing or decoding key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Wrong length or content for the claimed algorithm, bad base58, or a
    /// corrupted account id.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// An algorithm id or name this SDK does not know.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Parsed secret key for one of the supported schemes.
#[derive(Clone)]
enum SecretKey {
    Secp256k1(<Secp256k1 as SignatureScheme>::SecretKey),
    Ed25519(SigningKey),
}

impl SecretKey {
    fn algorithm(&self) -> Algorithm {
        match self {
            SecretKey::Secp256k1(_) => Algorithm::Secp256k1,
            SecretKey::Ed25519(_) => Algorithm::Ed25519,
        }
    }

    fn parse(algorithm: Algorithm, bytes: &[u8]) -> Result<Self, KeyError> {
        Ok(match algorithm {
            Algorithm::Secp256k1 => SecretKey::Secp256k1(Secp256k1::parse_secret_key(bytes)?),
            Algorithm::Ed25519 => SecretKey::Ed25519(Ed25519::parse_secret_key(bytes)?),
        })
    }

    fn generate(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Secp256k1 => SecretKey::Secp256k1(Secp256k1::generate()),
            Algorithm::Ed25519 => SecretKey::Ed25519(Ed25519::generate()),
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        match self {
            SecretKey::Secp256k1(sk) => Secp256k1::secret_key_bytes(sk),
            SecretKey::Ed25519(sk) => Ed25519::secret_key_bytes(sk),
        }
    }

    fn public_key(&self) -> Vec<u8> {
        match self {
            SecretKey::Secp256k1(sk) => Secp256k1::public_key(sk),
            SecretKey::Ed25519(sk) => Ed25519::public_key(sk),
        }
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            SecretKey::Secp256k1(sk) => Secp256k1::sign(message, sk),
            SecretKey::Ed25519(sk) => Ed25519::sign(message, sk),
        }
    }
}

/// A signing identity: algorithm, secret key, public key and account id.
///
/// # Examples
///
/// ```
/// use iost_sdk::crypto::{Algorithm, KeyPair};
///
/// let kp = KeyPair::generate(Algorithm::Ed25519);
/// let sig = kp.sign(b"transfer 10 iost to bob");
/// assert!(sig.verify(b"transfer 10 iost to bob"));
/// assert!(kp.id().starts_with("IOST"));
/// ```
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public_key: Vec<u8>,
    id: String,
}

impl KeyPair {
    /// Uses `secret_key` when given, otherwise generates a fresh one.
    pub fn new(algorithm: Algorithm, secret_key: Option<&[u8]>) -> Result<Self, KeyError> {
        match secret_key {
            Some(bytes) => Self::from_secret_key(algorithm, bytes),
            None => Ok(Self::generate(algorithm)),
        }
    }

    pub fn generate(algorithm: Algorithm) -> Self {
        Self::from_secret(SecretKey::generate(algorithm))
    }

    /// Validates `bytes` against `algorithm`'s secret key layout.
    pub fn from_secret_key(algorithm: Algorithm, bytes: &[u8]) -> Result<Self, KeyError> {
        SecretKey::parse(algorithm, bytes).map(Self::from_secret)
    }

    /// Decodes a base58 secret key, the format key files use.
    pub fn from_base58(algorithm: Algorithm, encoded: &str) -> Result<Self, KeyError> {
        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| KeyError::InvalidKey(format!("secret key is not base58: {e}")))?;
        Self::from_secret_key(algorithm, &bytes)
    }

    fn from_secret(secret: SecretKey) -> Self {
        let public_key = secret.public_key();
        let id = derive_account_id(&public_key);
        Self {
            secret,
            public_key,
            id,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.secret.algorithm()
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// `"IOST" + base58(public_key ++ checksum)`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw secret key bytes. Handle with care; this is the whole identity.
    pub fn secret_key(&self) -> Vec<u8> {
        self.secret.to_bytes()
    }

    pub fn secret_key_base58(&self) -> String {
        bs58::encode(self.secret.to_bytes()).into_string()
    }

    pub fn public_key_base58(&self) -> String {
        bs58::encode(&self.public_key).into_string()
    }

    /// Signs `message`. Infallible: the secret was validated at construction.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from_parts(
            self.algorithm(),
            self.secret.sign(message),
            self.public_key.clone(),
        )
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm() == other.algorithm() && self.public_key == other.public_key
    }
}

impl Eq for KeyPair {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
