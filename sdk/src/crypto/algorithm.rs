//! # Signing Algorithms
//!
//! The node accepts two signature schemes. Each one is a zero-sized struct
//! implementing [`SignatureScheme`]; the closed [`Algorithm`] enum picks
//! between them at runtime and is what travels with every key pair and
//! signature.
//!
//! | variant     | wire id | secret | public | signature |
//! |-------------|---------|--------|--------|-----------|
//! | `Secp256k1` | 1       | 32     | 33 (compressed) | 64 (compact) |
//! | `Ed25519`   | 2       | 64 (seed ++ public key) | 32 | 64 |
//!
//! Verification never errors. Garbage in (wrong lengths, points not on the
//! curve, high-S junk) is simply `false`.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use secp256k1::{ecdsa, Message, PublicKey, SecretKey, SECP256K1};
use serde::{Deserialize, Serialize};

use super::hash::{sha256, HASH_LEN};
use super::keys::KeyError;

// ---------------------------------------------------------------------------
// Scheme trait
// ---------------------------------------------------------------------------

/// One signature scheme: key generation, derivation, signing, verification.
///
/// `SecretKey` is the parsed, validated form of the secret. Once a caller
/// holds one, signing cannot fail.
pub trait SignatureScheme {
    type SecretKey: Clone;

    /// Wire id used by the node.
    const ID: u8;
    const NAME: &'static str;
    const SECRET_KEY_LEN: usize;
    const PUBLIC_KEY_LEN: usize;

    fn generate() -> Self::SecretKey;

    /// Validates length and content of raw secret key bytes.
    fn parse_secret_key(bytes: &[u8]) -> Result<Self::SecretKey, KeyError>;

    /// Raw bytes in the layout [`parse_secret_key`](Self::parse_secret_key) accepts.
    fn secret_key_bytes(secret: &Self::SecretKey) -> Vec<u8>;

    fn public_key(secret: &Self::SecretKey) -> Vec<u8>;

    fn sign(message: &[u8], secret: &Self::SecretKey) -> Vec<u8>;

    fn verify(message: &[u8], public_key: &[u8], signature: &[u8]) -> bool;
}

// ---------------------------------------------------------------------------
// secp256k1
// ---------------------------------------------------------------------------

/// ECDSA over secp256k1 with compressed public keys and compact signatures.
///
/// ECDSA signs a 32-byte digest. Transaction hashes already are one and are
/// signed as-is; any other message is SHA-256 hashed first.
#[derive(Debug, Clone, Copy)]
pub struct Secp256k1;

impl Secp256k1 {
    fn digest(message: &[u8]) -> Message {
        let digest: [u8; HASH_LEN] = match message.try_into() {
            Ok(digest) => digest,
            Err(_) => sha256(message),
        };
        Message::from_digest(digest)
    }
}

impl SignatureScheme for Secp256k1 {
    type SecretKey = SecretKey;

    const ID: u8 = 1;
    const NAME: &'static str = "secp256k1";
    const SECRET_KEY_LEN: usize = 32;
    const PUBLIC_KEY_LEN: usize = 33;

    fn generate() -> SecretKey {
        SecretKey::new(&mut OsRng)
    }

    fn parse_secret_key(bytes: &[u8]) -> Result<SecretKey, KeyError> {
        if bytes.len() != Self::SECRET_KEY_LEN {
            return Err(KeyError::InvalidKey(format!(
                "{} secret key must be {} bytes, got {}",
                Self::NAME,
                Self::SECRET_KEY_LEN,
                bytes.len()
            )));
        }
        SecretKey::from_slice(bytes).map_err(|_| {
            KeyError::InvalidKey(format!("{} secret key is not a valid scalar", Self::NAME))
        })
    }

    fn secret_key_bytes(secret: &SecretKey) -> Vec<u8> {
        secret.secret_bytes().to_vec()
    }

    fn public_key(secret: &SecretKey) -> Vec<u8> {
        PublicKey::from_secret_key_global(secret).serialize().to_vec()
    }

    fn sign(message: &[u8], secret: &SecretKey) -> Vec<u8> {
        SECP256K1
            .sign_ecdsa(&Self::digest(message), secret)
            .serialize_compact()
            .to_vec()
    }

    fn verify(message: &[u8], public_key: &[u8], signature: &[u8]) -> bool {
        let Ok(public_key) = PublicKey::from_slice(public_key) else {
            return false;
        };
        let Ok(mut signature) = ecdsa::Signature::from_compact(signature) else {
            return false;
        };
        // libsecp256k1 only accepts low-S; other signers may not normalise.
        signature.normalize_s();
        SECP256K1
            .verify_ecdsa(&Self::digest(message), &signature, &public_key)
            .is_ok()
    }
}

// ---------------------------------------------------------------------------
// Ed25519
// ---------------------------------------------------------------------------

/// Ed25519 with the 64-byte `seed ++ public key` secret layout that IOST
/// wallets store on disk.
#[derive(Debug, Clone, Copy)]
pub struct Ed25519;

impl SignatureScheme for Ed25519 {
    type SecretKey = SigningKey;

    const ID: u8 = 2;
    const NAME: &'static str = "ed25519";
    const SECRET_KEY_LEN: usize = ed25519_dalek::KEYPAIR_LENGTH;
    const PUBLIC_KEY_LEN: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

    fn generate() -> SigningKey {
        SigningKey::generate(&mut OsRng)
    }

    fn parse_secret_key(bytes: &[u8]) -> Result<SigningKey, KeyError> {
        let keypair: &[u8; ed25519_dalek::KEYPAIR_LENGTH] = bytes.try_into().map_err(|_| {
            KeyError::InvalidKey(format!(
                "{} secret key must be {} bytes, got {}",
                Self::NAME,
                Self::SECRET_KEY_LEN,
                bytes.len()
            ))
        })?;
        SigningKey::from_keypair_bytes(keypair).map_err(|_| {
            KeyError::InvalidKey(format!(
                "{} public key half does not match the seed",
                Self::NAME
            ))
        })
    }

    fn secret_key_bytes(secret: &SigningKey) -> Vec<u8> {
        secret.to_keypair_bytes().to_vec()
    }

    fn public_key(secret: &SigningKey) -> Vec<u8> {
        secret.verifying_key().to_bytes().to_vec()
    }

    fn sign(message: &[u8], secret: &SigningKey) -> Vec<u8> {
        secret.sign(message).to_bytes().to_vec()
    }

    fn verify(message: &[u8], public_key: &[u8], signature: &[u8]) -> bool {
        let Ok(public_key) = <&[u8; ed25519_dalek::PUBLIC_KEY_LENGTH]>::try_from(public_key) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
            return false;
        };
        let Ok(signature) = DalekSignature::from_slice(signature) else {
            return false;
        };
        verifying_key.verify(message, &signature).is_ok()
    }
}

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

/// The closed set of schemes the node understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Secp256k1,
    Ed25519,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Secp256k1, Algorithm::Ed25519];

    /// Wire id used by the node.
    pub fn id(self) -> u8 {
        match self {
            Algorithm::Secp256k1 => Secp256k1::ID,
            Algorithm::Ed25519 => Ed25519::ID,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Secp256k1 => Secp256k1::NAME,
            Algorithm::Ed25519 => Ed25519::NAME,
        }
    }

    /// Decodes a wire id. Unknown ids are [`KeyError::UnsupportedAlgorithm`].
    pub fn from_id(id: u8) -> Result<Self, KeyError> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == id)
            .ok_or_else(|| KeyError::UnsupportedAlgorithm(format!("id {id}")))
    }

    pub fn secret_key_len(self) -> usize {
        match self {
            Algorithm::Secp256k1 => Secp256k1::SECRET_KEY_LEN,
            Algorithm::Ed25519 => Ed25519::SECRET_KEY_LEN,
        }
    }

    pub fn public_key_len(self) -> usize {
        match self {
            Algorithm::Secp256k1 => Secp256k1::PUBLIC_KEY_LEN,
            Algorithm::Ed25519 => Ed25519::PUBLIC_KEY_LEN,
        }
    }

    /// Fresh secret key bytes from the OS RNG.
    pub fn generate_secret_key(self) -> Vec<u8> {
        match self {
            Algorithm::Secp256k1 => Secp256k1::secret_key_bytes(&Secp256k1::generate()),
            Algorithm::Ed25519 => Ed25519::secret_key_bytes(&Ed25519::generate()),
        }
    }

    pub fn derive_public_key(self, secret_key: &[u8]) -> Result<Vec<u8>, KeyError> {
        match self {
            Algorithm::Secp256k1 => derive::<Secp256k1>(secret_key),
            Algorithm::Ed25519 => derive::<Ed25519>(secret_key),
        }
    }

    pub fn sign(self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, KeyError> {
        match self {
            Algorithm::Secp256k1 => sign_raw::<Secp256k1>(message, secret_key),
            Algorithm::Ed25519 => sign_raw::<Ed25519>(message, secret_key),
        }
    }

    /// `true` only for a well-formed signature by `public_key` over `message`.
    pub fn verify(self, message: &[u8], public_key: &[u8], signature: &[u8]) -> bool {
        match self {
            Algorithm::Secp256k1 => Secp256k1::verify(message, public_key, signature),
            Algorithm::Ed25519 => Ed25519::verify(message, public_key, signature),
        }
    }
}

fn derive<S: SignatureScheme>(secret_key: &[u8]) -> Result<Vec<u8>, KeyError> {
    S::parse_secret_key(secret_key).map(|secret| S::public_key(&secret))
}

fn sign_raw<S: SignatureScheme>(message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, KeyError> {
    S::parse_secret_key(secret_key).map(|secret| S::sign(message, &secret))
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = KeyError;

    /// Case-insensitive: the CLI says `ed25519`, the HTTP gateway `ED25519`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KeyError::UnsupportedAlgorithm(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECP_SECRET: &str = "c6e193266883a500c6e51a117e012d96ad113d5f21f42b28eb648be92a78f92f";
    const SECP_PUBLIC: &str = "0314bf901a6640033ea07b39c6b3acb675fc0af6a6ab526f378216085a93e5c7a2";

    #[test]
    fn wire_ids_are_stable() {
        assert_eq!(Algorithm::Secp256k1.id(), 1);
        assert_eq!(Algorithm::Ed25519.id(), 2);
        assert_eq!(Algorithm::from_id(2).unwrap(), Algorithm::Ed25519);
    }

    #[test]
    fn unknown_id_is_unsupported() {
        assert!(matches!(
            Algorithm::from_id(9),
            Err(KeyError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            Algorithm::from_id(0),
            Err(KeyError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("ED25519".parse::<Algorithm>().unwrap(), Algorithm::Ed25519);
        assert_eq!("secp256k1".parse::<Algorithm>().unwrap(), Algorithm::Secp256k1);
        assert!("rsa".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::Ed25519.to_string(), "ed25519");
    }

    #[test]
    fn secp256k1_derives_known_compressed_key() {
        let secret = hex::decode(SECP_SECRET).unwrap();
        let public = Algorithm::Secp256k1.derive_public_key(&secret).unwrap();
        assert_eq!(hex::encode(public), SECP_PUBLIC);
    }

    #[test]
    fn sign_verify_round_trip_for_every_algorithm() {
        let message = sha256(&[1, 2, 3, 4]);
        for algorithm in Algorithm::ALL {
            let secret = algorithm.generate_secret_key();
            assert_eq!(secret.len(), algorithm.secret_key_len());
            let public = algorithm.derive_public_key(&secret).unwrap();
            assert_eq!(public.len(), algorithm.public_key_len());
            let sig = algorithm.sign(&message, &secret).unwrap();
            assert!(
                algorithm.verify(&message, &public, &sig),
                "{algorithm} signature must verify"
            );
        }
    }

    #[test]
    fn secp256k1_signs_arbitrary_length_messages() {
        let secret = hex::decode(SECP_SECRET).unwrap();
        let public = hex::decode(SECP_PUBLIC).unwrap();
        let sig = Algorithm::Secp256k1.sign(b"not a digest", &secret).unwrap();
        assert_eq!(sig.len(), 64);
        assert!(Algorithm::Secp256k1.verify(b"not a digest", &public, &sig));
        assert!(!Algorithm::Secp256k1.verify(b"another message", &public, &sig));
    }

    #[test]
    fn flipped_signature_byte_is_false_not_error() {
        let message = sha256(b"hello");
        for algorithm in Algorithm::ALL {
            let secret = algorithm.generate_secret_key();
            let public = algorithm.derive_public_key(&secret).unwrap();
            let sig = algorithm.sign(&message, &secret).unwrap();
            for i in [0, 31, 63] {
                let mut bad = sig.clone();
                bad[i] ^= 0x01;
                assert!(!algorithm.verify(&message, &public, &bad), "{algorithm} byte {i}");
            }
        }
    }

    #[test]
    fn malformed_inputs_verify_false() {
        let message = sha256(b"hello");
        for algorithm in Algorithm::ALL {
            assert!(!algorithm.verify(&message, &[], &[]));
            assert!(!algorithm.verify(&message, &[0u8; 5], &[5, 6, 7, 8]));
        }
    }

    #[test]
    fn wrong_secret_length_is_invalid_key() {
        assert!(matches!(
            Algorithm::Secp256k1.derive_public_key(&[1u8; 31]),
            Err(KeyError::InvalidKey(_))
        ));
        assert!(matches!(
            Algorithm::Ed25519.derive_public_key(&[1u8; 32]),
            Err(KeyError::InvalidKey(_))
        ));
    }

    #[test]
    fn ed25519_rejects_mismatched_public_half() {
        let mut secret = Algorithm::Ed25519.generate_secret_key();
        secret[40] ^= 0xff;
        assert!(matches!(
            Algorithm::Ed25519.derive_public_key(&secret),
            Err(KeyError::InvalidKey(_))
        ));
    }

    #[test]
    fn secp256k1_zero_scalar_is_invalid() {
        assert!(Algorithm::Secp256k1.derive_public_key(&[0u8; 32]).is_err());
    }

    #[test]
    fn ed25519_signatures_are_deterministic() {
        let secret = Algorithm::Ed25519.generate_secret_key();
        let a = Algorithm::Ed25519.sign(b"msg", &secret).unwrap();
        let b = Algorithm::Ed25519.sign(b"msg", &secret).unwrap();
        assert_eq!(a, b);
    }
}
