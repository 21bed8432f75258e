//! # Identity Module
//!
//! Who signs. Every IOST key pair maps to a checksummed account id, every
//! transaction names its signers as `account@permission`, and an
//! [`Account`] holds the local keys behind those permissions.
//!
//! The identity stack is layered:
//!
//! 1. **Account id**: `"IOST" + base58(pubkey ++ crc32)`. Pure function of
//!    the public key, no network needed.
//! 2. **Signer id**: validated `name@permission` pair.
//! 3. **Account**: a name plus one [`KeyPair`](crate::crypto::KeyPair) per
//!    permission; signs and publishes transactions.
//! 4. **Directory**: [`SignerKeys`] answers which keys may sign for which
//!    signer, used by transaction verification.

pub mod account;
pub mod account_id;
pub mod directory;
pub mod signer;

pub use account::Account;
pub use account_id::{derive_account_id, public_key_from_account_id};
pub use directory::{KeyDirectory, SignerKeys};
pub use signer::{SignerId, SignerIdError};
