//! Signature coverage checks for a transaction about to be submitted.
//!
//! Signature *mismatch* is an ordinary negative answer everywhere in the
//! crypto layer. Here it becomes a [`PermissionError`], because a
//! transaction that fails these checks must not leave the process: the
//! caller has to collect the missing signatures first.
//!
//! The checks, in order:
//!
//! 1. Every signer signature verifies against the base hash.
//! 2. Every declared signer is covered by a signature. Without a
//!    [`SignerKeys`] source this only counts distinct signing keys, so any
//!    valid key covers any signer. Pass keys through
//!    [`VerifyPolicy::with_keys`] to bind signatures to named signers.
//! 3. A publisher is named.
//! 4. The publisher has signed, and every publisher signature verifies
//!    against the publish hash.

use std::collections::BTreeSet;

use thiserror::Error;

use super::builder::Transaction;
use crate::config::DEFAULT_PUBLISHER_PERMISSION;
use crate::identity::directory::SignerKeys;
use crate::identity::signer::SignerId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A transaction is missing an authorization it needs, or carries one that
/// does not check out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// Strict signing was asked for a signer the transaction never declared.
    #[error("{signer} is not a declared signer of this transaction")]
    NotASigner { signer: String },

    #[error("signer {signer} has not signed")]
    MissingSignerSignature { signer: String },

    #[error("signer signature #{index} does not verify against the base hash")]
    InvalidSignerSignature { index: usize },

    #[error("transaction has no publisher")]
    MissingPublisher,

    #[error("publisher {publisher} has not signed")]
    MissingPublisherSignature { publisher: String },

    #[error("publisher signature #{index} of {publisher} does not verify against the publish hash")]
    InvalidPublisherSignature { publisher: String, index: usize },

    /// An account was asked to sign with a permission it holds no key for.
    #[error("account {account} has no key for permission {permission}")]
    MissingKey { account: String, permission: String },
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Knobs for [`Transaction::verify`].
///
/// Without a key directory a signature cannot be tied to a named signer,
/// so coverage means "at least as many distinct signing keys as declared
/// signers". With one, each signer needs a signature from a key the
/// directory authorizes for it.
#[derive(Clone, Copy)]
pub struct VerifyPolicy<'a> {
    pub require_publisher: bool,
    pub check_publisher_signature: bool,
    pub keys: Option<&'a dyn SignerKeys>,
}

impl<'a> VerifyPolicy<'a> {
    /// Everything checked, signers matched against `keys`.
    pub fn with_keys(keys: &'a dyn SignerKeys) -> Self {
        Self {
            keys: Some(keys),
            ..Self::default()
        }
    }

    /// Signer checks only, for a transaction still waiting on its
    /// publisher.
    pub fn signers_only() -> Self {
        Self {
            require_publisher: false,
            check_publisher_signature: false,
            keys: None,
        }
    }
}

impl Default for VerifyPolicy<'_> {
    fn default() -> Self {
        Self {
            require_publisher: true,
            check_publisher_signature: true,
            keys: None,
        }
    }
}

impl std::fmt::Debug for VerifyPolicy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyPolicy")
            .field("require_publisher", &self.require_publisher)
            .field("check_publisher_signature", &self.check_publisher_signature)
            .field("keys", &self.keys.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

impl Transaction {
    /// Full check with the default policy.
    ///
    /// The default policy has no key source, so signer coverage is a count
    /// of distinct valid keys: a signature from any key satisfies
    /// `alice@active`. Signatures are bound to named signers only under
    /// [`VerifyPolicy::with_keys`].
    pub fn verify_self(&self) -> Result<(), PermissionError> {
        self.verify(&VerifyPolicy::default())
    }

    /// Runs the checks listed in the module docs. The first failure is
    /// returned.
    pub fn verify(&self, policy: &VerifyPolicy<'_>) -> Result<(), PermissionError> {
        self.verify_signer_signatures()?;
        match policy.keys {
            Some(keys) => self.verify_coverage_with(keys)?,
            None => self.verify_coverage()?,
        }

        if !policy.require_publisher {
            return Ok(());
        }
        if self.publisher().is_empty() {
            return Err(PermissionError::MissingPublisher);
        }
        if policy.check_publisher_signature {
            self.verify_publisher_signatures(policy.keys)?;
        }
        Ok(())
    }

    fn verify_signer_signatures(&self) -> Result<(), PermissionError> {
        let base = self.base_hash();
        match self.signatures().iter().position(|sig| !sig.verify(&base)) {
            Some(index) => Err(PermissionError::InvalidSignerSignature { index }),
            None => Ok(()),
        }
    }

    fn verify_coverage(&self) -> Result<(), PermissionError> {
        let distinct_keys: BTreeSet<&[u8]> =
            self.signatures().iter().map(|sig| sig.public_key()).collect();
        match self.signers().get(distinct_keys.len()) {
            Some(uncovered) => Err(PermissionError::MissingSignerSignature {
                signer: uncovered.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn verify_coverage_with(&self, keys: &dyn SignerKeys) -> Result<(), PermissionError> {
        for signer in self.signers() {
            let covered = self
                .signatures()
                .iter()
                .any(|sig| keys.authorizes(signer, sig.public_key()));
            if !covered {
                return Err(PermissionError::MissingSignerSignature {
                    signer: signer.to_string(),
                });
            }
        }
        Ok(())
    }

    fn verify_publisher_signatures(&self, keys: Option<&dyn SignerKeys>) -> Result<(), PermissionError> {
        let publisher = self.publisher();
        let missing = || PermissionError::MissingPublisherSignature {
            publisher: publisher.to_string(),
        };
        if self.publisher_signatures().is_empty() {
            return Err(missing());
        }

        let publish = self.publish_hash();
        if let Some(index) = self
            .publisher_signatures()
            .iter()
            .position(|sig| !sig.verify(&publish))
        {
            return Err(PermissionError::InvalidPublisherSignature {
                publisher: publisher.to_string(),
                index,
            });
        }

        if let Some(keys) = keys {
            let Ok(signer) = SignerId::new(publisher, DEFAULT_PUBLISHER_PERMISSION) else {
                return Err(missing());
            };
            let authorized = self
                .publisher_signatures()
                .iter()
                .any(|sig| keys.authorizes(&signer, sig.public_key()));
            if !authorized {
                return Err(missing());
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
