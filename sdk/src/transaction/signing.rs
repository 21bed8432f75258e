//! Collecting signer and publisher signatures.
//!
//! Signers sign the base hash and may do so in any order, without knowing
//! who else signs or who will publish. The publisher signs last, over the
//! publish hash, which commits it to the exact signer signatures collected.
//!
//! [`Transaction::add_signature`] does not check that the key belongs to a
//! declared signer; that is [`Transaction::verify_self`]'s job. Use
//! [`Transaction::add_signature_strict`] to check up front.

use super::builder::Transaction;
use super::verification::PermissionError;
use crate::crypto::keys::KeyPair;
use crate::crypto::signatures::Signature;
use crate::identity::signer::SignerId;

impl Transaction {
    /// Signs the base hash with `keypair` and appends the signature.
    pub fn add_signature(&mut self, keypair: &KeyPair) -> &mut Self {
        let signature = Signature::new(&self.base_hash(), keypair);
        self.push_signature(signature)
    }

    /// Like [`add_signature`](Self::add_signature), but refuses to sign on
    /// behalf of a signer the transaction does not declare.
    pub fn add_signature_strict(
        &mut self,
        signer: &SignerId,
        keypair: &KeyPair,
    ) -> Result<&mut Self, PermissionError> {
        if !self.signers().contains(signer) {
            return Err(PermissionError::NotASigner {
                signer: signer.to_string(),
            });
        }
        Ok(self.add_signature(keypair))
    }

    /// Signs the publish hash as `publisher`. Sets the publisher name and
    /// drops the cached transaction hash.
    pub fn add_publisher_signature(&mut self, publisher: &str, keypair: &KeyPair) -> &mut Self {
        let signature = Signature::new(&self.publish_hash(), keypair);
        self.push_publisher_signature(publisher, signature)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
