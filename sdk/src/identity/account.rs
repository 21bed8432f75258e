//! Named accounts holding one key pair per permission.

use std::collections::BTreeMap;

use super::directory::SignerKeys;
use super::signer::{SignerId, SignerIdError};
use crate::config::DEFAULT_PUBLISHER_PERMISSION;
use crate::crypto::keys::KeyPair;
use crate::transaction::{PermissionError, Transaction};

/// An on-chain account name and the local keys it signs with.
///
/// ```
/// use iost_sdk::crypto::{Algorithm, KeyPair};
/// use iost_sdk::identity::Account;
/// use iost_sdk::transaction::Transaction;
///
/// let mut admin = Account::new("admin");
/// admin.add_key_pair("active", KeyPair::generate(Algorithm::Ed25519));
///
/// let mut tx = Transaction::new();
/// admin.sign_publish(&mut tx).unwrap();
/// assert!(tx.is_published());
/// ```
#[derive(Debug, Clone)]
pub struct Account {
    name: String,
    keys: BTreeMap<String, KeyPair>,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the key for `permission`, replacing any previous one.
    pub fn add_key_pair(&mut self, permission: impl Into<String>, keypair: KeyPair) -> &mut Self {
        self.keys.insert(permission.into(), keypair);
        self
    }

    pub fn key_pair(&self, permission: &str) -> Option<&KeyPair> {
        self.keys.get(permission)
    }

    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// `name@permission` for this account.
    pub fn signer_id(&self, permission: &str) -> Result<SignerId, SignerIdError> {
        SignerId::new(self.name.as_str(), permission)
    }

    fn require_key(&self, permission: &str) -> Result<&KeyPair, PermissionError> {
        self.key_pair(permission).ok_or_else(|| PermissionError::MissingKey {
            account: self.name.clone(),
            permission: permission.to_string(),
        })
    }

    /// Adds a signer signature made with the key held for `permission`.
    pub fn sign(&self, tx: &mut Transaction, permission: &str) -> Result<(), PermissionError> {
        let keypair = self.require_key(permission)?;
        tx.add_signature(keypair);
        Ok(())
    }

    /// Publishes `tx` as this account with its `active` key.
    pub fn sign_publish(&self, tx: &mut Transaction) -> Result<(), PermissionError> {
        let keypair = self.require_key(DEFAULT_PUBLISHER_PERMISSION)?;
        tx.add_publisher_signature(&self.name, keypair);
        Ok(())
    }
}

impl SignerKeys for Account {
    fn authorizes(&self, signer: &SignerId, public_key: &[u8]) -> bool {
        signer.name() == self.name
            && self
                .key_pair(signer.permission())
                .is_some_and(|kp| kp.public_key() == public_key)
    }
}
