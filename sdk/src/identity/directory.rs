//! Which public keys may sign for which signer.

use std::collections::HashMap;

use super::signer::SignerId;

/// Answers "may this public key sign as `signer`?".
///
/// Verification uses it to tie anonymous signatures to the signers a
/// transaction declares. On chain the answer comes from account
/// permissions; locally it comes from whatever keys the caller knows.
pub trait SignerKeys {
    fn authorizes(&self, signer: &SignerId, public_key: &[u8]) -> bool;
}

/// In-memory `signer -> public keys` map.
#[derive(Debug, Clone, Default)]
pub struct KeyDirectory {
    keys: HashMap<SignerId, Vec<Vec<u8>>>,
}

impl KeyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorizes `public_key` for `signer`. A signer may hold several keys.
    pub fn insert(&mut self, signer: SignerId, public_key: &[u8]) -> &mut Self {
        let keys = self.keys.entry(signer).or_default();
        if !keys.iter().any(|k| k == public_key) {
            keys.push(public_key.to_vec());
        }
        self
    }

    pub fn keys_for(&self, signer: &SignerId) -> &[Vec<u8>] {
        self.keys.get(signer).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SignerKeys for KeyDirectory {
    fn authorizes(&self, signer: &SignerId, public_key: &[u8]) -> bool {
        self.keys_for(signer).iter().any(|k| k == public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SignerId {
        s.parse().unwrap()
    }

    #[test]
    fn authorizes_only_inserted_keys() {
        let mut dir = KeyDirectory::new();
        dir.insert(id("alice@active"), &[1; 32]);

        assert!(dir.authorizes(&id("alice@active"), &[1; 32]));
        assert!(!dir.authorizes(&id("alice@active"), &[2; 32]));
        assert!(!dir.authorizes(&id("alice@owner"), &[1; 32]));
    }

    #[test]
    fn signer_may_hold_several_keys() {
        let mut dir = KeyDirectory::new();
        dir.insert(id("vault@owner"), &[1; 33])
            .insert(id("vault@owner"), &[2; 33])
            .insert(id("vault@owner"), &[1; 33]);
        assert_eq!(dir.keys_for(&id("vault@owner")).len(), 2);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn unknown_signer_has_no_keys() {
        let dir = KeyDirectory::new();
        assert!(dir.is_empty());
        assert!(dir.keys_for(&id("nobody@active")).is_empty());
    }
}
