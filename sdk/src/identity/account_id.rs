//! # Account IDs
//!
//! An account id is a checksummed, text-encoded public key:
//!
//! ```text
//! public_key (33 or 32 bytes)
//!     -> public_key ++ crc32_koopman(public_key) as 4 little-endian bytes
//!     -> base58
//!     -> "IOST" + ...
//! ```
//!
//! Derivation is a pure function of the public key bytes and needs no
//! network access. The checksum catches typos and single-byte corruption
//! when an id is parsed back into a public key.

use crate::config::{ACCOUNT_ID_CHECKSUM_LEN, ACCOUNT_ID_PREFIX};
use crate::crypto::crc32::crc32_koopman;
use crate::crypto::keys::KeyError;

/// `"IOST" + base58(public_key ++ crc32_koopman_le(public_key))`.
///
/// ```
/// use iost_sdk::identity::derive_account_id;
///
/// let id = derive_account_id(&[7u8; 32]);
/// assert!(id.starts_with("IOST"));
/// ```
pub fn derive_account_id(public_key: &[u8]) -> String {
    let mut payload = Vec::with_capacity(public_key.len() + ACCOUNT_ID_CHECKSUM_LEN);
    payload.extend_from_slice(public_key);
    payload.extend_from_slice(&crc32_koopman(public_key).to_le_bytes());
    format!("{ACCOUNT_ID_PREFIX}{}", bs58::encode(payload).into_string())
}

/// Recovers the public key from an account id, verifying prefix and
/// checksum.
pub fn public_key_from_account_id(id: &str) -> Result<Vec<u8>, KeyError> {
    let encoded = id.strip_prefix(ACCOUNT_ID_PREFIX).ok_or_else(|| {
        KeyError::InvalidKey(format!("account id must start with {ACCOUNT_ID_PREFIX}"))
    })?;
    let payload = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| KeyError::InvalidKey(format!("account id is not base58: {e}")))?;
    if payload.len() <= ACCOUNT_ID_CHECKSUM_LEN {
        return Err(KeyError::InvalidKey("account id too short".to_string()));
    }

    let (public_key, checksum) = payload.split_at(payload.len() - ACCOUNT_ID_CHECKSUM_LEN);
    if checksum != crc32_koopman(public_key).to_le_bytes() {
        return Err(KeyError::InvalidKey("account id checksum mismatch".to_string()));
    }
    Ok(public_key.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Public key of the local test network's admin key and the id the
    // node reports for it.
    const ADMIN_PUBLIC: &str = "6sNQa7PV2SFzqCBtQUcQYJGGoU7XaB6R4xuCQVXNZe6b";
    const ADMIN_ID: &str = "IOSTfQFocqDn7VrKV7vvPqhAQGyeFU9XMYo5SNn5yQbdbzC75wM7C";

    fn admin_public() -> Vec<u8> {
        bs58::decode(ADMIN_PUBLIC).into_vec().unwrap()
    }

    #[test]
    fn known_public_key_derives_known_id() {
        assert_eq!(derive_account_id(&admin_public()), ADMIN_ID);
    }

    #[test]
    fn second_fixture() {
        let public = bs58::decode("6d8jQzRcxawmTebQQhrWvBvbjpSp9CnPFCFQsuBoMWQc")
            .into_vec()
            .unwrap();
        assert_eq!(
            derive_account_id(&public),
            "IOSTdo6srdnREjZBXU9Yp1i2eBkhMJLE9hu4ihmKtMBxHA1pc18Vv"
        );
    }

    #[test]
    fn derivation_is_pure() {
        let pk = admin_public();
        assert_eq!(derive_account_id(&pk), derive_account_id(&pk.clone()));
    }

    #[test]
    fn any_byte_change_changes_id() {
        let pk = admin_public();
        let original = derive_account_id(&pk);
        for i in 0..pk.len() {
            let mut tweaked = pk.clone();
            tweaked[i] ^= 0x01;
            assert_ne!(derive_account_id(&tweaked), original, "byte {i}");
        }
    }

    #[test]
    fn parse_round_trips() {
        assert_eq!(public_key_from_account_id(ADMIN_ID).unwrap(), admin_public());
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        assert!(public_key_from_account_id(&ADMIN_ID[4..]).is_err());
    }

    #[test]
    fn parse_rejects_corrupted_checksum() {
        let mut payload = admin_public();
        payload.extend_from_slice(&[0, 0, 0, 0]);
        let forged = format!("IOST{}", bs58::encode(payload).into_string());
        assert!(matches!(
            public_key_from_account_id(&forged),
            Err(KeyError::InvalidKey(msg)) if msg.contains("checksum")
        ));
    }

    #[test]
    fn parse_rejects_short_payload() {
        assert!(public_key_from_account_id("IOST1").is_err());
    }
}
