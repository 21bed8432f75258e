//! Signer identifiers: `"name@permission"`.
//!
//! A transaction names the accounts that must co-authorize it by account
//! name and permission (`alice@active`, `vault@owner`). [`SignerId`] keeps
//! the two halves apart in the type system and only joins them when the
//! text form is needed for hashing or the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SEPARATOR: char = '@';

/// Reasons a `"name@permission"` string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerIdError {
    #[error("signer id {0:?} has no '@' separator")]
    MissingSeparator(String),

    #[error("signer id {0:?} has more than one '@'")]
    ExtraSeparator(String),

    #[error("signer id {0:?} has an empty account name")]
    EmptyName(String),

    #[error("signer id {0:?} has an empty permission")]
    EmptyPermission(String),

    #[error("signer id {0:?} contains whitespace")]
    Whitespace(String),
}

/// An account name plus the permission it signs with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignerId {
    name: String,
    permission: String,
}

impl SignerId {
    pub fn new(name: impl Into<String>, permission: impl Into<String>) -> Result<Self, SignerIdError> {
        let id = Self {
            name: name.into(),
            permission: permission.into(),
        };
        id.validate()?;
        Ok(id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    fn validate(&self) -> Result<(), SignerIdError> {
        let text = || self.to_string();
        if self.name.is_empty() {
            return Err(SignerIdError::EmptyName(text()));
        }
        if self.permission.is_empty() {
            return Err(SignerIdError::EmptyPermission(text()));
        }
        if self.name.contains(SEPARATOR) || self.permission.contains(SEPARATOR) {
            return Err(SignerIdError::ExtraSeparator(text()));
        }
        if self.name.chars().chain(self.permission.chars()).any(char::is_whitespace) {
            return Err(SignerIdError::Whitespace(text()));
        }
        Ok(())
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.name, self.permission)
    }
}

impl FromStr for SignerId {
    type Err = SignerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, permission) = s
            .split_once(SEPARATOR)
            .ok_or_else(|| SignerIdError::MissingSeparator(s.to_string()))?;
        Self::new(name, permission)
    }
}

impl TryFrom<String> for SignerId {
    type Error = SignerIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SignerId> for String {
    fn from(id: SignerId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format_round_trip() {
        let id: SignerId = "alice@active".parse().unwrap();
        assert_eq!(id.name(), "alice");
        assert_eq!(id.permission(), "active");
        assert_eq!(id.to_string(), "alice@active");
    }

    #[test]
    fn new_matches_parse() {
        assert_eq!(
            SignerId::new("vault", "owner").unwrap(),
            "vault@owner".parse::<SignerId>().unwrap()
        );
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!("alice".parse::<SignerId>(), Err(SignerIdError::MissingSeparator(_))));
        assert!(matches!("@active".parse::<SignerId>(), Err(SignerIdError::EmptyName(_))));
        assert!(matches!("alice@".parse::<SignerId>(), Err(SignerIdError::EmptyPermission(_))));
        assert!(matches!("a@b@c".parse::<SignerId>(), Err(SignerIdError::ExtraSeparator(_))));
        assert!(matches!("al ice@active".parse::<SignerId>(), Err(SignerIdError::Whitespace(_))));
    }

    #[test]
    fn serde_uses_text_form() {
        let id = SignerId::new("bob", "active").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bob@active\"");
        let back: SignerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<SignerId>("\"bob\"").is_err());
    }
}
