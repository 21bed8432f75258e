//! Per-token spending caps declared on a transaction.
//!
//! The node refuses to let a transaction move more of `token` than its
//! limit allows. The bound is kept as text because that is how it is
//! hashed: either a non-negative decimal (`"100"`, `"10.5"`) or the literal
//! `"unlimited"`.

use serde::Serialize;
use thiserror::Error;

use crate::config::{ANY_TOKEN, UNLIMITED};
use crate::encoding::{CanonicalEncode, CanonicalEncoder};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountLimitError {
    #[error("amount limit token is empty")]
    EmptyToken,

    #[error("amount limit bound {0:?} is neither a non-negative decimal nor \"unlimited\"")]
    InvalidBound(String),
}

/// `(token, bound)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AmountLimit {
    token: String,
    value: String,
}

impl AmountLimit {
    pub fn new(token: impl Into<String>, bound: impl Into<String>) -> Result<Self, AmountLimitError> {
        let token = token.into();
        let value = bound.into();
        if token.is_empty() {
            return Err(AmountLimitError::EmptyToken);
        }
        if value != UNLIMITED && !is_decimal(&value) {
            return Err(AmountLimitError::InvalidBound(value));
        }
        Ok(Self { token, value })
    }

    /// No cap on `token`.
    pub fn unlimited(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value: UNLIMITED.to_string(),
        }
    }

    /// Taken verbatim from a node response.
    pub fn from_raw(token: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_unlimited(&self) -> bool {
        self.value == UNLIMITED
    }
}

/// Any token, no cap.
impl Default for AmountLimit {
    fn default() -> Self {
        Self::unlimited(ANY_TOKEN)
    }
}

impl CanonicalEncode for AmountLimit {
    fn encode(&self, enc: &mut CanonicalEncoder) {
        enc.write_string(&self.token).write_string(&self.value);
    }
}

/// `digits` or `digits.digits`.
fn is_decimal(s: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(s),
    }
}
