//! Error types for the transaction client.
//!
//! Every node interaction returns a [`ClientError`]. Local construction
//! errors (`Permission`, `Key`) pass through unchanged so callers can match
//! on them without unwrapping a string.

use thiserror::Error;

use crate::crypto::keys::KeyError;
use crate::transaction::types::StatusCode;
use crate::transaction::verification::PermissionError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The node could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The node answered with a non-success HTTP status.
    #[error("node returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The node's answer could not be decoded.
    #[error("malformed node response: {0}")]
    Decode(String),

    /// The node executed the transaction and reported a failure.
    #[error("transaction failed with {status_code}: {message}")]
    Transaction {
        status_code: StatusCode,
        message: String,
    },

    /// No final receipt within the polling bound, or the receipt itself
    /// says `TIMEOUT`.
    #[error("transaction {tx_hash} timed out: {reason}")]
    Timeout { tx_hash: String, reason: String },

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

impl ClientError {
    /// Worth retrying while polling: the node may simply not have the
    /// answer yet or was briefly unreachable.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Connection(_) | ClientError::Http { .. })
    }

    /// A failure caused by the contract or the caller's inputs rather than
    /// by the node or the transaction format.
    pub fn is_business_failure(&self) -> bool {
        matches!(self, ClientError::Transaction { status_code, .. } if status_code.is_business_failure())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Connection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ClientError::Connection("refused".into()).is_transient());
        assert!(ClientError::Http {
            status: 500,
            body: "tx not found".into()
        }
        .is_transient());
        assert!(!ClientError::Decode("bad json".into()).is_transient());
        assert!(!ClientError::Timeout {
            tx_hash: "h".into(),
            reason: "r".into()
        }
        .is_transient());
    }

    #[test]
    fn business_failures_are_distinguished() {
        let balance = ClientError::Transaction {
            status_code: StatusCode::BalanceNotEnough,
            message: "balance not enough".into(),
        };
        let format = ClientError::Transaction {
            status_code: StatusCode::WrongTxFormat,
            message: "bad".into(),
        };
        assert!(balance.is_business_failure());
        assert!(!format.is_business_failure());
    }

    #[test]
    fn permission_errors_convert() {
        let err: ClientError = PermissionError::MissingPublisher.into();
        assert!(matches!(err, ClientError::Permission(PermissionError::MissingPublisher)));
        assert_eq!(err.to_string(), "transaction has no publisher");
    }

    #[test]
    fn json_errors_are_decode_errors() {
        let err: ClientError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
