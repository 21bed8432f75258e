//! Values the node reports about submitted transactions.
//!
//! None of these exist while a transaction is being built and signed. They
//! arrive from the node and are layered on top of a decoded
//! [`Transaction`](super::Transaction).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::builder::Transaction;

// ---------------------------------------------------------------------------
// TransactionStatus
// ---------------------------------------------------------------------------

/// Coarse inclusion state of a transaction on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    /// In the pending pool, not yet in a block.
    Pending,
    /// In a block that may still be reverted.
    Packed,
    /// In a block below the last irreversible block.
    Irreversible,
    Unknown,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Packed => "PACKED",
            Self::Irreversible => "IRREVERSIBLE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Packed or irreversible.
    pub fn is_in_block(self) -> bool {
        matches!(self, Self::Packed | Self::Irreversible)
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => Self::Pending,
            "PACKED" => Self::Packed,
            "IRREVERSIBLE" => Self::Irreversible,
            _ => Self::Unknown,
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StatusCode
// ---------------------------------------------------------------------------

/// Execution outcome recorded in a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusCode {
    Success,
    GasRunOut,
    BalanceNotEnough,
    WrongParameter,
    RuntimeError,
    Timeout,
    WrongTxFormat,
    DuplicateSetCode,
    UnknownError,
}

impl StatusCode {
    pub const ALL: [StatusCode; 9] = [
        StatusCode::Success,
        StatusCode::GasRunOut,
        StatusCode::BalanceNotEnough,
        StatusCode::WrongParameter,
        StatusCode::RuntimeError,
        StatusCode::Timeout,
        StatusCode::WrongTxFormat,
        StatusCode::DuplicateSetCode,
        StatusCode::UnknownError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::GasRunOut => "GAS_RUN_OUT",
            Self::BalanceNotEnough => "BALANCE_NOT_ENOUGH",
            Self::WrongParameter => "WRONG_PARAMETER",
            Self::RuntimeError => "RUNTIME_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::WrongTxFormat => "WRONG_TX_FORMAT",
            Self::DuplicateSetCode => "DUPLICATE_SET_CODE",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn is_timeout(self) -> bool {
        self == Self::Timeout
    }

    /// The contract or the caller's inputs are at fault, as opposed to
    /// the transaction format or the node itself.
    pub fn is_business_failure(self) -> bool {
        matches!(
            self,
            Self::BalanceNotEnough
                | Self::WrongParameter
                | Self::RuntimeError
                | Self::GasRunOut
                | Self::DuplicateSetCode
        )
    }
}

/// Unrecognised codes become [`StatusCode::UnknownError`].
impl From<String> for StatusCode {
    fn from(s: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .unwrap_or(Self::UnknownError)
    }
}

impl From<StatusCode> for String {
    fn from(code: StatusCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

/// A log line emitted by a contract during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptEntry {
    pub func_name: String,
    pub content: String,
}

/// Execution result of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Base58 transaction hash.
    pub tx_hash: String,
    pub gas_usage: f64,
    /// RAM bytes charged per account.
    pub ram_usage: BTreeMap<String, i64>,
    pub status_code: StatusCode,
    pub message: String,
    /// One JSON-encoded return value per action.
    pub returns: Vec<String>,
    pub receipts: Vec<ReceiptEntry>,
}

impl TxReceipt {
    pub fn is_success(&self) -> bool {
        self.status_code.is_success()
    }
}

/// A transaction as the node reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct TxLookup {
    pub status: TransactionStatus,
    pub transaction: Transaction,
    /// Present once the transaction has been executed in a block.
    pub receipt: Option<TxReceipt>,
}

/// Head and last-irreversible block of the node's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub net_name: String,
    pub protocol_version: String,
    pub chain_id: u32,
    pub head_block: i64,
    pub head_block_hash: String,
    pub lib_block: i64,
    pub lib_block_hash: String,
    pub witness_list: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
