//! # Transaction Module
//!
//! Construction, canonical hashing, signing and verification of IOST
//! transactions, plus the value types the node reports back about them.
//!
//! ## Architecture
//!
//! ```text
//! action.rs      : Action (one contract call) and its JSON argument encoding
//! amount_limit.rs: AmountLimit (per-token spending cap)
//! builder.rs     : Transaction, TransactionBuilder, canonical bytes and hashes
//! signing.rs     : signer and publisher signatures
//! verification.rs: verify_self, VerifyPolicy, PermissionError
//! types.rs       : TransactionStatus, StatusCode, TxReceipt, TxLookup, ChainInfo
//! ```
//!
//! ## Signing lifecycle
//!
//! 1. **Build**: `Transaction::new()` or [`TransactionBuilder`], then
//!    `add_action`, `add_signer`, `add_amount_limit`.
//! 2. **Sign**: each declared signer calls `add_signature` over the base
//!    hash.
//! 3. **Publish**: the submitting account calls `add_publisher_signature`
//!    over the publish hash.
//! 4. **Verify**: `verify_self` before handing the transaction to a
//!    [`TxClient`](crate::client::TxClient).
//!
//! After submission the node reports `PENDING`, then `PACKED`, then
//! `IRREVERSIBLE`.

pub mod action;
pub mod amount_limit;
pub mod builder;
pub mod signing;
pub mod types;
pub mod verification;

pub use action::{Action, ActionArg, ActionError};
pub use amount_limit::{AmountLimit, AmountLimitError};
pub use builder::{SigningState, Transaction, TransactionBuilder};
pub use types::{ChainInfo, ReceiptEntry, StatusCode, TransactionStatus, TxLookup, TxReceipt};
pub use verification::{PermissionError, VerifyPolicy};
