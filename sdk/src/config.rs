//! # SDK Configuration & Constants
//!
//! Every magic number the SDK relies on lives here. Most of them are not
//! ours to choose: the node hashes the same bytes we do, so anything that
//! feeds the canonical encoding (gas scale, checksum polynomial, id prefix)
//! must match what the chain expects bit for bit.
//!
//! The remaining values are client-side defaults (TTL, gas, polling) that
//! callers override through [`TransactionBuilder`](crate::transaction::TransactionBuilder)
//! and [`PollConfig`](crate::client::PollConfig).

use std::time::Duration;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Prefix of every account id derived from a public key.
pub const ACCOUNT_ID_PREFIX: &str = "IOST";

/// Reflected Koopman polynomial used for the 4-byte account id checksum.
pub const CRC32_KOOPMAN: u32 = 0xEB31_D82E;

/// Length of the little-endian checksum appended to the public key before
/// base58 encoding.
pub const ACCOUNT_ID_CHECKSUM_LEN: usize = 4;

/// Permission whose key signs as publisher when an [`Account`](crate::identity::Account)
/// publishes a transaction.
pub const DEFAULT_PUBLISHER_PERMISSION: &str = "active";

// ---------------------------------------------------------------------------
// Transaction Defaults
// ---------------------------------------------------------------------------

/// Seconds between creation and expiration for a new transaction.
pub const DEFAULT_EXPIRATION_SECS: i64 = 90;

/// Gas price multiplier. The node accepts ratios between 1 and 100.
pub const DEFAULT_GAS_RATIO: f64 = 1.0;

/// Upper bound of gas a transaction may consume.
pub const DEFAULT_GAS_LIMIT: f64 = 10_000.0;

/// Deferred execution delay in nanoseconds. Zero executes immediately.
pub const DEFAULT_DELAY_NS: i64 = 0;

/// Chain id of the public IOST networks.
pub const DEFAULT_CHAIN_ID: u32 = 1024;

/// Gas fields are multiplied by this factor and truncated before they enter
/// the canonical encoding. Anything past two decimals is lost.
pub const GAS_SCALE: f64 = 100.0;

/// Nanoseconds per second, for expiration arithmetic.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Token wildcard used by the default amount limit.
pub const ANY_TOKEN: &str = "*";

/// Bound literal meaning "no cap".
pub const UNLIMITED: &str = "unlimited";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP gateway of a locally running node.
pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:30001";

/// Per-request timeout for the HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sleep between two receipt lookups.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Receipt lookups before giving up. With the default interval this
/// roughly covers the default expiration window.
pub const DEFAULT_MAX_POLL_RETRIES: u32 = 90;

/// Transactions in flight at once for batch submission.
pub const DEFAULT_SUBMIT_CONCURRENCY: usize = 8;
