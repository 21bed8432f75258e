//! # Client Module
//!
//! The boundary between the pure core and a running node.
//!
//! ```text
//! api.rs   : NodeApi trait: send, lookup, receipt, chain info
//! http.rs  : HttpClient: NodeApi over the node's HTTP/JSON gateway
//! wire.rs  : JSON request/response shapes and conversions
//! poller.rs: TxClient: submit, poll for finality, bounded batch submit
//! error.rs : ClientError
//! ```

pub mod api;
pub mod error;
pub mod http;
pub mod poller;
pub mod wire;

pub use api::NodeApi;
pub use error::ClientError;
pub use http::HttpClient;
pub use poller::{PollConfig, TxClient};
