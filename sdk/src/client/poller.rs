//! Submission and finality polling.
//!
//! Submitting returns a hash at once. [`TxClient::wait_for_receipt`] then
//! polls on a fixed interval, at most `max_retries` times, and sorts each
//! answer into one of three outcomes:
//!
//! - **success**: the receipt says `SUCCESS` (and, with `wait_irreversible`,
//!   the block is irreversible);
//! - **keep polling**: no receipt yet, or a transient fetch error;
//! - **failure**: `TIMEOUT` becomes [`ClientError::Timeout`], any other code
//!   [`ClientError::Transaction`].
//!
//! Running out of attempts is also a [`ClientError::Timeout`]. Resubmitting
//! after a timeout needs a freshly built transaction; the old one's
//! expiration is already counting down.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::api::NodeApi;
use super::error::ClientError;
use super::http::HttpClient;
use crate::config::{DEFAULT_MAX_POLL_RETRIES, DEFAULT_POLL_INTERVAL};
use crate::transaction::{PermissionError, StatusCode, Transaction, TransactionStatus, TxReceipt};

/// How [`TxClient`] waits for a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Sleep before every poll.
    pub interval: Duration,
    pub max_retries: u32,
    /// Report success only once the block is irreversible.
    pub wait_irreversible: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_retries: DEFAULT_MAX_POLL_RETRIES,
            wait_irreversible: false,
        }
    }
}

/// Submits transactions to a [`NodeApi`] and waits for their receipts.
#[derive(Debug, Clone)]
pub struct TxClient<A> {
    api: A,
    poll: PollConfig,
}

impl TxClient<HttpClient> {
    /// Connects to the node at `url`.
    pub async fn connect(url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::new(HttpClient::connect(url).await?))
    }
}

impl<A: NodeApi> TxClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            poll: PollConfig::default(),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Submits a published transaction and returns the node's hash.
    pub async fn send(&self, tx: &Transaction) -> Result<String, ClientError> {
        if tx.publisher().is_empty() {
            return Err(PermissionError::MissingPublisher.into());
        }
        if tx.publisher_signatures().is_empty() {
            return Err(PermissionError::MissingPublisherSignature {
                publisher: tx.publisher().to_string(),
            }
            .into());
        }

        let local = tx.hash_base58();
        let hash = self.api.send_tx(tx).await?;
        if hash != local {
            warn!(node_hash = %hash, local_hash = %local, "node hash differs from local hash");
        }
        info!(tx_hash = %hash, publisher = tx.publisher(), actions = tx.actions().len(), "transaction submitted");
        Ok(hash)
    }

    /// Polls until `hash` has a final receipt. See the module docs for how
    /// each answer is classified.
    pub async fn wait_for_receipt(&self, hash: &str) -> Result<TxReceipt, ClientError> {
        for attempt in 1..=self.poll.max_retries {
            tokio::time::sleep(self.poll.interval).await;
            match self.poll_once(hash).await {
                Ok(Some(receipt)) => return classify(hash, receipt),
                Ok(None) => debug!(tx_hash = hash, attempt, "no final receipt yet"),
                Err(e) if e.is_transient() => {
                    debug!(tx_hash = hash, attempt, error = %e, "receipt fetch failed, retrying")
                }
                Err(e) => return Err(e),
            }
        }
        Err(ClientError::Timeout {
            tx_hash: hash.to_string(),
            reason: format!("no final receipt after {} polls", self.poll.max_retries),
        })
    }

    async fn poll_once(&self, hash: &str) -> Result<Option<TxReceipt>, ClientError> {
        if !self.poll.wait_irreversible {
            return self.api.get_tx_receipt(hash).await.map(Some);
        }

        let lookup = self.api.get_tx_by_hash(hash).await?;
        match lookup.receipt {
            // A failed execution stays failed; no need to wait for finality.
            Some(receipt) if !receipt.is_success() => Ok(Some(receipt)),
            Some(receipt) if lookup.status == TransactionStatus::Irreversible => Ok(Some(receipt)),
            None if lookup.status == TransactionStatus::Irreversible => {
                self.api.get_tx_receipt(hash).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    /// [`send`](Self::send) then [`wait_for_receipt`](Self::wait_for_receipt).
    pub async fn send_and_wait(&self, tx: &Transaction) -> Result<TxReceipt, ClientError> {
        let hash = self.send(tx).await?;
        self.wait_for_receipt(&hash).await
    }

    /// Submits every transaction with at most `concurrency` in flight.
    /// Results come back in input order.
    pub async fn send_and_wait_all(
        &self,
        txs: &[Transaction],
        concurrency: usize,
    ) -> Vec<Result<TxReceipt, ClientError>> {
        stream::iter(txs)
            .map(|tx| self.send_and_wait(tx))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

fn classify(hash: &str, receipt: TxReceipt) -> Result<TxReceipt, ClientError> {
    match receipt.status_code {
        StatusCode::Success => {
            debug!(tx_hash = hash, gas = receipt.gas_usage, "transaction succeeded");
            Ok(receipt)
        }
        StatusCode::Timeout => Err(ClientError::Timeout {
            tx_hash: hash.to_string(),
            reason: receipt.message,
        }),
        status_code => Err(ClientError::Transaction {
            status_code,
            message: receipt.message,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn receipt(code: StatusCode) -> TxReceipt {
        TxReceipt {
            tx_hash: "h".into(),
            gas_usage: 1.0,
            ram_usage: BTreeMap::new(),
            status_code: code,
            message: format!("{code}"),
            returns: vec![],
            receipts: vec![],
        }
    }

    #[test]
    fn every_status_code_has_one_outcome() {
        for code in StatusCode::ALL {
            let outcome = classify("h", receipt(code));
            match code {
                StatusCode::Success => assert!(outcome.is_ok()),
                StatusCode::Timeout => assert!(matches!(outcome, Err(ClientError::Timeout { .. }))),
                _ => assert!(matches!(
                    outcome,
                    Err(ClientError::Transaction { status_code, .. }) if status_code == code
                )),
            }
        }
    }

    #[test]
    fn default_poll_config_comes_from_constants() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval, Duration::from_secs(1));
        assert_eq!(poll.max_retries, 90);
        assert!(!poll.wait_irreversible);
    }
}
