//! The node operations the SDK depends on.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::ClientError;
use crate::transaction::{ChainInfo, Transaction, TxLookup, TxReceipt};

/// A node's transaction endpoints.
///
/// [`HttpClient`](super::HttpClient) talks to a real node; tests plug in
/// scripted implementations.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Submits a published transaction. Returns the node's base58 hash.
    async fn send_tx(&self, tx: &Transaction) -> Result<String, ClientError>;

    async fn get_tx_by_hash(&self, hash: &str) -> Result<TxLookup, ClientError>;

    async fn get_tx_receipt(&self, hash: &str) -> Result<TxReceipt, ClientError>;

    async fn get_chain_info(&self) -> Result<ChainInfo, ClientError>;
}

#[async_trait]
impl<A: NodeApi + ?Sized> NodeApi for Arc<A> {
    async fn send_tx(&self, tx: &Transaction) -> Result<String, ClientError> {
        (**self).send_tx(tx).await
    }

    async fn get_tx_by_hash(&self, hash: &str) -> Result<TxLookup, ClientError> {
        (**self).get_tx_by_hash(hash).await
    }

    async fn get_tx_receipt(&self, hash: &str) -> Result<TxReceipt, ClientError> {
        (**self).get_tx_receipt(hash).await
    }

    async fn get_chain_info(&self) -> Result<ChainInfo, ClientError> {
        (**self).get_chain_info().await
    }
}
