//! [`NodeApi`] over the node's HTTP/JSON gateway.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::api::NodeApi;
use super::error::ClientError;
use super::wire::{ChainInfoJson, ReceiptJson, SendTxResponse, TransactionJson, TxByHashResponse};
use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::transaction::{ChainInfo, Transaction, TxLookup, TxReceipt};

/// HTTP client for one node.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Builds a client without contacting the node.
    pub fn new(url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Connection(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client and checks the node answers `/getChainInfo`. Any
    /// failure here is a [`ClientError::Connection`].
    pub async fn connect(url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Self::new(url)?;
        let info = client.get_chain_info().await.map_err(|e| {
            ClientError::Connection(format!("node at {} is unreachable: {e}", client.base_url))
        })?;
        info!(
            url = %client.base_url,
            net = %info.net_name,
            chain_id = info.chain_id,
            head_block = info.head_block,
            "connected to node"
        );
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl NodeApi for HttpClient {
    async fn send_tx(&self, tx: &Transaction) -> Result<String, ClientError> {
        let body = TransactionJson::from(tx);
        let response: SendTxResponse = self.post("sendTx", &body).await?;
        Ok(response.hash)
    }

    async fn get_tx_by_hash(&self, hash: &str) -> Result<TxLookup, ClientError> {
        let response: TxByHashResponse = self.get(&format!("getTxByHash/{hash}")).await?;
        response.try_into()
    }

    async fn get_tx_receipt(&self, hash: &str) -> Result<TxReceipt, ClientError> {
        let response: ReceiptJson = self.get(&format!("getTxReceiptByTxHash/{hash}")).await?;
        Ok(response.into())
    }

    async fn get_chain_info(&self) -> Result<ChainInfo, ClientError> {
        let response: ChainInfoJson = self.get("getChainInfo").await?;
        Ok(response.into())
    }
}
