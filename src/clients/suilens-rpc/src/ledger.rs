use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use suilens::TransactionRecord;

use crate::config::ExplainerConfig;
use crate::errors::{ConfigError, FetchError};
use crate::wire::TransactionBlockResponse;

const GET_TRANSACTION_METHOD: &str = "sui_getTransactionBlock";

/// Source of fetched transactions
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// One request per call. Callers validate the digest first.
    async fn get_transaction(&self, digest: &str) -> Result<TransactionRecord, FetchError>;
}

/// Fetches transactions from a Sui fullnode over JSON-RPC
#[derive(Debug, Clone)]
pub struct SuiRpcClient {
    endpoint: Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl SuiRpcClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn from_config(config: &ExplainerConfig) -> Result<Self, ConfigError> {
        let endpoint = config.rpc_endpoint()?;
        Self::new(endpoint, Duration::from_secs(config.request_timeout_secs)).map_err(|e| {
            ConfigError::Invalid {
                field: "rpc_url",
                message: e.to_string(),
            }
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_body(digest: &str) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": GET_TRANSACTION_METHOD,
            "params": [
                digest,
                {
                    "showInput": true,
                    "showEffects": true,
                    "showEvents": true,
                    "showObjectChanges": true,
                    "showBalanceChanges": true,
                }
            ]
        })
    }
}

#[async_trait]
impl LedgerClient for SuiRpcClient {
    async fn get_transaction(&self, digest: &str) -> Result<TransactionRecord, FetchError> {
        tracing::info!(%digest, endpoint = %self.endpoint, "fetching transaction");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&Self::request_body(digest))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(rpc_error(digest, error));
        }

        let result = envelope
            .result
            .ok_or_else(|| FetchError::Malformed("response has neither result nor error".into()))?;
        let block: TransactionBlockResponse =
            serde_json::from_value(result).map_err(|e| FetchError::Malformed(e.to_string()))?;

        let record = block.into_record()?;
        tracing::debug!(
            %digest,
            status = %record.status,
            events = record.events.len(),
            "transaction fetched"
        );
        Ok(record)
    }
}

fn rpc_error(digest: &str, error: RpcErrorObject) -> FetchError {
    let message = error.message.to_lowercase();
    if message.contains("could not find") || message.contains("not exist") {
        FetchError::NotFound(digest.to_string())
    } else {
        FetchError::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}
