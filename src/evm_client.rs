//! EVM Client Module
//!
//! This module provides a client for communicating with EVM-compatible blockchain nodes
//! via their JSON-RPC API. It covers the read-only calls a status lookup needs:
//! contract view calls, log queries and the current block number.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::LogQueryConfig;

// ============================================================================
// API RESPONSE STRUCTURES
// ============================================================================

/// EVM JSON-RPC request wrapper
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Vec<serde_json::Value>,
    id: u64,
}

/// EVM JSON-RPC response wrapper
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<T>,
    error: Option<JsonRpcError>,
    #[allow(dead_code)]
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// EVM event log entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvmLog {
    /// Address of the contract that emitted the event
    pub address: String,
    /// Array of topics (indexed event parameters)
    pub topics: Vec<String>,
    /// Event data (non-indexed parameters)
    pub data: String,
    /// Block number (JSON-RPC uses camelCase: blockNumber)
    #[serde(rename = "blockNumber")]
    pub block_number: String,
    /// Transaction hash (JSON-RPC uses camelCase: transactionHash)
    #[serde(rename = "transactionHash")]
    pub transaction_hash: String,
    /// Log index (JSON-RPC uses camelCase: logIndex)
    #[serde(rename = "logIndex")]
    pub log_index: String,
}

/// Address and topic filter for eth_getLogs
///
/// `None` topics are sent as `null` and match any value in that position.
#[derive(Debug, Clone)]
pub struct LogFilter {
    /// Contract address emitting the logs
    pub address: String,
    /// Positional topic filter (topics[0] is the event signature)
    pub topics: Vec<Option<String>>,
}

impl LogFilter {
    fn to_params(&self, from_block: &str, to_block: &str) -> serde_json::Value {
        serde_json::json!({
            "address": self.address,
            "topics": self.topics,
            "fromBlock": from_block,
            "toBlock": to_block,
        })
    }
}

fn block_tag(block: u64) -> String {
    format!("0x{:x}", block)
}

// ============================================================================
// EVM CLIENT IMPLEMENTATION
// ============================================================================

/// Client for communicating with EVM-compatible blockchain nodes via JSON-RPC
#[derive(Debug, Clone)]
pub struct EvmClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the EVM node (e.g., "http://127.0.0.1:8545")
    base_url: String,
}

impl EvmClient {
    /// Creates a new EVM client for the given node URL
    ///
    /// # Arguments
    ///
    /// * `node_url` - Base URL of the EVM node (e.g., "http://127.0.0.1:8545")
    /// * `timeout` - Per-request timeout
    ///
    /// # Returns
    ///
    /// * `Ok(EvmClient)` - Successfully created client
    /// * `Err(anyhow::Error)` - Failed to create client
    pub fn new(node_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: node_url.to_string(),
        })
    }

    /// Generic JSON-RPC call helper.
    ///
    /// Returns `Ok(None)` when the node answers with a `null` result.
    async fn json_rpc<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<Option<T>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        debug!("{} -> {}", method, self.base_url);

        let response: JsonRpcResponse<T> = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to {}", method, self.base_url))?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response from {}", method, self.base_url))?;

        if let Some(error) = response.error {
            return Err(anyhow::anyhow!(
                "JSON-RPC error from {} ({}): {} (code: {})",
                self.base_url,
                method,
                error.message,
                error.code
            ));
        }

        Ok(response.result)
    }

    /// Executes a read-only contract call with eth_call against the latest block
    ///
    /// # Arguments
    ///
    /// * `to` - Contract address
    /// * `data` - 0x-prefixed calldata
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - 0x-prefixed ABI-encoded return data
    /// * `Err(anyhow::Error)` - Call failed or reverted
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String> {
        let params = vec![
            serde_json::json!({
                "to": to,
                "data": data,
            }),
            serde_json::json!("latest"),
        ];

        self.json_rpc::<String>("eth_call", params)
            .await?
            .ok_or_else(|| anyhow::anyhow!("No result in eth_call response for contract {}", to))
    }

    /// Queries logs with eth_getLogs over an explicit block range
    ///
    /// A `null` result is treated as no logs.
    pub async fn get_logs(
        &self,
        filter: &LogFilter,
        from_block: &str,
        to_block: &str,
    ) -> Result<Vec<EvmLog>> {
        let logs = self
            .json_rpc::<Vec<EvmLog>>("eth_getLogs", vec![filter.to_params(from_block, to_block)])
            .await?;
        Ok(logs.unwrap_or_default())
    }

    /// Gets the current block number
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Current block number
    /// * `Err(anyhow::Error)` - Failed to query block number
    pub async fn get_block_number(&self) -> Result<u64> {
        let block_number_hex = self
            .json_rpc::<String>("eth_blockNumber", vec![])
            .await?
            .ok_or_else(|| anyhow::anyhow!("No result in eth_blockNumber response"))?;

        let block_number = u64::from_str_radix(
            block_number_hex
                .strip_prefix("0x")
                .unwrap_or(&block_number_hex),
            16,
        )
        .context("Failed to parse block number")?;

        Ok(block_number)
    }

    /// Walks the logs matching `filter` in chain order and returns the first value
    /// `matcher` produces.
    ///
    /// Without a page size a single query covers `from_block..latest`. With a page size
    /// the head block is read once and the range is queried in windows of that many
    /// blocks, stopping at the first match. Both modes yield the same first match.
    pub async fn scan_logs<T, F>(
        &self,
        filter: &LogFilter,
        query: &LogQueryConfig,
        mut matcher: F,
    ) -> Result<Option<T>>
    where
        F: FnMut(&EvmLog) -> Result<Option<T>>,
    {
        let page_size = match query.page_size {
            None => {
                let logs = self
                    .get_logs(filter, &block_tag(query.from_block), "latest")
                    .await?;
                debug!("Scanning {} logs from {}", logs.len(), filter.address);
                for log in &logs {
                    if let Some(found) = matcher(log)? {
                        return Ok(Some(found));
                    }
                }
                return Ok(None);
            }
            Some(page_size) => page_size.max(1),
        };

        let head = self.get_block_number().await?;
        let mut start = query.from_block;
        while start <= head {
            let end = start.saturating_add(page_size - 1).min(head);
            let logs = self
                .get_logs(filter, &block_tag(start), &block_tag(end))
                .await?;
            debug!(
                "Scanning {} logs from {} in blocks {}..={}",
                logs.len(),
                filter.address,
                start,
                end
            );
            for log in &logs {
                if let Some(found) = matcher(log)? {
                    return Ok(Some(found));
                }
            }
            if end == u64::MAX {
                break;
            }
            start = end + 1;
        }

        Ok(None)
    }
}
