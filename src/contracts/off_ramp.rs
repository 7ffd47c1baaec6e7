//! CCIP Off-Ramp
//!
//! Parses `ExecutionStateChanged` logs and searches them for a message id.

use anyhow::{Context, Result};
use tracing::warn;

use super::message_ids_match;
use crate::abi::{self, WORD};
use crate::config::LogQueryConfig;
use crate::error::StatusError;
use crate::evm_client::{EvmClient, EvmLog, LogFilter};
use crate::state::MessageExecutionState;

/// `ExecutionStateChanged(uint64 indexed sequenceNumber, bytes32 indexed messageId,
/// MessageExecutionState state, bytes returnData)`
pub const EXECUTION_STATE_CHANGED: &str = "ExecutionStateChanged(uint64,bytes32,uint8,bytes)";

/// ExecutionStateChanged event data parsed from EVM logs
#[derive(Debug, Clone)]
pub struct ExecutionStateChangedEvent {
    /// Sequence number (indexed, first topic after the signature)
    pub sequence_number: u64,
    /// Message id (indexed, second topic after the signature)
    pub message_id: String,
    /// Raw MessageExecutionState code
    pub state: u8,
    /// Receiver return data or revert reason (0x-prefixed hex)
    pub return_data: String,
    pub block_number: String,
    pub transaction_hash: String,
}

impl ExecutionStateChangedEvent {
    /// Decodes an ExecutionStateChanged log
    pub fn from_log(log: &EvmLog) -> Result<Self> {
        // topics[0] = event signature
        // topics[1] = sequenceNumber (uint64, padded to 32 bytes)
        // topics[2] = messageId (bytes32)
        // data = abi.encode(state, returnData)
        if log.topics.len() < 3 {
            anyhow::bail!(
                "ExecutionStateChanged log has {} topics, expected 3",
                log.topics.len()
            );
        }

        let data = abi::decode_hex(&log.data)?;
        let state = abi::read_u8(&data, 0)?;
        let return_data_start = abi::read_offset(&data, WORD, 0)?;
        let return_data = abi::read_bytes(&data, return_data_start)?;

        Ok(Self {
            sequence_number: abi::topic_u64(&log.topics[1])?,
            message_id: log.topics[2].to_lowercase(),
            state,
            return_data: format!("0x{}", hex::encode(return_data)),
            block_number: log.block_number.clone(),
            transaction_hash: log.transaction_hash.clone(),
        })
    }

    /// Maps the raw state code to its label
    pub fn execution_state(&self) -> Result<MessageExecutionState, StatusError> {
        MessageExecutionState::try_from(self.state)
    }
}

/// Off-ramp contract on the destination chain
#[derive(Debug)]
pub struct OffRamp<'a> {
    client: &'a EvmClient,
    address: String,
}

impl<'a> OffRamp<'a> {
    pub fn new(client: &'a EvmClient, address: &str) -> Self {
        Self {
            client,
            address: address.to_string(),
        }
    }

    /// Searches ExecutionStateChanged logs for `message_id`.
    ///
    /// The node filters on the indexed message id; results are still checked locally
    /// since not every node honours topic filters.
    pub async fn find_execution_state_change(
        &self,
        message_id: &str,
        query: &LogQueryConfig,
    ) -> Result<Option<ExecutionStateChangedEvent>> {
        let filter = LogFilter {
            address: self.address.clone(),
            topics: vec![
                Some(abi::event_topic(EXECUTION_STATE_CHANGED)),
                None,
                Some(message_id.to_lowercase()),
            ],
        };

        self.client
            .scan_logs(&filter, query, |log| {
                let Some(id) = log.topics.get(2) else {
                    warn!(
                        "Skipping ExecutionStateChanged log without messageId topic in tx {}",
                        log.transaction_hash
                    );
                    return Ok(None);
                };
                if !message_ids_match(id, message_id) {
                    return Ok(None);
                }
                ExecutionStateChangedEvent::from_log(log)
                    .map(Some)
                    .with_context(|| format!("Failed to decode ExecutionStateChanged for {}", id))
            })
            .await
    }
}
