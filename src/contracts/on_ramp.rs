//! CCIP On-Ramp
//!
//! Parses `CCIPSendRequested` logs and searches them for a message id.

use anyhow::{Context, Result};
use ethereum_types::U256;
use tracing::warn;

use super::message_ids_match;
use crate::abi::{self, WORD};
use crate::config::LogQueryConfig;
use crate::evm_client::{EvmClient, EvmLog, LogFilter};

/// `CCIPSendRequested(Internal.EVM2EVMMessage message)`
///
/// EVM2EVMMessage field order: sourceChainSelector, sender, receiver, sequenceNumber,
/// gasLimit, strict, nonce, feeToken, feeTokenAmount, data, tokenAmounts,
/// sourceTokenData, messageId.
pub const CCIP_SEND_REQUESTED: &str = "CCIPSendRequested((uint64,address,address,uint64,uint256,bool,uint64,address,uint256,bytes,(address,uint256)[],bytes[],bytes32))";

// Head word positions inside the EVM2EVMMessage tuple
const SOURCE_CHAIN_SELECTOR: usize = 0;
const SENDER: usize = 1;
const RECEIVER: usize = 2;
const SEQUENCE_NUMBER: usize = 3;
const GAS_LIMIT: usize = 4;
const STRICT: usize = 5;
const NONCE: usize = 6;
const FEE_TOKEN: usize = 7;
const FEE_TOKEN_AMOUNT: usize = 8;
const DATA: usize = 9;
const TOKEN_AMOUNTS: usize = 10;
const MESSAGE_ID: usize = 12;

/// Token and amount transferred with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAmount {
    pub token: String,
    pub amount: U256,
}

/// CCIPSendRequested event data parsed from EVM logs
#[derive(Debug, Clone)]
pub struct SendRequestedEvent {
    pub source_chain_selector: u64,
    pub sender: String,
    pub receiver: String,
    pub sequence_number: u64,
    pub gas_limit: U256,
    pub strict: bool,
    pub nonce: u64,
    pub fee_token: String,
    pub fee_token_amount: U256,
    /// Message payload (0x-prefixed hex)
    pub data: String,
    pub token_amounts: Vec<TokenAmount>,
    /// Message id (0x-prefixed lowercase hex)
    pub message_id: String,
    pub block_number: String,
    pub transaction_hash: String,
}

fn tuple_start(data: &[u8]) -> Result<usize> {
    // The single non-indexed tuple parameter is dynamic, so data starts with its offset
    abi::read_offset(data, 0, 0)
}

fn field(tuple: usize, index: usize) -> usize {
    tuple + index * WORD
}

/// Reads only the message id of a CCIPSendRequested log
pub fn message_id_of(log: &EvmLog) -> Result<String> {
    let data = abi::decode_hex(&log.data)?;
    let tuple = tuple_start(&data)?;
    abi::read_bytes32(&data, field(tuple, MESSAGE_ID))
}

impl SendRequestedEvent {
    /// Decodes a CCIPSendRequested log
    pub fn from_log(log: &EvmLog) -> Result<Self> {
        let data = abi::decode_hex(&log.data)?;
        let tuple = tuple_start(&data)?;

        let payload_start = abi::read_offset(&data, field(tuple, DATA), tuple)?;
        let payload = abi::read_bytes(&data, payload_start)?;

        let tokens_start = abi::read_offset(&data, field(tuple, TOKEN_AMOUNTS), tuple)?;
        let token_count = abi::read_length(&data, tokens_start)?;
        let mut token_amounts = Vec::with_capacity(token_count);
        for i in 0..token_count {
            let entry = tokens_start + WORD + i * 2 * WORD;
            token_amounts.push(TokenAmount {
                token: abi::read_address(&data, entry)?,
                amount: abi::read_u256(&data, entry + WORD)?,
            });
        }

        Ok(Self {
            source_chain_selector: abi::read_u64(&data, field(tuple, SOURCE_CHAIN_SELECTOR))?,
            sender: abi::read_address(&data, field(tuple, SENDER))?,
            receiver: abi::read_address(&data, field(tuple, RECEIVER))?,
            sequence_number: abi::read_u64(&data, field(tuple, SEQUENCE_NUMBER))?,
            gas_limit: abi::read_u256(&data, field(tuple, GAS_LIMIT))?,
            strict: abi::read_bool(&data, field(tuple, STRICT))?,
            nonce: abi::read_u64(&data, field(tuple, NONCE))?,
            fee_token: abi::read_address(&data, field(tuple, FEE_TOKEN))?,
            fee_token_amount: abi::read_u256(&data, field(tuple, FEE_TOKEN_AMOUNT))?,
            data: format!("0x{}", hex::encode(payload)),
            token_amounts,
            message_id: abi::read_bytes32(&data, field(tuple, MESSAGE_ID))?,
            block_number: log.block_number.clone(),
            transaction_hash: log.transaction_hash.clone(),
        })
    }
}

/// On-ramp contract on the source chain
#[derive(Debug)]
pub struct OnRamp<'a> {
    client: &'a EvmClient,
    address: String,
}

impl<'a> OnRamp<'a> {
    pub fn new(client: &'a EvmClient, address: &str) -> Self {
        Self {
            client,
            address: address.to_string(),
        }
    }

    /// Searches the on-ramp's CCIPSendRequested history for `message_id`.
    ///
    /// Logs whose message id cannot be read are skipped. A matching log that fails to
    /// decode is an error.
    pub async fn find_message(
        &self,
        message_id: &str,
        query: &LogQueryConfig,
    ) -> Result<Option<SendRequestedEvent>> {
        let filter = LogFilter {
            address: self.address.clone(),
            topics: vec![Some(abi::event_topic(CCIP_SEND_REQUESTED))],
        };

        self.client
            .scan_logs(&filter, query, |log| {
                let id = match message_id_of(log) {
                    Ok(id) => id,
                    Err(e) => {
                        warn!(
                            "Skipping malformed CCIPSendRequested log in tx {}: {}",
                            log.transaction_hash, e
                        );
                        return Ok(None);
                    }
                };
                if !message_ids_match(&id, message_id) {
                    return Ok(None);
                }
                SendRequestedEvent::from_log(log)
                    .map(Some)
                    .with_context(|| format!("Failed to decode CCIPSendRequested for {}", id))
            })
            .await
    }
}
