//! Shared test helpers for unit tests
//!
//! This module provides helper functions used by unit tests.
//!
//! The module is organized into several categories:
//! - **Constants**: Dummy addresses, ids, selectors and other test values
//! - **Configuration Builders**: Test configurations pointing at mock servers
//! - **ABI Payload Builders**: Encoded router results and event log payloads
//! - **Mock Server Setup Helpers**: WireMock mounts for JSON-RPC calls

#![allow(dead_code)]

use ccip_status::abi::{self, encode_u64, WORD};
use ccip_status::config::{ChainConfig, Config, LogQueryConfig};
use ccip_status::contracts::off_ramp::EXECUTION_STATE_CHANGED;
use ccip_status::contracts::on_ramp::CCIP_SEND_REQUESTED;
use ccip_status::contracts::router::{GET_OFF_RAMPS, GET_ON_RAMP, IS_CHAIN_SUPPORTED};
use serde_json::json;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// CONSTANTS
// ============================================================================

// --------------------------------- IDs ----------------------------------

/// Dummy message id (64 hex characters)
pub const DUMMY_MESSAGE_ID: &str =
    "0xabc0000000000000000000000000000000000000000000000000000000000001";

/// Another message id that never matches DUMMY_MESSAGE_ID
pub const DUMMY_OTHER_MESSAGE_ID: &str =
    "0xabc0000000000000000000000000000000000000000000000000000000000002";

/// Dummy transaction hash (64 hex characters)
pub const DUMMY_TX_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000012";

// ------------------------------- CHAINS ---------------------------------

/// Source chain name used on the command line
pub const SOURCE_CHAIN: &str = "A";

/// Destination chain name used on the command line
pub const DESTINATION_CHAIN: &str = "B";

/// Selector of chain A (above i64::MAX on purpose)
pub const SOURCE_CHAIN_SELECTOR: u64 = 16015286601757825753;

/// Selector of chain B
pub const DESTINATION_CHAIN_SELECTOR: u64 = 14767482510784806043;

/// Selector of a chain that is neither A nor B
pub const OTHER_CHAIN_SELECTOR: u64 = 3478487238524512106;

// ------------------------------ CONTRACTS -------------------------------

/// Router on chain A
pub const DUMMY_SOURCE_ROUTER_ADDR: &str = "0x0000000000000000000000000000000000000a01";

/// Router on chain B
pub const DUMMY_DESTINATION_ROUTER_ADDR: &str = "0x0000000000000000000000000000000000000b01";

/// On-ramp on chain A for the A -> B lane
pub const DUMMY_ON_RAMP_ADDR: &str = "0x0000000000000000000000000000000000000a02";

/// Off-ramp on chain B for the A -> B lane
pub const DUMMY_OFF_RAMP_ADDR: &str = "0x0000000000000000000000000000000000000b02";

/// Second off-ramp on chain B
pub const DUMMY_OTHER_OFF_RAMP_ADDR: &str = "0x0000000000000000000000000000000000000b03";

// -------------------------------- USERS ---------------------------------

/// Dummy message sender (EVM format, 20 bytes)
pub const DUMMY_SENDER_ADDR: &str = "0x0000000000000000000000000000000000000005";

/// Dummy message receiver (EVM format, 20 bytes)
pub const DUMMY_RECEIVER_ADDR: &str = "0x0000000000000000000000000000000000000006";

/// Dummy fee token (EVM format, 20 bytes)
pub const DUMMY_FEE_TOKEN_ADDR: &str = "0x0000000000000000000000000000000000000007";

/// Dummy transferred token (EVM format, 20 bytes)
pub const DUMMY_TOKEN_ADDR: &str = "0x0000000000000000000000000000000000000008";

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Builds a two-chain config (A and B) pointing at the given RPC URLs
pub fn build_test_config(source_rpc_url: &str, destination_rpc_url: &str) -> Config {
    Config {
        rpc_timeout_ms: 5_000,
        log_query: LogQueryConfig::default(),
        chains: vec![
            ChainConfig {
                name: SOURCE_CHAIN.to_string(),
                router: DUMMY_SOURCE_ROUTER_ADDR.to_string(),
                chain_selector: SOURCE_CHAIN_SELECTOR,
                rpc_url: Some(source_rpc_url.to_string()),
                rpc_url_env: None,
            },
            ChainConfig {
                name: DESTINATION_CHAIN.to_string(),
                router: DUMMY_DESTINATION_ROUTER_ADDR.to_string(),
                chain_selector: DESTINATION_CHAIN_SELECTOR,
                rpc_url: Some(destination_rpc_url.to_string()),
                rpc_url_env: None,
            },
        ],
    }
}

// ============================================================================
// ABI PAYLOAD BUILDERS
// ============================================================================

fn hex_word(word: &[u8; WORD]) -> String {
    hex::encode(word)
}

/// Left-pads a 20-byte address to one word (hex, no prefix)
pub fn address_word(addr: &str) -> String {
    format!("{:0>64}", addr.strip_prefix("0x").unwrap_or(addr))
}

/// Encodes a usize value as one word (hex, no prefix)
pub fn usize_word(value: usize) -> String {
    hex_word(&encode_u64(value as u64))
}

/// Encodes a uint64 value as one word (hex, no prefix)
pub fn u64_word(value: u64) -> String {
    hex_word(&encode_u64(value))
}

/// Encodes a 32-byte value given as 0x hex (hex, no prefix)
pub fn bytes32_word(value: &str) -> String {
    value.strip_prefix("0x").unwrap_or(value).to_string()
}

/// `bytes` tail: length word plus right-padded content (hex, no prefix)
pub fn bytes_tail(content: &[u8]) -> String {
    let mut padded = content.to_vec();
    let padding = (WORD - content.len() % WORD) % WORD;
    padded.extend(std::iter::repeat(0u8).take(padding));
    format!("{}{}", usize_word(content.len()), hex::encode(padded))
}

/// eth_call result for a bool return
pub fn bool_result(value: bool) -> String {
    format!("0x{}", u64_word(value as u64))
}

/// eth_call result for an address return
pub fn address_result(addr: &str) -> String {
    format!("0x{}", address_word(addr))
}

/// eth_call result for `getOffRamps()`
pub fn off_ramps_result(bindings: &[(u64, &str)]) -> String {
    let mut out = String::from("0x");
    out.push_str(&usize_word(WORD));
    out.push_str(&usize_word(bindings.len()));
    for (selector, off_ramp) in bindings {
        out.push_str(&u64_word(*selector));
        out.push_str(&address_word(off_ramp));
    }
    out
}

/// Data of a CCIPSendRequested log carrying `message_id`.
///
/// The message has payload "hello", one token amount and an empty sourceTokenData.
pub fn send_requested_data(message_id: &str, sequence_number: u64) -> String {
    let payload = bytes_tail(b"hello");
    let head_size = 13 * WORD;
    let data_offset = head_size;
    let tokens_offset = data_offset + payload.len() / 2;
    let token_amounts = format!(
        "{}{}{}",
        usize_word(1),
        address_word(DUMMY_TOKEN_ADDR),
        u64_word(1_000)
    );
    let source_token_data_offset = tokens_offset + token_amounts.len() / 2;
    let source_token_data = usize_word(0);

    let head = [
        u64_word(SOURCE_CHAIN_SELECTOR),
        address_word(DUMMY_SENDER_ADDR),
        address_word(DUMMY_RECEIVER_ADDR),
        u64_word(sequence_number),
        u64_word(200_000),
        u64_word(0),
        u64_word(3),
        address_word(DUMMY_FEE_TOKEN_ADDR),
        u64_word(42),
        usize_word(data_offset),
        usize_word(tokens_offset),
        usize_word(source_token_data_offset),
        bytes32_word(message_id),
    ]
    .concat();

    format!(
        "0x{}{}{}{}{}",
        usize_word(WORD),
        head,
        payload,
        token_amounts,
        source_token_data
    )
}

/// Data of an ExecutionStateChanged log: abi.encode(state, returnData)
pub fn execution_state_changed_data(state: u8, return_data: &[u8]) -> String {
    format!(
        "0x{}{}{}",
        u64_word(state as u64),
        usize_word(2 * WORD),
        bytes_tail(return_data)
    )
}

/// CCIPSendRequested topic0
pub fn send_requested_topic() -> String {
    abi::event_topic(CCIP_SEND_REQUESTED)
}

/// ExecutionStateChanged topic0
pub fn execution_state_changed_topic() -> String {
    abi::event_topic(EXECUTION_STATE_CHANGED)
}

/// Indexed uint64 topic
pub fn u64_topic(value: u64) -> String {
    format!("0x{}", u64_word(value))
}

// ============================================================================
// JSON-RPC BUILDERS
// ============================================================================

/// JSON-RPC success envelope
pub fn rpc_result(result: serde_json::Value) -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": 1
    })
}

/// JSON-RPC error envelope
pub fn rpc_error(code: i64, message: &str) -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message },
        "id": 1
    })
}

/// One eth_getLogs entry
pub fn evm_log(address: &str, topics: Vec<String>, data: &str) -> serde_json::Value {
    json!({
        "address": address,
        "topics": topics,
        "data": data,
        "blockNumber": "0x10",
        "transactionHash": DUMMY_TX_HASH,
        "logIndex": "0x0"
    })
}

/// CCIPSendRequested log emitted by the on-ramp
pub fn send_requested_log(message_id: &str, sequence_number: u64) -> serde_json::Value {
    evm_log(
        DUMMY_ON_RAMP_ADDR,
        vec![send_requested_topic()],
        &send_requested_data(message_id, sequence_number),
    )
}

/// ExecutionStateChanged log emitted by `off_ramp`
pub fn execution_state_changed_log(
    off_ramp: &str,
    message_id: &str,
    state: u8,
) -> serde_json::Value {
    evm_log(
        off_ramp,
        vec![execution_state_changed_topic(), u64_topic(7), message_id.to_string()],
        &execution_state_changed_data(state, &[]),
    )
}

/// Exact eth_call request body
pub fn eth_call_request(to: &str, data: &str) -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "method": "eth_call",
        "params": [{ "to": to, "data": data }, "latest"],
        "id": 1
    })
}

/// Exact eth_getLogs request body
pub fn get_logs_request(
    address: &str,
    topics: serde_json::Value,
    from_block: &str,
    to_block: &str,
) -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "method": "eth_getLogs",
        "params": [{
            "address": address,
            "topics": topics,
            "fromBlock": from_block,
            "toBlock": to_block
        }],
        "id": 1
    })
}

/// Topic filter used for the on-ramp scan
pub fn on_ramp_topics() -> serde_json::Value {
    json!([send_requested_topic()])
}

/// Topic filter used for the off-ramp scan
pub fn off_ramp_topics(message_id: &str) -> serde_json::Value {
    json!([execution_state_changed_topic(), null, message_id.to_lowercase()])
}

// ============================================================================
// MOCK SERVER SETUP HELPERS
// ============================================================================

/// Mounts a handler answering `request` with `response`
pub async fn mount_rpc(server: &MockServer, request: serde_json::Value, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(body_json(request))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// Mounts `isChainSupported(selector)` on the router at `router`
pub async fn mock_is_chain_supported(server: &MockServer, router: &str, selector: u64, supported: bool) {
    let calldata = abi::encode_call(IS_CHAIN_SUPPORTED, &[encode_u64(selector)]);
    mount_rpc(
        server,
        eth_call_request(router, &calldata),
        rpc_result(json!(bool_result(supported))),
    )
    .await;
}

/// Mounts `getOnRamp(selector)` on the router at `router`
pub async fn mock_get_on_ramp(server: &MockServer, router: &str, selector: u64, on_ramp: &str) {
    let calldata = abi::encode_call(GET_ON_RAMP, &[encode_u64(selector)]);
    mount_rpc(
        server,
        eth_call_request(router, &calldata),
        rpc_result(json!(address_result(on_ramp))),
    )
    .await;
}

/// Mounts `getOffRamps()` on the router at `router`
pub async fn mock_get_off_ramps(server: &MockServer, router: &str, bindings: &[(u64, &str)]) {
    let calldata = abi::encode_call(GET_OFF_RAMPS, &[]);
    mount_rpc(
        server,
        eth_call_request(router, &calldata),
        rpc_result(json!(off_ramps_result(bindings))),
    )
    .await;
}

/// Mounts the full-history on-ramp scan
pub async fn mock_on_ramp_logs(server: &MockServer, logs: Vec<serde_json::Value>) {
    mount_rpc(
        server,
        get_logs_request(DUMMY_ON_RAMP_ADDR, on_ramp_topics(), "0x0", "latest"),
        rpc_result(json!(logs)),
    )
    .await;
}

/// Mounts the full-history off-ramp scan on `off_ramp`
pub async fn mock_off_ramp_logs(
    server: &MockServer,
    off_ramp: &str,
    message_id: &str,
    logs: Vec<serde_json::Value>,
) {
    mount_rpc(
        server,
        get_logs_request(off_ramp, off_ramp_topics(message_id), "0x0", "latest"),
        rpc_result(json!(logs)),
    )
    .await;
}

/// Mounts every source-side call for a supported lane whose on-ramp returns `logs`
pub async fn mock_source_chain(server: &MockServer, logs: Vec<serde_json::Value>) {
    mock_is_chain_supported(server, DUMMY_SOURCE_ROUTER_ADDR, DESTINATION_CHAIN_SELECTOR, true).await;
    mock_get_on_ramp(server, DUMMY_SOURCE_ROUTER_ADDR, DESTINATION_CHAIN_SELECTOR, DUMMY_ON_RAMP_ADDR).await;
    mock_on_ramp_logs(server, logs).await;
}

/// Number of requests a mock server has seen
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
