//! CCIP Router
//!
//! View calls on the router: lane support, the on-ramp serving a destination and the
//! off-ramps registered per source chain.

use anyhow::{Context, Result};
use tracing::debug;

use crate::abi::{self, WORD};
use crate::evm_client::EvmClient;

/// `isChainSupported(uint64 chainSelector) returns (bool)`
pub const IS_CHAIN_SUPPORTED: &str = "isChainSupported(uint64)";
/// `getOnRamp(uint64 destChainSelector) returns (address)`
pub const GET_ON_RAMP: &str = "getOnRamp(uint64)";
/// `getOffRamps() returns (OffRamp[])` with `OffRamp { uint64 sourceChainSelector; address offRamp; }`
pub const GET_OFF_RAMPS: &str = "getOffRamps()";

/// Off-ramp registered in a destination router for one source chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffRampBinding {
    /// Selector of the source chain this off-ramp serves
    pub source_chain_selector: u64,
    /// Off-ramp contract address (lowercase hex)
    pub off_ramp: String,
}

/// Router contract on one chain
#[derive(Debug)]
pub struct Router<'a> {
    client: &'a EvmClient,
    address: String,
}

impl<'a> Router<'a> {
    pub fn new(client: &'a EvmClient, address: &str) -> Self {
        Self {
            client,
            address: address.to_string(),
        }
    }

    /// Whether the router accepts messages to `dest_chain_selector`
    pub async fn is_chain_supported(&self, dest_chain_selector: u64) -> Result<bool> {
        let calldata = abi::encode_call(IS_CHAIN_SUPPORTED, &[abi::encode_u64(dest_chain_selector)]);
        let result = self
            .client
            .eth_call(&self.address, &calldata)
            .await
            .context("Failed to call isChainSupported on source router")?;
        let data = abi::decode_hex(&result)?;
        abi::read_bool(&data, 0).context("Malformed isChainSupported result")
    }

    /// On-ramp address handling messages to `dest_chain_selector`
    pub async fn get_on_ramp(&self, dest_chain_selector: u64) -> Result<String> {
        let calldata = abi::encode_call(GET_ON_RAMP, &[abi::encode_u64(dest_chain_selector)]);
        let result = self
            .client
            .eth_call(&self.address, &calldata)
            .await
            .context("Failed to call getOnRamp on source router")?;
        let data = abi::decode_hex(&result)?;
        abi::read_address(&data, 0).context("Malformed getOnRamp result")
    }

    /// All off-ramps registered on this router, in router order
    pub async fn get_off_ramps(&self) -> Result<Vec<OffRampBinding>> {
        let calldata = abi::encode_call(GET_OFF_RAMPS, &[]);
        let result = self
            .client
            .eth_call(&self.address, &calldata)
            .await
            .context("Failed to call getOffRamps on destination router")?;
        let data = abi::decode_hex(&result)?;
        let bindings = decode_off_ramps(&data).context("Malformed getOffRamps result")?;
        debug!("Router {} lists {} off-ramps", self.address, bindings.len());
        Ok(bindings)
    }
}

/// Decodes the `(uint64,address)[]` return value of `getOffRamps()`
pub fn decode_off_ramps(data: &[u8]) -> Result<Vec<OffRampBinding>> {
    let array_start = abi::read_offset(data, 0, 0)?;
    let len = abi::read_length(data, array_start)?;

    let mut bindings = Vec::with_capacity(len);
    for i in 0..len {
        let entry = array_start + WORD + i * 2 * WORD;
        bindings.push(OffRampBinding {
            source_chain_selector: abi::read_u64(data, entry)?,
            off_ramp: abi::read_address(data, entry + WORD)?,
        });
    }
    Ok(bindings)
}

/// Picks the off-ramp serving `source_chain_selector`.
///
/// The first binding in router order wins when several serve the same source.
pub fn select_off_ramp(
    bindings: &[OffRampBinding],
    source_chain_selector: u64,
) -> Option<&OffRampBinding> {
    bindings
        .iter()
        .find(|binding| binding.source_chain_selector == source_chain_selector)
}
