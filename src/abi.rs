//! Contract ABI Helpers
//!
//! Minimal Solidity ABI encoding and decoding for the router, on-ramp and off-ramp
//! interfaces. Calls only ever take `uint64` arguments, and responses and log payloads
//! are decoded word by word with explicit bounds and range checks.

use anyhow::{Context, Result};
use ethereum_types::U256;
use sha3::{Digest, Keccak256};

/// Size of one ABI word in bytes
pub const WORD: usize = 32;

/// Computes keccak256 of the input
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    Keccak256::digest(input).into()
}

/// Function selector: keccak256(signature)[0..4]
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Event topic0 as a 0x-prefixed hex string: keccak256(signature)
///
/// Indexed parameters don't affect the signature, only the types matter.
pub fn event_topic(signature: &str) -> String {
    format!("0x{}", hex::encode(keccak256(signature.as_bytes())))
}

/// Left-pads a uint64 to one ABI word
pub fn encode_u64(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Builds 0x-prefixed calldata: selector followed by static argument words
pub fn encode_call(signature: &str, args: &[[u8; WORD]]) -> String {
    let mut calldata = Vec::with_capacity(4 + args.len() * WORD);
    calldata.extend_from_slice(&function_selector(signature));
    for arg in args {
        calldata.extend_from_slice(arg);
    }
    format!("0x{}", hex::encode(calldata))
}

/// Decodes a hex string with or without 0x prefix
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let clean = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(clean).with_context(|| format!("Invalid hex payload '{}'", value))
}

/// Returns the 32-byte word starting at `offset`
pub fn word(data: &[u8], offset: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(WORD)
        .ok_or_else(|| anyhow::anyhow!("ABI offset {} overflows", offset))?;
    data.get(offset..end).ok_or_else(|| {
        anyhow::anyhow!(
            "ABI payload too short: need {} bytes, have {}",
            end,
            data.len()
        )
    })
}

fn ensure_zero_padding(word: &[u8], significant: usize, kind: &str) -> Result<()> {
    if word[..WORD - significant].iter().any(|b| *b != 0) {
        anyhow::bail!("ABI word 0x{} is out of range for {}", hex::encode(word), kind);
    }
    Ok(())
}

/// Reads a uint64 word
pub fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let word = word(data, offset)?;
    ensure_zero_padding(word, 8, "uint64")?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(bytes))
}

/// Reads a uint8 word (also used for Solidity enums)
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    let word = word(data, offset)?;
    ensure_zero_padding(word, 1, "uint8")?;
    Ok(word[WORD - 1])
}

/// Reads a bool word
pub fn read_bool(data: &[u8], offset: usize) -> Result<bool> {
    match read_u8(data, offset)? {
        0 => Ok(false),
        1 => Ok(true),
        other => anyhow::bail!("ABI bool word holds {}", other),
    }
}

/// Reads an address word as a lowercase 0x-prefixed string
pub fn read_address(data: &[u8], offset: usize) -> Result<String> {
    let word = word(data, offset)?;
    ensure_zero_padding(word, 20, "address")?;
    Ok(format!("0x{}", hex::encode(&word[WORD - 20..])))
}

/// Reads a bytes32 word as a lowercase 0x-prefixed string
pub fn read_bytes32(data: &[u8], offset: usize) -> Result<String> {
    Ok(format!("0x{}", hex::encode(word(data, offset)?)))
}

/// Reads a uint256 word
pub fn read_u256(data: &[u8], offset: usize) -> Result<U256> {
    Ok(U256::from_big_endian(word(data, offset)?))
}

/// Reads a head word holding an offset to dynamic data and resolves it against `base`
pub fn read_offset(data: &[u8], offset: usize, base: usize) -> Result<usize> {
    let value = read_u256(data, offset)?;
    if value > U256::from(data.len()) {
        anyhow::bail!(
            "ABI offset {} points past the end of a {} byte payload",
            value,
            data.len()
        );
    }
    base.checked_add(value.as_usize())
        .ok_or_else(|| anyhow::anyhow!("ABI offset {} overflows", value))
}

/// Reads a dynamic length word
pub fn read_length(data: &[u8], offset: usize) -> Result<usize> {
    let value = read_u256(data, offset)?;
    if value > U256::from(data.len()) {
        anyhow::bail!(
            "ABI length {} exceeds the {} byte payload",
            value,
            data.len()
        );
    }
    Ok(value.as_usize())
}

/// Reads `bytes` whose length word starts at `offset`
pub fn read_bytes(data: &[u8], offset: usize) -> Result<Vec<u8>> {
    let len = read_length(data, offset)?;
    let start = offset + WORD;
    data.get(start..start + len)
        .map(|bytes| bytes.to_vec())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "ABI bytes of length {} at offset {} exceed the {} byte payload",
                len,
                offset,
                data.len()
            )
        })
}

/// Decodes an indexed uint64 topic
pub fn topic_u64(topic: &str) -> Result<u64> {
    let bytes = decode_hex(topic)?;
    if bytes.len() != WORD {
        anyhow::bail!("Topic {} is not 32 bytes", topic);
    }
    read_u64(&bytes, 0)
}
