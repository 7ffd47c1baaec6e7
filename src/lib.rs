//! CCIP Message Status Library
//!
//! This crate looks up the status of a cross-chain CCIP message by reading the source
//! chain's on-ramp logs and the destination chain's off-ramp logs over JSON-RPC.

pub mod abi;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod error;
pub mod evm_client;
pub mod state;
pub mod status;

// Re-export commonly used types
pub use cli::Cli;
pub use config::{ChainConfig, Config, LogQueryConfig};
pub use error::StatusError;
pub use evm_client::EvmClient;
pub use state::MessageExecutionState;
pub use status::{get_status, MessageStatus, StatusRequest};
