//! Error Types
//!
//! Classified failures of a status lookup. Remote-call failures are not classified
//! further; they travel as `anyhow::Error` with context naming the endpoint and method.

use thiserror::Error;

/// Fatal, classified errors raised before or between remote calls.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Wrong number of positional arguments
    #[error("Wrong number of arguments. Usage: ccip-status <SOURCE_CHAIN> <DESTINATION_CHAIN> <MESSAGE_ID>")]
    Usage(#[source] clap::Error),

    /// Chain name missing from the configuration table
    #[error("Unknown chain '{0}'. Add it to the [[chains]] table of the configuration file.")]
    UnknownChain(String),

    /// Chain is configured but its RPC endpoint cannot be resolved
    #[error("RPC URL for chain '{chain}' is not configured: {reason}")]
    MissingRpcUrl { chain: String, reason: String },

    /// Source router rejected the destination selector
    #[error("Lane {source_chain}->{destination_chain} is not supported")]
    LaneNotSupported {
        source_chain: String,
        destination_chain: String,
    },

    /// Off-ramp reported a state code outside the known set
    #[error("Unknown message execution state code {0}")]
    UnknownExecutionState(u8),
}
