//! Command line arguments

use clap::Parser;
use std::ffi::OsString;

use crate::error::StatusError;
use crate::status::StatusRequest;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ccip-status",
    version,
    about = "Look up the status of a CCIP message by its id",
    after_help = "Example:\n  ccip-status ethereumSepolia avalancheFuji 0xbd2f751ffab340b98575a8f46efc234e8d884db7b654c0144d7aabd72ff38595"
)]
pub struct Cli {
    /// Source chain name (e.g., ethereumSepolia)
    pub source_chain: String,

    /// Destination chain name (e.g., avalancheFuji)
    pub destination_chain: String,

    /// Message id returned by the router's ccipSend
    #[arg(value_name = "0x...", allow_hyphen_values = true)]
    pub message_id: String,
}

impl Cli {
    /// Parses exactly three positional arguments; anything else is a usage error.
    pub fn parse_args<I, T>(args: I) -> Result<Self, StatusError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(StatusError::Usage)
    }

    pub fn into_request(self) -> StatusRequest {
        StatusRequest {
            source_chain: self.source_chain,
            destination_chain: self.destination_chain,
            message_id: self.message_id,
        }
    }
}
