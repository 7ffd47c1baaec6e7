//! CCIP Message Status
//!
//! Reports whether a CCIP message was sent on a lane and, if so, the execution state the
//! destination off-ramp recorded for it.
//!
//! ## Usage
//!
//! ```bash
//! ccip-status ethereumSepolia avalancheFuji 0xbd2f751ffab340b98575a8f46efc234e8d884db7b654c0144d7aabd72ff38595
//! ```
//!
//! Status lines go to stdout. Logs go to stderr and are filtered with `RUST_LOG`
//! (default `warn`). Any error exits with code 1.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ccip_status::{get_status, Cli, Config, StatusError};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging on stderr, stdout carries the status line
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        // --help and --version
        Err(StatusError::Usage(e)) if !e.use_stderr() => e.exit(),
        Err(e) => return Err(e.into()),
    };

    let config = Config::load()?;
    info!("Configuration loaded with {} chains", config.chains.len());

    let status = get_status(&config, &cli.into_request()).await?;
    println!("{}", status);

    Ok(())
}
