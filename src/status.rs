//! Message Status Lookup
//!
//! Walks the fixed sequence of router, on-ramp and off-ramp reads that decides which
//! observable bucket a message is in: not sent, sent but not executed, or executed with
//! a terminal state.
//!
//! ## Flow
//!
//! 1. Resolve both chains from the configuration (no remote call before this succeeds)
//! 2. `isChainSupported` on the source router
//! 3. `getOnRamp` and a scan of `CCIPSendRequested` logs
//! 4. `getOffRamps` on the destination router, first binding for the source selector
//! 5. Scan of `ExecutionStateChanged` logs filtered by message id

use anyhow::Result;
use std::fmt;
use tracing::info;

use crate::config::Config;
use crate::contracts::router::select_off_ramp;
use crate::contracts::{OffRamp, OnRamp, Router};
use crate::error::StatusError;
use crate::evm_client::EvmClient;
use crate::state::MessageExecutionState;

/// What to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    pub source_chain: String,
    pub destination_chain: String,
    pub message_id: String,
}

/// Outcome of a lookup. Every variant is a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageStatus {
    /// No CCIPSendRequested log carries the id
    NotFoundOnSource { message_id: String },
    /// Sent, but no ExecutionStateChanged log on the destination yet
    NotProcessed { message_id: String },
    /// Sent and recorded by the destination off-ramp
    Executed {
        message_id: String,
        state: MessageExecutionState,
    },
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Printed on stdout like the other outcomes; it is a result, not an error
            MessageStatus::NotFoundOnSource { message_id } => {
                write!(f, "Message {} does not exist on this lane", message_id)
            }
            MessageStatus::NotProcessed { message_id } => {
                write!(
                    f,
                    "Message {} is not processed yet on destination chain",
                    message_id
                )
            }
            MessageStatus::Executed { message_id, state } => {
                write!(f, "Status of message {} is {}", message_id, state)
            }
        }
    }
}

/// Looks up the status of `request.message_id` on the lane
/// `request.source_chain -> request.destination_chain`.
///
/// # Returns
///
/// * `Ok(MessageStatus)` - One of the three observable outcomes
/// * `Err(anyhow::Error)` - Configuration error, unsupported lane, unknown state code
///   or a failed remote call
pub async fn get_status(config: &Config, request: &StatusRequest) -> Result<MessageStatus> {
    let message_id = request.message_id.clone();

    let source = config.get_chain(&request.source_chain)?;
    let destination = config.get_chain(&request.destination_chain)?;
    let source_client = EvmClient::new(&source.get_rpc_url()?, config.rpc_timeout())?;
    let destination_client = EvmClient::new(&destination.get_rpc_url()?, config.rpc_timeout())?;

    info!(
        "Checking message {} on lane {} ({}) -> {} ({})",
        message_id, source.name, source.chain_selector, destination.name, destination.chain_selector
    );

    let source_router = Router::new(&source_client, &source.router);
    if !source_router
        .is_chain_supported(destination.chain_selector)
        .await?
    {
        return Err(StatusError::LaneNotSupported {
            source_chain: source.name.clone(),
            destination_chain: destination.name.clone(),
        }
        .into());
    }

    let on_ramp_address = source_router
        .get_on_ramp(destination.chain_selector)
        .await?;
    info!("On-ramp for lane is {}", on_ramp_address);

    let on_ramp = OnRamp::new(&source_client, &on_ramp_address);
    let Some(sent) = on_ramp.find_message(&message_id, &config.log_query).await? else {
        return Ok(MessageStatus::NotFoundOnSource { message_id });
    };
    info!(
        "Message {} sent in tx {} (sequence number {})",
        message_id, sent.transaction_hash, sent.sequence_number
    );

    let destination_router = Router::new(&destination_client, &destination.router);
    let bindings = destination_router.get_off_ramps().await?;
    let Some(binding) = select_off_ramp(&bindings, source.chain_selector) else {
        info!(
            "No off-ramp on {} serves source selector {}",
            destination.name, source.chain_selector
        );
        return Ok(MessageStatus::NotProcessed { message_id });
    };
    info!("Off-ramp for lane is {}", binding.off_ramp);

    let off_ramp = OffRamp::new(&destination_client, &binding.off_ramp);
    match off_ramp
        .find_execution_state_change(&message_id, &config.log_query)
        .await?
    {
        Some(change) => {
            let state = change.execution_state()?;
            info!(
                "Message {} reached state {} ({}) in tx {}",
                message_id,
                state,
                state.code(),
                change.transaction_hash
            );
            Ok(MessageStatus::Executed { message_id, state })
        }
        None => Ok(MessageStatus::NotProcessed { message_id }),
    }
}
