//! Message Execution State
//!
//! Mapping from the off-ramp's numeric `MessageExecutionState` to a human-readable label.

use std::fmt;

use crate::error::StatusError;

/// Execution state recorded by an off-ramp in `ExecutionStateChanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageExecutionState {
    Untouched,
    InProgress,
    Success,
    Failure,
}

impl MessageExecutionState {
    /// Human-readable label printed in status lines
    pub fn label(&self) -> &'static str {
        match self {
            MessageExecutionState::Untouched => "Untouched",
            MessageExecutionState::InProgress => "InProgress",
            MessageExecutionState::Success => "Success",
            MessageExecutionState::Failure => "Failure",
        }
    }

    /// Numeric code as emitted on-chain
    pub fn code(&self) -> u8 {
        match self {
            MessageExecutionState::Untouched => 0,
            MessageExecutionState::InProgress => 1,
            MessageExecutionState::Success => 2,
            MessageExecutionState::Failure => 3,
        }
    }
}

impl TryFrom<u8> for MessageExecutionState {
    type Error = StatusError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MessageExecutionState::Untouched),
            1 => Ok(MessageExecutionState::InProgress),
            2 => Ok(MessageExecutionState::Success),
            3 => Ok(MessageExecutionState::Failure),
            other => Err(StatusError::UnknownExecutionState(other)),
        }
    }
}

impl fmt::Display for MessageExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
