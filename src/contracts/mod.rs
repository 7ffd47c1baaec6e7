//! CCIP Contract Bindings
//!
//! Read-only bindings for the three contracts a status lookup touches: the router on
//! each chain, the on-ramp on the source chain and the off-ramp on the destination chain.

pub mod off_ramp;
pub mod on_ramp;
pub mod router;

pub use off_ramp::{ExecutionStateChangedEvent, OffRamp};
pub use on_ramp::{OnRamp, SendRequestedEvent, TokenAmount};
pub use router::{OffRampBinding, Router};

/// Compares two 0x-prefixed message ids.
///
/// Hex digits compare case-insensitively, which is byte equality for well-formed ids.
pub fn message_ids_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
