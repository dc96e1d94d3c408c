//! # Retouch Bridge
//!
//! The AI mediation bridge: submits element snapshots through a
//! privileged relay, correlates the asynchronous reply, and reports
//! success or a typed failure. No queueing, no deduplication, no
//! retry: each submission is an independent round trip.

mod bridge;
mod prompt;
mod relay;

pub use bridge::Bridge;
pub use prompt::compose_rewrite_instruction;
pub use relay::{HttpRelay, HttpRelayConfig, Relay};
