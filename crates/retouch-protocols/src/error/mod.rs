//! Error contracts shared across crates.

mod apply;
mod bridge;

pub use apply::ApplyError;
pub use bridge::BridgeError;
