//! Engine errors.

use thiserror::Error;

use retouch_protocols::error::{ApplyError, BridgeError};
use retouch_store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No element is selected")]
    NoSelection,
}
