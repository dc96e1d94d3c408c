//! AI mediation bridge errors.
//!
//! Every failure is terminal for that submission; nothing is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("No mediator credential configured")]
    MissingCredential,

    #[error("Mediator unreachable: {0}")]
    Unreachable(String),

    #[error("Mediator rejected the request: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed mediator reply: {0}")]
    MalformedReply(String),
}
