//! Mutation applier errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    /// The snapshot's node could not be re-identified in the live
    /// document. The document is left untouched.
    #[error("Original element no longer present in the document")]
    StaleSnapshot,

    /// The replacement markup was empty or did not parse to at least
    /// one element. The document is left untouched.
    #[error("Replacement markup is empty or invalid: {0}")]
    EmptyOrInvalidMarkup(String),
}
