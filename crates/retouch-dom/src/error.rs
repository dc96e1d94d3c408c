//! DOM errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
}

impl DomError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}
