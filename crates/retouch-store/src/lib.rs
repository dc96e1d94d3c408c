//! # Retouch Store
//!
//! Durable page-scoped state: the selection-mode flag, the mediator
//! credential, and the selector → markup mutation map replayed on
//! every load.

mod error;
mod mutation;
mod store;

pub use error::StoreError;
pub use mutation::{PersistedMutation, MAX_MUTATIONS_PER_ORIGIN};
pub use store::{EditStore, FileEditStore, MemoryEditStore};
