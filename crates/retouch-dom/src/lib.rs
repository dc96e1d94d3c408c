//! # Retouch DOM
//!
//! Headless in-memory document model. Elements carry host-supplied
//! facts (computed style, viewport bounds, expando properties) the way
//! a live page's layout engine would supply them; the crate owns
//! structure, the markup codec, selectors, and hit-testing.

mod document;
mod error;
mod node;
mod parse;
mod selector;
mod serialize;

pub use document::Document;
pub use error::DomError;
pub use node::{ElementData, Node, NodeId};
