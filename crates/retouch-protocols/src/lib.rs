//! # Retouch Protocols
//!
//! Shared types crossing crate boundaries: geometry, element snapshots,
//! relay wire messages, inbound commands, notices, and error contracts.

pub mod error;
mod geometry;
mod notice;
mod snapshot;
mod wire;

pub use geometry::{BoundingBox, Point};
pub use notice::{Notice, NoticeLevel};
pub use snapshot::{
    ComputedStyle, ElementSnapshot, FrameworkState, EXTRACTED_STYLE_PROPERTIES,
};
pub use wire::{Ack, Command, RelayRequest, RelayResponse, RequestKind};
