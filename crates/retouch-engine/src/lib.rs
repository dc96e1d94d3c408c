//! # Retouch Engine
//!
//! The interactive core: the selection controller state machine, the
//! context capturer, and the editor session that wires selection,
//! rules, bridge, applier, and storage together.

mod capture;
mod error;
mod events;
mod notify;
mod select;
mod session;

pub use capture::capture;
pub use error::EngineError;
pub use events::{Modifiers, PointerButton, PointerEvent};
pub use notify::{show_notice, NOTICE_ID};
pub use select::{
    SelectionController, SelectionMode, SelectionSession, DRAG_RECT_ID, HIGHLIGHT_CLASS,
    OVERLAY_ID,
};
pub use session::{EditOutcome, EditorSession};
