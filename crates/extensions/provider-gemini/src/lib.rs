//! # Retouch Provider - Gemini
//!
//! Google Gemini mediator client: single-shot `generateContent` calls
//! that turn a rewrite instruction into a replacement markup fragment.

mod client;
mod types;

pub use client::{GeminiClient, DEFAULT_MODEL};
pub use types::*;
