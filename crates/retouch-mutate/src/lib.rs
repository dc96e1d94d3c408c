//! # Retouch Mutate
//!
//! Turns a mediator reply or a matched local rule back into live
//! document structure, and replays durable mutations on load.

mod apply;
mod replay;
mod rules;

pub use apply::{apply_replacement, AppliedReplacement};
pub use replay::reapply_all;
pub use rules::{apply_rules, default_rules, Effect, Rule, Trigger};
