//! Persisted mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cap on stored mutations per origin. Inserting past the cap evicts
/// the oldest entry.
pub const MAX_MUTATIONS_PER_ORIGIN: usize = 64;

/// One durable edit: a selector and the markup that replaces whatever
/// the selector resolves to, replayed on every page load.
///
/// Keyed by `selector` within an origin; repeated edits to the same
/// selector overwrite (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedMutation {
    pub selector: String,
    pub markup: String,
    pub updated_at: DateTime<Utc>,
}

impl PersistedMutation {
    /// Create a mutation stamped with the current time.
    pub fn new(selector: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            markup: markup.into(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_time() {
        let before = Utc::now();
        let mutation = PersistedMutation::new("#title", "<h1>t</h1>");
        assert!(mutation.updated_at >= before);
        assert_eq!(mutation.selector, "#title");
    }

    #[test]
    fn test_serde_round_trip() {
        let mutation = PersistedMutation::new("#title", "<h1>t</h1>");
        let json = serde_json::to_string(&mutation).unwrap();
        let back: PersistedMutation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mutation);
    }
}
