//! Edit storage backends.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::mutation::{PersistedMutation, MAX_MUTATIONS_PER_ORIGIN};

/// Durable edit storage.
///
/// Mutations and the selection-mode flag are scoped to a page origin;
/// the mediator credential is global. Reads and writes are
/// read-modify-write without transactions: concurrent writers to the
/// same origin are last-write-wins.
#[async_trait]
pub trait EditStore: Send + Sync {
    /// Persisted selection-mode flag for an origin.
    async fn selection_mode(&self, origin: &str) -> Result<bool, StoreError>;

    /// Persist the selection-mode flag for an origin.
    async fn set_selection_mode(&self, origin: &str, enabled: bool) -> Result<(), StoreError>;

    /// The configured mediator credential, if any.
    async fn credential(&self) -> Result<Option<String>, StoreError>;

    /// Store the mediator credential.
    async fn set_credential(&self, key: &str) -> Result<(), StoreError>;

    /// Insert or overwrite a mutation for an origin, keyed by selector.
    async fn upsert_mutation(
        &self,
        origin: &str,
        mutation: PersistedMutation,
    ) -> Result<(), StoreError>;

    /// All mutations for an origin, oldest first.
    async fn mutations(&self, origin: &str) -> Result<Vec<PersistedMutation>, StoreError>;

    /// Drop everything stored for an origin.
    async fn clear_origin(&self, origin: &str) -> Result<(), StoreError>;
}

/// Everything stored for one origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OriginState {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    mutations: Vec<PersistedMutation>,
}

impl OriginState {
    /// Overwrite-by-selector insert with cap eviction.
    fn upsert(&mut self, origin: &str, mutation: PersistedMutation) {
        self.mutations.retain(|m| m.selector != mutation.selector);
        self.mutations.push(mutation);
        while self.mutations.len() > MAX_MUTATIONS_PER_ORIGIN {
            let oldest = self
                .mutations
                .iter()
                .enumerate()
                .min_by_key(|(_, m)| m.updated_at)
                .map(|(i, _)| i)
                .expect("non-empty over cap");
            let evicted = self.mutations.remove(oldest);
            warn!(
                origin,
                selector = %evicted.selector,
                "mutation cap reached, evicting oldest entry"
            );
        }
    }

    fn sorted_mutations(&self) -> Vec<PersistedMutation> {
        let mut mutations = self.mutations.clone();
        mutations.sort_by_key(|m| m.updated_at);
        mutations
    }
}

/// In-memory edit store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryEditStore {
    origins: tokio::sync::RwLock<HashMap<String, OriginState>>,
    credential: tokio::sync::RwLock<Option<String>>,
}

impl MemoryEditStore {
    /// Create a new memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EditStore for MemoryEditStore {
    async fn selection_mode(&self, origin: &str) -> Result<bool, StoreError> {
        let origins = self.origins.read().await;
        Ok(origins.get(origin).map(|s| s.enabled).unwrap_or(false))
    }

    async fn set_selection_mode(&self, origin: &str, enabled: bool) -> Result<(), StoreError> {
        let mut origins = self.origins.write().await;
        origins.entry(origin.to_string()).or_default().enabled = enabled;
        Ok(())
    }

    async fn credential(&self) -> Result<Option<String>, StoreError> {
        Ok(self.credential.read().await.clone())
    }

    async fn set_credential(&self, key: &str) -> Result<(), StoreError> {
        *self.credential.write().await = Some(key.to_string());
        Ok(())
    }

    async fn upsert_mutation(
        &self,
        origin: &str,
        mutation: PersistedMutation,
    ) -> Result<(), StoreError> {
        let mut origins = self.origins.write().await;
        origins
            .entry(origin.to_string())
            .or_default()
            .upsert(origin, mutation);
        Ok(())
    }

    async fn mutations(&self, origin: &str) -> Result<Vec<PersistedMutation>, StoreError> {
        let origins = self.origins.read().await;
        Ok(origins
            .get(origin)
            .map(|s| s.sorted_mutations())
            .unwrap_or_default())
    }

    async fn clear_origin(&self, origin: &str) -> Result<(), StoreError> {
        self.origins.write().await.remove(origin);
        Ok(())
    }
}

/// File-backed edit store.
///
/// One JSON document per origin:
/// ```text
/// {storage_path}/
/// ├── settings.json          (global credential)
/// └── origins/
///     ├── {sanitized-origin}.json
///     └── ...
/// ```
pub struct FileEditStore {
    storage_path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GlobalSettings {
    #[serde(default)]
    api_key: Option<String>,
}

impl FileEditStore {
    /// Create a file store rooted at `storage_path`.
    pub async fn new(storage_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage_path = storage_path.into();
        fs::create_dir_all(storage_path.join("origins")).await?;
        debug!("FileEditStore initialized at {:?}", storage_path);
        Ok(Self { storage_path })
    }

    fn origin_path(&self, origin: &str) -> PathBuf {
        self.storage_path
            .join("origins")
            .join(format!("{}.json", Self::sanitize_origin(origin)))
    }

    fn settings_path(&self) -> PathBuf {
        self.storage_path.join("settings.json")
    }

    /// Sanitize an origin for use as a file name.
    fn sanitize_origin(origin: &str) -> String {
        origin
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    async fn read_origin(&self, origin: &str) -> Result<OriginState, StoreError> {
        let path = self.origin_path(origin);
        if !path.exists() {
            return Ok(OriginState::default());
        }
        let content = fs::read_to_string(&path).await?;
        match serde_json::from_str(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!("Undecodable origin state at {:?}: {}", path, e);
                Ok(OriginState::default())
            }
        }
    }

    async fn write_origin(&self, origin: &str, state: &OriginState) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(self.origin_path(origin), content).await?;
        Ok(())
    }

    async fn read_settings(&self) -> Result<GlobalSettings, StoreError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(GlobalSettings::default());
        }
        let content = fs::read_to_string(&path).await?;
        serde_json::from_str(&content).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl EditStore for FileEditStore {
    async fn selection_mode(&self, origin: &str) -> Result<bool, StoreError> {
        Ok(self.read_origin(origin).await?.enabled)
    }

    async fn set_selection_mode(&self, origin: &str, enabled: bool) -> Result<(), StoreError> {
        let mut state = self.read_origin(origin).await?;
        state.enabled = enabled;
        self.write_origin(origin, &state).await
    }

    async fn credential(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_settings().await?.api_key)
    }

    async fn set_credential(&self, key: &str) -> Result<(), StoreError> {
        let mut settings = self.read_settings().await?;
        settings.api_key = Some(key.to_string());
        let content = serde_json::to_string_pretty(&settings)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(self.settings_path(), content).await?;
        Ok(())
    }

    async fn upsert_mutation(
        &self,
        origin: &str,
        mutation: PersistedMutation,
    ) -> Result<(), StoreError> {
        let mut state = self.read_origin(origin).await?;
        state.upsert(origin, mutation);
        self.write_origin(origin, &state).await?;
        debug!(origin, "persisted mutation written");
        Ok(())
    }

    async fn mutations(&self, origin: &str) -> Result<Vec<PersistedMutation>, StoreError> {
        Ok(self.read_origin(origin).await?.sorted_mutations())
    }

    async fn clear_origin(&self, origin: &str) -> Result<(), StoreError> {
        let path = self.origin_path(origin);
        if path.exists() {
            fs::remove_file(&path).await?;
            debug!(origin, "cleared origin state");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
