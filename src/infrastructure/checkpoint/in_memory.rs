//! In-memory checkpoint store implementation using moka

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::domain::{CheckpointStore, DomainError, WorkflowState};

/// Limits for the in-memory checkpoint store
#[derive(Debug, Clone)]
pub struct InMemoryCheckpointConfig {
    /// Checkpoints not saved again within this window are dropped
    pub ttl: Duration,
    /// Maximum number of stored checkpoints
    pub max_entries: u64,
}

impl Default for InMemoryCheckpointConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            max_entries: 1_000,
        }
    }
}

impl InMemoryCheckpointConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries;
        self
    }
}

/// Keeps serialized workflow states in memory, one per thread id.
///
/// States go through JSON so a loaded state is a fresh copy without the
/// task's progress sink, the same as a persistent store would return.
/// Abandoned checkpoints expire after the configured TTL.
#[derive(Debug, Clone)]
pub struct InMemoryCheckpointStore {
    cache: MokaCache<String, Arc<String>>,
    /// Threads currently being resumed
    claims: Arc<Mutex<HashSet<String>>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::with_config(InMemoryCheckpointConfig::default())
    }

    pub fn with_config(config: InMemoryCheckpointConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();

        Self {
            cache,
            claims: Arc::default(),
        }
    }

    pub async fn len(&self) -> usize {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn decode(thread_id: &str, data: &str) -> Result<WorkflowState, DomainError> {
        serde_json::from_str(data).map_err(|e| {
            DomainError::storage(format!("Corrupt checkpoint '{}': {}", thread_id, e))
        })
    }
}

impl Default for InMemoryCheckpointStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn save(&self, thread_id: &str, state: &WorkflowState) -> Result<(), DomainError> {
        let data = serde_json::to_string(state)
            .map_err(|e| DomainError::storage(format!("Failed to serialize checkpoint: {}", e)))?;

        self.cache.insert(thread_id.to_string(), Arc::new(data)).await;
        Ok(())
    }

    async fn load(&self, thread_id: &str) -> Result<Option<WorkflowState>, DomainError> {
        self.cache
            .get(thread_id)
            .await
            .map(|data| Self::decode(thread_id, &data))
            .transpose()
    }

    async fn claim(&self, thread_id: &str) -> Result<Option<WorkflowState>, DomainError> {
        let mut claims = self.claims.lock().await;
        if claims.contains(thread_id) {
            return Err(DomainError::conflict(format!(
                "Thread '{}' is already being resumed",
                thread_id
            )));
        }

        let Some(data) = self.cache.get(thread_id).await else {
            return Ok(None);
        };

        let state = Self::decode(thread_id, &data)?;
        claims.insert(thread_id.to_string());
        Ok(Some(state))
    }

    async fn release(&self, thread_id: &str) -> Result<(), DomainError> {
        self.claims.lock().await.remove(thread_id);
        Ok(())
    }

    async fn delete(&self, thread_id: &str) -> Result<bool, DomainError> {
        self.claims.lock().await.remove(thread_id);
        Ok(self.cache.remove(thread_id).await.is_some())
    }
}
