//! In-memory record store

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::GrantResult;
use crate::records::{Granted, Requested};

use super::RecordStore;

/// Keyed records in insertion order
#[derive(Debug)]
struct Keyed<T> {
    entries: Vec<(String, T)>,
}

impl<T: Clone> Keyed<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace in place when the key exists, append otherwise
    fn upsert(&mut self, key: String, record: T) -> bool {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                entry.1 = record;
                false
            }
            None => {
                self.entries.push((key, record));
                true
            }
        }
    }

    fn records(&self) -> Vec<T> {
        self.entries.iter().map(|(_, r)| r.clone()).collect()
    }
}

/// Store keeping every record in process memory
#[derive(Debug)]
pub struct MemoryStore {
    granted: RwLock<Keyed<Granted>>,
    requested: RwLock<Keyed<Requested>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            granted: RwLock::new(Keyed::new()),
            requested: RwLock::new(Keyed::new()),
        }
    }

    /// Create a store seeded with grants
    pub async fn with_granted(granted: impl IntoIterator<Item = Granted>) -> GrantResult<Self> {
        let store = Self::new();
        for grant in granted {
            store.save_granted(grant).await?;
        }
        Ok(store)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn granted(&self) -> GrantResult<Vec<Granted>> {
        Ok(self.granted.read().await.records())
    }

    async fn requested(&self) -> GrantResult<Vec<Requested>> {
        Ok(self.requested.read().await.records())
    }

    async fn save_granted(&self, granted: Granted) -> GrantResult<String> {
        let key = granted.content_key()?;
        if self.granted.write().await.upsert(key.clone(), granted) {
            tracing::debug!("[MemoryStore] Stored grant {}", key);
        }
        Ok(key)
    }

    async fn save_requested(&self, requested: Requested) -> GrantResult<String> {
        let key = requested.content_key()?;
        if self.requested.write().await.upsert(key.clone(), requested) {
            tracing::debug!("[MemoryStore] Stored request {}", key);
        }
        Ok(key)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
