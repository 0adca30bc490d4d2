// src/infrastructure/storage/memory.rs
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::error::DomainResult;
use crate::domain::repositories::storage::CollectionStorage;

/// Process-local storage; contents are lost on exit
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw payload under `key`, for inspecting what a store wrote
    pub async fn payload(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl CollectionStorage for InMemoryStorage {
    async fn read(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.payload(key).await)
    }

    async fn write(&self, key: &str, payload: &str) -> DomainResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
