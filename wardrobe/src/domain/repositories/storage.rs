// src/domain/repositories/storage.rs
use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::error::DomainResult;

/*
   Collections are persisted whole: a store serializes its entire collection
   and hands the payload over under one key per entity kind. Implementations
   know nothing about entities.
*/
/// Durable key-value storage for serialized collections
#[async_trait]
pub trait CollectionStorage: Debug + Send + Sync {
    /// Payload stored under `key`, `None` if nothing was ever written
    async fn read(&self, key: &str) -> DomainResult<Option<String>>;

    /// Replace the payload stored under `key`
    async fn write(&self, key: &str, payload: &str) -> DomainResult<()>;
}
