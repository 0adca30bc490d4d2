// src/application/services/entity_store.rs
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entity::{EntityId, EntityPatch, TaggedEntity};
use crate::domain::error::DomainError;
use crate::domain::query::TagFilter;
use crate::domain::repositories::storage::CollectionStorage;
use crate::domain::tags::{ClothingTags, FacetTags, OutfitTags};
use crate::domain::vocabulary::TagVocabulary;

/// Persisted form of a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
struct StoredCollection<T: FacetTags> {
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default = "Vec::new")]
    items: Vec<TaggedEntity<T>>,
}

fn first_id() -> u64 {
    1
}

impl<T: FacetTags> StoredCollection<T> {
    fn empty() -> Self {
        Self {
            next_id: first_id(),
            items: Vec::new(),
        }
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|e| e.id.as_ref() == Some(id))
    }

    /// Next counter value that is not already taken by an existing id
    fn allocate_id(&mut self) -> ApplicationResult<EntityId> {
        while self.next_id < u64::MAX {
            let candidate = EntityId::new(self.next_id.to_string());
            self.next_id += 1;
            if self.position(&candidate).is_none() {
                return Ok(candidate);
            }
        }
        Err(ApplicationError::Validation(
            "no free ids left, supply an id explicitly".to_string(),
        ))
    }

    /// Every item has a non-blank unique id and an image
    fn check_integrity(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for (index, item) in self.items.iter().enumerate() {
            let id = match &item.id {
                Some(id) if !id.as_str().trim().is_empty() => id,
                _ => return Err(format!("item {} has no id", index)),
            };
            if !seen.insert(id) {
                return Err(format!("id {} occurs more than once", id));
            }
            if item.image.trim().is_empty() {
                return Err(format!("item {} has no image", id));
            }
        }
        Ok(())
    }
}

/// Owner of the collection of one entity kind and its only mutation path.
///
/// Every mutation runs read-modify-persist under one lock: the change is made
/// on a copy of the collection, written whole, and only then becomes visible.
/// A failed write leaves the in-memory collection as it was.
pub struct EntityStore<T: FacetTags> {
    storage: Arc<dyn CollectionStorage>,
    vocabulary: Arc<TagVocabulary<T::Facet>>,
    state: Mutex<StoredCollection<T>>,
}

pub type ClothingStore = EntityStore<ClothingTags>;
pub type OutfitStore = EntityStore<OutfitTags>;

impl<T: FacetTags> EntityStore<T> {
    /// Load the collection from storage; nothing stored yet means an empty store
    #[instrument(skip(storage, vocabulary), level = "debug")]
    pub async fn load(
        storage: Arc<dyn CollectionStorage>,
        vocabulary: Arc<TagVocabulary<T::Facet>>,
    ) -> ApplicationResult<Self> {
        let key = T::KIND.storage_key();
        let collection = match storage
            .read(key)
            .await
            .map_err(|e| ApplicationError::Persistence(e.to_string()))?
        {
            Some(payload) => {
                let mut collection: StoredCollection<T> = serde_json::from_str(&payload)
                    .map_err(|e| {
                        ApplicationError::Persistence(format!(
                            "Cannot parse stored {} collection: {}",
                            T::KIND,
                            e
                        ))
                    })?;
                collection.check_integrity().map_err(|e| {
                    ApplicationError::Persistence(format!(
                        "Stored {} collection is invalid: {}",
                        T::KIND,
                        e
                    ))
                })?;
                let highest = collection
                    .items
                    .iter()
                    .filter_map(|e| e.id.as_ref()?.as_str().parse::<u64>().ok())
                    .max()
                    .unwrap_or(0);
                collection.next_id = collection.next_id.max(highest.saturating_add(1));
                debug!("Loaded {} {} items", collection.items.len(), T::KIND);
                collection
            }
            None => {
                debug!("No stored {} collection, starting empty", T::KIND);
                StoredCollection::empty()
            }
        };

        Ok(Self {
            storage,
            vocabulary,
            state: Mutex::new(collection),
        })
    }

    pub fn vocabulary(&self) -> &TagVocabulary<T::Facet> {
        &self.vocabulary
    }

    /// Snapshot of the collection in insertion order
    pub async fn list(&self) -> Vec<TaggedEntity<T>> {
        self.state.lock().await.items.clone()
    }

    pub async fn get(&self, id: &EntityId) -> Option<TaggedEntity<T>> {
        let state = self.state.lock().await;
        state.position(id).map(|i| state.items[i].clone())
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn filter(&self, filter: &TagFilter<T::Facet>) -> Vec<TaggedEntity<T>> {
        self.state
            .lock()
            .await
            .items
            .iter()
            .filter(|e| filter.matches(*e))
            .cloned()
            .collect()
    }

    /// Validate and append an entity, assigning an id unless one is given
    #[instrument(skip(self, entity), level = "debug")]
    pub async fn add(&self, mut entity: TaggedEntity<T>) -> ApplicationResult<TaggedEntity<T>> {
        entity.validate(&self.vocabulary)?;

        let mut state = self.state.lock().await;
        let mut next = state.clone();

        let id = match entity.id.take() {
            Some(id) if id.as_str().trim().is_empty() => {
                return Err(ApplicationError::Validation(
                    "entity id must not be blank".to_string(),
                ));
            }
            Some(id) if next.position(&id).is_some() => {
                return Err(DomainError::DuplicateId(id).into());
            }
            Some(id) => id,
            None => next.allocate_id()?,
        };
        entity.id = Some(id.clone());
        entity.updated_at = Utc::now();
        next.items.push(entity.clone());

        self.persist(&next).await?;
        *state = next;
        debug!("Added {} {}", T::KIND, id);
        Ok(entity)
    }

    /// Apply `patch` to the entity with `id`
    #[instrument(skip(self, patch), level = "debug")]
    pub async fn edit(
        &self,
        id: &EntityId,
        patch: EntityPatch<T::Facet>,
    ) -> ApplicationResult<TaggedEntity<T>> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();

        let index = next
            .position(id)
            .ok_or_else(|| ApplicationError::NotFound(id.clone()))?;
        let entity = &mut next.items[index];
        entity.apply(patch)?;
        entity.validate(&self.vocabulary)?;
        let updated = entity.clone();

        self.persist(&next).await?;
        *state = next;
        debug!("Edited {} {}", T::KIND, id);
        Ok(updated)
    }

    /// Remove the entity with `id`.
    ///
    /// Removing an absent id is a no-op and returns `false`.
    #[instrument(skip(self), level = "debug")]
    pub async fn remove(&self, id: &EntityId) -> ApplicationResult<bool> {
        let mut state = self.state.lock().await;
        let Some(index) = state.position(id) else {
            trace!("Nothing to remove for {} {}", T::KIND, id);
            return Ok(false);
        };

        let mut next = state.clone();
        next.items.remove(index);

        self.persist(&next).await?;
        *state = next;
        debug!("Removed {} {}", T::KIND, id);
        Ok(true)
    }

    async fn persist(&self, collection: &StoredCollection<T>) -> ApplicationResult<()> {
        let payload = serde_json::to_string_pretty(collection).map_err(|e| {
            ApplicationError::Persistence(format!("Cannot serialize {} collection: {}", T::KIND, e))
        })?;
        self.storage
            .write(T::KIND.storage_key(), &payload)
            .await
            .map_err(|e| {
                warn!("Persisting {} collection failed: {}", T::KIND, e);
                ApplicationError::Persistence(e.to_string())
            })
    }
}

impl<T: FacetTags> fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("kind", &T::KIND)
            .field("storage", &self.storage)
            .field("vocabulary", &self.vocabulary)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::OutfitItem;
    use crate::infrastructure::storage::memory::InMemoryStorage;

    async fn store() -> (Arc<InMemoryStorage>, OutfitStore) {
        let storage = Arc::new(InMemoryStorage::new());
        let store = OutfitStore::load(storage.clone(), Arc::new(TagVocabulary::default()))
            .await
            .unwrap();
        (storage, store)
    }

    #[tokio::test]
    async fn given_empty_storage_when_load_then_store_is_empty() {
        let (_, store) = store().await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn given_entities_without_id_when_add_then_assigns_distinct_ids() {
        let (_, store) = store().await;
        let a = store
            .add(OutfitItem::new("a", "", OutfitTags::default()))
            .await
            .unwrap();
        let b = store
            .add(OutfitItem::new("b", "", OutfitTags::default()))
            .await
            .unwrap();

        assert_eq!(a.id, Some(EntityId::new("1")));
        assert_eq!(b.id, Some(EntityId::new("2")));
    }

    #[tokio::test]
    async fn given_caller_supplied_id_when_add_then_kept_and_collision_rejected() {
        let (_, store) = store().await;
        let mut item = OutfitItem::new("a", "", OutfitTags::default());
        item.id = Some(EntityId::new("1"));
        store.add(item.clone()).await.unwrap();

        let err = store.add(item).await.unwrap_err();
        assert!(err.is_validation());

        // counter skips the taken id
        let next = store
            .add(OutfitItem::new("b", "", OutfitTags::default()))
            .await
            .unwrap();
        assert_eq!(next.id, Some(EntityId::new("2")));
    }

    #[tokio::test]
    async fn given_stored_collection_when_reloaded_then_continues_id_sequence() {
        let (storage, store) = store().await;
        store
            .add(OutfitItem::new("a", "", OutfitTags::default()))
            .await
            .unwrap();
        let removed = store.add(OutfitItem::new("b", "", OutfitTags::default())).await.unwrap();
        store.remove(removed.id.as_ref().unwrap()).await.unwrap();

        let reloaded = OutfitStore::load(storage, Arc::new(TagVocabulary::default()))
            .await
            .unwrap();
        assert_eq!(reloaded.len().await, 1);
        let c = reloaded
            .add(OutfitItem::new("c", "", OutfitTags::default()))
            .await
            .unwrap();
        assert_eq!(c.id, Some(EntityId::new("3")));
    }

    #[tokio::test]
    async fn given_absent_id_when_edit_then_not_found() {
        let (_, store) = store().await;
        let err = store
            .edit(&EntityId::new("42"), EntityPatch::new().description("x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn given_patch_blanking_image_when_edit_then_rejected_and_unchanged() {
        let (_, store) = store().await;
        let item = store
            .add(OutfitItem::new("a", "beach", OutfitTags::default()))
            .await
            .unwrap();
        let id = item.id.clone().unwrap();

        let err = store
            .edit(&id, EntityPatch::new().image("").description("changed"))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.get(&id).await.unwrap().description, "beach");
    }

    #[tokio::test]
    async fn given_corrupt_payload_when_load_then_persistence_error() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.write("outfits", "{not json").await.unwrap();

        let err = OutfitStore::load(storage, Arc::new(TagVocabulary::default()))
            .await
            .unwrap_err();
        assert!(err.is_persistence());
    }

    #[tokio::test]
    async fn given_duplicate_stored_ids_when_load_then_persistence_error() {
        let storage = Arc::new(InMemoryStorage::new());
        let payload = r#"{"next_id": 2, "items": [
            {"id": "1", "image": "a", "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"},
            {"id": "1", "image": "b", "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}
        ]}"#;
        storage.write("outfits", payload).await.unwrap();

        let err = OutfitStore::load(storage, Arc::new(TagVocabulary::default()))
            .await
            .unwrap_err();
        assert!(err.is_persistence());
        assert!(err.to_string().contains("more than once"));
    }

    #[tokio::test]
    async fn given_stored_item_without_id_or_image_when_load_then_persistence_error() {
        let missing_id = r#"{"items": [
            {"image": "a", "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}
        ]}"#;
        let blank_image = r#"{"items": [
            {"id": "1", "image": " ", "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}
        ]}"#;

        for payload in [missing_id, blank_image] {
            let storage = Arc::new(InMemoryStorage::new());
            storage.write("outfits", payload).await.unwrap();
            let err = OutfitStore::load(storage, Arc::new(TagVocabulary::default()))
                .await
                .unwrap_err();
            assert!(err.is_persistence());
        }
    }

    #[tokio::test]
    async fn given_max_numeric_id_when_reloaded_then_loads_and_requires_explicit_id() {
        let (storage, store) = store().await;
        let mut item = OutfitItem::new("a", "", OutfitTags::default());
        item.id = Some(EntityId::new(u64::MAX.to_string()));
        store.add(item).await.unwrap();

        let reloaded = OutfitStore::load(storage, Arc::new(TagVocabulary::default()))
            .await
            .unwrap();
        let err = reloaded
            .add(OutfitItem::new("b", "", OutfitTags::default()))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let mut named = OutfitItem::new("c", "", OutfitTags::default());
        named.id = Some(EntityId::new("picnic"));
        assert!(reloaded.add(named).await.is_ok());
        assert_eq!(reloaded.len().await, 2);
    }

    #[tokio::test]
    async fn given_id_just_below_max_when_allocating_then_no_overflow() {
        let (storage, store) = store().await;
        let mut item = OutfitItem::new("a", "", OutfitTags::default());
        item.id = Some(EntityId::new((u64::MAX - 1).to_string()));
        store.add(item).await.unwrap();

        let reloaded = OutfitStore::load(storage, Arc::new(TagVocabulary::default()))
            .await
            .unwrap();
        let err = reloaded
            .add(OutfitItem::new("b", "", OutfitTags::default()))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(reloaded.len().await, 1);
    }
}
