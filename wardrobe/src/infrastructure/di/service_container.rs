use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::{ClothingStore, OutfitStore};
use crate::config::Settings;
use crate::domain::repositories::storage::CollectionStorage;
use crate::domain::vocabulary::VocabularyOverrides;
use crate::infrastructure::storage::JsonFileStorage;

/// Composition root: owns both stores for the lifetime of the process.
///
/// Consumers receive the stores from here; there is no global lookup.
pub struct ServiceContainer {
    pub storage: Arc<dyn CollectionStorage>,
    pub clothing_store: Arc<ClothingStore>,
    pub outfit_store: Arc<OutfitStore>,
}

impl ServiceContainer {
    /// Build the stores on JSON files in the configured data directory
    #[instrument(level = "debug")]
    pub async fn new(config: &Settings) -> ApplicationResult<Self> {
        let overrides = match &config.vocabulary_file {
            Some(path) => Self::read_vocabulary(path)?,
            None => VocabularyOverrides::default(),
        };
        let storage: Arc<dyn CollectionStorage> =
            Arc::new(JsonFileStorage::new(config.data_dir.clone()));
        Self::with_storage(storage, &overrides).await
    }

    /// Build the stores on any storage backend
    pub async fn with_storage(
        storage: Arc<dyn CollectionStorage>,
        overrides: &VocabularyOverrides,
    ) -> ApplicationResult<Self> {
        let clothing_vocabulary = Arc::new(overrides.clothing_vocabulary()?);
        let outfit_vocabulary = Arc::new(overrides.outfit_vocabulary()?);

        let clothing_store = Arc::new(
            ClothingStore::load(storage.clone(), clothing_vocabulary)
                .await
                .map_err(|e| e.context("Failed to load clothing"))?,
        );
        let outfit_store = Arc::new(
            OutfitStore::load(storage.clone(), outfit_vocabulary)
                .await
                .map_err(|e| e.context("Failed to load outfits"))?,
        );

        Ok(Self {
            storage,
            clothing_store,
            outfit_store,
        })
    }

    fn read_vocabulary(path: &Path) -> ApplicationResult<VocabularyOverrides> {
        debug!("Reading vocabulary from {:?}", path);
        let text = std::fs::read_to_string(path).map_err(|e| {
            ApplicationError::Other(format!(
                "Failed to read vocabulary file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(VocabularyOverrides::from_toml(&text)?)
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("storage", &self.storage)
            .field("clothing_store", &"Arc<ClothingStore>")
            .field("outfit_store", &"Arc<OutfitStore>")
            .finish()
    }
}
