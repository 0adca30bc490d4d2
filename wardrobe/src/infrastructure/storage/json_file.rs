// src/infrastructure/storage/json_file.rs
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument, trace};

use crate::domain::error::DomainResult;
use crate::domain::repositories::storage::CollectionStorage;
use crate::infrastructure::error::InfrastructureError;

/// One `<key>.json` file per collection inside a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`; keys are restricted to `[A-Za-z0-9_-]`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, InfrastructureError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(InfrastructureError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl CollectionStorage for JsonFileStorage {
    #[instrument(skip(self), level = "trace")]
    async fn read(&self, key: &str) -> DomainResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(payload) => {
                trace!("Read {} bytes from {:?}", payload.len(), path);
                Ok(Some(payload))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No collection file at {:?}", path);
                Ok(None)
            }
            Err(e) => Err(InfrastructureError::FileSystem(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
            .into()),
        }
    }

    /// Written to a sibling temp file first, then renamed over the target
    #[instrument(skip(self, payload), level = "trace")]
    async fn write(&self, key: &str, payload: &str) -> DomainResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let fs_error = |action: &str, p: &Path, e: std::io::Error| {
            InfrastructureError::FileSystem(format!("Failed to {} {}: {}", action, p.display(), e))
        };

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| fs_error("create", self.dir.as_path(), e))?;
        fs::write(&tmp, payload)
            .await
            .map_err(|e| fs_error("write", tmp.as_path(), e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| fs_error("replace", path.as_path(), e))?;

        trace!("Wrote {} bytes to {:?}", payload.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn given_missing_file_when_read_then_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        assert_eq!(storage.read("clothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn given_missing_directory_when_write_then_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/data"));

        storage.write("outfits", "{\"items\":[]}").await.unwrap();

        let on_disk = std::fs::read_to_string(dir.path().join("nested/data/outfits.json")).unwrap();
        assert_eq!(on_disk, "{\"items\":[]}");
        assert!(!dir.path().join("nested/data/outfits.json.tmp").exists());
        assert_eq!(
            storage.read("outfits").await.unwrap().as_deref(),
            Some("{\"items\":[]}")
        );
    }

    #[test]
    fn given_key_with_path_separator_when_path_for_then_rejected() {
        let storage = JsonFileStorage::new("/tmp");
        assert!(storage.path_for("../etc/passwd").is_err());
        assert!(storage.path_for("").is_err());
        assert!(storage.path_for("clothing").is_ok());
    }
}
