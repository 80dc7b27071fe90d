use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

use crate::{CollectionStore, StoreError};

/// A collection persisted as one pretty-printed JSON array.
///
/// Saves go to a sibling temp file which is fsynced and renamed over the
/// target, so readers only ever observe a complete previous or next version.
pub struct JsonFileStore<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collection".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl<T> CollectionStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn load(&self) -> Vec<T> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "collection file absent, starting empty");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read collection file");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to decode collection file");
                Vec::new()
            }
        }
    }

    async fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(items)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        if let Err(err) = write_synced(&temp_path, &encoded).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err);
        }

        if let Err(err) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StoreError::io(&self.path, err));
        }

        tracing::debug!(path = %self.path.display(), records = items.len(), "collection saved");
        Ok(())
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    file.sync_all().await.map_err(|e| StoreError::io(path, e))?;
    Ok(())
}
