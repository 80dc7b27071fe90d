use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CollectionStore, StoreError};

/// In-process collection, used by tests and ephemeral deployments.
pub struct MemoryStore<T> {
    items: RwLock<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> CollectionStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync,
{
    async fn load(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    async fn save(&self, items: &[T]) -> Result<(), StoreError> {
        *self.items.write().await = items.to_vec();
        Ok(())
    }
}
