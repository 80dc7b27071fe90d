//! Whole-collection persistence for shelf resources.
//!
//! Every resource type owns one [`CollectionStore`]. A store hands back the
//! full ordered collection on [`CollectionStore::load`] and replaces it
//! wholesale on [`CollectionStore::save`]; there is no per-record access and
//! no cache between calls.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

/// Read-whole / write-whole storage for one collection of records.
#[async_trait]
pub trait CollectionStore<T>: Send + Sync {
    /// Read the entire collection.
    ///
    /// Never fails: a missing, unreadable, or undecodable backing file
    /// yields an empty collection.
    async fn load(&self) -> Vec<T>;

    /// Replace the entire collection.
    async fn save(&self, items: &[T]) -> Result<(), StoreError>;
}
