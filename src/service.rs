//! CRUD over a whole-collection store, shared by every resource module.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use shelf_db::{CollectionStore, JsonFileStore, MemoryStore};
use shelf_http::{AppError, AppResult};
use shelf_kernel::settings::StorageSettings;
use tokio::sync::Mutex;

use crate::modules::{authors::models::Author, books::models::Book, categories::models::Category};

/// A record type managed by a [`ResourceService`].
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Payload accepted on creation.
    type Create: Send + 'static;
    /// Partial update; only supplied fields are applied.
    type Update: Send + 'static;

    /// Singular name used in response messages, e.g. `"Book"`.
    const LABEL: &'static str;

    /// Whether an update supplying no fields is rejected instead of applied.
    const REJECT_EMPTY_UPDATE: bool = false;

    /// Whether the merged record is re-validated before an update is saved.
    const VALIDATE_MERGED_UPDATE: bool = false;

    fn id(&self) -> &str;

    /// Build a new record, assigning its id and both timestamps.
    fn create(input: Self::Create, now: DateTime<Utc>) -> Self;

    /// Rule violations, empty when the record is valid.
    fn violations(&self) -> Vec<String>;

    /// Reason this new record clashes with the stored collection, if any.
    fn conflict(&self, _existing: &[Self]) -> Option<String> {
        None
    }

    fn is_empty_update(update: &Self::Update) -> bool;

    /// Merge supplied fields; never touches `id` or `createdAt`.
    fn apply(&mut self, update: Self::Update);

    fn touch(&mut self, now: DateTime<Utc>);
}

/// Load-mutate-save operations over one resource collection.
///
/// Mutations hold a per-collection writer lock across the whole
/// load-mutate-save sequence. Reads never take it.
pub struct ResourceService<R> {
    store: Arc<dyn CollectionStore<R>>,
    writer: Mutex<()>,
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn CollectionStore<R>>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    pub async fn list_all(&self) -> Vec<R> {
        self.store.load().await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<R> {
        self.store
            .load()
            .await
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(not_found::<R>)
    }

    pub async fn create(&self, input: R::Create) -> AppResult<R> {
        let _guard = self.writer.lock().await;
        let mut records = self.store.load().await;

        let record = R::create(input, Utc::now());
        if let Some(reason) = record.conflict(&records) {
            return Err(AppError::conflict(reason));
        }
        let violations = record.violations();
        if !violations.is_empty() {
            return Err(AppError::validation(violations));
        }

        records.push(record.clone());
        self.store.save(&records).await?;

        tracing::info!(resource = R::LABEL, id = record.id(), "record created");
        Ok(record)
    }

    pub async fn update(&self, id: &str, update: R::Update) -> AppResult<R> {
        let _guard = self.writer.lock().await;
        let mut records = self.store.load().await;

        let index = position(&records, id).ok_or_else(not_found::<R>)?;
        if R::REJECT_EMPTY_UPDATE && R::is_empty_update(&update) {
            return Err(AppError::bad_request("No valid fields to update"));
        }

        let mut updated = records[index].clone();
        updated.apply(update);
        if R::VALIDATE_MERGED_UPDATE {
            let violations = updated.violations();
            if !violations.is_empty() {
                return Err(AppError::validation(violations));
            }
        }
        updated.touch(Utc::now());

        records[index] = updated.clone();
        self.store.save(&records).await?;

        tracing::info!(resource = R::LABEL, id, "record updated");
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> AppResult<R> {
        let _guard = self.writer.lock().await;
        let mut records = self.store.load().await;

        let index = position(&records, id).ok_or_else(not_found::<R>)?;
        let removed = records.remove(index);
        self.store.save(&records).await?;

        tracing::info!(resource = R::LABEL, id, "record removed");
        Ok(removed)
    }
}

fn position<R: Resource>(records: &[R], id: &str) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}

fn not_found<R: Resource>() -> AppError {
    AppError::not_found(format!("{} not found", R::LABEL))
}

/// The three resource services wired to their stores.
#[derive(Clone)]
pub struct Services {
    pub books: Arc<ResourceService<Book>>,
    pub authors: Arc<ResourceService<Author>>,
    pub categories: Arc<ResourceService<Category>>,
}

impl Services {
    /// One JSON file per resource under the configured data directory.
    pub fn open(storage: &StorageSettings) -> Self {
        Self::from_stores(
            Arc::new(JsonFileStore::<Book>::new(storage.books_path())),
            Arc::new(JsonFileStore::<Author>::new(storage.authors_path())),
            Arc::new(JsonFileStore::<Category>::new(storage.categories_path())),
        )
    }

    pub fn in_memory() -> Self {
        Self::from_stores(
            Arc::new(MemoryStore::<Book>::new()),
            Arc::new(MemoryStore::<Author>::new()),
            Arc::new(MemoryStore::<Category>::new()),
        )
    }

    pub fn from_stores(
        books: Arc<dyn CollectionStore<Book>>,
        authors: Arc<dyn CollectionStore<Author>>,
        categories: Arc<dyn CollectionStore<Category>>,
    ) -> Self {
        Self {
            books: Arc::new(ResourceService::new(books)),
            authors: Arc::new(ResourceService::new(authors)),
            categories: Arc::new(ResourceService::new(categories)),
        }
    }
}
