//! In-memory storage implementation of the document-store contract.
//!
//! Documents live in nested HashMaps behind an async-aware read-write lock.
//! Useful for tests and development; queries scan every document in the
//! collection.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::Document;
use futures::{StreamExt, stream};
use mea::rwlock::RwLock;

use docbind_core::{
    backend::{SnapshotStream, StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    query::DocQuery,
    record::Snapshot,
};

use crate::evaluator::matches_all;

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document store.
///
/// `InMemoryStore` is cloneable and wraps its state in an `Arc`; clones
/// share the same underlying data. Create fails with a conflict on an
/// occupied id, update merges fields into the existing body, delete is
/// idempotent, and streaming yields documents in the map's iteration order
/// (no ordering guarantee, matching the contract).
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> body)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn get_document(&self, id: &str, collection: &str) -> StoreResult<Option<Snapshot>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .and_then(|col| col.get(id))
            .map(|body| Snapshot::new(id, body.clone())))
    }

    async fn create_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        if collection_map.contains_key(id) {
            return Err(StoreError::Conflict(id.to_string(), collection.to_string()));
        }

        collection_map.insert(id.to_string(), body);

        Ok(())
    }

    async fn update_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(StoreError::CollectionNotFound(collection.to_string())),
        };

        let existing = match collection_map.get_mut(id) {
            Some(doc) => doc,
            None => return Err(StoreError::NotFound(id.to_string(), collection.to_string())),
        };

        // Merge/patch semantics: fields not present in the body survive.
        for (key, value) in body {
            existing.insert(key, value);
        }

        Ok(())
    }

    async fn delete_document(&self, id: &str, collection: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;

        // Idempotent: deleting an absent document or collection succeeds.
        if let Some(collection_map) = store.get_mut(collection) {
            collection_map.remove(id);
        }

        Ok(())
    }

    async fn stream_documents(
        &self,
        query: DocQuery,
        collection: &str,
    ) -> StoreResult<SnapshotStream> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(stream::iter(Vec::<StoreResult<Snapshot>>::new()).boxed()),
        };

        let snapshots = collection_map
            .iter()
            .filter(|(_, body)| matches_all(body, &query.filters))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|(id, body)| Ok(Snapshot::new(id.clone(), body.clone())))
            .collect::<Vec<_>>();

        Ok(stream::iter(snapshots).boxed())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
