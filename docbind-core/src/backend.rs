//! Storage backend abstraction: the document-store client contract.
//!
//! [`StoreBackend`] is the minimum capability surface the mapping layer
//! requires of a document store: point reads, path-addressed create/update/
//! delete, and a filtered snapshot stream. The trait is object-safe, so
//! `Box<dyn StoreBackend>` works wherever a concrete backend does; delegating
//! impls for `&B` and `Box<B>` are provided.
//!
//! # Examples
//!
//! ```ignore
//! use docbind_core::backend::StoreBackend;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//!
//! // Create a document at ("users", "u1"); fails with Conflict if occupied.
//! backend.create_document("u1", doc! { "name": "Alice" }, "users").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document;
use futures::stream::BoxStream;
use std::fmt::Debug;

use crate::{error::StoreResult, query::DocQuery, record::Snapshot};

/// A lazy, forward-only sequence of store snapshots.
pub type SnapshotStream = BoxStream<'static, StoreResult<Snapshot>>;

/// Abstract interface for document storage backends.
///
/// The mapping layer never opens or closes the underlying connection; a
/// backend is an externally owned resource. Implementations must be
/// thread-safe (`Send + Sync`); the concrete concurrency discipline is the
/// implementer's concern.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Fetches the document at path (`collection`, `id`).
    ///
    /// A missing document is `Ok(None)`, never an error.
    async fn get_document(&self, id: &str, collection: &str) -> StoreResult<Option<Snapshot>>;

    /// Creates a document at path (`collection`, `id`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`](crate::error::StoreError::Conflict)
    /// when a document already exists at that path.
    async fn create_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()>;

    /// Merges `body` into the existing document at path (`collection`, `id`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// when no document exists at that path.
    async fn update_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()>;

    /// Deletes the document at path (`collection`, `id`).
    ///
    /// Idempotent: succeeds even when the document is absent.
    async fn delete_document(&self, id: &str, collection: &str) -> StoreResult<()>;

    /// Streams the snapshots matching `query` in the store's natural result
    /// order, honoring the query's filters (conjunctively, in order) and
    /// limit.
    async fn stream_documents(
        &self,
        query: DocQuery,
        collection: &str,
    ) -> StoreResult<SnapshotStream>;
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn get_document(&self, id: &str, collection: &str) -> StoreResult<Option<Snapshot>> {
        (*self).get_document(id, collection).await
    }

    async fn create_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()> {
        (*self)
            .create_document(id, body, collection)
            .await
    }

    async fn update_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()> {
        (*self)
            .update_document(id, body, collection)
            .await
    }

    async fn delete_document(&self, id: &str, collection: &str) -> StoreResult<()> {
        (*self).delete_document(id, collection).await
    }

    async fn stream_documents(
        &self,
        query: DocQuery,
        collection: &str,
    ) -> StoreResult<SnapshotStream> {
        (*self)
            .stream_documents(query, collection)
            .await
    }
}

#[async_trait]
impl<B> StoreBackend for Box<B>
where
    B: StoreBackend + ?Sized,
{
    async fn get_document(&self, id: &str, collection: &str) -> StoreResult<Option<Snapshot>> {
        (**self).get_document(id, collection).await
    }

    async fn create_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()> {
        (**self)
            .create_document(id, body, collection)
            .await
    }

    async fn update_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()> {
        (**self)
            .update_document(id, body, collection)
            .await
    }

    async fn delete_document(&self, id: &str, collection: &str) -> StoreResult<()> {
        (**self).delete_document(id, collection).await
    }

    async fn stream_documents(
        &self,
        query: DocQuery,
        collection: &str,
    ) -> StoreResult<SnapshotStream> {
        (**self)
            .stream_documents(query, collection)
            .await
    }
}

/// Factory trait for constructing backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StoreResult<Self::Backend>;
}
