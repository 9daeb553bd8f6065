//! Typed mapper operations and the query cursor.
//!
//! A [`RecordMapper`] binds one record type to its resolved collection and a
//! borrowed backend, and carries every instance-level operation: `get`,
//! `filter`, `create`, `update`, `delete`. [`Cursor`] is the immutable,
//! chainable query handle returned by `filter`.
//!
//! # Example
//!
//! ```ignore
//! use docbind_core::query::FilterOp;
//! use futures::StreamExt;
//!
//! let users = store.records::<User>()?;
//!
//! let mut user = User { id: None, name: "Alice".to_string() };
//! users.create(&mut user).await?;
//! assert!(user.id.is_some());
//!
//! let mut stream = users.filter("name", FilterOp::Eq, "Alice").stream().await?;
//! while let Some(found) = stream.next().await {
//!     println!("{:?}", found?);
//! }
//! ```

use std::marker::PhantomData;

use bson::Bson;
use futures::{StreamExt, stream::BoxStream};

use crate::{
    backend::StoreBackend,
    error::{StoreError, StoreResult},
    query::{DocQuery, FilterOp},
    record::{Record, RecordExt},
};

/// A lazy, forward-only sequence of typed records.
pub type RecordStream<R> = BoxStream<'static, StoreResult<R>>;

/// Instance-level operations for one record type against one backend.
#[derive(Debug)]
pub struct RecordMapper<'a, B: StoreBackend, R: Record> {
    collection: String,
    backend: &'a B,
    _marker: PhantomData<R>,
}

impl<'a, B: StoreBackend, R: Record> RecordMapper<'a, B, R> {
    pub(crate) fn new(collection: String, backend: &'a B) -> Self {
        Self { collection, backend, _marker: PhantomData }
    }

    /// The collection this mapper addresses.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Fetches the record at `id`.
    ///
    /// Returns `Ok(None)` when the document does not exist; a missing
    /// document is an expected result, not an error.
    pub async fn get(&self, id: &str) -> StoreResult<Option<R>> {
        match self
            .backend
            .get_document(id, &self.collection)
            .await?
        {
            Some(snapshot) => Ok(Some(R::from_snapshot(snapshot)?)),
            None => Ok(None),
        }
    }

    /// Starts a query with one field filter applied.
    ///
    /// Further filters and a limit can be chained on the returned
    /// [`Cursor`]; no I/O happens until [`Cursor::stream`].
    pub fn filter(&self, field: impl Into<String>, op: FilterOp, value: impl Into<Bson>) -> Cursor<'a, B, R> {
        Cursor::new(
            self.collection.clone(),
            self.backend,
            DocQuery::new().filter(field, op, value),
        )
    }

    /// Returns the identity to write at, generating and assigning a fresh
    /// one when the record has none (or when `new_id` forces regeneration).
    fn write_identity(&self, record: &mut R, new_id: bool) -> StoreResult<String> {
        if !new_id {
            if let Some(id) = record.identity() {
                return Ok(id.to_string());
            }
        }

        let id = R::config().id_generator()?.generate();
        record.set_identity(Some(id.clone()));

        Ok(id)
    }

    /// Persists a new document for `record`.
    ///
    /// The body is the record's field map minus the identity field. An
    /// unset identity is generated via the configured generator and
    /// assigned onto the record. On a create conflict, when the type's
    /// `retry_create_on_conflict` policy allows, a brand-new identity is
    /// generated (the colliding one is never reused) and the create is
    /// retried; the loop is unbounded and terminates only on success or a
    /// non-conflict error. With the policy disabled the conflict propagates
    /// unchanged.
    ///
    /// On success the record's identity field holds the persisted id.
    pub async fn create(&self, record: &mut R) -> StoreResult<()> {
        let body = record.to_body()?;
        let mut new_id = false;

        loop {
            let id = self.write_identity(record, new_id)?;

            match self
                .backend
                .create_document(&id, body.clone(), &self.collection)
                .await
            {
                Ok(()) => return Ok(()),
                Err(StoreError::Conflict(..)) if R::config().retry_create_on_conflict() => {
                    new_id = true;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Merges the record's current field values (minus identity) into the
    /// document at its identity's path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingIdentity`] when the record has no
    /// identity set; updating an unpersisted record is a caller error,
    /// surfaced distinctly from store-level failures.
    pub async fn update(&self, record: &R) -> StoreResult<()> {
        let id = record
            .identity()
            .ok_or_else(|| StoreError::MissingIdentity(self.collection.clone()))?;
        let body = record.to_body()?;

        self.backend
            .update_document(id, body, &self.collection)
            .await
    }

    /// Deletes the persisted copy of `record`.
    ///
    /// When the identity field is unset nothing was ever persisted, so this
    /// returns without any store I/O. The in-memory record is untouched
    /// either way.
    pub async fn delete(&self, record: &R) -> StoreResult<()> {
        let Some(id) = record.identity() else {
            return Ok(());
        };

        self.backend
            .delete_document(id, &self.collection)
            .await
    }
}

/// An immutable, chainable cursor over a store query.
///
/// Each [`filter`](Cursor::filter) or [`limit`](Cursor::limit) call returns
/// a new cursor; the bound record type and backend never change across the
/// chain, and the original cursor stays usable.
#[derive(Debug)]
pub struct Cursor<'a, B: StoreBackend, R: Record> {
    collection: String,
    backend: &'a B,
    query: DocQuery,
    _marker: PhantomData<R>,
}

impl<'a, B: StoreBackend, R: Record> Cursor<'a, B, R> {
    pub(crate) fn new(collection: String, backend: &'a B, query: DocQuery) -> Self {
        Self { collection, backend, query, _marker: PhantomData }
    }

    /// The query this cursor would execute.
    pub fn query(&self) -> &DocQuery {
        &self.query
    }

    /// Returns a new cursor with one more field filter applied.
    ///
    /// Filters compose conjunctively in the order applied.
    pub fn filter(&self, field: impl Into<String>, op: FilterOp, value: impl Into<Bson>) -> Self {
        Self::new(
            self.collection.clone(),
            self.backend,
            self.query.clone().filter(field, op, value),
        )
    }

    /// Returns a new cursor with a maximum result count applied.
    pub fn limit(&self, limit: usize) -> Self {
        Self::new(
            self.collection.clone(),
            self.backend,
            self.query.clone().limit(limit),
        )
    }

    /// Executes the query and lazily materializes matching snapshots into
    /// typed records.
    ///
    /// Each snapshot is converted exactly as [`RecordMapper::get`] converts
    /// one: field map verbatim, identity from the snapshot's own key. The
    /// sequence is forward-only and finite: it ends when the store's result
    /// set ends, in the store's delivery order.
    pub async fn stream(&self) -> StoreResult<RecordStream<R>> {
        let snapshots = self
            .backend
            .stream_documents(self.query.clone(), &self.collection)
            .await?;

        Ok(snapshots
            .map(|snapshot| snapshot.and_then(R::from_snapshot))
            .boxed())
    }
}
