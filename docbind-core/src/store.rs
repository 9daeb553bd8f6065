//! The record store: entry point binding record types to a backend.
//!
//! A [`RecordStore`] owns (or borrows, via the `&B`/`Box<B>` backend impls)
//! a [`StoreBackend`] and hands out typed [`RecordMapper`]s. Obtaining a
//! mapper is pure composition: the record type's resolved collection is
//! read, no I/O is performed.
//!
//! # Example
//!
//! ```ignore
//! use docbind_core::store::RecordStore;
//!
//! let store = RecordStore::new(backend);
//! let users = store.records::<User>()?;
//! let found = users.get("u1").await?;
//! ```

use crate::{
    backend::StoreBackend,
    error::StoreResult,
    mapper::RecordMapper,
    record::Record,
};

/// A record store bound to a backend implementation.
///
/// The backend is an externally owned resource; the store never opens or
/// closes its connection. Use `RecordStore<Box<dyn StoreBackend>>` when the
/// backend type is only known at runtime.
#[derive(Debug)]
pub struct RecordStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> RecordStore<B> {
    /// Creates a record store over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the typed mapper for `R`, addressed at `R`'s resolved
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`](crate::error::StoreError::Config) when
    /// the record type has no collection configured along its inheritance
    /// chain.
    pub fn records<R: Record>(&self) -> StoreResult<RecordMapper<'_, B, R>> {
        let collection = R::config().collection()?.to_string();

        Ok(RecordMapper::new(collection, &self.backend))
    }
}
