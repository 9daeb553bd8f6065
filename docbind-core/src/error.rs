//! Error and result types for record mapping operations.
//!
//! Use [`StoreResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Represents all possible failures of the mapping layer and its backends.
///
/// Declaration-time problems surface as [`Config`](StoreError::Config); the
/// remaining variants are raised by instance-level operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Encoding or decoding a record to/from its field map failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A record type's storage configuration is invalid or incomplete.
    #[error("Record configuration error: {0}")]
    Config(String),
    /// A create targeted an already-occupied document path.
    /// The first argument is the document id, the second the collection name.
    #[error("Document {0} already exists in collection {1}")]
    Conflict(String, String),
    /// The targeted document does not exist.
    /// The first argument is the document id, the second the collection name.
    #[error("Document {0} not found in collection {1}")]
    NotFound(String, String),
    /// The targeted collection does not exist in the store.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// An operation that requires a persisted identity was called on a
    /// record whose identity field is unset.
    #[error("Record in collection {0} has no identity set")]
    MissingIdentity(String),
    /// Identity generation was requested but the record type has no
    /// generator configured.
    #[error("No identity generator configured for collection {0}")]
    NoGenerator(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for record mapping operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
