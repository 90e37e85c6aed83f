//! The document-store collaborator.
//!
//! The rest of the workspace consumes the store only through
//! [`DocumentStore`]: collection-scoped equality queries, document CRUD by
//! identifier, and store-assigned identifiers on insert. Two backends are
//! provided, an in-process [`MemoryStore`] for tests and local runs and a
//! [`RestStore`] client for a remote endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

pub type ResultStore<T> = Result<T, StoreError>;

/// A schemaless document: a store-assigned identifier plus a JSON field map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// An equality predicate on a field path.
///
/// Dotted paths reach into nested objects (`"category.id"`). Equality is
/// the only supported comparison.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldFilter {
    pub path: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn new(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Abstraction over document-store backends.
///
/// Callers never combine more than two filters per query; backends are not
/// required to support more. No multi-document atomicity and no schema
/// enforcement are expected of implementations.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Returns the documents of `collection` matching every filter, in
    /// store-native order.
    async fn query(&self, collection: &str, filters: &[FieldFilter]) -> ResultStore<Vec<Document>>;

    /// Persists a new document and returns it with its assigned identifier.
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> ResultStore<Document>;

    /// Merges `fields` into an existing document, leaving absent keys
    /// untouched, and returns the updated document.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> ResultStore<Document>;

    /// Deletes a document by identifier.
    async fn delete(&self, collection: &str, id: &str) -> ResultStore<()>;
}

/// Store-boundary failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("\"{0}\" not found")]
    NotFound(String),
    /// A constraint-style refusal by the store itself.
    #[error("rejected by the store: {0}")]
    Rejected(String),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("store error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
