use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Document, DocumentStore, FieldFilter, ResultStore, StoreError};

/// In-process store backend used by tests and local runs.
///
/// Documents keep insertion order per collection, which is the only
/// ordering the contract promises ("store-native order"). Clones share
/// the same underlying collections, so a test can keep a handle to the
/// store it hands the adapter.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolves a dotted field path inside a document's field map.
fn lookup<'a>(fields: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut value = fields.get(segments.next()?)?;
    for segment in segments {
        value = value.get(segment)?;
    }
    Some(value)
}

fn matches(document: &Document, filters: &[FieldFilter]) -> bool {
    filters
        .iter()
        .all(|filter| lookup(&document.fields, &filter.path) == Some(&filter.value))
}

impl DocumentStore for MemoryStore {
    async fn query(&self, collection: &str, filters: &[FieldFilter]) -> ResultStore<Vec<Document>> {
        let collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let documents = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches(document, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> ResultStore<Document> {
        let document = Document {
            id: Uuid::new_v4().to_string(),
            fields,
        };
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> ResultStore<Document> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id))
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        for (key, value) in fields {
            document.fields.insert(key, value);
        }
        Ok(document.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> ResultStore<()> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        let before = documents.len();
        documents.retain(|document| document.id != id);
        if documents.len() == before {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }
        Ok(())
    }
}
