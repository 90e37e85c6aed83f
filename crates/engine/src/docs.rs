//! Document ↔ entity codecs.

use docstore::{Document, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{EngineError, ResultEngine};

/// Decodes a document into an entity, injecting the store-assigned id.
pub(crate) fn decode<T: DeserializeOwned>(document: Document) -> ResultEngine<T> {
    let Document { id, mut fields } = document;
    fields.insert("id".to_string(), Value::String(id));
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| EngineError::Store(StoreError::Serialization(err)))
}

/// Serializes a payload into a field map.
///
/// Any `id` key is dropped so the store stays the only source of
/// identifiers.
pub(crate) fn fields_of<T: Serialize>(value: &T) -> ResultEngine<Map<String, Value>> {
    let value =
        serde_json::to_value(value).map_err(|err| EngineError::Store(StoreError::Serialization(err)))?;
    object(value)
}

pub(crate) fn object(value: Value) -> ResultEngine<Map<String, Value>> {
    match value {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(EngineError::Store(StoreError::Invalid(format!(
            "expected an object, got {other}"
        )))),
    }
}
