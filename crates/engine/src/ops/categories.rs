use api_types::category::{Category, CategorySave};
use chrono::Utc;
use docstore::{DocumentStore, FieldFilter};
use serde_json::json;

use crate::{EngineError, ResultEngine, docs, util};

use super::{COLLECTION_CATEGORIES, COLLECTION_TRANSACTIONS, Engine};

impl<S: DocumentStore> Engine<S> {
    /// Lists every category in store-native order.
    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let documents = self.store.query(COLLECTION_CATEGORIES, &[]).await?;
        documents.into_iter().map(docs::decode).collect()
    }

    /// Renames an existing category or creates a new one.
    ///
    /// With an id only `name` is written; nothing else on the document is
    /// touched.
    pub async fn save_category(&self, payload: CategorySave) -> ResultEngine<Category> {
        let name = util::normalize_required_name(&payload.name, "category name")?;

        let document = match payload.id {
            Some(id) => {
                let fields = docs::object(json!({ "name": name }))?;
                self.store.update(COLLECTION_CATEGORIES, &id, fields).await?
            }
            None => {
                let fields = docs::object(json!({ "name": name, "created_at": Utc::now() }))?;
                self.store.insert(COLLECTION_CATEGORIES, fields).await?
            }
        };
        docs::decode(document)
    }

    /// Deletes a category by identifier.
    ///
    /// Transactions hold only weak references, so the delete is refused
    /// while any transaction still points at the category; nothing in the
    /// store would stop a dangling reference otherwise.
    pub async fn delete_category(&self, id: &str) -> ResultEngine<()> {
        let referencing = self
            .store
            .query(
                COLLECTION_TRANSACTIONS,
                &[FieldFilter::new("category.id", id)],
            )
            .await?;
        if !referencing.is_empty() {
            return Err(EngineError::CategoryInUse(format!(
                "{} transactions reference category {id}",
                referencing.len()
            )));
        }

        self.store.delete(COLLECTION_CATEGORIES, id).await?;
        Ok(())
    }
}
