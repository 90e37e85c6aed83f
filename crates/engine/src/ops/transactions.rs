use api_types::Period;
use api_types::transaction::{Transaction, TransactionNew};
use chrono::Utc;
use docstore::DocumentStore;
use serde_json::{Value, json};

use crate::{ResultEngine, docs, util};

use super::{COLLECTION_TRANSACTIONS, Engine, period_filters};

impl<S: DocumentStore> Engine<S> {
    /// Lists transactions, scoped to a calendar month when a period is
    /// given, in store-native order. The full matching set is always
    /// materialized; there is no pagination.
    pub async fn transactions(&self, period: Option<Period>) -> ResultEngine<Vec<Transaction>> {
        let filters = match period {
            Some(period) => {
                util::validate_period(&period)?;
                period_filters(period)
            }
            None => Vec::new(),
        };

        let documents = self.store.query(COLLECTION_TRANSACTIONS, &filters).await?;
        documents.into_iter().map(docs::decode).collect()
    }

    /// Records a transaction.
    ///
    /// `month` and `year` are derived from the date and stored redundantly
    /// so the month scope stays a two-field equality query.
    pub async fn add_transaction(&self, payload: TransactionNew) -> ResultEngine<Transaction> {
        let description = util::normalize_required_name(&payload.description, "description")?;
        let period = Period::from_date(payload.date);

        let mut fields = docs::fields_of(&payload)?;
        fields.insert("description".to_string(), Value::String(description));
        fields.insert("month".to_string(), json!(period.month));
        fields.insert("year".to_string(), json!(period.year));
        fields.insert("created_at".to_string(), json!(Utc::now()));

        let document = self.store.insert(COLLECTION_TRANSACTIONS, fields).await?;
        docs::decode(document)
    }
}
