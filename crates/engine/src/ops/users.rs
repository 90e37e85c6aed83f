use api_types::user::User;
use chrono::Utc;
use docstore::{DocumentStore, FieldFilter};
use serde_json::json;

use crate::{ResultEngine, docs, util};

use super::{COLLECTION_USERS, Engine};

impl<S: DocumentStore> Engine<S> {
    /// Finds or creates the user document for `username`.
    ///
    /// There is no authentication; the id only feeds the weak `user` ref
    /// stamped on transactions.
    pub async fn ensure_user(&self, username: &str) -> ResultEngine<User> {
        let username = util::normalize_required_name(username, "username")?;

        let documents = self
            .store
            .query(
                COLLECTION_USERS,
                &[FieldFilter::new("username", username.clone())],
            )
            .await?;
        if let Some(document) = documents.into_iter().next() {
            return docs::decode(document);
        }

        let fields = docs::object(json!({ "username": username, "created_at": Utc::now() }))?;
        let document = self.store.insert(COLLECTION_USERS, fields).await?;
        tracing::info!(%username, "created default user");
        docs::decode(document)
    }
}
