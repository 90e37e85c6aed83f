use reqwest::{Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Document, DocumentStore, FieldFilter, ResultStore, StoreError};

/// Client for a remote document-store endpoint.
///
/// Collections live under `{base}/v1/{collection}`; queries are POSTed to
/// `{base}/v1/{collection}/query`. Non-success statuses map onto
/// [`StoreError`]: 404 not-found, 409 rejected (constraint-style refusal),
/// 422 invalid, anything else a server failure.
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: Url,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    filters: &'a [FieldFilter],
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    documents: Vec<Document>,
}

#[derive(Debug, Serialize)]
struct WriteRequest<'a> {
    fields: &'a Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl RestStore {
    pub fn new(base_url: &str) -> ResultStore<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| StoreError::Invalid(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> ResultStore<Url> {
        self.base_url
            .join(path)
            .map_err(|err| StoreError::Invalid(format!("invalid endpoint: {err}")))
    }

    async fn fail(res: Response) -> StoreError {
        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        match status.as_u16() {
            404 => StoreError::NotFound(body),
            409 => StoreError::Rejected(body),
            422 => StoreError::Invalid(body),
            _ => StoreError::Server(body),
        }
    }
}

impl DocumentStore for RestStore {
    async fn query(&self, collection: &str, filters: &[FieldFilter]) -> ResultStore<Vec<Document>> {
        let endpoint = self.endpoint(&format!("v1/{collection}/query"))?;
        let res = self
            .http
            .post(endpoint)
            .json(&QueryRequest { filters })
            .send()
            .await?;

        if res.status().is_success() {
            let body = res.json::<QueryResponse>().await?;
            return Ok(body.documents);
        }
        Err(Self::fail(res).await)
    }

    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> ResultStore<Document> {
        let endpoint = self.endpoint(&format!("v1/{collection}"))?;
        let res = self
            .http
            .post(endpoint)
            .json(&WriteRequest { fields: &fields })
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res.json::<Document>().await?);
        }
        Err(Self::fail(res).await)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> ResultStore<Document> {
        let endpoint = self.endpoint(&format!("v1/{collection}/{id}"))?;
        let res = self
            .http
            .patch(endpoint)
            .json(&WriteRequest { fields: &fields })
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res.json::<Document>().await?);
        }
        Err(Self::fail(res).await)
    }

    async fn delete(&self, collection: &str, id: &str) -> ResultStore<()> {
        let endpoint = self.endpoint(&format!("v1/{collection}/{id}"))?;
        let res = self.http.delete(endpoint).send().await?;

        if res.status().is_success() {
            return Ok(());
        }
        Err(Self::fail(res).await)
    }
}
