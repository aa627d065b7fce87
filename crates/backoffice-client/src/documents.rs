//! # Document Store
//!
//! Store staff accounts do not go through the REST gateway; they live in a
//! document collection (`StoreUsers`) that the back office reads with an
//! equality query and writes with one batch per save.
//!
//! ```text
//! ┌──────────────────────┐   query(adminId, storeId)   ┌────────────────────┐
//! │ StoreUsers store     │ ──────────────────────────► │ DocumentStore      │
//! │ (apps/backoffice)    │ ◄────────────────────────── │  ├─ Memory         │
//! │                      │   batch_write([set, del])   │  ├─ Rest (HTTP)    │
//! │                      │                             │  └─ Unconfigured   │
//! └──────────────────────┘ ──────────────────────────► └────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiRequest, HttpBackend, HttpMethod};
use crate::resource::backend_message;
use crate::session::SessionStore;

/// One write inside a batch. Documents are keyed by their `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum WriteOp {
    Set { id: String, data: Value },
    Delete { id: String },
}

impl WriteOp {
    pub fn id(&self) -> &str {
        match self {
            WriteOp::Set { id, .. } | WriteOp::Delete { id } => id,
        }
    }
}

/// Equality filter on a top-level document field.
pub type FieldFilter<'a> = (&'a str, &'a str);

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents in `collection` whose fields equal every filter.
    async fn query(&self, collection: &str, filters: &[FieldFilter<'_>]) -> ClientResult<Vec<Value>>;

    /// Applies all writes or none.
    async fn batch_write(&self, collection: &str, writes: Vec<WriteOp>) -> ClientResult<()>;
}

fn matches_filters(doc: &Value, filters: &[FieldFilter<'_>]) -> bool {
    filters
        .iter()
        .all(|(field, expected)| doc.get(*field).and_then(Value::as_str) == Some(*expected))
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Process-local document store for tests and embedding. Nothing survives
/// the process.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    fail_next_batch: Mutex<Option<String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `batch_write` fail with `message` and write nothing.
    pub fn fail_next_batch(&self, message: &str) {
        *self.fail_next_batch.lock().expect("document store poisoned") = Some(message.to_string());
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .expect("document store poisoned")
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(&self, collection: &str, filters: &[FieldFilter<'_>]) -> ClientResult<Vec<Value>> {
        let collections = self.collections.lock().expect("document store poisoned");
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches_filters(doc, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn batch_write(&self, collection: &str, writes: Vec<WriteOp>) -> ClientResult<()> {
        if let Some(message) = self.fail_next_batch.lock().expect("document store poisoned").take() {
            return Err(ClientError::Documents(message));
        }

        let mut collections = self.collections.lock().expect("document store poisoned");
        let docs = collections.entry(collection.to_string()).or_default();
        for write in writes {
            match write {
                WriteOp::Set { id, data } => {
                    docs.insert(id, data);
                }
                WriteOp::Delete { id } => {
                    docs.remove(&id);
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unconfigured Store
// =============================================================================

/// Stands in when no document endpoint is configured. Every call fails
/// with `InvalidConfig` so store users are never silently kept in memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredDocumentStore;

impl UnconfiguredDocumentStore {
    fn error() -> ClientError {
        ClientError::InvalidConfig("documents endpoint not configured".to_string())
    }
}

#[async_trait]
impl DocumentStore for UnconfiguredDocumentStore {
    async fn query(&self, collection: &str, _filters: &[FieldFilter<'_>]) -> ClientResult<Vec<Value>> {
        warn!(collection, "Document query without a documents endpoint");
        Err(Self::error())
    }

    async fn batch_write(&self, collection: &str, _writes: Vec<WriteOp>) -> ClientResult<()> {
        warn!(collection, "Document write without a documents endpoint");
        Err(Self::error())
    }
}

// =============================================================================
// REST Store
// =============================================================================

/// Document store behind a small REST facade:
///
/// - `GET  {base}/collections/{collection}/documents?field=value`
///   → `{ "documents": [...] }` or a bare array
/// - `POST {base}/collections/{collection}/batch` with `{ "writes": [...] }`
pub struct RestDocumentStore {
    base_url: Url,
    backend: Arc<dyn HttpBackend>,
    session: Arc<SessionStore>,
}

impl RestDocumentStore {
    pub fn new(base_url: &str, backend: Arc<dyn HttpBackend>, session: Arc<SessionStore>) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!("{} cannot be a base URL", base_url)));
        }
        Ok(Self {
            base_url,
            backend,
            session,
        })
    }

    fn collection_url(&self, collection: &str, action: &str) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("collections")
            .push(collection)
            .push(action);
        Ok(url)
    }

    async fn send(&self, method: HttpMethod, url: Url, body: Option<Value>) -> ClientResult<Value> {
        debug!(%method, %url, "Document store request");
        let response = self
            .backend
            .send(ApiRequest {
                method,
                url: url.clone(),
                body,
                bearer: self.session.token(),
            })
            .await
            .map_err(|e| ClientError::Documents(e.message()))?;

        if !response.is_success() {
            let message = backend_message(&response.body)
                .unwrap_or_else(|| format!("Request failed with status {}", response.status));
            warn!(%url, status = response.status, %message, "Document store rejected request");
            return Err(ClientError::Documents(message));
        }
        Ok(response.body)
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn query(&self, collection: &str, filters: &[FieldFilter<'_>]) -> ClientResult<Vec<Value>> {
        let mut url = self.collection_url(collection, "documents")?;
        {
            let mut pairs = url.query_pairs_mut();
            for (field, value) in filters {
                pairs.append_pair(field, value);
            }
        }

        let body = self.send(HttpMethod::Get, url, None).await?;
        let docs = match body {
            Value::Array(docs) => docs,
            Value::Object(mut map) => match map.remove("documents") {
                Some(Value::Array(docs)) => docs,
                _ => return Err(ClientError::InvalidResponse("missing documents array".into())),
            },
            Value::Null => Vec::new(),
            _ => return Err(ClientError::InvalidResponse("expected documents".into())),
        };

        // The facade may ignore unknown filters; apply them again locally.
        Ok(docs.into_iter().filter(|doc| matches_filters(doc, filters)).collect())
    }

    async fn batch_write(&self, collection: &str, writes: Vec<WriteOp>) -> ClientResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let url = self.collection_url(collection, "batch")?;
        self.send(HttpMethod::Post, url, Some(json!({ "writes": writes })))
            .await?;
        Ok(())
    }
}
