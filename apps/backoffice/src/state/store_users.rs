//! # Store Users Store
//!
//! Staff accounts of the selected store. They live in the `StoreUsers`
//! document collection rather than behind the REST gateway.
//!
//! ## Pending Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_user / update_user ──► users list + pending Set { id, data }      │
//! │  remove_user            ──► users list + pending Delete { id }         │
//! │                                                                         │
//! │  save() ──► one batch_write(StoreUsers, pending)                       │
//! │     ├── ok     → saved ops leave the queue, Succeeded                  │
//! │     └── failed → queue kept for the next save, Failed + Error          │
//! │                                                                         │
//! │  Only the newest write per user id is queued.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::ops::Deref;
use std::sync::{Arc, RwLock};

use backoffice_client::{ClientError, ClientResult, DocumentStore, ResourceClient, WriteOp};
use backoffice_core::schema::store_users::{StoreUser, StoreUsersSettings};
use backoffice_core::{CoreError, CoreResult, STORE_USERS_COLLECTION};
use serde_json::json;
use tracing::{debug, info};

use super::store::SettingsStore;

#[derive(Clone)]
pub struct StoreUsersStore {
    store: SettingsStore<StoreUsersSettings>,
    documents: Arc<dyn DocumentStore>,
    pending: Arc<RwLock<Vec<WriteOp>>>,
}

impl StoreUsersStore {
    pub fn new(client: Arc<ResourceClient>, documents: Arc<dyn DocumentStore>) -> Self {
        StoreUsersStore {
            store: SettingsStore::new(client),
            documents,
            pending: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Loads the users of the selected store. Unsaved changes are dropped.
    pub async fn fetch(&self, admin_id: &str) -> ClientResult<StoreUsersSettings> {
        let scope = self.scope(admin_id);
        let (admin_id, store_id) = match scope {
            Ok(scope) => scope,
            Err(e) => {
                self.store.record_failure(&e);
                return Err(e);
            }
        };

        let filters = [("adminId", admin_id.as_str()), ("storeId", store_id.as_str())];
        let docs = self
            .store
            .send(
                "fetch",
                async {
                    let docs = self.documents.query(STORE_USERS_COLLECTION, &filters).await?;
                    Ok::<_, ClientError>(json!({ "users": docs }))
                },
            )
            .await?;

        self.store.apply_response(&docs)?;
        let dropped = std::mem::take(&mut *self.pending.write().expect("pending writes poisoned"));
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Unsaved store user changes dropped");
        }
        Ok(self.store.settings())
    }

    // =========================================================================
    // Local Changes
    // =========================================================================

    pub fn add_user(&self, user: StoreUser) -> CoreResult<()> {
        let op = set_op(&user)?;
        self.store.edit(|s| s.add(user))?;
        self.queue(op);
        Ok(())
    }

    pub fn update_user(&self, user: StoreUser) -> CoreResult<()> {
        let op = set_op(&user)?;
        self.store.edit(|s| s.replace(user))?;
        self.queue(op);
        Ok(())
    }

    pub fn remove_user(&self, id: &str) -> CoreResult<StoreUser> {
        let removed = self.store.edit(|s| s.remove(id))?;
        self.queue(WriteOp::Delete { id: removed.id.clone() });
        Ok(removed)
    }

    pub fn pending_writes(&self) -> Vec<WriteOp> {
        self.pending.read().expect("pending writes poisoned").clone()
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Writes every pending change in one batch. Returns how many were saved.
    pub async fn save(&self) -> ClientResult<usize> {
        let batch = self.pending_writes();
        if batch.is_empty() {
            return Ok(0);
        }

        let count = batch.len();
        self.store
            .send(
                "save",
                async {
                    self.documents
                        .batch_write(STORE_USERS_COLLECTION, batch.clone())
                        .await?;
                    Ok::<_, ClientError>(serde_json::Value::Null)
                },
            )
            .await?;

        // Writes queued while the batch was in flight stay pending
        self.pending
            .write()
            .expect("pending writes poisoned")
            .retain(|op| !batch.contains(op));
        self.store.succeed();
        info!(count, "Store users saved");
        Ok(count)
    }

    /// Resets the users list and forgets pending writes.
    pub fn reset(&self) {
        self.store.reset();
        self.pending.write().expect("pending writes poisoned").clear();
    }

    fn scope(&self, admin_id: &str) -> ClientResult<(String, String)> {
        let admin_id = admin_id.trim();
        if admin_id.is_empty() {
            return Err(ClientError::MissingAdminId);
        }
        let store_id = self
            .store
            .client()
            .session()
            .selected_store_id()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ClientError::NoStoreSelected)?;
        Ok((admin_id.to_string(), store_id))
    }

    fn queue(&self, op: WriteOp) {
        let mut pending = self.pending.write().expect("pending writes poisoned");
        pending.retain(|queued| queued.id() != op.id());
        pending.push(op);
    }
}

fn set_op(user: &StoreUser) -> CoreResult<WriteOp> {
    let data = serde_json::to_value(user).map_err(|e| CoreError::InvalidPayload(e.to_string()))?;
    Ok(WriteOp::Set {
        id: user.id.clone(),
        data,
    })
}

impl Deref for StoreUsersStore {
    type Target = SettingsStore<StoreUsersSettings>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{client_with, select_store};
    use backoffice_client::http::testing::FakeBackend;
    use backoffice_client::MemoryDocumentStore;
    use backoffice_core::schema::store_users::StoreRole;
    use backoffice_core::Status;

    fn store() -> (StoreUsersStore, Arc<MemoryDocumentStore>) {
        let client = client_with(Arc::new(FakeBackend::new()));
        select_store(&client, "s1");
        let documents = Arc::new(MemoryDocumentStore::new());
        (StoreUsersStore::new(client, documents.clone()), documents)
    }

    fn user(email: &str) -> StoreUser {
        StoreUser::new("admin-1", "s1", "Sam", email, StoreRole::Cashier).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_fetch_round_trip() {
        let (store, documents) = store();
        let sam = user("sam@shop.example");
        store.add_user(sam.clone()).unwrap();
        store.add_user(user("kim@shop.example")).unwrap();

        assert_eq!(store.save().await.unwrap(), 2);
        assert!(store.pending_writes().is_empty());
        assert_eq!(documents.len(STORE_USERS_COLLECTION), 2);

        store.remove_user(&sam.id).unwrap();
        store.save().await.unwrap();

        store.reset();
        let settings = store.fetch("admin-1").await.unwrap();
        assert_eq!(settings.users.len(), 1);
        assert_eq!(settings.users[0].email, "kim@shop.example");
        assert_eq!(store.status(), Status::Succeeded);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_pending() {
        let (store, documents) = store();
        store.add_user(user("sam@shop.example")).unwrap();
        documents.fail_next_batch("permission denied");

        let err = store.save().await.unwrap_err();

        assert!(matches!(err, ClientError::Documents(_)));
        assert_eq!(store.pending_writes().len(), 1);
        assert_eq!(store.status(), Status::Failed);
        assert_eq!(store.error().as_deref(), Some("Document store error: permission denied"));

        assert_eq!(store.save().await.unwrap(), 1);
    }

    #[test]
    fn test_only_latest_write_per_user_is_queued() {
        let (store, _) = store();
        let mut sam = user("sam@shop.example");
        store.add_user(sam.clone()).unwrap();
        sam.role = StoreRole::Manager;
        store.update_user(sam.clone()).unwrap();

        let pending = store.pending_writes();
        assert_eq!(pending.len(), 1);
        assert!(matches!(&pending[0], WriteOp::Set { data, .. } if data["role"] == "manager"));

        assert!(store.add_user(user("SAM@shop.example")).is_err());
    }

    #[tokio::test]
    async fn test_fetch_without_store_fails_locally() {
        let client = client_with(Arc::new(FakeBackend::new()));
        let store = StoreUsersStore::new(client, Arc::new(MemoryDocumentStore::new()));

        let err = store.fetch("admin-1").await.unwrap_err();

        assert!(matches!(err, ClientError::NoStoreSelected));
        assert_eq!(store.error().as_deref(), Some("No store selected"));
    }

    #[tokio::test]
    async fn test_missing_documents_endpoint_is_config_error() {
        let client = client_with(Arc::new(FakeBackend::new()));
        select_store(&client, "s1");
        let store = StoreUsersStore::new(client, Arc::new(backoffice_client::UnconfiguredDocumentStore));

        let err = store.fetch("admin-1").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
        assert_eq!(store.status(), Status::Failed);
        assert_eq!(
            store.error().as_deref(),
            Some("Invalid configuration: documents endpoint not configured")
        );

        store.add_user(user("sam@shop.example")).unwrap();
        store.save().await.unwrap_err();
        assert_eq!(store.pending_writes().len(), 1);
    }
}
