//! # Store Settings Store
//!
//! Settings of the selected store, plus the admin's store list and the
//! store selection that scopes `notifications` and `store-settings`.
//!
//! ## Store Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load_stores()  ─► GET  /api/stores/{admin}      ─► stores list        │
//! │  create_store() ─► POST /api/stores/{admin}      ─► list + new store   │
//! │                                                                         │
//! │  select_store(id)                                                       │
//! │     ├─► session.selectedStoreId = id   (persisted)                     │
//! │     └─► settings reset (they belonged to the previous store)           │
//! │                                                                         │
//! │  delete()       ─► DELETE /api/store-settings/{admin}/{store}          │
//! │     ├─► settings reset                                                  │
//! │     ├─► store removed from the list                                     │
//! │     └─► selection cleared if it still points at the deleted store      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::ops::Deref;
use std::sync::{Arc, RwLock};

use backoffice_client::{ClientError, ClientResult, ResourceClient};
use backoffice_core::schema::store_settings::{NewStore, OpeningHours, StoreSettings, StoreSummary};
use backoffice_core::{CoreError, CoreResult, RequestState, Resource};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::store::SettingsStore;

#[derive(Default)]
struct StoreList {
    stores: Vec<StoreSummary>,
    request: RequestState,
    loaded: bool,
}

#[derive(Clone)]
pub struct StoreSettingsStore {
    store: SettingsStore<StoreSettings>,
    list: Arc<RwLock<StoreList>>,
}

impl StoreSettingsStore {
    pub fn new(client: Arc<ResourceClient>) -> Self {
        StoreSettingsStore {
            store: SettingsStore::new(client),
            list: Arc::new(RwLock::new(StoreList::default())),
        }
    }

    // =========================================================================
    // Store List
    // =========================================================================

    pub fn stores(&self) -> Vec<StoreSummary> {
        self.list.read().expect("store list poisoned").stores.clone()
    }

    pub fn stores_state(&self) -> RequestState {
        self.list.read().expect("store list poisoned").request.clone()
    }

    pub fn selected_store_id(&self) -> Option<String> {
        self.store.client().session().selected_store_id()
    }

    pub async fn load_stores(&self, admin_id: &str) -> ClientResult<Vec<StoreSummary>> {
        let body = self
            .list_request(self.store.client().get(Resource::Stores, admin_id))
            .await?;
        let stores = match parse_store_list(body) {
            Ok(stores) => stores,
            Err(e) => {
                self.list_failed(&e);
                return Err(e);
            }
        };

        let mut list = self.list.write().expect("store list poisoned");
        list.stores = stores.clone();
        list.loaded = true;
        list.request.succeed(Utc::now());
        info!(count = stores.len(), "Stores loaded");
        Ok(stores)
    }

    pub async fn create_store(&self, admin_id: &str, new_store: NewStore) -> ClientResult<StoreSummary> {
        let body = serde_json::to_value(&new_store)?;
        let response = self
            .list_request(self.store.client().post(Resource::Stores, admin_id, body))
            .await?;
        let created = match parse_created_store(response) {
            Ok(created) => created,
            Err(e) => {
                self.list_failed(&e);
                return Err(e);
            }
        };

        let mut list = self.list.write().expect("store list poisoned");
        list.stores.retain(|s| s.id != created.id);
        list.stores.push(created.clone());
        list.request.succeed(Utc::now());
        info!(store_id = %created.id, name = %created.name, "Store created");
        Ok(created)
    }

    /// Selects a store and persists the choice.
    ///
    /// Once the list is loaded, unknown ids are rejected. The settings of
    /// the previous store are dropped.
    pub fn select_store(&self, store_id: &str) -> ClientResult<()> {
        {
            let list = self.list.read().expect("store list poisoned");
            if list.loaded && !list.stores.iter().any(|s| s.id == store_id) {
                return Err(CoreError::not_found("Store", store_id).into());
            }
        }

        self.store
            .client()
            .session()
            .set_selected_store(Some(store_id.to_string()))?;
        self.store.reset();
        info!(store_id, "Store selected");
        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Deletes the selected store's settings on the backend.
    pub async fn delete(&self, admin_id: &str) -> ClientResult<()> {
        let deleted = self.selected_store_id();
        self.store
            .send("delete", self.store.client().delete(Resource::StoreSettings, admin_id))
            .await?;

        self.store.reset();
        self.store.succeed();

        if let Some(ref deleted) = deleted {
            self.list
                .write()
                .expect("store list poisoned")
                .stores
                .retain(|s| &s.id != deleted);

            let session = self.store.client().session();
            if session.selected_store_id().as_ref() == Some(deleted) {
                session.set_selected_store(None)?;
            }
            info!(store_id = %deleted, "Store settings deleted");
        }
        Ok(())
    }

    pub fn set_hours(&self, hours: OpeningHours) -> CoreResult<()> {
        self.store.edit(|s| s.set_hours(hours))
    }

    /// Resets settings and forgets the loaded store list.
    pub fn reset(&self) {
        self.store.reset();
        *self.list.write().expect("store list poisoned") = StoreList::default();
    }

    async fn list_request<Fut>(&self, call: Fut) -> ClientResult<Value>
    where
        Fut: std::future::Future<Output = ClientResult<Value>>,
    {
        self.list.write().expect("store list poisoned").request.begin();
        debug!("Store list request started");
        call.await.inspect_err(|e| self.list_failed(e))
    }

    fn list_failed(&self, err: &ClientError) {
        warn!(error = %err, "Store list request failed");
        self.list
            .write()
            .expect("store list poisoned")
            .request
            .fail(err.message());
    }
}

impl Deref for StoreSettingsStore {
    type Target = SettingsStore<StoreSettings>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Accepts a bare array or `{ "stores": [...] }`.
fn parse_store_list(body: Value) -> ClientResult<Vec<StoreSummary>> {
    let list = match body {
        Value::Array(_) => body,
        Value::Object(mut map) => map
            .remove("stores")
            .ok_or_else(|| ClientError::InvalidResponse("missing stores array".to_string()))?,
        Value::Null => return Ok(Vec::new()),
        _ => return Err(ClientError::InvalidResponse("expected a store list".to_string())),
    };
    Ok(serde_json::from_value(list)?)
}

/// Accepts `{ "store": {...} }` or the store object itself.
fn parse_created_store(body: Value) -> ClientResult<StoreSummary> {
    let store = match body {
        Value::Object(mut map) if map.contains_key("store") => map.remove("store").unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(store)?)
}
