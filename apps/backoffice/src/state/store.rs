//! # Settings Store
//!
//! One generic store type backs every settings domain. It owns the typed
//! settings, the request state (status, error, last sync time) and a handle
//! to the resource client.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SettingsStore<S> Request Flow                        │
//! │                                                                         │
//! │  fetch(admin) / update(admin, s)                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  begin()  ───────────────► Status = Loading, Error = None              │
//! │         │                                                               │
//! │         ▼  (no lock held while awaiting)                               │
//! │  ResourceClient ─────────► GET / POST {baseUrl}/api/{resource}/...     │
//! │         │                                                               │
//! │         ├── Ok(body)  ──► write lock: merge_settings(current, body)    │
//! │         │                   ├── ok   → swap in, Succeeded, now         │
//! │         │                   └── err  → Failed, settings untouched      │
//! │         │                                                               │
//! │         └── Err(e)    ──► Failed, Error = e.message()                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The store is `Clone` and shares its state through `Arc<RwLock<_>>`.
//! Responses are applied under one short write lock in the order they
//! arrive, so the last response to arrive wins and readers never see a
//! half-merged tree.

use std::future::Future;
use std::sync::{Arc, RwLock};

use backoffice_client::{ClientError, ClientResult, ResourceClient};
use backoffice_core::merge::settings_payload;
use backoffice_core::{
    merge_settings, CoreResult, MergeReport, RemoteSettings, RequestState, SettingsSchema, StagedChange, Status,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

struct StoreInner<S> {
    settings: S,
    request: RequestState,
}

/// Mirrors one backend settings resource.
pub struct SettingsStore<S: SettingsSchema> {
    client: Arc<ResourceClient>,
    inner: Arc<RwLock<StoreInner<S>>>,
}

impl<S: SettingsSchema> Clone for SettingsStore<S> {
    fn clone(&self) -> Self {
        SettingsStore {
            client: Arc::clone(&self.client),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SettingsSchema> SettingsStore<S> {
    /// Creates a store holding the compiled-in default settings.
    pub fn new(client: Arc<ResourceClient>) -> Self {
        SettingsStore {
            client,
            inner: Arc::new(RwLock::new(StoreInner {
                settings: S::default(),
                request: RequestState::default(),
            })),
        }
    }

    pub fn client(&self) -> &Arc<ResourceClient> {
        &self.client
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of the current settings.
    pub fn settings(&self) -> S {
        self.with_settings(S::clone)
    }

    /// Executes a function with read access to the settings.
    pub fn with_settings<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let inner = self.inner.read().expect("settings store poisoned");
        f(&inner.settings)
    }

    pub fn request_state(&self) -> RequestState {
        self.inner.read().expect("settings store poisoned").request.clone()
    }

    pub fn status(&self) -> Status {
        self.inner.read().expect("settings store poisoned").request.status
    }

    pub fn error(&self) -> Option<String> {
        self.inner.read().expect("settings store poisoned").request.error.clone()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.read().expect("settings store poisoned").request.last_updated
    }

    // =========================================================================
    // Local Mutation
    // =========================================================================

    /// Applies a synchronous local edit. No request is made.
    ///
    /// The edit runs on a copy; the copy replaces the settings only when
    /// the edit succeeds.
    pub fn edit<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut S) -> CoreResult<R>,
    {
        let mut inner = self.inner.write().expect("settings store poisoned");
        let mut draft = inner.settings.clone();
        let result = f(&mut draft)?;
        inner.settings = draft;
        Ok(result)
    }

    /// Clears the error. Status, settings and timestamp stay as they are.
    pub fn clear_error(&self) {
        self.inner
            .write()
            .expect("settings store poisoned")
            .request
            .clear_error();
    }

    /// Back to default settings, `Idle`, no error and no timestamp.
    pub fn reset(&self) {
        let mut inner = self.inner.write().expect("settings store poisoned");
        inner.settings = S::default();
        inner.request = RequestState::default();
        debug!(domain = S::DOMAIN, "Settings reset");
    }

    // =========================================================================
    // Staged Changes
    // =========================================================================

    /// Snapshots the subtree picked by `lens`, then applies `mutate` to it.
    pub fn stage<T, L, F>(&self, lens: L, mutate: F) -> CoreResult<StagedChange<T>>
    where
        T: Clone,
        L: FnOnce(&mut S) -> &mut T,
        F: FnOnce(&mut T) -> CoreResult<()>,
    {
        let mut inner = self.inner.write().expect("settings store poisoned");
        StagedChange::apply(lens(&mut inner.settings), mutate)
    }

    /// Restores a staged snapshot into the subtree picked by `lens`.
    pub fn rollback<T, L>(&self, lens: L, staged: StagedChange<T>)
    where
        T: Clone,
        L: FnOnce(&mut S) -> &mut T,
    {
        let mut inner = self.inner.write().expect("settings store poisoned");
        staged.rollback(lens(&mut inner.settings));
        debug!(domain = S::DOMAIN, "Staged change rolled back");
    }

    // =========================================================================
    // Request Lifecycle (used by the domain stores)
    // =========================================================================

    pub(crate) fn begin(&self) {
        self.inner.write().expect("settings store poisoned").request.begin();
    }

    pub(crate) fn succeed(&self) {
        self.inner
            .write()
            .expect("settings store poisoned")
            .request
            .succeed(Utc::now());
    }

    pub(crate) fn record_failure(&self, err: &ClientError) {
        warn!(domain = S::DOMAIN, error = %err, "Settings request failed");
        self.inner
            .write()
            .expect("settings store poisoned")
            .request
            .fail(err.message());
    }

    /// Marks the request as started, awaits `call` and records a failure.
    ///
    /// The lock is only taken before and after the await.
    pub(crate) async fn send<Fut>(&self, operation: &str, call: Fut) -> ClientResult<Value>
    where
        Fut: Future<Output = ClientResult<Value>>,
    {
        self.begin();
        debug!(domain = S::DOMAIN, operation, "Settings request started");
        match call.await {
            Ok(body) => Ok(body),
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Merges a response body into the settings without touching status.
    pub(crate) fn merge_response(&self, body: &Value) -> CoreResult<MergeReport> {
        let mut inner = self.inner.write().expect("settings store poisoned");
        let (merged, report) = merge_settings(&inner.settings, settings_payload(body))?;
        inner.settings = merged;
        if !report.ignored.is_empty() {
            debug!(domain = S::DOMAIN, ignored = ?report.ignored, "Response keys not in schema");
        }
        Ok(report)
    }

    /// Merges a response body and marks the request as succeeded.
    ///
    /// A body that does not fit the schema fails the request and leaves the
    /// settings as they were.
    pub(crate) fn apply_response(&self, body: &Value) -> ClientResult<MergeReport> {
        let mut inner = self.inner.write().expect("settings store poisoned");
        match merge_settings(&inner.settings, settings_payload(body)) {
            Ok((merged, report)) => {
                inner.settings = merged;
                inner.request.succeed(Utc::now());
                info!(domain = S::DOMAIN, keys = report.merged.len(), "Settings applied");
                Ok(report)
            }
            Err(e) => {
                warn!(domain = S::DOMAIN, error = %e, "Response rejected");
                inner.request.fail(e.to_string());
                Err(e.into())
            }
        }
    }
}

impl<S: RemoteSettings> SettingsStore<S> {
    /// Reads the settings from the backend and merges them in.
    pub async fn fetch(&self, admin_id: &str) -> ClientResult<S> {
        let body = self.send("fetch", self.client.get(S::RESOURCE, admin_id)).await?;
        self.apply_response(&body)?;
        Ok(self.settings())
    }

    /// Posts `{ "settings": ... }` and merges whatever the backend answers,
    /// even if local edits happened meanwhile.
    pub async fn update(&self, admin_id: &str, settings: &S) -> ClientResult<S> {
        let body = json!({ "settings": settings });
        let response = self
            .send("update", self.client.post(S::RESOURCE, admin_id, body))
            .await?;
        self.apply_response(&response)?;
        Ok(self.settings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{client_with, discount_body};
    use backoffice_client::http::testing::{CannedResponse, FakeBackend};
    use backoffice_client::HttpMethod;
    use backoffice_core::schema::discounts::{DiscountSettings, DiscountType, PromoCode};
    use backoffice_core::schema::notifications::NotificationSettings;
    use backoffice_core::CoreError;
    use std::time::Duration;

    fn discounts(backend: FakeBackend) -> (SettingsStore<DiscountSettings>, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        (SettingsStore::new(client_with(backend.clone())), backend)
    }

    #[tokio::test]
    async fn test_fetch_merges_response() {
        let (store, backend) = discounts(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/discounts/admin-1",
            CannedResponse::ok(json!({
                "settings": { "allowStacking": true, "loyalty": { "enabled": true } },
                "message": "ok"
            })),
        ));

        let settings = store.fetch("admin-1").await.unwrap();

        assert!(settings.allow_stacking);
        assert!(settings.loyalty.enabled);
        // Untouched loyalty fields keep their defaults
        assert_eq!(settings.loyalty.points_per_dollar, 1);
        assert_eq!(store.status(), Status::Succeeded);
        assert!(store.last_updated().is_some());
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_settings() {
        let (store, _) = discounts(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/discounts/admin-1",
            CannedResponse::status(500, json!({ "message": "database offline" })),
        ));
        store
            .edit(|s| {
                s.allow_stacking = true;
                Ok(())
            })
            .unwrap();
        let before = store.settings();

        let err = store.fetch("admin-1").await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(store.settings(), before);
        assert_eq!(store.status(), Status::Failed);
        assert_eq!(store.error().as_deref(), Some("database offline"));
        assert!(store.last_updated().is_none());
    }

    #[tokio::test]
    async fn test_schema_mismatch_keeps_settings() {
        let (store, _) = discounts(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/discounts/admin-1",
            CannedResponse::ok(json!({ "settings": { "allowStacking": "sometimes" } })),
        ));

        let err = store.fetch("admin-1").await.unwrap_err();

        assert!(matches!(err, ClientError::Core(CoreError::MergeFailed { .. })));
        assert_eq!(store.settings(), DiscountSettings::default());
        assert_eq!(store.status(), Status::Failed);
    }

    #[tokio::test]
    async fn test_update_posts_settings_envelope() {
        let (store, backend) = discounts(FakeBackend::new().with_response(
            HttpMethod::Post,
            "/api/discounts/admin-1",
            CannedResponse::ok(json!({ "settings": { "allowStacking": true } })),
        ));
        let mut draft = DiscountSettings::default();
        draft.allow_stacking = true;

        store.update("admin-1", &draft).await.unwrap();

        let sent = backend.requests().remove(0);
        assert_eq!(sent.body.unwrap()["settings"]["allowStacking"], json!(true));
        assert!(store.settings().allow_stacking);
    }

    #[tokio::test]
    async fn test_update_response_overrides_local_edits() {
        let (store, _) = discounts(FakeBackend::new().with_response(
            HttpMethod::Post,
            "/api/discounts/admin-1",
            CannedResponse::ok(json!({ "settings": { "promoCodes": [] } })),
        ));
        store
            .edit(|s| s.add_promo_code(PromoCode::new("SUMMER10", DiscountType::Percentage, 10.0)?))
            .unwrap();

        store.update("admin-1", &DiscountSettings::default()).await.unwrap();

        assert!(store.settings().promo_codes.is_empty());
    }

    #[tokio::test]
    async fn test_racing_updates_last_arrival_wins() {
        let (store, _) = discounts(
            FakeBackend::new()
                .with_response(
                    HttpMethod::Post,
                    "/api/discounts/admin-1",
                    CannedResponse::ok(discount_body(false)).delayed(Duration::from_millis(50)),
                )
                .with_response(
                    HttpMethod::Post,
                    "/api/discounts/admin-1",
                    CannedResponse::ok(discount_body(true)),
                ),
        );
        let settings = DiscountSettings::default();

        let (first, second) = tokio::join!(
            store.update("admin-1", &settings),
            store.update("admin-1", &settings)
        );
        first.unwrap();
        second.unwrap();

        // The delayed answer to the first request is processed last
        assert!(!store.settings().allow_stacking);
        assert_eq!(store.status(), Status::Succeeded);
    }

    #[test]
    fn test_edit_is_all_or_nothing() {
        let (store, _) = discounts(FakeBackend::new());
        let result = store.edit(|s| {
            s.allow_stacking = true;
            s.remove_promo_code("missing").map(|_| ())
        });

        assert!(result.is_err());
        assert!(!store.settings().allow_stacking);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let (store, _) = discounts(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/discounts/admin-1",
            CannedResponse::ok(discount_body(true)),
        ));
        store.fetch("admin-1").await.unwrap();
        store
            .edit(|s| s.add_promo_code(PromoCode::new("VIP", DiscountType::FixedAmount, 5.0)?))
            .unwrap();

        store.reset();

        assert_eq!(store.settings(), DiscountSettings::default());
        assert_eq!(store.request_state(), RequestState::default());
    }

    #[tokio::test]
    async fn test_clear_error_only_touches_error() {
        let (store, _) = discounts(FakeBackend::new());
        // Unmatched route answers 404
        store.fetch("admin-1").await.unwrap_err();
        assert!(store.error().is_some());

        store.clear_error();

        assert!(store.error().is_none());
        assert_eq!(store.status(), Status::Failed);
    }

    #[tokio::test]
    async fn test_store_scoped_fetch_without_store_makes_no_request() {
        let backend = Arc::new(FakeBackend::new());
        let store: SettingsStore<NotificationSettings> = SettingsStore::new(client_with(backend.clone()));

        let err = store.fetch("admin-1").await.unwrap_err();

        assert!(matches!(err, ClientError::NoStoreSelected));
        assert_eq!(backend.request_count(), 0);
        assert_eq!(store.error().as_deref(), Some("No store selected"));
    }

    #[test]
    fn test_stage_and_rollback() {
        let (store, _) = discounts(FakeBackend::new());
        let staged = store
            .stage(
                |s| &mut s.allow_stacking,
                |v| {
                    *v = true;
                    Ok(())
                },
            )
            .unwrap();
        assert!(store.settings().allow_stacking);

        store.rollback(|s| &mut s.allow_stacking, staged);
        assert!(!store.settings().allow_stacking);
    }
}
