//! # Resource Client
//!
//! The single HTTP call wrapper every settings store goes through.
//!
//! ## URL Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {baseUrl}/api/{resource}/{adminId}[/{storeId}][/{subPath}]             │
//! │                                                                         │
//! │  admin scope          GET  /api/discounts/a-1                          │
//! │  admin + store scope  GET  /api/notifications/a-1/s-9                  │
//! │  sub-resource         POST /api/finances/a-1/payment                   │
//! │                       PATCH /api/clients/a-1/userType                  │
//! │                                                                         │
//! │  storeId is read from the persisted session at call time; with no      │
//! │  store selected the call fails with NoStoreSelected before any I/O.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Mapping
//! Non-2xx answers become `ClientError::Http` carrying the backend's
//! `message` (or `error`) field, else `"Request failed with status {code}"`.
//! There is no retry and no cache.

use std::sync::Arc;

use backoffice_core::validation::validate_identifier;
use backoffice_core::{Resource, ResourceScope};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{ApiRequest, HttpBackend, HttpMethod};
use crate::session::SessionStore;

pub struct ResourceClient {
    base_url: Url,
    backend: Arc<dyn HttpBackend>,
    session: Arc<SessionStore>,
}

impl ResourceClient {
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

    pub fn from_config(
        config: &ClientConfig,
        backend: Arc<dyn HttpBackend>,
        session: Arc<SessionStore>,
    ) -> ClientResult<Self> {
        Self::new(config.base_url(), backend, session)
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    // =========================================================================
    // URL Building
    // =========================================================================

    /// Builds the URL of `resource` for `admin_id`, adding the selected store
    /// for store-scoped resources.
    pub fn resource_url(&self, resource: Resource, admin_id: &str, sub_path: Option<&str>) -> ClientResult<Url> {
        if admin_id.trim().is_empty() {
            return Err(ClientError::MissingAdminId);
        }
        validate_identifier("adminId", admin_id)?;

        let store_id = match resource.scope() {
            ResourceScope::Admin => None,
            ResourceScope::AdminAndStore => Some(
                self.session
                    .selected_store_id()
                    .filter(|id| !id.trim().is_empty())
                    .ok_or(ClientError::NoStoreSelected)?,
            ),
        };

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .push("api")
                .push(resource.path())
                .push(admin_id.trim());
            if let Some(ref store_id) = store_id {
                segments.push(store_id);
            }
            if let Some(sub_path) = sub_path {
                segments.push(sub_path);
            }
        }
        Ok(url)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get(&self, resource: Resource, admin_id: &str) -> ClientResult<Value> {
        let url = self.resource_url(resource, admin_id, None)?;
        self.call(HttpMethod::Get, url, None).await
    }

    pub async fn post(&self, resource: Resource, admin_id: &str, body: Value) -> ClientResult<Value> {
        let url = self.resource_url(resource, admin_id, None)?;
        self.call(HttpMethod::Post, url, Some(body)).await
    }

    pub async fn post_to(&self, resource: Resource, admin_id: &str, sub_path: &str, body: Value) -> ClientResult<Value> {
        let url = self.resource_url(resource, admin_id, Some(sub_path))?;
        self.call(HttpMethod::Post, url, Some(body)).await
    }

    pub async fn patch_to(&self, resource: Resource, admin_id: &str, sub_path: &str, body: Value) -> ClientResult<Value> {
        let url = self.resource_url(resource, admin_id, Some(sub_path))?;
        self.call(HttpMethod::Patch, url, Some(body)).await
    }

    pub async fn delete(&self, resource: Resource, admin_id: &str) -> ClientResult<Value> {
        let url = self.resource_url(resource, admin_id, None)?;
        self.call(HttpMethod::Delete, url, None).await
    }

    async fn call(&self, method: HttpMethod, url: Url, body: Option<Value>) -> ClientResult<Value> {
        debug!(%method, %url, "Sending request");

        let request = ApiRequest {
            method,
            url: url.clone(),
            body,
            bearer: self.session.token(),
        };

        let response = match self.backend.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %url, error = %e, "Request failed before a response");
                return Err(e);
            }
        };

        if response.is_success() {
            debug!(%method, %url, status = response.status, "Request succeeded");
            return Ok(response.body);
        }

        let err = ClientError::http(response.status, backend_message(&response.body));
        warn!(%method, %url, status = response.status, error = %err, "Backend rejected request");
        Err(err)
    }
}

/// Extracts the backend's own error text: `message`, `error`, or
/// `error.message`.
pub fn backend_message(body: &Value) -> Option<String> {
    let text = |v: &Value| v.as_str().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    text(&body["message"])
        .or_else(|| text(&body["error"]))
        .or_else(|| text(&body["error"]["message"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    fn client_with(backend: FakeBackend) -> (ResourceClient, Arc<FakeBackend>, Arc<SessionStore>) {
        let backend = Arc::new(backend);
        let session = Arc::new(SessionStore::in_memory());
        let client = ResourceClient::new("http://localhost:5000", backend.clone(), session.clone()).unwrap();
        (client, backend, session)
    }

    #[test]
    fn test_admin_scoped_url() {
        let (client, _, _) = client_with(FakeBackend::new());
        let url = client.resource_url(Resource::Discounts, "a-1", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/discounts/a-1");

        let url = client.resource_url(Resource::Finances, "a-1", Some("payment")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/finances/a-1/payment");
    }

    #[test]
    fn test_store_scoped_url_needs_selection() {
        let (client, _, session) = client_with(FakeBackend::new());
        let err = client
            .resource_url(Resource::Notifications, "a-1", None)
            .unwrap_err();
        assert!(matches!(err, ClientError::NoStoreSelected));

        session.set_selected_store(Some("s-9".to_string())).unwrap();
        let url = client.resource_url(Resource::Notifications, "a-1", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/notifications/a-1/s-9");
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let backend: Arc<dyn HttpBackend> = Arc::new(FakeBackend::new());
        let client = ResourceClient::new(
            "https://gw.shop.example/v2/",
            backend,
            Arc::new(SessionStore::in_memory()),
        )
        .unwrap();
        let url = client.resource_url(Resource::Clients, "a-1", Some("userType")).unwrap();
        assert_eq!(url.as_str(), "https://gw.shop.example/v2/api/clients/a-1/userType");
    }

    #[test]
    fn test_missing_admin_id() {
        let (client, _, _) = client_with(FakeBackend::new());
        assert!(matches!(
            client.resource_url(Resource::Marketing, " ", None),
            Err(ClientError::MissingAdminId)
        ));
    }

    #[tokio::test]
    async fn test_no_store_selected_makes_no_request() {
        let (client, backend, _) = client_with(FakeBackend::new());
        let err = client.get(Resource::StoreSettings, "a-1").await.unwrap_err();
        assert!(err.is_local());
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_backend_message_surfaces() {
        let (client, _, _) = client_with(FakeBackend::new().with_response(
            HttpMethod::Post,
            "/api/discounts/a-1",
            CannedResponse::status(422, json!({ "message": "Promo code already exists" })),
        ));
        let err = client
            .post(Resource::Discounts, "a-1", json!({ "settings": {} }))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Promo code already exists");
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn test_status_fallback_message() {
        let (client, _, _) = client_with(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/marketing/a-1",
            CannedResponse::status(500, Value::Null),
        ));
        let err = client.get(Resource::Marketing, "a-1").await.unwrap_err();
        assert_eq!(err.message(), "Request failed with status 500");
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let (client, backend, session) = client_with(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/marketing/a-1",
            CannedResponse::ok(json!({})),
        ));
        session.set_token(Some("tok-123".to_string())).unwrap();
        client.get(Resource::Marketing, "a-1").await.unwrap();
        assert_eq!(backend.requests()[0].bearer.as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_backend_message_shapes() {
        assert_eq!(backend_message(&json!({ "message": "nope" })), Some("nope".to_string()));
        assert_eq!(backend_message(&json!({ "error": "denied" })), Some("denied".to_string()));
        assert_eq!(
            backend_message(&json!({ "error": { "message": "deep" } })),
            Some("deep".to_string())
        );
        assert_eq!(backend_message(&json!({ "message": "  " })), None);
        assert_eq!(backend_message(&Value::Null), None);
    }
}
