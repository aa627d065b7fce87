//! # App State
//!
//! Root composition: one settings store per domain, the shared session and
//! resource client, and the auth gate. Built explicitly and passed to
//! whoever needs it; there is no global instance.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             AppState                                    │
//! │                                                                         │
//! │  ClientConfig ─► HttpBackend ─► ResourceClient ◄── SessionStore        │
//! │                                     │                                   │
//! │       ┌──────────────┬──────────────┼──────────────┬──────────────┐    │
//! │       ▼              ▼              ▼              ▼              ▼     │
//! │  notifications   discounts      finance       marketing     admin_tools │
//! │  store_settings  subscribers    store_users ◄── DocumentStore           │
//! │                                                                         │
//! │  AuthGate ◄── SessionStore + [auth] policy                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use backoffice_client::{
    ClientConfig, ClientError, ClientResult, DocumentStore, HttpBackend, ReqwestBackend, ResourceClient,
    RestDocumentStore, SessionStore, UnconfiguredDocumentStore,
};
use backoffice_core::{CoreError, RequestState, SettingsSchema, Status, UserData, ValidationError};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{
    AdminToolsStore, DiscountsStore, FinanceStore, MarketingStore, NotificationsStore, StoreSettingsStore,
    StoreUsersStore, SubscribersStore,
};
use crate::auth::AuthGate;

// =============================================================================
// Domains
// =============================================================================

/// The settings domains, in the order `fetch_all` visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingsDomain {
    StoreSettings,
    Notifications,
    Discounts,
    Finance,
    Marketing,
    AdminTools,
    Subscribers,
    StoreUsers,
}

impl SettingsDomain {
    pub const ALL: [SettingsDomain; 8] = [
        SettingsDomain::StoreSettings,
        SettingsDomain::Notifications,
        SettingsDomain::Discounts,
        SettingsDomain::Finance,
        SettingsDomain::Marketing,
        SettingsDomain::AdminTools,
        SettingsDomain::Subscribers,
        SettingsDomain::StoreUsers,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            SettingsDomain::StoreSettings => "store-settings",
            SettingsDomain::Notifications => "notifications",
            SettingsDomain::Discounts => "discounts",
            SettingsDomain::Finance => "finance",
            SettingsDomain::Marketing => "marketing",
            SettingsDomain::AdminTools => "admin-tools",
            SettingsDomain::Subscribers => "subscribers",
            SettingsDomain::StoreUsers => "store-users",
        }
    }
}

impl fmt::Display for SettingsDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingsDomain {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        let wanted = match wanted.as_str() {
            "finances" => "finance",
            "clients" => "subscribers",
            other => other,
        };
        SettingsDomain::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "domain".to_string(),
                allowed: SettingsDomain::ALL.iter().map(|d| d.name().to_string()).collect(),
            })
    }
}

/// Result of one domain inside `fetch_all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainOutcome {
    pub domain: SettingsDomain,
    pub status: Status,
    pub error: Option<String>,
}

// =============================================================================
// App State
// =============================================================================

pub struct AppState {
    config: ClientConfig,
    session: Arc<SessionStore>,
    client: Arc<ResourceClient>,
    auth: AuthGate,

    pub notifications: NotificationsStore,
    pub discounts: DiscountsStore,
    pub finance: FinanceStore,
    pub marketing: MarketingStore,
    pub admin_tools: AdminToolsStore,
    pub store_settings: StoreSettingsStore,
    pub subscribers: SubscribersStore,
    pub store_users: StoreUsersStore,
}

impl AppState {
    pub fn new(
        config: ClientConfig,
        backend: Arc<dyn HttpBackend>,
        session: Arc<SessionStore>,
        documents: Arc<dyn DocumentStore>,
    ) -> ClientResult<Self> {
        config.validate()?;
        let client = Arc::new(ResourceClient::from_config(&config, backend, Arc::clone(&session))?);
        let auth = AuthGate::new(Arc::clone(&session), config.auth.clone());

        Ok(AppState {
            notifications: NotificationsStore::new(Arc::clone(&client)),
            discounts: DiscountsStore::new(Arc::clone(&client)),
            finance: FinanceStore::new(Arc::clone(&client)),
            marketing: MarketingStore::new(Arc::clone(&client)),
            admin_tools: AdminToolsStore::new(Arc::clone(&client)),
            store_settings: StoreSettingsStore::new(Arc::clone(&client)),
            subscribers: SubscribersStore::new(Arc::clone(&client)),
            store_users: StoreUsersStore::new(Arc::clone(&client), documents),
            config,
            session,
            client,
            auth,
        })
    }

    /// Production wiring: reqwest backend, file session (when a path is
    /// known) and a REST document store. Without a documents endpoint,
    /// store users operations fail with a configuration error.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let backend: Arc<dyn HttpBackend> = Arc::new(ReqwestBackend::new(config.timeout())?);

        let session = match config.session_path() {
            Some(path) => SessionStore::open(path)?,
            None => {
                warn!("No data directory, session will not persist");
                SessionStore::in_memory()
            }
        };
        let session = Arc::new(session);

        let documents: Arc<dyn DocumentStore> = match config.documents_url() {
            Some(url) => Arc::new(RestDocumentStore::new(url, Arc::clone(&backend), Arc::clone(&session))?),
            None => {
                warn!("No documents endpoint, store users are unavailable");
                Arc::new(UnconfiguredDocumentStore)
            }
        };

        Self::new(config, backend, session, documents)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn client(&self) -> &Arc<ResourceClient> {
        &self.client
    }

    pub fn auth(&self) -> &AuthGate {
        &self.auth
    }

    /// Admin id of the signed-in user.
    pub fn admin_id(&self) -> ClientResult<String> {
        self.session.admin_id().ok_or(ClientError::MissingAdminId)
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn login(&self, token: String, user: UserData) -> ClientResult<()> {
        self.session.login(token, user)
    }

    /// Clears the session and every store.
    pub fn logout(&self) -> ClientResult<()> {
        self.session.logout()?;
        self.reset_all();
        Ok(())
    }

    /// Selects a store and drops everything scoped to the previous one.
    pub fn select_store(&self, store_id: &str) -> ClientResult<()> {
        self.store_settings.select_store(store_id)?;
        self.notifications.reset();
        self.store_users.reset();
        Ok(())
    }

    pub fn reset_all(&self) {
        self.notifications.reset();
        self.discounts.reset();
        self.finance.reset();
        self.marketing.reset();
        self.admin_tools.reset();
        self.store_settings.reset();
        self.subscribers.reset();
        self.store_users.reset();
    }

    // =========================================================================
    // Per-Domain Dispatch
    // =========================================================================

    /// Fetches one domain and returns its settings as JSON.
    pub async fn fetch_domain(&self, domain: SettingsDomain, admin_id: &str) -> ClientResult<Value> {
        match domain {
            SettingsDomain::StoreSettings => to_json(&self.store_settings.fetch(admin_id).await?),
            SettingsDomain::Notifications => to_json(&self.notifications.fetch(admin_id).await?),
            SettingsDomain::Discounts => to_json(&self.discounts.fetch(admin_id).await?),
            SettingsDomain::Finance => to_json(&self.finance.fetch(admin_id).await?),
            SettingsDomain::Marketing => to_json(&self.marketing.fetch(admin_id).await?),
            SettingsDomain::AdminTools => to_json(&self.admin_tools.fetch(admin_id).await?),
            SettingsDomain::Subscribers => to_json(&self.subscribers.fetch(admin_id).await?),
            SettingsDomain::StoreUsers => to_json(&self.store_users.fetch(admin_id).await?),
        }
    }

    /// Posts a full settings tree for one domain.
    ///
    /// Store users are not posted; they are saved through the document store.
    pub async fn update_domain(&self, domain: SettingsDomain, admin_id: &str, settings: Value) -> ClientResult<Value> {
        match domain {
            SettingsDomain::StoreSettings => {
                to_json(&self.store_settings.update(admin_id, &from_json(settings)?).await?)
            }
            SettingsDomain::Notifications => {
                to_json(&self.notifications.update(admin_id, &from_json(settings)?).await?)
            }
            SettingsDomain::Discounts => to_json(&self.discounts.update(admin_id, &from_json(settings)?).await?),
            SettingsDomain::Finance => to_json(&self.finance.update(admin_id, &from_json(settings)?).await?),
            SettingsDomain::Marketing => to_json(&self.marketing.update(admin_id, &from_json(settings)?).await?),
            SettingsDomain::AdminTools => {
                to_json(&self.admin_tools.update(admin_id, &from_json(settings)?).await?)
            }
            SettingsDomain::Subscribers => {
                to_json(&self.subscribers.update(admin_id, &from_json(settings)?).await?)
            }
            SettingsDomain::StoreUsers => Err(CoreError::InvalidPayload(
                "store users are saved through the document store".to_string(),
            )
            .into()),
        }
    }

    /// Current settings of one domain as JSON.
    pub fn settings_json(&self, domain: SettingsDomain) -> ClientResult<Value> {
        match domain {
            SettingsDomain::StoreSettings => to_json(&self.store_settings.settings()),
            SettingsDomain::Notifications => to_json(&self.notifications.settings()),
            SettingsDomain::Discounts => to_json(&self.discounts.settings()),
            SettingsDomain::Finance => to_json(&self.finance.settings()),
            SettingsDomain::Marketing => to_json(&self.marketing.settings()),
            SettingsDomain::AdminTools => to_json(&self.admin_tools.settings()),
            SettingsDomain::Subscribers => to_json(&self.subscribers.settings()),
            SettingsDomain::StoreUsers => to_json(&self.store_users.settings()),
        }
    }

    pub fn request_state(&self, domain: SettingsDomain) -> RequestState {
        match domain {
            SettingsDomain::StoreSettings => self.store_settings.request_state(),
            SettingsDomain::Notifications => self.notifications.request_state(),
            SettingsDomain::Discounts => self.discounts.request_state(),
            SettingsDomain::Finance => self.finance.request_state(),
            SettingsDomain::Marketing => self.marketing.request_state(),
            SettingsDomain::AdminTools => self.admin_tools.request_state(),
            SettingsDomain::Subscribers => self.subscribers.request_state(),
            SettingsDomain::StoreUsers => self.store_users.request_state(),
        }
    }

    pub fn clear_error(&self, domain: SettingsDomain) {
        match domain {
            SettingsDomain::StoreSettings => self.store_settings.clear_error(),
            SettingsDomain::Notifications => self.notifications.clear_error(),
            SettingsDomain::Discounts => self.discounts.clear_error(),
            SettingsDomain::Finance => self.finance.clear_error(),
            SettingsDomain::Marketing => self.marketing.clear_error(),
            SettingsDomain::AdminTools => self.admin_tools.clear_error(),
            SettingsDomain::Subscribers => self.subscribers.clear_error(),
            SettingsDomain::StoreUsers => self.store_users.clear_error(),
        }
    }

    /// Fetches every domain one after another. A failing domain does not
    /// stop the others.
    pub async fn fetch_all(&self, admin_id: &str) -> Vec<DomainOutcome> {
        let mut outcomes = Vec::with_capacity(SettingsDomain::ALL.len());
        for domain in SettingsDomain::ALL {
            let error = self.fetch_domain(domain, admin_id).await.err().map(|e| e.message());
            outcomes.push(DomainOutcome {
                domain,
                status: self.request_state(domain).status,
                error,
            });
        }

        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
        info!(total = outcomes.len(), failed, "Fetched all settings");
        outcomes
    }
}

fn to_json<S: SettingsSchema>(settings: &S) -> ClientResult<Value> {
    Ok(serde_json::to_value(settings)?)
}

fn from_json<S: SettingsSchema>(value: Value) -> ClientResult<S> {
    serde_json::from_value(value).map_err(|e| CoreError::InvalidPayload(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::discount_body;
    use backoffice_client::http::testing::{CannedResponse, FakeBackend};
    use backoffice_client::MemoryDocumentStore;
    use backoffice_client::HttpMethod;
    use backoffice_core::{AccessMode, RoleType};
    use serde_json::json;

    fn app(backend: FakeBackend) -> (AppState, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let state = AppState::new(
            ClientConfig::default(),
            backend.clone(),
            Arc::new(SessionStore::in_memory()),
            Arc::new(MemoryDocumentStore::new()),
        )
        .unwrap();
        (state, backend)
    }

    fn owner() -> UserData {
        UserData {
            id: "admin-1".to_string(),
            role_type: RoleType::Owner,
            access_mode: AccessMode::Full,
        }
    }

    #[test]
    fn test_domain_parsing() {
        assert_eq!("finances".parse::<SettingsDomain>().unwrap(), SettingsDomain::Finance);
        assert_eq!("admin_tools".parse::<SettingsDomain>().unwrap(), SettingsDomain::AdminTools);
        assert!("payroll".parse::<SettingsDomain>().is_err());
    }

    #[tokio::test]
    async fn test_fetch_all_continues_past_failures() {
        let (state, _) = app(
            FakeBackend::new()
                .with_response(HttpMethod::Get, "/api/discounts/admin-1", CannedResponse::ok(discount_body(true)))
                .with_response(
                    HttpMethod::Get,
                    "/api/finances/admin-1",
                    CannedResponse::status(500, json!({ "message": "ledger offline" })),
                ),
        );

        let outcomes = state.fetch_all("admin-1").await;

        assert_eq!(outcomes.len(), SettingsDomain::ALL.len());
        let discounts = outcomes.iter().find(|o| o.domain == SettingsDomain::Discounts).unwrap();
        assert_eq!(discounts.status, Status::Succeeded);
        let finance = outcomes.iter().find(|o| o.domain == SettingsDomain::Finance).unwrap();
        assert_eq!(finance.error.as_deref(), Some("ledger offline"));
        // No store selected, so store-scoped domains fail without a request
        let notifications = outcomes
            .iter()
            .find(|o| o.domain == SettingsDomain::Notifications)
            .unwrap();
        assert_eq!(notifications.error.as_deref(), Some("No store selected"));
        assert!(state.discounts.settings().allow_stacking);
    }

    #[tokio::test]
    async fn test_select_store_scopes_requests() {
        let (state, backend) = app(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/notifications/admin-1/s-42",
            CannedResponse::ok(json!({ "settings": { "lowStockThreshold": 9 } })),
        ));
        state.login("tok".to_string(), owner()).unwrap();
        state.select_store("s-42").unwrap();

        let admin = state.admin_id().unwrap();
        let settings = state
            .fetch_domain(SettingsDomain::Notifications, &admin)
            .await
            .unwrap();

        assert_eq!(settings["lowStockThreshold"], json!(9));
        assert_eq!(backend.requests()[0].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_update_domain_rejects_bad_payload_locally() {
        let (state, backend) = app(FakeBackend::new());

        let err = state
            .update_domain(SettingsDomain::Discounts, "admin-1", json!({ "allowStacking": "yes" }))
            .await
            .unwrap_err();

        assert!(err.is_local());
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_resets_everything() {
        let (state, _) = app(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/discounts/admin-1",
            CannedResponse::ok(discount_body(true)),
        ));
        state.login("tok".to_string(), owner()).unwrap();
        state.fetch_domain(SettingsDomain::Discounts, "admin-1").await.unwrap();

        state.logout().unwrap();

        assert!(state.admin_id().is_err());
        assert_eq!(state.request_state(SettingsDomain::Discounts), RequestState::default());
        assert!(!state.auth().check("/settings").is_allowed());
    }

    #[tokio::test]
    async fn test_production_wiring_without_documents_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.session.path = Some(dir.path().join("session.json"));
        assert!(config.documents_url().is_none());

        let state = AppState::from_config(config).unwrap();
        state.login("tok".to_string(), owner()).unwrap();
        state.select_store("s1").unwrap();

        let err = state
            .fetch_domain(SettingsDomain::StoreUsers, "admin-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidConfig(_)));
        assert_eq!(state.request_state(SettingsDomain::StoreUsers).status, Status::Failed);
    }
}
