//! # Admin Tools Store
//!
//! Security, backups, maintenance and audit log. Sections are saved one at a
//! time and each keeps its own request state, so a failing backup trigger
//! does not mark the security form as failed.
//!
//! ```text
//! update_section(Backups, data, Trigger)
//!      │
//!      ├─► sections[Backups] = Loading
//!      ├─► POST /api/admin-tools/{admin}  { section, data, action }
//!      │
//!      ├── ok   → merge, sections[Backups] = Succeeded,
//!      │          last_action = { Backups, Trigger, now }
//!      └── err  → sections[Backups] = Failed + Error
//! ```

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, RwLock};

use backoffice_client::{ClientError, ClientResult, ResourceClient};
use backoffice_core::schema::admin_tools::{AdminAction, AdminSection, AdminToolsSettings, LastAction, SectionUpdate};
use backoffice_core::{RequestState, Resource};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::store::SettingsStore;

#[derive(Default)]
struct SectionTracker {
    sections: HashMap<AdminSection, RequestState>,
    last_action: Option<LastAction>,
}

#[derive(Clone)]
pub struct AdminToolsStore {
    store: SettingsStore<AdminToolsSettings>,
    tracker: Arc<RwLock<SectionTracker>>,
}

impl AdminToolsStore {
    pub fn new(client: Arc<ResourceClient>) -> Self {
        AdminToolsStore {
            store: SettingsStore::new(client),
            tracker: Arc::new(RwLock::new(SectionTracker::default())),
        }
    }

    /// Sends one section to the backend and merges the answer.
    pub async fn update_section(
        &self,
        admin_id: &str,
        section: AdminSection,
        data: Value,
        action: AdminAction,
    ) -> ClientResult<AdminToolsSettings> {
        self.with_section(section, RequestState::begin);

        let body = serde_json::to_value(SectionUpdate { section, data, action })?;
        let result = self
            .store
            .send(
                "update_section",
                self.store.client().post(Resource::AdminTools, admin_id, body),
            )
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.section_failed(section, &e);
                return Err(e);
            }
        };

        if let Err(e) = self.store.merge_response(&response) {
            let e = ClientError::from(e);
            self.store.record_failure(&e);
            self.section_failed(section, &e);
            return Err(e);
        }

        let now = Utc::now();
        self.store.succeed();
        {
            let mut tracker = self.tracker.write().expect("admin tools tracker poisoned");
            tracker.sections.entry(section).or_default().succeed(now);
            tracker.last_action = Some(LastAction { section, action, at: now });
        }
        info!(?section, ?action, "Admin section updated");
        Ok(self.store.settings())
    }

    /// Request state of one section. Untouched sections are `Idle`.
    pub fn section_state(&self, section: AdminSection) -> RequestState {
        self.tracker
            .read()
            .expect("admin tools tracker poisoned")
            .sections
            .get(&section)
            .cloned()
            .unwrap_or_default()
    }

    /// The most recent section action the backend confirmed.
    pub fn last_action(&self) -> Option<LastAction> {
        self.tracker
            .read()
            .expect("admin tools tracker poisoned")
            .last_action
            .clone()
    }

    pub fn clear_section_error(&self, section: AdminSection) {
        self.with_section(section, RequestState::clear_error);
    }

    /// Resets settings, every section and the last action.
    pub fn reset(&self) {
        self.store.reset();
        *self.tracker.write().expect("admin tools tracker poisoned") = SectionTracker::default();
    }

    fn with_section(&self, section: AdminSection, f: impl FnOnce(&mut RequestState)) {
        let mut tracker = self.tracker.write().expect("admin tools tracker poisoned");
        f(tracker.sections.entry(section).or_default());
    }

    fn section_failed(&self, section: AdminSection, err: &ClientError) {
        warn!(?section, error = %err, "Admin section update failed");
        self.with_section(section, |state| state.fail(err.message()));
    }
}

impl Deref for AdminToolsStore {
    type Target = SettingsStore<AdminToolsSettings>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::client_with;
    use backoffice_client::http::testing::{CannedResponse, FakeBackend};
    use backoffice_client::HttpMethod;
    use backoffice_core::Status;
    use serde_json::json;

    #[tokio::test]
    async fn test_section_update_tracks_state_and_last_action() {
        let backend = Arc::new(FakeBackend::new().with_response(
            HttpMethod::Post,
            "/api/admin-tools/admin-1",
            CannedResponse::ok(json!({ "settings": { "security": { "twoFactorRequired": true } } })),
        ));
        let store = AdminToolsStore::new(client_with(backend.clone()));

        let settings = store
            .update_section(
                "admin-1",
                AdminSection::Security,
                json!({ "twoFactorRequired": true }),
                AdminAction::Update,
            )
            .await
            .unwrap();

        assert!(settings.security.two_factor_required);
        assert_eq!(store.section_state(AdminSection::Security).status, Status::Succeeded);
        assert_eq!(store.section_state(AdminSection::Backups).status, Status::Idle);

        let last = store.last_action().unwrap();
        assert_eq!(last.section, AdminSection::Security);
        assert_eq!(last.action, AdminAction::Update);

        let sent = backend.requests().remove(0).body.unwrap();
        assert_eq!(
            sent,
            json!({ "section": "security", "data": { "twoFactorRequired": true }, "action": "update" })
        );
    }

    #[tokio::test]
    async fn test_failure_stays_in_its_section() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_response(
                    HttpMethod::Post,
                    "/api/admin-tools/admin-1",
                    CannedResponse::ok(json!({ "settings": { "maintenance": { "enabled": true } } })),
                )
                .with_response(
                    HttpMethod::Post,
                    "/api/admin-tools/admin-1",
                    CannedResponse::status(503, json!({ "error": "Backup service unavailable" })),
                ),
        );
        let store = AdminToolsStore::new(client_with(backend));

        store
            .update_section(
                "admin-1",
                AdminSection::Maintenance,
                json!({ "enabled": true }),
                AdminAction::Update,
            )
            .await
            .unwrap();
        store
            .update_section("admin-1", AdminSection::Backups, Value::Null, AdminAction::Trigger)
            .await
            .unwrap_err();

        let backups = store.section_state(AdminSection::Backups);
        assert_eq!(backups.status, Status::Failed);
        assert_eq!(backups.error.as_deref(), Some("Backup service unavailable"));
        assert_eq!(store.section_state(AdminSection::Maintenance).status, Status::Succeeded);
        // Last confirmed action is still the maintenance update
        assert_eq!(store.last_action().unwrap().section, AdminSection::Maintenance);

        store.clear_section_error(AdminSection::Backups);
        assert!(store.section_state(AdminSection::Backups).error.is_none());

        store.reset();
        assert!(store.last_action().is_none());
        assert_eq!(store.section_state(AdminSection::Maintenance), RequestState::default());
    }
}
