//! # Subscribers Store
//!
//! The admin's clients and their subscription tier.

use std::ops::Deref;
use std::sync::Arc;

use backoffice_client::{ClientError, ClientResult, ResourceClient};
use backoffice_core::merge::settings_payload;
use backoffice_core::schema::subscribers::{Subscriber, SubscriberSettings, UserType, UserTypeChange};
use backoffice_core::{CoreError, Resource};
use tracing::info;

use super::store::SettingsStore;

const USER_TYPE_PATH: &str = "userType";

#[derive(Clone)]
pub struct SubscribersStore {
    store: SettingsStore<SubscriberSettings>,
}

impl SubscribersStore {
    pub fn new(client: Arc<ResourceClient>) -> Self {
        SubscribersStore {
            store: SettingsStore::new(client),
        }
    }

    /// Changes a client's tier on the backend.
    ///
    /// When the answer carries the client list it is merged; otherwise the
    /// confirmed change is applied to the local copy.
    pub async fn update_user_type(
        &self,
        admin_id: &str,
        client_id: &str,
        user_type: UserType,
    ) -> ClientResult<SubscriberSettings> {
        let body = serde_json::to_value(UserTypeChange {
            client_id: client_id.to_string(),
            user_type,
        })?;
        let response = self
            .store
            .send(
                "update_user_type",
                self.store
                    .client()
                    .patch_to(Resource::Clients, admin_id, USER_TYPE_PATH, body),
            )
            .await?;

        if settings_payload(&response).get("clients").is_some() {
            self.store.apply_response(&response)?;
        } else {
            let applied = self.store.edit(|s| {
                let mut client = s
                    .find(client_id)
                    .cloned()
                    .ok_or_else(|| CoreError::not_found("Client", client_id))?;
                client.user_type = user_type;
                s.replace(client)
            });
            if let Err(e) = applied {
                let e = ClientError::from(e);
                self.store.record_failure(&e);
                return Err(e);
            }
            self.store.succeed();
        }

        info!(client_id, ?user_type, "Client tier updated");
        Ok(self.store.settings())
    }

    /// Clients with the given tier.
    pub fn filter_by_type(&self, user_type: UserType) -> Vec<Subscriber> {
        self.store
            .with_settings(|s| s.of_type(user_type).into_iter().cloned().collect())
    }
}

impl Deref for SubscribersStore {
    type Target = SettingsStore<SubscriberSettings>;

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
    use serde_json::json;

    fn clients_body() -> serde_json::Value {
        json!({
            "settings": {
                "clients": [
                    { "id": "c1", "name": "Ana", "email": "ana@mail.example", "userType": "free" },
                    { "id": "c2", "name": "Bo", "email": "bo@mail.example", "userType": "vip" }
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_update_user_type_applies_locally() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_response(HttpMethod::Get, "/api/clients/admin-1", CannedResponse::ok(clients_body()))
                .with_response(
                    HttpMethod::Patch,
                    "/api/clients/admin-1/userType",
                    CannedResponse::ok(json!({ "message": "User type updated" })),
                ),
        );
        let store = SubscribersStore::new(client_with(backend.clone()));
        store.fetch("admin-1").await.unwrap();

        store
            .update_user_type("admin-1", "c1", UserType::Premium)
            .await
            .unwrap();

        assert_eq!(store.filter_by_type(UserType::Premium).len(), 1);
        assert!(store.filter_by_type(UserType::Free).is_empty());
        assert_eq!(
            backend.requests()[1].body,
            Some(json!({ "clientId": "c1", "userType": "premium" }))
        );
    }

    #[tokio::test]
    async fn test_update_user_type_merges_returned_clients() {
        let backend = Arc::new(FakeBackend::new().with_response(
            HttpMethod::Patch,
            "/api/clients/admin-1/userType",
            CannedResponse::ok(clients_body()),
        ));
        let store = SubscribersStore::new(client_with(backend));

        let settings = store
            .update_user_type("admin-1", "c2", UserType::Vip)
            .await
            .unwrap();

        assert_eq!(settings.clients.len(), 2);
        assert_eq!(store.filter_by_type(UserType::Vip)[0].id, "c2");
    }

    #[tokio::test]
    async fn test_rejected_tier_change_sets_error() {
        let backend = Arc::new(FakeBackend::new().with_response(
            HttpMethod::Patch,
            "/api/clients/admin-1/userType",
            CannedResponse::status(400, json!({ "message": "Unknown client" })),
        ));
        let store = SubscribersStore::new(client_with(backend));

        store
            .update_user_type("admin-1", "c9", UserType::Basic)
            .await
            .unwrap_err();

        assert_eq!(store.error().as_deref(), Some("Unknown client"));
    }
}
