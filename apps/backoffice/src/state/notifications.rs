//! # Notifications Store
//!
//! Email, SMS and push settings of the selected store. Every request needs a
//! selected store; without one it fails before reaching the network.

use std::ops::Deref;
use std::sync::Arc;

use backoffice_client::ResourceClient;
use backoffice_core::schema::notifications::{NotificationChannel, NotificationSettings};
use backoffice_core::CoreResult;
use tracing::debug;

use super::store::SettingsStore;

#[derive(Clone)]
pub struct NotificationsStore {
    store: SettingsStore<NotificationSettings>,
}

impl NotificationsStore {
    pub fn new(client: Arc<ResourceClient>) -> Self {
        NotificationsStore {
            store: SettingsStore::new(client),
        }
    }

    /// Flips a channel on or off and returns its new state.
    pub fn toggle_channel(&self, channel: NotificationChannel) -> CoreResult<bool> {
        let enabled = self.store.edit(|s| {
            let enabled = !s.channel_enabled(channel);
            s.set_channel(channel, enabled);
            Ok(enabled)
        })?;
        debug!(?channel, enabled, "Notification channel toggled");
        Ok(enabled)
    }

    pub fn add_recipient(&self, email: &str) -> CoreResult<()> {
        self.store.edit(|s| s.add_recipient(email))
    }

    /// Returns whether the address was on the list.
    pub fn remove_recipient(&self, email: &str) -> bool {
        self.store
            .edit(|s| Ok(s.remove_recipient(email)))
            .unwrap_or(false)
    }
}

impl Deref for NotificationsStore {
    type Target = SettingsStore<NotificationSettings>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{client_with, select_store};
    use backoffice_client::http::testing::{CannedResponse, FakeBackend};
    use backoffice_client::HttpMethod;
    use backoffice_core::Status;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_uses_selected_store() {
        let backend = Arc::new(FakeBackend::new().with_response(
            HttpMethod::Get,
            "/api/notifications/admin-1/store-7",
            CannedResponse::ok(json!({ "settings": { "lowStockThreshold": 3 } })),
        ));
        let client = client_with(backend.clone());
        select_store(&client, "store-7");
        let store = NotificationsStore::new(client);

        store.fetch("admin-1").await.unwrap();

        assert_eq!(store.settings().low_stock_threshold, 3);
        assert_eq!(store.status(), Status::Succeeded);
    }

    #[test]
    fn test_toggle_channel_and_recipients() {
        let store = NotificationsStore::new(client_with(Arc::new(FakeBackend::new())));
        let before = store.settings().channel_enabled(NotificationChannel::Sms);

        assert_eq!(store.toggle_channel(NotificationChannel::Sms).unwrap(), !before);

        store.add_recipient("ops@shop.example").unwrap();
        assert!(store.add_recipient("not-an-email").is_err());
        assert!(store.remove_recipient("ops@shop.example"));
        assert!(!store.remove_recipient("ops@shop.example"));
    }
}
