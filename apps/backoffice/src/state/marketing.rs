//! # Marketing Store
//!
//! Email marketing, social links, SEO, campaigns and referrals.

use std::ops::Deref;
use std::sync::Arc;

use backoffice_client::ResourceClient;
use backoffice_core::schema::marketing::MarketingSettings;
use backoffice_core::CoreResult;

use super::store::SettingsStore;

#[derive(Clone)]
pub struct MarketingStore {
    store: SettingsStore<MarketingSettings>,
}

impl MarketingStore {
    pub fn new(client: Arc<ResourceClient>) -> Self {
        MarketingStore {
            store: SettingsStore::new(client),
        }
    }

    /// Adds the link for `platform`, or replaces its URL.
    pub fn add_social_link(&self, platform: &str, url: &str) -> CoreResult<()> {
        self.store.edit(|s| s.set_social_link(platform, url))
    }

    pub fn remove_social_link(&self, platform: &str) -> bool {
        self.store
            .edit(|s| Ok(s.remove_social_link(platform)))
            .unwrap_or(false)
    }

    /// Returns whether the campaign is now active.
    pub fn toggle_campaign(&self, id: &str) -> CoreResult<bool> {
        self.store.edit(|s| s.toggle_campaign(id))
    }
}

impl Deref for MarketingStore {
    type Target = SettingsStore<MarketingSettings>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
