//! # Discounts Store
//!
//! Promo codes, automatic discounts and loyalty, plus the view state of the
//! discounts page.
//!
//! ```text
//! ┌──────────────────────────────┐   ┌─────────────────────────────┐
//! │ SettingsStore<Discount...>   │   │ DiscountView                │
//! │  promoCodes, automatic, ...  │   │  promoCodeFilter  activeTab │
//! │  (mirrors /api/discounts)    │   │  (local only)               │
//! └──────────────────────────────┘   └─────────────────────────────┘
//!
//! Updating the filter never changes the tab and the other way round.
//! ```

use std::ops::Deref;
use std::sync::{Arc, RwLock};

use backoffice_client::ResourceClient;
use backoffice_core::schema::discounts::{DiscountSettings, DiscountTab, PromoCode, PromoCodeFilter};
use backoffice_core::CoreResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::store::SettingsStore;

/// Local view state of the discounts page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountView {
    pub promo_code_filter: PromoCodeFilter,
    pub active_tab: DiscountTab,
}

#[derive(Clone)]
pub struct DiscountsStore {
    store: SettingsStore<DiscountSettings>,
    view: Arc<RwLock<DiscountView>>,
}

impl DiscountsStore {
    pub fn new(client: Arc<ResourceClient>) -> Self {
        DiscountsStore {
            store: SettingsStore::new(client),
            view: Arc::new(RwLock::new(DiscountView::default())),
        }
    }

    // =========================================================================
    // View State
    // =========================================================================

    pub fn view(&self) -> DiscountView {
        *self.view.read().expect("discount view poisoned")
    }

    pub fn update_promo_code_filter(&self, filter: PromoCodeFilter) {
        self.view.write().expect("discount view poisoned").promo_code_filter = filter;
        debug!(?filter, "Promo code filter changed");
    }

    pub fn select_active_tab(&self, tab: DiscountTab) {
        self.view.write().expect("discount view poisoned").active_tab = tab;
        debug!(?tab, "Discount tab changed");
    }

    /// Promo codes passing the current filter at `now`.
    pub fn filtered_promo_codes(&self, now: DateTime<Utc>) -> Vec<PromoCode> {
        let filter = self.view().promo_code_filter;
        self.store.with_settings(|s| {
            s.promo_codes_matching(filter, now)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    // =========================================================================
    // Promo Codes
    // =========================================================================

    pub fn add_promo_code(&self, promo: PromoCode) -> CoreResult<()> {
        self.store.edit(|s| s.add_promo_code(promo))
    }

    pub fn update_promo_code(&self, promo: PromoCode) -> CoreResult<()> {
        self.store.edit(|s| s.update_promo_code(promo))
    }

    pub fn remove_promo_code(&self, id: &str) -> CoreResult<PromoCode> {
        self.store.edit(|s| s.remove_promo_code(id))
    }

    /// Resets settings, request state and view state.
    pub fn reset(&self) {
        self.store.reset();
        *self.view.write().expect("discount view poisoned") = DiscountView::default();
    }
}

impl Deref for DiscountsStore {
    type Target = SettingsStore<DiscountSettings>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_client::http::testing::FakeBackend;
    use backoffice_core::schema::discounts::DiscountType;
    use chrono::Duration;

    use crate::state::testing::client_with;

    fn store() -> DiscountsStore {
        DiscountsStore::new(client_with(Arc::new(FakeBackend::new())))
    }

    #[test]
    fn test_filter_and_tab_are_independent() {
        let store = store();
        store.select_active_tab(DiscountTab::Loyalty);

        store.update_promo_code_filter("Expired".parse().unwrap());

        let view = store.view();
        assert_eq!(view.promo_code_filter, PromoCodeFilter::Expired);
        assert_eq!(view.active_tab, DiscountTab::Loyalty);

        store.select_active_tab(DiscountTab::Automatic);
        assert_eq!(store.view().promo_code_filter, PromoCodeFilter::Expired);
    }

    #[test]
    fn test_filtered_promo_codes() {
        let store = store();
        let now = Utc::now();
        let mut expired = PromoCode::new("OLD", DiscountType::Percentage, 5.0).unwrap();
        expired.expires_at = Some(now - Duration::days(1));
        store.add_promo_code(expired).unwrap();
        store
            .add_promo_code(PromoCode::new("FRESH", DiscountType::Percentage, 10.0).unwrap())
            .unwrap();

        assert_eq!(store.filtered_promo_codes(now).len(), 2);

        store.update_promo_code_filter(PromoCodeFilter::Expired);
        let codes = store.filtered_promo_codes(now);
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].code, "OLD");
    }

    #[test]
    fn test_promo_code_edits() {
        let store = store();
        let promo = PromoCode::new("SPRING", DiscountType::FixedAmount, 500.0).unwrap();
        store.add_promo_code(promo.clone()).unwrap();
        assert!(store
            .add_promo_code(PromoCode::new("spring", DiscountType::Percentage, 5.0).unwrap())
            .is_err());

        let mut renamed = promo.clone();
        renamed.code = "SPRING25".to_string();
        store.update_promo_code(renamed).unwrap();
        assert_eq!(store.settings().promo_codes[0].code, "SPRING25");

        let removed = store.remove_promo_code(&promo.id).unwrap();
        assert_eq!(removed.id, promo.id);
        assert!(store.remove_promo_code(&promo.id).is_err());
    }

    #[test]
    fn test_reset_clears_view_state() {
        let store = store();
        store.update_promo_code_filter(PromoCodeFilter::Inactive);
        store.select_active_tab(DiscountTab::Automatic);

        store.reset();

        assert_eq!(store.view(), DiscountView::default());
        assert_eq!(store.settings(), DiscountSettings::default());
    }
}
