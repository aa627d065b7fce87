//! # Finance Store
//!
//! Tax, currency, payment methods and payouts. Card changes are optimistic:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_active_card(B)                                                     │
//! │                                                                         │
//! │  stage(cards)        [A*, B] ──► [A, B*]      (UI shows B at once)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST /api/finances/{admin}/payment  { "payment": {...} }              │
//! │       │                                                                 │
//! │       ├── ok     → commit, merge response, Succeeded                   │
//! │       └── failed → rollback to [A*, B], Failed + Error                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::ops::Deref;
use std::sync::Arc;

use backoffice_client::{ClientResult, ResourceClient};
use backoffice_core::schema::finance::{self, CardDetails, FinanceSettings, PaymentSettings};
use backoffice_core::{CoreResult, Resource};
use serde_json::json;
use tracing::info;

use super::store::SettingsStore;

const PAYMENT_PATH: &str = "payment";

fn cards_of(settings: &mut FinanceSettings) -> &mut Vec<CardDetails> {
    &mut settings.payment.cards
}

#[derive(Clone)]
pub struct FinanceStore {
    store: SettingsStore<FinanceSettings>,
}

impl FinanceStore {
    pub fn new(client: Arc<ResourceClient>) -> Self {
        FinanceStore {
            store: SettingsStore::new(client),
        }
    }

    /// Posts the payment section on its own.
    pub async fn update_payment(&self, admin_id: &str, payment: PaymentSettings) -> ClientResult<FinanceSettings> {
        let body = json!({ "payment": payment });
        let response = self
            .store
            .send(
                "update_payment",
                self.store
                    .client()
                    .post_to(Resource::Finances, admin_id, PAYMENT_PATH, body),
            )
            .await?;
        self.store.apply_response(&response)?;
        Ok(self.store.settings())
    }

    /// Makes `card_id` the active card, optimistically.
    pub async fn set_active_card(&self, admin_id: &str, card_id: &str) -> ClientResult<FinanceSettings> {
        let staged = self
            .store
            .stage(cards_of, |cards| finance::activate_card(cards, card_id))?;
        self.push_cards(admin_id, staged).await
    }

    /// Removes a saved card, optimistically.
    pub async fn remove_card(&self, admin_id: &str, card_id: &str) -> ClientResult<FinanceSettings> {
        let staged = self.store.stage(cards_of, |cards| {
            finance::remove_card(cards, card_id).map(|_| ())
        })?;
        self.push_cards(admin_id, staged).await
    }

    async fn push_cards(
        &self,
        admin_id: &str,
        staged: backoffice_core::StagedChange<Vec<CardDetails>>,
    ) -> ClientResult<FinanceSettings> {
        let payment = self.store.with_settings(|s| s.payment.clone());
        match self.update_payment(admin_id, payment).await {
            Ok(settings) => {
                staged.commit();
                info!(cards = settings.payment.cards.len(), "Card change confirmed");
                Ok(settings)
            }
            Err(e) => {
                self.store.rollback(cards_of, staged);
                Err(e)
            }
        }
    }

    /// Saves a card locally. The first card becomes active.
    pub fn add_card(&self, card: CardDetails) -> CoreResult<()> {
        self.store.edit(|s| s.payment.add_card(card))
    }

    pub fn set_tax_rate(&self, rate_percent: f64) -> CoreResult<()> {
        self.store.edit(|s| s.tax.set_rate(rate_percent))
    }
}

impl Deref for FinanceStore {
    type Target = SettingsStore<FinanceSettings>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
