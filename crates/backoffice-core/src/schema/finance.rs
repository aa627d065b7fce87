//! # Finance Settings
//!
//! Tax, currency, accepted payments with saved cards, and payouts.
//!
//! ## Saved Cards
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  payment.cards  =  [ Visa •4242 (active) , Amex •0005 ]                 │
//! │                                                                         │
//! │  • At most one card is active; it pays the subscription invoice.        │
//! │  • Activating a card deactivates every other card.                      │
//! │  • Removing the active card promotes the first remaining card.          │
//! │                                                                         │
//! │  These edits are applied optimistically by the finance store and       │
//! │  rolled back when the backend rejects the payment update.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::schema::{RemoteSettings, SettingsSchema};
use crate::types::Resource;
use crate::validation::{validate_card_last4, validate_percentage};
use crate::MAX_SAVED_CARDS;

// =============================================================================
// Tax & Currency
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxSettings {
    pub enabled: bool,
    /// Percent in [0, 100], e.g. 8.25.
    pub rate_percent: f64,
    /// Prices already include tax (EU/UK model).
    pub inclusive: bool,
    pub tax_id: String,
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            enabled: true,
            rate_percent: 0.0,
            inclusive: false,
            tax_id: String::new(),
        }
    }
}

impl TaxSettings {
    pub fn set_rate(&mut self, rate_percent: f64) -> CoreResult<()> {
        validate_percentage("tax rate", rate_percent)?;
        self.rate_percent = rate_percent;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrencySettings {
    /// ISO 4217 code
    pub code: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            decimals: 2,
        }
    }
}

impl CurrencySettings {
    /// Formats an amount in minor units for display.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::schema::finance::CurrencySettings;
    ///
    /// let usd = CurrencySettings::default();
    /// assert_eq!(usd.format(1234), "$12.34");
    /// assert_eq!(usd.format(-5), "-$0.05");
    /// ```
    pub fn format(&self, minor_units: i64) -> String {
        let sign = if minor_units < 0 { "-" } else { "" };
        let amount = minor_units.unsigned_abs();

        if self.decimals == 0 {
            return format!("{}{}{}", sign, self.symbol, amount);
        }

        let divisor = 10_u64.pow(u32::from(self.decimals));
        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.symbol,
            amount / divisor,
            amount % divisor,
            width = usize::from(self.decimals)
        )
    }
}

// =============================================================================
// Payment & Cards
// =============================================================================

/// A saved payment card. Only display data; the PAN never reaches the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub id: String,
    pub brand: String,
    pub last4: String,
    pub holder_name: String,
    pub exp_month: u8,
    pub exp_year: u16,
    #[serde(default)]
    pub is_active: bool,
}

impl CardDetails {
    pub fn new(brand: &str, last4: &str, holder_name: &str, exp_month: u8, exp_year: u16) -> CoreResult<Self> {
        validate_card_last4(last4)?;
        if !(1..=12).contains(&exp_month) {
            return Err(ValidationError::OutOfRange {
                field: "expiry month".to_string(),
                min: 1.0,
                max: 12.0,
            }
            .into());
        }

        Ok(CardDetails {
            id: uuid::Uuid::new_v4().to_string(),
            brand: brand.trim().to_string(),
            last4: last4.to_string(),
            holder_name: holder_name.trim().to_string(),
            exp_month,
            exp_year,
            is_active: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentSettings {
    pub accept_cash: bool,
    pub accept_cards: bool,
    pub tipping_enabled: bool,
    pub cards: Vec<CardDetails>,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        PaymentSettings {
            accept_cash: true,
            accept_cards: true,
            tipping_enabled: false,
            cards: Vec::new(),
        }
    }
}

impl PaymentSettings {
    pub fn active_card(&self) -> Option<&CardDetails> {
        self.cards.iter().find(|c| c.is_active)
    }

    /// Adds a card. The first card saved becomes the active one.
    pub fn add_card(&mut self, mut card: CardDetails) -> CoreResult<()> {
        if self.cards.len() >= MAX_SAVED_CARDS {
            return Err(CoreError::LimitExceeded {
                what: "saved cards".to_string(),
                max: MAX_SAVED_CARDS,
            });
        }
        card.is_active = self.cards.is_empty();
        self.cards.push(card);
        Ok(())
    }
}

/// Card list operations used inside a staged change.
pub fn activate_card(cards: &mut [CardDetails], card_id: &str) -> CoreResult<()> {
    if !cards.iter().any(|c| c.id == card_id) {
        return Err(CoreError::not_found("Card", card_id));
    }
    for card in cards.iter_mut() {
        card.is_active = card.id == card_id;
    }
    Ok(())
}

/// Removes a card, promoting the first remaining one if the active card went.
pub fn remove_card(cards: &mut Vec<CardDetails>, card_id: &str) -> CoreResult<CardDetails> {
    let index = cards
        .iter()
        .position(|c| c.id == card_id)
        .ok_or_else(|| CoreError::not_found("Card", card_id))?;
    let removed = cards.remove(index);

    if removed.is_active {
        if let Some(first) = cards.first_mut() {
            first.is_active = true;
        }
    }
    Ok(removed)
}

// =============================================================================
// Payouts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PayoutSchedule {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PayoutSettings {
    pub schedule: PayoutSchedule,
    pub minimum_payout_cents: i64,
    pub bank_account_last4: Option<String>,
}

impl Default for PayoutSettings {
    fn default() -> Self {
        PayoutSettings {
            schedule: PayoutSchedule::Weekly,
            minimum_payout_cents: 1000,
            bank_account_last4: None,
        }
    }
}

// =============================================================================
// Finance Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct FinanceSettings {
    pub tax: TaxSettings,
    pub currency: CurrencySettings,
    pub payment: PaymentSettings,
    pub payouts: PayoutSettings,
}

impl SettingsSchema for FinanceSettings {
    const DOMAIN: &'static str = "finance";
}

impl RemoteSettings for FinanceSettings {
    const RESOURCE: Resource = Resource::Finances;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, active: bool) -> CardDetails {
        CardDetails {
            id: id.to_string(),
            brand: "Visa".to_string(),
            last4: "4242".to_string(),
            holder_name: "Jane Doe".to_string(),
            exp_month: 12,
            exp_year: 2030,
            is_active: active,
        }
    }

    #[test]
    fn test_format_currency() {
        let usd = CurrencySettings::default();
        assert_eq!(usd.format(1234), "$12.34");
        assert_eq!(usd.format(100), "$1.00");
        assert_eq!(usd.format(0), "$0.00");
        assert_eq!(usd.format(-1234), "-$12.34");

        let yen = CurrencySettings {
            code: "JPY".to_string(),
            symbol: "¥".to_string(),
            decimals: 0,
        };
        assert_eq!(yen.format(500), "¥500");
    }

    #[test]
    fn test_activate_card_keeps_single_active() {
        let mut cards = vec![card("a", true), card("b", false)];
        activate_card(&mut cards, "b").unwrap();
        assert!(!cards[0].is_active);
        assert!(cards[1].is_active);

        assert!(activate_card(&mut cards, "zzz").is_err());
    }

    #[test]
    fn test_remove_active_card_promotes_next() {
        let mut cards = vec![card("a", true), card("b", false)];
        let removed = remove_card(&mut cards, "a").unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(cards.len(), 1);
        assert!(cards[0].is_active);
    }

    #[test]
    fn test_first_card_becomes_active() {
        let mut payment = PaymentSettings::default();
        payment
            .add_card(CardDetails::new("Visa", "4242", "Jane", 1, 2030).unwrap())
            .unwrap();
        payment
            .add_card(CardDetails::new("Amex", "0005", "Jane", 2, 2031).unwrap())
            .unwrap();
        assert_eq!(payment.active_card().map(|c| c.last4.as_str()), Some("4242"));
    }

    #[test]
    fn test_card_validation() {
        assert!(CardDetails::new("Visa", "42", "Jane", 1, 2030).is_err());
        assert!(CardDetails::new("Visa", "4242", "Jane", 13, 2030).is_err());
    }

    #[test]
    fn test_tax_rate_bounds() {
        let mut tax = TaxSettings::default();
        assert!(tax.set_rate(8.25).is_ok());
        assert!(tax.set_rate(101.0).is_err());
        assert_eq!(tax.rate_percent, 8.25);
    }
}
