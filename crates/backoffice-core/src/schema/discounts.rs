//! # Discount Settings
//!
//! Promo codes, automatic cart discounts and the loyalty program.
//!
//! ## Promo Code Status
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  is_active = false                       → Inactive                     │
//! │  starts_at in the future                 → Scheduled                    │
//! │  expires_at in the past                  → Expired                      │
//! │  usage_limit reached                     → Expired                      │
//! │  otherwise                               → Active                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::schema::{RemoteSettings, SettingsSchema};
use crate::types::Resource;
use crate::validation::{validate_percentage, validate_promo_code};
use crate::MAX_PROMO_CODES;

// =============================================================================
// Promo Codes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum DiscountType {
    #[default]
    Percentage,
    FixedAmount,
}

/// A code the cashier or customer enters at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub id: String,
    pub code: String,
    pub discount_type: DiscountType,
    /// Percent (0-100) for `Percentage`, cents for `FixedAmount`.
    pub value: f64,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub times_used: u32,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl PromoCode {
    /// Creates an active, unlimited code with a fresh id.
    pub fn new(code: &str, discount_type: DiscountType, value: f64) -> CoreResult<Self> {
        validate_promo_code(code)?;
        if discount_type == DiscountType::Percentage {
            validate_percentage("discount", value)?;
        } else if value <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 1.0,
                max: f64::MAX,
            }
            .into());
        }

        Ok(PromoCode {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.trim().to_uppercase(),
            discount_type,
            value,
            usage_limit: None,
            times_used: 0,
            starts_at: None,
            expires_at: None,
            is_active: true,
        })
    }

    pub fn status(&self, now: DateTime<Utc>) -> PromoCodeStatus {
        if !self.is_active {
            return PromoCodeStatus::Inactive;
        }
        if self.starts_at.is_some_and(|start| start > now) {
            return PromoCodeStatus::Scheduled;
        }
        if self.expires_at.is_some_and(|end| end <= now) {
            return PromoCodeStatus::Expired;
        }
        if self.usage_limit.is_some_and(|limit| self.times_used >= limit) {
            return PromoCodeStatus::Expired;
        }
        PromoCodeStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoCodeStatus {
    Active,
    Scheduled,
    Expired,
    Inactive,
}

/// Filter of the promo code table. View state, not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PromoCodeFilter {
    #[default]
    All,
    Active,
    Scheduled,
    Expired,
    Inactive,
}

impl PromoCodeFilter {
    pub fn matches(&self, status: PromoCodeStatus) -> bool {
        match self {
            PromoCodeFilter::All => true,
            PromoCodeFilter::Active => status == PromoCodeStatus::Active,
            PromoCodeFilter::Scheduled => status == PromoCodeStatus::Scheduled,
            PromoCodeFilter::Expired => status == PromoCodeStatus::Expired,
            PromoCodeFilter::Inactive => status == PromoCodeStatus::Inactive,
        }
    }
}

impl std::str::FromStr for PromoCodeFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PromoCodeFilter::All),
            "active" => Ok(PromoCodeFilter::Active),
            "scheduled" => Ok(PromoCodeFilter::Scheduled),
            "expired" => Ok(PromoCodeFilter::Expired),
            "inactive" => Ok(PromoCodeFilter::Inactive),
            _ => Err(ValidationError::NotAllowed {
                field: "filter".to_string(),
                allowed: ["All", "Active", "Scheduled", "Expired", "Inactive"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

/// Tab of the discounts page. View state, not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum DiscountTab {
    #[default]
    PromoCodes,
    Automatic,
    Loyalty,
}

impl std::str::FromStr for DiscountTab {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "promocodes" => Ok(DiscountTab::PromoCodes),
            "automatic" => Ok(DiscountTab::Automatic),
            "loyalty" => Ok(DiscountTab::Loyalty),
            _ => Err(ValidationError::NotAllowed {
                field: "tab".to_string(),
                allowed: vec![
                    "promoCodes".to_string(),
                    "automatic".to_string(),
                    "loyalty".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Automatic Discounts & Loyalty
// =============================================================================

/// A discount applied without a code once the cart qualifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AutomaticDiscount {
    pub id: String,
    pub name: String,
    pub min_order_cents: i64,
    pub percent_off: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct LoyaltyProgram {
    pub enabled: bool,
    pub points_per_dollar: u32,
    /// What 100 points are worth at redemption, in cents.
    pub redemption_value_cents: i64,
}

impl Default for LoyaltyProgram {
    fn default() -> Self {
        LoyaltyProgram {
            enabled: false,
            points_per_dollar: 1,
            redemption_value_cents: 100,
        }
    }
}

// =============================================================================
// Discount Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscountSettings {
    pub promo_codes: Vec<PromoCode>,
    pub automatic_discounts: Vec<AutomaticDiscount>,
    pub loyalty: LoyaltyProgram,
    /// Whether a promo code may combine with automatic discounts.
    pub allow_stacking: bool,
}

impl SettingsSchema for DiscountSettings {
    const DOMAIN: &'static str = "discounts";
}

impl RemoteSettings for DiscountSettings {
    const RESOURCE: Resource = Resource::Discounts;
}

impl DiscountSettings {
    pub fn add_promo_code(&mut self, promo: PromoCode) -> CoreResult<()> {
        if self.promo_codes.len() >= MAX_PROMO_CODES {
            return Err(CoreError::LimitExceeded {
                what: "promo codes".to_string(),
                max: MAX_PROMO_CODES,
            });
        }
        if self
            .promo_codes
            .iter()
            .any(|p| p.code.eq_ignore_ascii_case(&promo.code))
        {
            return Err(ValidationError::Duplicate {
                field: "code".to_string(),
                value: promo.code,
            }
            .into());
        }
        self.promo_codes.push(promo);
        Ok(())
    }

    /// Replaces the promo code with the same id.
    pub fn update_promo_code(&mut self, promo: PromoCode) -> CoreResult<()> {
        validate_promo_code(&promo.code)?;
        if self
            .promo_codes
            .iter()
            .any(|p| p.id != promo.id && p.code.eq_ignore_ascii_case(&promo.code))
        {
            return Err(ValidationError::Duplicate {
                field: "code".to_string(),
                value: promo.code,
            }
            .into());
        }

        let slot = self
            .promo_codes
            .iter_mut()
            .find(|p| p.id == promo.id)
            .ok_or_else(|| CoreError::not_found("Promo code", &promo.id))?;
        *slot = promo;
        Ok(())
    }

    pub fn remove_promo_code(&mut self, id: &str) -> CoreResult<PromoCode> {
        let index = self
            .promo_codes
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::not_found("Promo code", id))?;
        Ok(self.promo_codes.remove(index))
    }

    pub fn promo_codes_matching(&self, filter: PromoCodeFilter, now: DateTime<Utc>) -> Vec<&PromoCode> {
        self.promo_codes
            .iter()
            .filter(|p| filter.matches(p.status(now)))
            .collect()
    }
}
