//! # Finance Commands
//!
//! Saved payment cards. Activation and removal are optimistic: the card
//! list changes at once and is restored if the backend refuses.

use backoffice_core::schema::finance::{CardDetails, FinanceSettings};
use tracing::debug;

use crate::error::AppResult;
use crate::state::AppState;

pub async fn set_active_card(state: &AppState, card_id: &str) -> AppResult<FinanceSettings> {
    debug!(card_id, "set_active_card command");
    let admin_id = state.admin_id()?;
    Ok(state.finance.set_active_card(&admin_id, card_id).await?)
}

pub async fn remove_card(state: &AppState, card_id: &str) -> AppResult<FinanceSettings> {
    debug!(card_id, "remove_card command");
    let admin_id = state.admin_id()?;
    Ok(state.finance.remove_card(&admin_id, card_id).await?)
}

/// Adds a card locally; it is sent with the next finance update.
pub fn add_card(
    state: &AppState,
    brand: &str,
    last4: &str,
    holder_name: &str,
    exp_month: u8,
    exp_year: u16,
) -> AppResult<CardDetails> {
    debug!(brand, "add_card command");
    let card = CardDetails::new(brand, last4, holder_name, exp_month, exp_year)?;
    state.finance.add_card(card.clone())?;
    Ok(state
        .finance
        .with_settings(|s| s.payment.cards.iter().find(|c| c.id == card.id).cloned())
        .unwrap_or(card))
}
