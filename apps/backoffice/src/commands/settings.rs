//! # Settings Commands
//!
//! Domain-agnostic entry points: fetch, update, read and clear errors for
//! any settings domain by name, plus the admin tools section update.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_settings(state, "finance")                                       │
//! │         │                                                               │
//! │         ├── "finance".parse::<SettingsDomain>()                        │
//! │         ├── state.admin_id()              (no session → Unauthorized) │
//! │         └── state.fetch_domain(Finance, admin)                          │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  Ok(settings JSON)  or  Err(AppError { code, message })                │
//! │                                                                         │
//! │  The store records the failure either way; the view reads Status and   │
//! │  Error from get_settings.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoffice_core::schema::admin_tools::{AdminAction, AdminSection};
use backoffice_core::RequestState;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::state::{AppState, DomainOutcome, SettingsDomain};

/// Settings of one domain together with its request state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub domain: SettingsDomain,
    pub settings: Value,
    pub request: RequestState,
}

fn parse_domain(domain: &str) -> AppResult<SettingsDomain> {
    domain.parse::<SettingsDomain>().map_err(AppError::from)
}

/// Fetches one domain from the backend.
pub async fn fetch_settings(state: &AppState, domain: &str) -> AppResult<Value> {
    debug!(domain, "fetch_settings command");
    let domain = parse_domain(domain)?;
    let admin_id = state.admin_id()?;
    Ok(state.fetch_domain(domain, &admin_id).await?)
}

/// Posts a full settings tree for one domain.
pub async fn update_settings(state: &AppState, domain: &str, settings: Value) -> AppResult<Value> {
    debug!(domain, "update_settings command");
    let domain = parse_domain(domain)?;
    let admin_id = state.admin_id()?;
    Ok(state.update_domain(domain, &admin_id, settings).await?)
}

/// Current local settings and request state. No request is made.
pub fn get_settings(state: &AppState, domain: &str) -> AppResult<SettingsSnapshot> {
    let domain = parse_domain(domain)?;
    Ok(SettingsSnapshot {
        domain,
        settings: state.settings_json(domain)?,
        request: state.request_state(domain),
    })
}

pub fn clear_settings_error(state: &AppState, domain: &str) -> AppResult<()> {
    state.clear_error(parse_domain(domain)?);
    Ok(())
}

/// Fetches every domain; per-domain failures are reported, not raised.
pub async fn fetch_all_settings(state: &AppState) -> AppResult<Vec<DomainOutcome>> {
    debug!("fetch_all_settings command");
    let admin_id = state.admin_id()?;
    Ok(state.fetch_all(&admin_id).await)
}

/// Saves one admin tools section.
///
/// ## Parameters
/// - `section`: `security`, `backups`, `maintenance` or `auditLog`
/// - `action`: `update` (default), `reset` or `trigger`
pub async fn update_admin_section(
    state: &AppState,
    section: &str,
    data: Value,
    action: Option<&str>,
) -> AppResult<Value> {
    debug!(section, ?action, "update_admin_section command");
    let section: AdminSection = section.parse()?;
    let action: AdminAction = action.map(str::parse).transpose()?.unwrap_or_default();
    let admin_id = state.admin_id()?;

    let settings = state
        .admin_tools
        .update_section(&admin_id, section, data, action)
        .await?;
    serde_json::to_value(settings).map_err(|e| AppError::internal(e.to_string()))
}

/// Posts the store users' pending writes in one batch.
pub async fn save_store_users(state: &AppState) -> AppResult<usize> {
    debug!("save_store_users command");
    Ok(state.store_users.save().await?)
}
