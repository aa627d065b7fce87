//! # Store Commands
//!
//! List, create, select and delete stores.
//!
//! ## Store Lifecycle
//! ```text
//! ┌──────────┐  create_store  ┌──────────┐  select_store  ┌──────────────┐
//! │ (none)   │───────────────►│ listed   │───────────────►│ selected     │
//! └──────────┘                └──────────┘                │ (persisted)  │
//!                                   ▲                     └──────┬───────┘
//!                                   │   delete_store_settings    │
//!                                   └────────────────────────────┘
//!                                     (selection cleared)
//! ```

use backoffice_core::schema::store_settings::{NewStore, StoreSummary};
use tracing::debug;

use crate::error::AppResult;
use crate::state::AppState;

pub async fn list_stores(state: &AppState) -> AppResult<Vec<StoreSummary>> {
    debug!("list_stores command");
    let admin_id = state.admin_id()?;
    Ok(state.store_settings.load_stores(&admin_id).await?)
}

pub async fn create_store(state: &AppState, name: &str, address: Option<String>) -> AppResult<StoreSummary> {
    debug!(name, "create_store command");
    let new_store = NewStore::new(name, address)?;
    let admin_id = state.admin_id()?;
    Ok(state.store_settings.create_store(&admin_id, new_store).await?)
}

/// Selects a store; store-scoped settings of the previous store are dropped.
pub fn select_store(state: &AppState, store_id: &str) -> AppResult<()> {
    debug!(store_id, "select_store command");
    Ok(state.select_store(store_id)?)
}

/// Deletes the selected store's settings.
pub async fn delete_store_settings(state: &AppState) -> AppResult<()> {
    debug!("delete_store_settings command");
    let admin_id = state.admin_id()?;
    Ok(state.store_settings.delete(&admin_id).await?)
}
