//! # Session Commands
//!
//! Sign in, sign out and route checks.

use backoffice_core::{AccessMode, RoleType, UserData};
use backoffice_core::validation::validate_identifier;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::GateDecision;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// What the view needs to know about the session. The token is never
/// echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub signed_in: bool,
    pub user_data: Option<UserData>,
    pub selected_store_id: Option<String>,
}

pub fn current_session(state: &AppState) -> SessionInfo {
    let session = state.session().snapshot();
    SessionInfo {
        signed_in: session.token.is_some() && session.user_data.is_some(),
        user_data: session.user_data,
        selected_store_id: session.selected_store_id,
    }
}

/// Stores the token and user data obtained from the identity provider.
pub fn login(
    state: &AppState,
    token: &str,
    admin_id: &str,
    role_type: &str,
    access_mode: &str,
) -> AppResult<SessionInfo> {
    if token.trim().is_empty() {
        return Err(AppError::validation("token is required"));
    }
    validate_identifier("adminId", admin_id)?;
    let user = UserData {
        id: admin_id.trim().to_string(),
        role_type: role_type.parse::<RoleType>()?,
        access_mode: access_mode.parse::<AccessMode>()?,
    };

    state.login(token.trim().to_string(), user)?;
    info!(admin_id, "login command");
    Ok(current_session(state))
}

pub fn logout(state: &AppState) -> AppResult<()> {
    info!("logout command");
    Ok(state.logout()?)
}

/// Asks the auth gate whether `route` may be shown.
pub fn check_route(state: &AppState, route: &str) -> GateDecision {
    debug!(route, "check_route command");
    state.auth().check(route)
}
