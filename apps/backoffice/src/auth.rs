//! # Auth Gate
//!
//! Decides whether a route may be shown for the current session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check(route)                                                           │
//! │     │                                                                   │
//! │     ├── route == login route ───────────────────────► Allow            │
//! │     ├── no token or no userData ────────────────────► Redirect(login)  │
//! │     ├── roleType not allowed ───────────────────────► Redirect(login)  │
//! │     ├── accessMode not allowed ─────────────────────► Redirect(login)  │
//! │     └── otherwise ──────────────────────────────────► Allow            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use backoffice_client::{AuthSettings, SessionStore};
use serde::Serialize;
use tracing::debug;

/// Outcome of a route check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "camelCase")]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

pub struct AuthGate {
    session: Arc<SessionStore>,
    policy: AuthSettings,
}

impl AuthGate {
    pub fn new(session: Arc<SessionStore>, policy: AuthSettings) -> Self {
        AuthGate { session, policy }
    }

    pub fn login_route(&self) -> &str {
        &self.policy.login_route
    }

    pub fn check(&self, route: &str) -> GateDecision {
        if route == self.policy.login_route {
            return GateDecision::Allow;
        }

        let session = self.session.snapshot();
        let (Some(_), Some(user)) = (session.token, session.user_data) else {
            debug!(route, "No session, redirecting to login");
            return self.redirect();
        };

        if !self.policy.allowed_roles.contains(&user.role_type) {
            debug!(route, role = ?user.role_type, "Role not allowed");
            return self.redirect();
        }
        if !self.policy.allowed_access_modes.contains(&user.access_mode) {
            debug!(route, access_mode = ?user.access_mode, "Access mode not allowed");
            return self.redirect();
        }

        GateDecision::Allow
    }

    fn redirect(&self) -> GateDecision {
        GateDecision::Redirect(self.policy.login_route.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{AccessMode, RoleType, UserData};

    fn gate_with(user: Option<UserData>, token: Option<&str>) -> AuthGate {
        let session = Arc::new(SessionStore::in_memory());
        if let Some(user) = user {
            session.login("tok".to_string(), user).unwrap();
        }
        session.set_token(token.map(str::to_string)).unwrap();
        AuthGate::new(session, AuthSettings::default())
    }

    fn user(role_type: RoleType, access_mode: AccessMode) -> UserData {
        UserData {
            id: "admin-1".to_string(),
            role_type,
            access_mode,
        }
    }

    #[test]
    fn test_missing_session_redirects() {
        let gate = gate_with(None, None);
        assert_eq!(gate.check("/settings/finance"), GateDecision::Redirect("/login".to_string()));
        assert!(gate.check("/login").is_allowed());
    }

    #[test]
    fn test_token_without_user_redirects() {
        let gate = gate_with(None, Some("tok"));
        assert!(!gate.check("/settings").is_allowed());
    }

    #[test]
    fn test_user_without_token_redirects() {
        let gate = gate_with(Some(user(RoleType::Owner, AccessMode::Full)), None);
        assert!(!gate.check("/settings").is_allowed());
    }

    #[test]
    fn test_role_and_access_mode_policy() {
        let owner = gate_with(Some(user(RoleType::Owner, AccessMode::Full)), Some("tok"));
        assert!(owner.check("/settings").is_allowed());

        let staff = gate_with(Some(user(RoleType::Staff, AccessMode::Full)), Some("tok"));
        assert!(!staff.check("/settings").is_allowed());

        let read_only = gate_with(Some(user(RoleType::Admin, AccessMode::ReadOnly)), Some("tok"));
        assert!(!read_only.check("/settings").is_allowed());
    }

    #[test]
    fn test_decision_json() {
        let json = serde_json::to_value(GateDecision::Redirect("/login".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "decision": "redirect", "to": "/login" }));
    }
}
