//! # Domain Types
//!
//! Types shared by every settings store.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Shared Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Status      │   │  RequestState   │   │    Resource     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Idle           │   │  status         │   │  path segment   │       │
//! │  │  Loading        │   │  error          │   │  scope          │       │
//! │  │  Succeeded      │   │  last_updated   │   │  (admin/store)  │       │
//! │  │  Failed         │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    UserData     │   │    RoleType     │   │   AccessMode    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (admin id)  │   │  Owner, Admin   │   │  Full           │       │
//! │  │  role_type      │   │  Manager, Staff │   │  ReadOnly       │       │
//! │  │  access_mode    │   └─────────────────┘   │  Restricted     │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Request Status
// =============================================================================

/// Lifecycle of the outstanding request of a store (or store section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Nothing requested yet (or reset).
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request completed and its response was applied.
    Succeeded,
    /// The last request failed; see `RequestState::error`.
    Failed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Idle => write!(f, "idle"),
            Status::Loading => write!(f, "loading"),
            Status::Succeeded => write!(f, "succeeded"),
            Status::Failed => write!(f, "failed"),
        }
    }
}

/// Status, error and last sync time of a store or section.
///
/// ## Transitions
/// ```text
///   Idle ──begin──► Loading ──succeed──► Succeeded
///                      │
///                      └──────fail─────► Failed
///
///   begin() from any state clears the error.
///   reset() returns to Idle with no error and no timestamp.
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RequestState {
    pub status: Status,
    pub error: Option<String>,
    #[ts(as = "Option<String>")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RequestState {
    /// Marks a request as started.
    pub fn begin(&mut self) {
        self.status = Status::Loading;
        self.error = None;
    }

    /// Marks the request as applied at `at`.
    pub fn succeed(&mut self, at: DateTime<Utc>) {
        self.status = Status::Succeeded;
        self.error = None;
        self.last_updated = Some(at);
    }

    /// Marks the request as failed with a user-visible message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = Status::Failed;
        self.error = Some(message.into());
    }

    /// Clears the error without touching the status.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }
}

// =============================================================================
// Resources
// =============================================================================

/// How a resource URL is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    /// `{baseUrl}/api/{resource}/{adminId}`
    Admin,
    /// `{baseUrl}/api/{resource}/{adminId}/{storeId}`
    AdminAndStore,
}

/// REST resources exposed by the back office gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Notifications,
    Discounts,
    Finances,
    Marketing,
    AdminTools,
    StoreSettings,
    Stores,
    Clients,
}

impl Resource {
    /// Path segment after `/api/`.
    pub const fn path(&self) -> &'static str {
        match self {
            Resource::Notifications => "notifications",
            Resource::Discounts => "discounts",
            Resource::Finances => "finances",
            Resource::Marketing => "marketing",
            Resource::AdminTools => "admin-tools",
            Resource::StoreSettings => "store-settings",
            Resource::Stores => "stores",
            Resource::Clients => "clients",
        }
    }

    /// Whether the currently selected store is part of the URL.
    pub const fn scope(&self) -> ResourceScope {
        match self {
            Resource::Notifications | Resource::StoreSettings => ResourceScope::AdminAndStore,
            _ => ResourceScope::Admin,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// =============================================================================
// Session User
// =============================================================================

/// Role of the signed-in back office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    Owner,
    Admin,
    Manager,
    Staff,
}

impl std::str::FromStr for RoleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(RoleType::Owner),
            "admin" => Ok(RoleType::Admin),
            "manager" => Ok(RoleType::Manager),
            "staff" => Ok(RoleType::Staff),
            _ => Err(ValidationError::NotAllowed {
                field: "roleType".to_string(),
                allowed: vec![
                    "owner".to_string(),
                    "admin".to_string(),
                    "manager".to_string(),
                    "staff".to_string(),
                ],
            }),
        }
    }
}

/// What the signed-in user may do in the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum AccessMode {
    Full,
    ReadOnly,
    Restricted,
}

impl std::str::FromStr for AccessMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "full" => Ok(AccessMode::Full),
            "readonly" => Ok(AccessMode::ReadOnly),
            "restricted" => Ok(AccessMode::Restricted),
            _ => Err(ValidationError::NotAllowed {
                field: "accessMode".to_string(),
                allowed: vec![
                    "full".to_string(),
                    "readOnly".to_string(),
                    "restricted".to_string(),
                ],
            }),
        }
    }
}

/// The `userData` record persisted after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// Admin identifier used to scope every resource URL.
    pub id: String,
    pub role_type: RoleType,
    pub access_mode: AccessMode,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_state_lifecycle() {
        let mut state = RequestState::default();
        assert_eq!(state.status, Status::Idle);

        state.fail("boom");
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.begin();
        assert!(state.is_loading());
        assert!(state.error.is_none());

        let now = Utc::now();
        state.succeed(now);
        assert_eq!(state.status, Status::Succeeded);
        assert_eq!(state.last_updated, Some(now));
    }

    #[test]
    fn test_clear_error_keeps_status() {
        let mut state = RequestState::default();
        state.fail("network down");
        state.clear_error();
        assert_eq!(state.status, Status::Failed);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_resource_scope() {
        assert_eq!(Resource::Notifications.scope(), ResourceScope::AdminAndStore);
        assert_eq!(Resource::StoreSettings.scope(), ResourceScope::AdminAndStore);
        assert_eq!(Resource::Discounts.scope(), ResourceScope::Admin);
        assert_eq!(Resource::AdminTools.path(), "admin-tools");
    }

    #[test]
    fn test_user_data_json_shape() {
        let json = r#"{"id":"admin-1","roleType":"admin","accessMode":"readOnly"}"#;
        let user: UserData = serde_json::from_str(json).unwrap();
        assert_eq!(user.role_type, RoleType::Admin);
        assert_eq!(user.access_mode, AccessMode::ReadOnly);
    }

    #[test]
    fn test_role_and_access_parsing() {
        assert_eq!("Owner".parse::<RoleType>().unwrap(), RoleType::Owner);
        assert!("cashier".parse::<RoleType>().is_err());
        assert_eq!("read-only".parse::<AccessMode>().unwrap(), AccessMode::ReadOnly);
        assert_eq!("readOnly".parse::<AccessMode>().unwrap(), AccessMode::ReadOnly);
    }
}
