//! # Admin Tools Settings
//!
//! Security, backups, maintenance mode and audit log. Each section is
//! updated on its own with a `{ section, data, action }` payload and has its
//! own request status in the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::schema::{RemoteSettings, SettingsSchema};
use crate::types::Resource;

// =============================================================================
// Sections
// =============================================================================

/// Independently updatable part of the admin tools settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum AdminSection {
    Security,
    Backups,
    Maintenance,
    AuditLog,
}

impl AdminSection {
    pub const ALL: [AdminSection; 4] = [
        AdminSection::Security,
        AdminSection::Backups,
        AdminSection::Maintenance,
        AdminSection::AuditLog,
    ];

    /// Key of the section in the settings JSON.
    pub const fn key(&self) -> &'static str {
        match self {
            AdminSection::Security => "security",
            AdminSection::Backups => "backups",
            AdminSection::Maintenance => "maintenance",
            AdminSection::AuditLog => "auditLog",
        }
    }
}

impl std::str::FromStr for AdminSection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], "");
        AdminSection::ALL
            .into_iter()
            .find(|section| section.key().to_lowercase() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "section".to_string(),
                allowed: AdminSection::ALL.iter().map(|s| s.key().to_string()).collect(),
            })
    }
}

/// What the admin asked the backend to do with a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AdminAction {
    /// Save the submitted values.
    #[default]
    Update,
    /// Restore the section to backend defaults.
    Reset,
    /// Run the section's job now (e.g. an immediate backup).
    Trigger,
}

impl std::str::FromStr for AdminAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "update" => Ok(AdminAction::Update),
            "reset" => Ok(AdminAction::Reset),
            "trigger" | "run" => Ok(AdminAction::Trigger),
            _ => Err(ValidationError::NotAllowed {
                field: "action".to_string(),
                allowed: vec!["update".to_string(), "reset".to_string(), "trigger".to_string()],
            }),
        }
    }
}

/// Body of a section update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    pub section: AdminSection,
    pub data: Value,
    pub action: AdminAction,
}

/// The most recent section action confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LastAction {
    pub section: AdminSection,
    pub action: AdminAction,
    #[ts(as = "String")]
    pub at: DateTime<Utc>,
}

// =============================================================================
// Section Schemas
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub two_factor_required: bool,
    pub session_timeout_minutes: u32,
    pub password_min_length: u8,
    /// Addresses allowed to sign in; empty means unrestricted.
    pub ip_whitelist: Vec<String>,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        SecuritySettings {
            two_factor_required: false,
            session_timeout_minutes: 30,
            password_min_length: 8,
            ip_whitelist: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    Hourly,
    #[default]
    Daily,
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupSettings {
    pub auto_backup: bool,
    pub frequency: BackupFrequency,
    pub retention_days: u32,
    #[ts(as = "Option<String>")]
    pub last_backup_at: Option<DateTime<Utc>>,
}

impl Default for BackupSettings {
    fn default() -> Self {
        BackupSettings {
            auto_backup: true,
            frequency: BackupFrequency::Daily,
            retention_days: 30,
            last_backup_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceSettings {
    pub enabled: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditLogSettings {
    pub enabled: bool,
    pub retention_days: u32,
}

impl Default for AuditLogSettings {
    fn default() -> Self {
        AuditLogSettings {
            enabled: true,
            retention_days: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminToolsSettings {
    pub security: SecuritySettings,
    pub backups: BackupSettings,
    pub maintenance: MaintenanceSettings,
    pub audit_log: AuditLogSettings,
}

impl SettingsSchema for AdminToolsSettings {
    const DOMAIN: &'static str = "admin-tools";
}

impl RemoteSettings for AdminToolsSettings {
    const RESOURCE: Resource = Resource::AdminTools;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_parsing() {
        assert_eq!("security".parse::<AdminSection>().unwrap(), AdminSection::Security);
        assert_eq!("audit-log".parse::<AdminSection>().unwrap(), AdminSection::AuditLog);
        assert_eq!("auditLog".parse::<AdminSection>().unwrap(), AdminSection::AuditLog);
        assert!("billing".parse::<AdminSection>().is_err());
    }

    #[test]
    fn test_section_keys_match_schema() {
        let value = serde_json::to_value(AdminToolsSettings::default()).unwrap();
        for section in AdminSection::ALL {
            assert!(value.get(section.key()).is_some(), "missing {}", section.key());
        }
    }

    #[test]
    fn test_section_update_wire_shape() {
        let update = SectionUpdate {
            section: AdminSection::AuditLog,
            data: json!({ "retentionDays": 180 }),
            action: AdminAction::Update,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({ "section": "auditLog", "data": { "retentionDays": 180 }, "action": "update" })
        );
    }
}
