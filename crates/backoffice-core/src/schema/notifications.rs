//! Notification preferences for a store.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::schema::{RemoteSettings, SettingsSchema};
use crate::types::Resource;
use crate::validation::validate_email;

/// Delivery channel of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
    Push,
}

impl std::str::FromStr for NotificationChannel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(NotificationChannel::Email),
            "sms" => Ok(NotificationChannel::Sms),
            "push" => Ok(NotificationChannel::Push),
            _ => Err(ValidationError::NotAllowed {
                field: "channel".to_string(),
                allowed: vec!["email".to_string(), "sms".to_string(), "push".to_string()],
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailNotifications {
    pub enabled: bool,
    pub recipients: Vec<String>,
    pub order_confirmation: bool,
    pub low_stock_alert: bool,
    pub daily_summary: bool,
}

impl Default for EmailNotifications {
    fn default() -> Self {
        EmailNotifications {
            enabled: true,
            recipients: Vec::new(),
            order_confirmation: true,
            low_stock_alert: true,
            daily_summary: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsNotifications {
    pub enabled: bool,
    pub phone_number: String,
    pub order_updates: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PushNotifications {
    pub enabled: bool,
    pub new_order: bool,
    pub refund_requested: bool,
}

impl Default for PushNotifications {
    fn default() -> Self {
        PushNotifications {
            enabled: true,
            new_order: true,
            refund_requested: true,
        }
    }
}

/// Notification settings, keyed by admin and store on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email: EmailNotifications,
    pub sms: SmsNotifications,
    pub push: PushNotifications,
    /// Stock level at or below which a low-stock alert fires.
    pub low_stock_threshold: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            email: EmailNotifications::default(),
            sms: SmsNotifications::default(),
            push: PushNotifications::default(),
            low_stock_threshold: 5,
        }
    }
}

impl SettingsSchema for NotificationSettings {
    const DOMAIN: &'static str = "notifications";
}

impl RemoteSettings for NotificationSettings {
    const RESOURCE: Resource = Resource::Notifications;
}

impl NotificationSettings {
    pub fn channel_enabled(&self, channel: NotificationChannel) -> bool {
        match channel {
            NotificationChannel::Email => self.email.enabled,
            NotificationChannel::Sms => self.sms.enabled,
            NotificationChannel::Push => self.push.enabled,
        }
    }

    pub fn set_channel(&mut self, channel: NotificationChannel, enabled: bool) {
        match channel {
            NotificationChannel::Email => self.email.enabled = enabled,
            NotificationChannel::Sms => self.sms.enabled = enabled,
            NotificationChannel::Push => self.push.enabled = enabled,
        }
    }

    /// Adds an email recipient; duplicates are rejected case-insensitively.
    pub fn add_recipient(&mut self, email: &str) -> CoreResult<()> {
        let email = email.trim();
        validate_email(email)?;

        if self
            .email
            .recipients
            .iter()
            .any(|r| r.eq_ignore_ascii_case(email))
        {
            return Err(ValidationError::Duplicate {
                field: "recipient".to_string(),
                value: email.to_string(),
            }
            .into());
        }

        self.email.recipients.push(email.to_string());
        Ok(())
    }

    /// Removes a recipient. Returns false if it was not present.
    pub fn remove_recipient(&mut self, email: &str) -> bool {
        let before = self.email.recipients.len();
        self.email
            .recipients
            .retain(|r| !r.eq_ignore_ascii_case(email.trim()));
        self.email.recipients.len() != before
    }
}
