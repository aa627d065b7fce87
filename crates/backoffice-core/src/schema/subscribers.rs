//! Subscriber (client) list of an admin account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::schema::{RemoteSettings, SettingsSchema};
use crate::types::Resource;

/// Subscription tier of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Free,
    Basic,
    Premium,
    Vip,
}

impl std::str::FromStr for UserType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(UserType::Free),
            "basic" => Ok(UserType::Basic),
            "premium" => Ok(UserType::Premium),
            "vip" => Ok(UserType::Vip),
            _ => Err(ValidationError::NotAllowed {
                field: "userType".to_string(),
                allowed: vec![
                    "free".to_string(),
                    "basic".to_string(),
                    "premium".to_string(),
                    "vip".to_string(),
                ],
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub subscribed_at: Option<DateTime<Utc>>,
}

/// Body of `PATCH /api/clients/{adminId}/userType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypeChange {
    pub client_id: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriberSettings {
    pub clients: Vec<Subscriber>,
}

impl SettingsSchema for SubscriberSettings {
    const DOMAIN: &'static str = "subscribers";
}

impl RemoteSettings for SubscriberSettings {
    const RESOURCE: Resource = Resource::Clients;
}

impl SubscriberSettings {
    pub fn find(&self, client_id: &str) -> Option<&Subscriber> {
        self.clients.iter().find(|c| c.id == client_id)
    }

    /// Replaces one subscriber record by id.
    pub fn replace(&mut self, subscriber: Subscriber) -> CoreResult<()> {
        let slot = self
            .clients
            .iter_mut()
            .find(|c| c.id == subscriber.id)
            .ok_or_else(|| CoreError::not_found("Client", &subscriber.id))?;
        *slot = subscriber;
        Ok(())
    }

    pub fn of_type(&self, user_type: UserType) -> Vec<&Subscriber> {
        self.clients.iter().filter(|c| c.user_type == user_type).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscriber(id: &str, user_type: UserType) -> Subscriber {
        Subscriber {
            id: id.to_string(),
            name: format!("Client {}", id),
            email: format!("{}@mail.com", id),
            phone: None,
            user_type,
            subscribed_at: None,
        }
    }

    #[test]
    fn test_filter_and_replace() {
        let mut settings = SubscriberSettings {
            clients: vec![subscriber("1", UserType::Free), subscriber("2", UserType::Vip)],
        };
        assert_eq!(settings.of_type(UserType::Vip).len(), 1);

        settings.replace(subscriber("1", UserType::Premium)).unwrap();
        assert_eq!(settings.find("1").unwrap().user_type, UserType::Premium);
        assert!(settings.replace(subscriber("9", UserType::Free)).is_err());
    }

    #[test]
    fn test_user_type_change_wire_shape() {
        let change = UserTypeChange {
            client_id: "c-1".to_string(),
            user_type: UserType::Vip,
        };
        assert_eq!(
            serde_json::to_string(&change).unwrap(),
            r#"{"clientId":"c-1","userType":"vip"}"#
        );
    }
}
