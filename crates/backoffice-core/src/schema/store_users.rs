//! Staff accounts of a store, kept in the `StoreUsers` document collection
//! rather than behind the REST gateway.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::schema::SettingsSchema;
use crate::validation::{validate_email, validate_required};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StoreRole {
    Manager,
    #[default]
    Cashier,
    Inventory,
}

impl std::str::FromStr for StoreRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manager" => Ok(StoreRole::Manager),
            "cashier" => Ok(StoreRole::Cashier),
            "inventory" => Ok(StoreRole::Inventory),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec![
                    "manager".to_string(),
                    "cashier".to_string(),
                    "inventory".to_string(),
                ],
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreUser {
    pub id: String,
    pub admin_id: String,
    pub store_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: StoreRole,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl StoreUser {
    pub fn new(admin_id: &str, store_id: &str, name: &str, email: &str, role: StoreRole) -> CoreResult<Self> {
        validate_required("name", name)?;
        validate_email(email)?;

        Ok(StoreUser {
            id: uuid::Uuid::new_v4().to_string(),
            admin_id: admin_id.to_string(),
            store_id: store_id.to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            role,
            permissions: Vec::new(),
            is_active: true,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreUsersSettings {
    pub users: Vec<StoreUser>,
}

impl SettingsSchema for StoreUsersSettings {
    const DOMAIN: &'static str = "store-users";
}

impl StoreUsersSettings {
    pub fn add(&mut self, user: StoreUser) -> CoreResult<()> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(ValidationError::Duplicate {
                field: "email".to_string(),
                value: user.email,
            }
            .into());
        }
        self.users.push(user);
        Ok(())
    }

    pub fn replace(&mut self, user: StoreUser) -> CoreResult<()> {
        let slot = self
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| CoreError::not_found("Store user", &user.id))?;
        *slot = user;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> CoreResult<StoreUser> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| CoreError::not_found("Store user", id))?;
        Ok(self.users.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_replace_remove() {
        let mut settings = StoreUsersSettings::default();
        let user = StoreUser::new("admin-1", "store-1", "Ana", "Ana@Shop.com", StoreRole::Cashier).unwrap();
        assert_eq!(user.email, "ana@shop.com");
        settings.add(user.clone()).unwrap();

        let dup = StoreUser::new("admin-1", "store-1", "Ana B", "ana@shop.com", StoreRole::Manager).unwrap();
        assert!(settings.add(dup).is_err());

        let mut promoted = user.clone();
        promoted.role = StoreRole::Manager;
        settings.replace(promoted).unwrap();
        assert_eq!(settings.users[0].role, StoreRole::Manager);

        settings.remove(&user.id).unwrap();
        assert!(settings.users.is_empty());
    }

    #[test]
    fn test_new_user_validation() {
        assert!(StoreUser::new("a", "s", "", "x@y.com", StoreRole::Cashier).is_err());
        assert!(StoreUser::new("a", "s", "Bo", "nope", StoreRole::Cashier).is_err());
    }
}
