//! # Store Settings
//!
//! Per-store profile: general info, address, map location, opening hours
//! and receipt layout. Also the summary records of the admin's store
//! collection (`/api/stores/{adminId}`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::schema::{RemoteSettings, SettingsSchema};
use crate::types::Resource;
use crate::validation::{validate_store_name, validate_time_of_day};

// =============================================================================
// Profile Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralInfo {
    pub store_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

impl std::str::FromStr for Weekday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let name = format!("{:?}", day).to_lowercase();
                name == s || name[..3] == s
            })
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "day".to_string(),
                reason: format!("unknown weekday '{}'", s),
            })
    }
}

/// Opening hours for one weekday, `HH:MM` 24h local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub day: Weekday,
    pub opens_at: String,
    pub closes_at: String,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptSettings {
    pub header: String,
    pub footer: String,
    pub show_logo: bool,
    pub show_tax_breakdown: bool,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            header: String::new(),
            footer: "Thank you for shopping with us!".to_string(),
            show_logo: true,
            show_tax_breakdown: true,
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    pub general: GeneralInfo,
    pub address: Address,
    pub location: GeoLocation,
    pub hours: Vec<OpeningHours>,
    pub receipt: ReceiptSettings,
    /// IANA timezone name
    pub timezone: String,
}

impl Default for StoreSettings {
    /// Monday to Saturday 09:00-18:00, closed on Sunday.
    fn default() -> Self {
        let hours = Weekday::ALL
            .into_iter()
            .map(|day| OpeningHours {
                day,
                opens_at: "09:00".to_string(),
                closes_at: "18:00".to_string(),
                closed: day == Weekday::Sunday,
            })
            .collect();

        StoreSettings {
            general: GeneralInfo::default(),
            address: Address::default(),
            location: GeoLocation::default(),
            hours,
            receipt: ReceiptSettings::default(),
            timezone: "UTC".to_string(),
        }
    }
}

impl SettingsSchema for StoreSettings {
    const DOMAIN: &'static str = "store-settings";
}

impl RemoteSettings for StoreSettings {
    const RESOURCE: Resource = Resource::StoreSettings;
}

impl StoreSettings {
    /// Sets the hours of one day, replacing any existing entry for it.
    pub fn set_hours(&mut self, hours: OpeningHours) -> CoreResult<()> {
        if !hours.closed {
            validate_time_of_day("opensAt", &hours.opens_at)?;
            validate_time_of_day("closesAt", &hours.closes_at)?;
            // HH:MM compares correctly as a string
            if hours.closes_at <= hours.opens_at {
                return Err(ValidationError::InvalidFormat {
                    field: "closesAt".to_string(),
                    reason: "must be later than opensAt".to_string(),
                }
                .into());
            }
        }

        match self.hours.iter_mut().find(|h| h.day == hours.day) {
            Some(slot) => *slot = hours,
            None => self.hours.push(hours),
        }
        Ok(())
    }
}

// =============================================================================
// Store Collection
// =============================================================================

/// One entry of the admin's store list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a create-store request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewStore {
    pub fn new(name: &str, address: Option<String>) -> CoreResult<Self> {
        validate_store_name(name)?;
        Ok(NewStore {
            name: name.trim().to_string(),
            address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hours() {
        let settings = StoreSettings::default();
        assert_eq!(settings.hours.len(), 7);
        assert!(settings.hours.iter().filter(|h| h.closed).count() == 1);
    }

    #[test]
    fn test_set_hours() {
        let mut settings = StoreSettings::default();
        settings
            .set_hours(OpeningHours {
                day: Weekday::Sunday,
                opens_at: "10:00".to_string(),
                closes_at: "14:00".to_string(),
                closed: false,
            })
            .unwrap();
        let sunday = settings.hours.iter().find(|h| h.day == Weekday::Sunday).unwrap();
        assert!(!sunday.closed);
        assert_eq!(sunday.opens_at, "10:00");

        let bad = OpeningHours {
            day: Weekday::Monday,
            opens_at: "18:00".to_string(),
            closes_at: "09:00".to_string(),
            closed: false,
        };
        assert!(settings.set_hours(bad).is_err());
    }

    #[test]
    fn test_weekday_parsing() {
        assert_eq!("Mon".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("sunday".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_new_store_requires_name() {
        assert!(NewStore::new("  ", None).is_err());
        assert_eq!(NewStore::new(" Downtown ", None).unwrap().name, "Downtown");
    }
}
