//! Marketing settings: email marketing, social links, SEO, campaigns and
//! the referral program.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::schema::{RemoteSettings, SettingsSchema};
use crate::types::Resource;
use crate::validation::validate_url;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailMarketing {
    pub enabled: bool,
    pub provider: String,
    pub list_id: String,
    pub double_opt_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoSettings {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub channel: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferralProgram {
    pub enabled: bool,
    /// Store credit granted to the referrer, in cents.
    pub reward_cents: i64,
}

impl Default for ReferralProgram {
    fn default() -> Self {
        ReferralProgram {
            enabled: false,
            reward_cents: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketingSettings {
    pub email_marketing: EmailMarketing,
    pub social_links: Vec<SocialLink>,
    pub seo: SeoSettings,
    pub campaigns: Vec<Campaign>,
    pub referral: ReferralProgram,
}

impl SettingsSchema for MarketingSettings {
    const DOMAIN: &'static str = "marketing";
}

impl RemoteSettings for MarketingSettings {
    const RESOURCE: Resource = Resource::Marketing;
}

impl MarketingSettings {
    /// Adds or replaces the link for `platform`.
    pub fn set_social_link(&mut self, platform: &str, url: &str) -> CoreResult<()> {
        let platform = platform.trim().to_lowercase();
        if platform.is_empty() {
            return Err(ValidationError::Required {
                field: "platform".to_string(),
            }
            .into());
        }
        validate_url("url", url)?;

        match self.social_links.iter_mut().find(|l| l.platform == platform) {
            Some(link) => link.url = url.trim().to_string(),
            None => self.social_links.push(SocialLink {
                platform,
                url: url.trim().to_string(),
            }),
        }
        Ok(())
    }

    pub fn remove_social_link(&mut self, platform: &str) -> bool {
        let platform = platform.trim().to_lowercase();
        let before = self.social_links.len();
        self.social_links.retain(|l| l.platform != platform);
        self.social_links.len() != before
    }

    /// Flips a campaign on or off and returns its new state.
    pub fn toggle_campaign(&mut self, id: &str) -> CoreResult<bool> {
        let campaign = self
            .campaigns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::not_found("Campaign", id))?;
        campaign.is_active = !campaign.is_active;
        Ok(campaign.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_links_upsert() {
        let mut settings = MarketingSettings::default();
        settings
            .set_social_link("Instagram", "https://instagram.com/shop")
            .unwrap();
        settings
            .set_social_link("instagram", "https://instagram.com/shop2")
            .unwrap();
        assert_eq!(settings.social_links.len(), 1);
        assert_eq!(settings.social_links[0].url, "https://instagram.com/shop2");

        assert!(settings.set_social_link("x", "ftp://nope").is_err());
        assert!(settings.remove_social_link("INSTAGRAM"));
        assert!(settings.social_links.is_empty());
    }

    #[test]
    fn test_toggle_campaign() {
        let mut settings = MarketingSettings::default();
        settings.campaigns.push(Campaign {
            id: "c1".to_string(),
            name: "Black Friday".to_string(),
            channel: "email".to_string(),
            is_active: false,
            starts_at: None,
            ends_at: None,
        });
        assert!(settings.toggle_campaign("c1").unwrap());
        assert!(!settings.toggle_campaign("c1").unwrap());
        assert!(settings.toggle_campaign("missing").is_err());
    }
}
