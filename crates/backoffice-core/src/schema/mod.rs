//! # Settings Schemas
//!
//! One typed schema per back office domain. Every schema:
//!
//! - serializes as camelCase JSON (the gateway's wire format)
//! - has a compiled-in `Default` that a store starts from and resets to
//! - tolerates missing fields (`#[serde(default)]`) so partial sections
//!   from older backends still deserialize
//!
//! ```text
//! ┌──────────────────┬───────────────────┬──────────────────────────────┐
//! │ Schema           │ Resource          │ Top-level keys               │
//! ├──────────────────┼───────────────────┼──────────────────────────────┤
//! │ notifications    │ notifications     │ email, sms, push, threshold  │
//! │ discounts        │ discounts         │ promoCodes, automatic, ...   │
//! │ finance          │ finances          │ tax, currency, payment, ...  │
//! │ marketing        │ marketing         │ emailMarketing, seo, ...     │
//! │ admin_tools      │ admin-tools       │ security, backups, ...       │
//! │ store_settings   │ store-settings    │ general, address, hours, ... │
//! │ subscribers      │ clients           │ clients                      │
//! │ store_users      │ (document store)  │ users                        │
//! └──────────────────┴───────────────────┴──────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::Resource;

pub mod admin_tools;
pub mod discounts;
pub mod finance;
pub mod marketing;
pub mod notifications;
pub mod store_settings;
pub mod store_users;
pub mod subscribers;

/// A settings tree owned by exactly one store.
pub trait SettingsSchema:
    Serialize + DeserializeOwned + Default + Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    /// Short domain name used in logs and errors.
    const DOMAIN: &'static str;
}

/// A settings tree mirrored from a REST resource.
pub trait RemoteSettings: SettingsSchema {
    const RESOURCE: Resource;
}
