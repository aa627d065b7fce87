//! # backoffice-core: Pure Domain Logic for the Titan Back Office
//!
//! This crate holds everything about back office settings that can be
//! expressed without I/O: the typed per-domain schemas, the shallow merge
//! policy that folds backend responses into local state, the staged change
//! used for optimistic updates, and the input sanitizers the forms run
//! before a value reaches a settings store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Titan Back Office Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web front end / CLI (view layer)                │   │
//! │  │    Settings forms ──► sanitize ──► store entry points           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                apps/backoffice (settings stores)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ backoffice-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │   │  schema  │ │  merge  │ │ staged  │ │ sanitize │ │ types  │ │   │
//! │  │   └──────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HTTP • NO FILES • PURE FUNCTIONS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Request status, resources, session user data
//! - [`schema`] - Typed settings per domain (notifications, discounts, ...)
//! - [`merge`] - Shallow merge of backend responses into settings
//! - [`staged`] - Staged change with compensating rollback
//! - [`sanitize`] - String-to-string input normalizers for form fields
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use backoffice_core::sanitize::{validate_gps_coordinate, CoordinateAxis};
//!
//! assert_eq!(validate_gps_coordinate("95", CoordinateAxis::Latitude), "90");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod merge;
pub mod sanitize;
pub mod schema;
pub mod staged;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use merge::{merge_settings, MergeReport};
pub use schema::{RemoteSettings, SettingsSchema};
pub use staged::StagedChange;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Route the auth gate redirects to when no valid session exists.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Document store collection holding per-store staff accounts.
pub const STORE_USERS_COLLECTION: &str = "StoreUsers";

/// Maximum promo codes a single admin can keep.
///
/// ## Business Reason
/// The checkout screen resolves codes linearly; the backend rejects more.
pub const MAX_PROMO_CODES: usize = 200;

/// Maximum saved payment cards per admin account.
pub const MAX_SAVED_CARDS: usize = 10;
