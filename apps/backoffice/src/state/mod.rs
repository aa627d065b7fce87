//! # State Module
//!
//! Settings stores for every back office domain, and the `AppState` that
//! wires them together.
//!
//! ## Why One Store Per Domain?
//! Each domain mirrors its own backend resource and keeps its own status
//! and error. A failing finance request never marks discounts as failed,
//! and two domains never contend for the same lock.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  SettingsStore<S> (store.rs)                    │   │
//! │  │  Arc<RwLock<{ settings: S, request: RequestState }>>            │   │
//! │  │  fetch · update · edit · clear_error · reset · stage/rollback   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              ▲ Deref                                    │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │ Discounts    │  │ Finance          │  │ AdminTools       │  ...     │
//! │  │ + view state │  │ + staged cards   │  │ + section states │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Locks are held only for synchronous reads and writes                │
//! │  • No lock is held across an await                                     │
//! │  • Responses apply in arrival order; the last one wins                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod admin_tools;
mod app;
mod discounts;
mod finance;
mod marketing;
mod notifications;
mod store;
mod store_settings;
mod store_users;
mod subscribers;

pub use admin_tools::AdminToolsStore;
pub use app::{AppState, DomainOutcome, SettingsDomain};
pub use discounts::{DiscountView, DiscountsStore};
pub use finance::FinanceStore;
pub use marketing::MarketingStore;
pub use notifications::NotificationsStore;
pub use store::SettingsStore;
pub use store_settings::StoreSettingsStore;
pub use store_users::StoreUsersStore;
pub use subscribers::SubscribersStore;
