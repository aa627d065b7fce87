//! # Titan Back Office Library
//!
//! Settings stores and commands for the back office. The view layer (or the
//! bundled CLI) builds one [`state::AppState`] and calls into [`commands`].
//!
//! ## Module Organization
//! ```text
//! backoffice/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── auth.rs         ◄─── Route gate over the persisted session
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── store.rs    ◄─── Generic SettingsStore<S>
//! │   ├── app.rs      ◄─── AppState: one store per domain
//! │   └── ...         ◄─── Domain stores (finance, discounts, ...)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── settings.rs ◄─── Fetch/update any domain
//! │   ├── stores.rs   ◄─── Store list and selection
//! │   └── ...
//! └── error.rs        ◄─── AppError returned by every command
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Back Office State                                    │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │  SessionStore    │ │  ResourceClient  │ │  AuthGate            │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Token         │ │  • Resource URLs │ │  • Login route       │   │
//! │  │  • User data     │ │  • Bearer header │ │  • Allowed roles     │   │
//! │  │  • Store id      │ │  • Error bodies  │ │                      │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  One SettingsStore per domain, each with its own status and error.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod commands;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays machine readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=backoffice_client=trace` - Trace every request
/// - Default: INFO, DEBUG for this crate
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,backoffice=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
