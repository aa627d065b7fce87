//! # Commands Module
//!
//! Entry points the view layer (and the CLI) call. Each command parses its
//! string arguments, reads the admin id from the session and delegates to a
//! settings store. Every failure comes back as an [`AppError`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── session.rs   ◄─── Login, logout, route checks
//! ├── settings.rs  ◄─── Fetch/update/get any settings domain
//! ├── stores.rs    ◄─── Store list, selection, deletion
//! ├── finance.rs   ◄─── Saved payment cards
//! └── sanitize.rs  ◄─── Form field normalizers by name
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  View / CLI                                                             │
//! │  ──────────                                                             │
//! │  fetch_settings(&state, "finance")                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command                                                                │
//! │  ───────                                                                │
//! │  parse args ──► state.admin_id() ──► store operation                    │
//! │         │                                                               │
//! │         │ (serde camelCase)                                             │
//! │         ▼                                                               │
//! │  View receives: settings JSON  or  { code, message }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`AppError`]: crate::error::AppError

pub mod finance;
pub mod sanitize;
pub mod session;
pub mod settings;
pub mod stores;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use backoffice_client::http::testing::FakeBackend;
    use backoffice_client::{ClientConfig, MemoryDocumentStore, SessionStore};
    use backoffice_core::{AccessMode, RoleType, UserData};

    use crate::state::AppState;

    /// An app over `backend` with default config and nobody signed in.
    pub fn app(backend: FakeBackend) -> (AppState, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let state = AppState::new(
            ClientConfig::default(),
            backend.clone(),
            Arc::new(SessionStore::in_memory()),
            Arc::new(MemoryDocumentStore::new()),
        )
        .unwrap();
        (state, backend)
    }

    /// Same as [`app`] with an owner signed in as `admin-1`.
    pub fn signed_in_app(backend: FakeBackend) -> (AppState, Arc<FakeBackend>) {
        let (state, backend) = app(backend);
        state
            .login(
                "tok".to_string(),
                UserData {
                    id: "admin-1".to_string(),
                    role_type: RoleType::Owner,
                    access_mode: AccessMode::Full,
                },
            )
            .unwrap();
        (state, backend)
    }
}
