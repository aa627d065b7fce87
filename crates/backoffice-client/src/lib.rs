//! # backoffice-client: Resource Client for the Titan Back Office
//!
//! Everything the settings stores need from the outside world: the REST
//! gateway, the persisted session, the document store and configuration.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Layer                                     │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      ResourceClient                              │  │
//! │  │                                                                  │  │
//! │  │  Builds {base}/api/{resource}/{admin}[/{store}] URLs            │  │
//! │  │  Attaches bearer token, maps non-2xx to ClientError::Http        │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  HttpBackend   │  │  SessionStore  │  │  DocumentStore         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ ReqwestBackend │  │ selectedStoreId│  │ StoreUsers collection  │    │
//! │  │ FakeBackend    │  │ userData, token│  │ Memory / REST          │    │
//! │  │ (test-utils)   │  │ session.json   │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Client configuration (API URL, session path, auth policy)
//! - [`documents`] - Document store for store users
//! - [`error`] - Client error types
//! - [`http`] - HTTP backend trait and implementations
//! - [`resource`] - Resource client
//! - [`session`] - Persisted session storage
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use backoffice_client::{ClientConfig, ReqwestBackend, ResourceClient, SessionStore};
//! use backoffice_core::Resource;
//!
//! # async fn demo() -> backoffice_client::ClientResult<()> {
//! let config = ClientConfig::load_or_default(None);
//! let backend = Arc::new(ReqwestBackend::new(config.timeout())?);
//! let session = Arc::new(SessionStore::in_memory());
//! let client = ResourceClient::from_config(&config, backend, session)?;
//!
//! let discounts = client.get(Resource::Discounts, "admin-1").await?;
//! println!("{}", discounts);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod documents;
pub mod error;
pub mod http;
pub mod resource;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ApiSettings, AuthSettings, ClientConfig, DocumentSettings, SessionSettings};
pub use documents::{DocumentStore, MemoryDocumentStore, RestDocumentStore, UnconfiguredDocumentStore, WriteOp};
pub use error::{ClientError, ClientResult};
pub use http::{ApiRequest, ApiResponse, HttpBackend, HttpMethod, ReqwestBackend};
pub use resource::ResourceClient;
pub use session::{SessionData, SessionStore};
