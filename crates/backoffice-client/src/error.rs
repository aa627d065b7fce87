//! # Client Error Types
//!
//! Error types for everything that crosses the process boundary.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ClientError Categories                          │
//! │                                                                         │
//! │  Local (no I/O happened)                                               │
//! │  ├── MissingAdminId, NoStoreSelected                                   │
//! │  └── InvalidUrl, Core (validation before the request)                  │
//! │                                                                         │
//! │  Remote                                                                │
//! │  ├── Http { status, message }   backend answered with non-2xx          │
//! │  ├── Transport                  no answer at all                       │
//! │  └── InvalidResponse            answer was not the JSON we expect      │
//! │                                                                         │
//! │  Environment                                                           │
//! │  └── Config*, Session, Documents, Io                                   │
//! │                                                                         │
//! │  Every variant ends up as the store's Error string via message().     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoffice_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Local Errors
    // =========================================================================
    /// No admin id is known for the current session.
    #[error("Admin ID is required")]
    MissingAdminId,

    /// A store-scoped resource was addressed with no store selected.
    #[error("No store selected")]
    NoStoreSelected,

    /// A URL could not be built from the configured base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Domain validation rejected the input before any request was made.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// Non-success HTTP status. `message` is the backend's own text when it
    /// supplied one.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Network or TLS failure; the backend never answered.
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body was not valid JSON or had an unexpected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Environment Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Persisted session could not be read or written.
    #[error("Session storage error: {0}")]
    Session(String),

    /// Document store read or batch write failed.
    #[error("Document store error: {0}")]
    Documents(String),

    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: format!("Request failed with status {}", status.as_u16()),
            }
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<backoffice_core::ValidationError> for ClientError {
    fn from(err: backoffice_core::ValidationError) -> Self {
        ClientError::Core(err.into())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Builds the error for a non-success status, preferring the backend's
    /// own message.
    pub fn http(status: u16, message: Option<String>) -> Self {
        ClientError::Http {
            status,
            message: message.unwrap_or_else(|| format!("Request failed with status {}", status)),
        }
    }

    /// The text a settings store shows verbatim in its Error field.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// True when the request was refused before any I/O.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::MissingAdminId
                | ClientError::NoStoreSelected
                | ClientError::InvalidUrl(_)
                | ClientError::Core(_)
        )
    }

    /// True when the backend answered with a non-success status.
    pub fn is_http(&self) -> bool {
        matches!(self, ClientError::Http { .. })
    }

    /// HTTP status code, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
