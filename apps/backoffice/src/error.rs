//! # App Error Type
//!
//! Unified error type for back office commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Back Office                        │
//! │                                                                         │
//! │  View layer                  Rust Backend                               │
//! │  ──────────                  ────────────                               │
//! │                                                                         │
//! │  fetch_settings("finance")                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Settings Store entry point                                      │  │
//! │  │         │                                                        │  │
//! │  │         ├── failure recorded in the store (Status, Error) ──┐    │  │
//! │  │         ▼                                                    │    │  │
//! │  │  ClientError / CoreError ─────────────────────────────► AppError │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "BACKEND_ERROR", "message": "Promo code already exists" }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store already shows the message; the command error only tells the
//! caller which kind of failure it was.

use backoffice_client::ClientError;
use backoffice_core::{CoreError, ValidationError};
use serde::Serialize;

/// Error returned from back office commands.
///
/// ```json
/// {
///   "code": "NO_STORE_SELECTED",
///   "message": "No store selected"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A list item or store does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// No session, or the session's role may not do this
    Unauthorized,

    /// A store-scoped call with no store selected
    NoStoreSelected,

    /// Backend answered with a non-success status
    BackendError,

    /// Backend could not be reached
    NetworkError,

    /// Configuration or session storage problem
    ConfigError,

    /// Internal error
    Internal,
}

/// Result type for commands.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts domain errors to command errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
            CoreError::LimitExceeded { .. } => AppError::validation(err.to_string()),
            CoreError::MergeFailed { .. } | CoreError::InvalidPayload(_) => {
                tracing::error!("Backend payload did not fit the schema: {}", err);
                AppError::new(ErrorCode::BackendError, err.to_string())
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Converts client errors to command errors.
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::MissingAdminId => AppError::unauthorized(err.message()),
            ClientError::NoStoreSelected => AppError::new(ErrorCode::NoStoreSelected, err.message()),
            ClientError::Core(core) => core.into(),
            ClientError::Http { status: 401 | 403, message } => AppError::unauthorized(message),
            ClientError::Http { status: 404, message } => AppError::new(ErrorCode::NotFound, message),
            ClientError::Http { message, .. } => AppError::new(ErrorCode::BackendError, message),
            ClientError::InvalidResponse(_) | ClientError::Documents(_) => {
                AppError::new(ErrorCode::BackendError, err.message())
            }
            ClientError::Transport(_) => AppError::new(ErrorCode::NetworkError, err.message()),
            ClientError::InvalidUrl(_)
            | ClientError::InvalidConfig(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_)
            | ClientError::Session(_)
            | ClientError::Io(_) => AppError::new(ErrorCode::ConfigError, err.message()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_codes() {
        assert_eq!(AppError::from(ClientError::NoStoreSelected).code, ErrorCode::NoStoreSelected);
        assert_eq!(
            AppError::from(ClientError::http(403, Some("Forbidden".into()))).code,
            ErrorCode::Unauthorized
        );
        let backend = AppError::from(ClientError::http(422, Some("Promo code already exists".into())));
        assert_eq!(backend.code, ErrorCode::BackendError);
        assert_eq!(backend.message, "Promo code already exists");
        assert_eq!(
            AppError::from(ClientError::Transport("reset".into())).code,
            ErrorCode::NetworkError
        );
    }

    #[test]
    fn test_core_error_codes() {
        assert_eq!(AppError::from(CoreError::not_found("Card", "c9")).code, ErrorCode::NotFound);
        let limit = CoreError::LimitExceeded {
            what: "saved cards".into(),
            max: 10,
        };
        assert_eq!(AppError::from(limit).code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(AppError::from(ClientError::NoStoreSelected)).unwrap();
        assert_eq!(json["code"], "NO_STORE_SELECTED");
        assert_eq!(json["message"], "No store selected");
    }
}
