//! # Error Types
//!
//! Domain-specific error types for backoffice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backoffice-core errors (this file)                                    │
//! │  ├── CoreError        - Merge, lookup and limit failures               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  backoffice-client errors (separate crate)                             │
//! │  └── ClientError      - HTTP, session and config failures              │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── AppError         - What the view layer sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → store Error string  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A backend response could not be folded into the typed settings.
    ///
    /// ## When This Occurs
    /// - A field changed type on the backend (e.g. number → string)
    /// - An enum value the client does not know about
    ///
    /// The store keeps its previous settings when this happens.
    #[error("Cannot merge {domain} settings: {reason}")]
    MergeFailed { domain: String, reason: String },

    /// The response body was not a JSON object.
    #[error("Invalid settings payload: {0}")]
    InvalidPayload(String),

    /// A list item addressed by id is not present.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A list would grow past its business limit.
    #[error("Cannot have more than {max} {what}")]
    LimitExceeded { what: String, max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a not found error.
    pub fn not_found(entity: &str, id: &str) -> Self {
        CoreError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used by local mutation entry points before settings change.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Invalid format (e.g., malformed email, bad URL).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate promo code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::MergeFailed {
            domain: "finance".to_string(),
            reason: "invalid type".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot merge finance settings: invalid type");

        let err = CoreError::not_found("Card", "card-1");
        assert_eq!(err.to_string(), "Card not found: card-1");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(err.to_string(), "tax rate must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
