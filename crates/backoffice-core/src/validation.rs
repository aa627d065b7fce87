//! # Validation Module
//!
//! Business rule checks run by local mutation entry points (add a promo
//! code, add a card, set opening hours) before settings change.
//!
//! ## Validation vs Sanitizing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Input Handling Layers                              │
//! │                                                                         │
//! │  Layer 1: sanitize (while typing)                                      │
//! │  ├── String in, string out                                             │
//! │  └── Never fails, clamps and strips instead                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (on submit)                                      │
//! │  ├── Returns ValidationError                                           │
//! │  └── Settings stay untouched on error                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Final authority, error message surfaces in the store              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use backoffice_core::validation::{validate_promo_code, validate_percentage};
//!
//! validate_promo_code("SUMMER-24").unwrap();
//! validate_percentage("discount", 15.0).unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Fails with `Required` when the trimmed value is empty.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an identifier used in a request path (admin id, store id).
///
/// ## Rules
/// - Must not be empty
/// - At most 128 characters
/// - No `/`, `?` or `#`, which would change the URL structure
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    validate_required(field, value)?;

    if value.len() > 128 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 128,
        });
    }

    if value.chars().any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain '/', '?', '#' or whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a promo code.
///
/// ## Rules
/// - Must not be empty
/// - At most 32 characters
/// - Only letters, numbers, hyphens and underscores
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_promo_code;
///
/// assert!(validate_promo_code("WELCOME10").is_ok());
/// assert!(validate_promo_code("").is_err());
/// assert!(validate_promo_code("TEN OFF").is_err());
/// ```
pub fn validate_promo_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();
    validate_required("code", code)?;

    if code.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 32,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a store name.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_store_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    validate_required("name", name)?;

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only the shape `local@domain.tld` is checked; delivery is the backend's
/// concern.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a link entered in a settings form. Only `http` and `https`.
pub fn validate_url(field: &str, url: &str) -> ValidationResult<()> {
    let url = url.trim();
    validate_required(field, url)?;

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must start with http:// or https://".to_string(),
        })?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must include a host".to_string(),
        });
    }

    Ok(())
}

/// Validates a 24h `HH:MM` time of day.
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_time_of_day;
///
/// assert!(validate_time_of_day("opensAt", "09:30").is_ok());
/// assert!(validate_time_of_day("opensAt", "24:00").is_err());
/// assert!(validate_time_of_day("opensAt", "9:30").is_err());
/// ```
pub fn validate_time_of_day(field: &str, value: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be HH:MM (24h)".to_string(),
    };

    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: u8 = hours.parse().map_err(|_| invalid())?;
    let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(())
}

/// Validates the last four digits of a saved card.
pub fn validate_card_last4(last4: &str) -> ValidationResult<()> {
    if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "last4".to_string(),
            reason: "must be exactly 4 digits".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a percentage in `0..=100`.
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_percentage;
///
/// assert!(validate_percentage("tax rate", 8.25).is_ok());
/// assert!(validate_percentage("tax rate", 100.5).is_err());
/// assert!(validate_percentage("tax rate", f64::NAN).is_err());
/// ```
pub fn validate_percentage(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("adminId", "admin-42").is_ok());
        assert!(validate_identifier("adminId", "").is_err());
        assert!(validate_identifier("adminId", "a/b").is_err());
        assert!(validate_identifier("storeId", "x y").is_err());
        assert!(validate_identifier("storeId", &"a".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_promo_code() {
        assert!(validate_promo_code("SUMMER-24").is_ok());
        assert!(validate_promo_code("free_ship").is_ok());

        assert!(validate_promo_code("   ").is_err());
        assert!(validate_promo_code("50%OFF").is_err());
        assert!(validate_promo_code(&"A".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("owner@shop.com").is_ok());
        assert!(validate_email(" owner@shop.co.uk ").is_ok());

        assert!(validate_email("owner").is_err());
        assert!(validate_email("@shop.com").is_err());
        assert!(validate_email("owner@shop").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("own er@shop.com").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("url", "https://instagram.com/shop").is_ok());
        assert!(validate_url("url", "http://localhost:3000").is_ok());
        assert!(validate_url("url", "ftp://files.shop.com").is_err());
        assert!(validate_url("url", "https://").is_err());
        assert!(validate_url("url", "").is_err());
    }

    #[test]
    fn test_validate_time_of_day() {
        assert!(validate_time_of_day("t", "00:00").is_ok());
        assert!(validate_time_of_day("t", "23:59").is_ok());
        assert!(validate_time_of_day("t", "12:60").is_err());
        assert!(validate_time_of_day("t", "noon").is_err());
    }

    #[test]
    fn test_validate_card_last4() {
        assert!(validate_card_last4("4242").is_ok());
        assert!(validate_card_last4("424").is_err());
        assert!(validate_card_last4("42a2").is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage("p", 0.0).is_ok());
        assert!(validate_percentage("p", 100.0).is_ok());
        assert!(validate_percentage("p", -0.1).is_err());
        assert!(validate_percentage("p", f64::INFINITY).is_err());
    }
}
