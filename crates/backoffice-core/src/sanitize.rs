//! # Input Sanitizers
//!
//! String-to-string normalizers the settings forms run on every keystroke.
//! They never fail: invalid characters are stripped and out-of-range values
//! clamped, so whatever they return can be handed to a store entry point.
//!
//! ## Clamp Table
//! ```text
//! ┌───────────────────────┬──────────────────────────────┬───────────────────┐
//! │ Sanitizer             │ Allowed characters           │ Range / length    │
//! ├───────────────────────┼──────────────────────────────┼───────────────────┤
//! │ numeric input         │ digits, one '.'              │ negative → "0"    │
//! │ GPS latitude          │ '-', digits, one '.'         │ [-90, 90], 6 dp   │
//! │ GPS longitude         │ '-', digits, one '.'         │ [-180, 180], 6 dp │
//! │ tax rate              │ digits, one '.'              │ [0, 100], 2 dp    │
//! │ phone number          │ leading '+', digits          │ 15 digits         │
//! │ zip code              │ A-Z, 0-9, ' ', '-'           │ 10 chars          │
//! │ IP address            │ digits, '.'                  │ 4 octets ≤ 255    │
//! └───────────────────────┴──────────────────────────────┴───────────────────┘
//! ```
//!
//! Partial input a user is still typing (`""`, `"-"`, `"12."`) is passed
//! through rather than rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const MAX_COORDINATE_DECIMALS: usize = 6;
const MAX_TAX_DECIMALS: usize = 2;
const MAX_PHONE_DIGITS: usize = 15;
const MAX_ZIP_LENGTH: usize = 10;

// =============================================================================
// Helpers
// =============================================================================

/// Keeps ASCII digits and the first `.`; optionally a leading `-`.
fn keep_decimal(value: &str, allow_sign: bool) -> String {
    let value = value.trim();
    let mut out = String::with_capacity(value.len());
    let mut seen_dot = false;

    for (i, c) in value.chars().enumerate() {
        match c {
            '0'..='9' => out.push(c),
            '.' if !seen_dot => {
                seen_dot = true;
                out.push(c);
            }
            '-' if allow_sign && i == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Cuts the fractional part to at most `max` digits.
fn truncate_decimals(value: &str, max: usize) -> String {
    match value.split_once('.') {
        Some((whole, frac)) if frac.len() > max => format!("{}.{}", whole, &frac[..max]),
        _ => value.to_string(),
    }
}

// =============================================================================
// Numeric
// =============================================================================

/// Normalizes a non-negative number field.
///
/// ```rust
/// use backoffice_core::sanitize::validate_numeric_input;
///
/// assert_eq!(validate_numeric_input("-5"), "0");
/// assert_eq!(validate_numeric_input("12a.5.1"), "12.51");
/// ```
pub fn validate_numeric_input(value: &str) -> String {
    let cleaned = keep_decimal(value, true);
    if cleaned.starts_with('-') {
        return "0".to_string();
    }
    cleaned
}

// =============================================================================
// GPS
// =============================================================================

/// Which coordinate a GPS field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateAxis {
    Latitude,
    Longitude,
}

impl CoordinateAxis {
    pub const fn limit(&self) -> f64 {
        match self {
            CoordinateAxis::Latitude => 90.0,
            CoordinateAxis::Longitude => 180.0,
        }
    }
}

impl fmt::Display for CoordinateAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateAxis::Latitude => write!(f, "latitude"),
            CoordinateAxis::Longitude => write!(f, "longitude"),
        }
    }
}

impl FromStr for CoordinateAxis {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latitude" | "lat" => Ok(CoordinateAxis::Latitude),
            "longitude" | "lng" | "lon" => Ok(CoordinateAxis::Longitude),
            _ => Err(ValidationError::NotAllowed {
                field: "axis".to_string(),
                allowed: vec!["latitude".to_string(), "longitude".to_string()],
            }),
        }
    }
}

/// Normalizes a latitude or longitude field.
///
/// ```rust
/// use backoffice_core::sanitize::{validate_gps_coordinate, CoordinateAxis};
///
/// assert_eq!(validate_gps_coordinate("-95", CoordinateAxis::Latitude), "-90");
/// assert_eq!(validate_gps_coordinate("40.7127753", CoordinateAxis::Latitude), "40.712775");
/// assert_eq!(validate_gps_coordinate("-", CoordinateAxis::Longitude), "-");
/// ```
pub fn validate_gps_coordinate(value: &str, axis: CoordinateAxis) -> String {
    let cleaned = truncate_decimals(&keep_decimal(value, true), MAX_COORDINATE_DECIMALS);

    let Ok(parsed) = cleaned.parse::<f64>() else {
        return cleaned;
    };

    let limit = axis.limit();
    if parsed > limit {
        format!("{}", limit)
    } else if parsed < -limit {
        format!("{}", -limit)
    } else {
        cleaned
    }
}

// =============================================================================
// Tax
// =============================================================================

/// Normalizes a tax rate percentage.
///
/// ```rust
/// use backoffice_core::sanitize::validate_tax_rate;
///
/// assert_eq!(validate_tax_rate("123.456"), "100");
/// assert_eq!(validate_tax_rate("8.255"), "8.25");
/// assert_eq!(validate_tax_rate("-5"), "0");
/// ```
pub fn validate_tax_rate(value: &str) -> String {
    let cleaned = truncate_decimals(&keep_decimal(value, true), MAX_TAX_DECIMALS);
    if cleaned.starts_with('-') {
        return "0".to_string();
    }

    match cleaned.parse::<f64>() {
        Ok(rate) if rate > 100.0 => "100".to_string(),
        _ => cleaned,
    }
}

// =============================================================================
// Contact
// =============================================================================

/// Keeps an optional leading `+` and up to 15 digits.
pub fn validate_phone_number(value: &str) -> String {
    let value = value.trim();
    let mut out = String::new();
    if value.starts_with('+') {
        out.push('+');
    }
    out.extend(
        value
            .chars()
            .filter(char::is_ascii_digit)
            .take(MAX_PHONE_DIGITS),
    );
    out
}

/// Keeps letters, digits, spaces and hyphens; uppercased, 10 characters max.
pub fn validate_zip_code(value: &str) -> String {
    value
        .trim_start()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .take(MAX_ZIP_LENGTH)
        .collect::<String>()
        .to_ascii_uppercase()
}

// =============================================================================
// Network
// =============================================================================

/// Normalizes a dotted IPv4 address as it is typed.
///
/// ```rust
/// use backoffice_core::sanitize::validate_ip_address;
///
/// assert_eq!(validate_ip_address("192.168.1.300"), "192.168.1.255");
/// assert_eq!(validate_ip_address("10.0."), "10.0.");
/// ```
pub fn validate_ip_address(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    cleaned
        .split('.')
        .take(4)
        .map(|octet| {
            let octet: String = octet.chars().take(3).collect();
            match octet.parse::<u16>() {
                Ok(n) if n > 255 => "255".to_string(),
                _ => octet,
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_input() {
        assert_eq!(validate_numeric_input("-5"), "0");
        assert_eq!(validate_numeric_input("-"), "0");
        assert_eq!(validate_numeric_input("42"), "42");
        assert_eq!(validate_numeric_input(" 3.14 "), "3.14");
        assert_eq!(validate_numeric_input("1,000"), "1000");
        assert_eq!(validate_numeric_input(""), "");
    }

    #[test]
    fn test_gps_clamps() {
        assert_eq!(validate_gps_coordinate("95", CoordinateAxis::Latitude), "90");
        assert_eq!(validate_gps_coordinate("-95", CoordinateAxis::Latitude), "-90");
        assert_eq!(validate_gps_coordinate("181", CoordinateAxis::Longitude), "180");
        assert_eq!(validate_gps_coordinate("-200.5", CoordinateAxis::Longitude), "-180");
        assert_eq!(validate_gps_coordinate("95", CoordinateAxis::Longitude), "95");
    }

    #[test]
    fn test_gps_partial_input_passes_through() {
        assert_eq!(validate_gps_coordinate("", CoordinateAxis::Latitude), "");
        assert_eq!(validate_gps_coordinate("-", CoordinateAxis::Latitude), "-");
        assert_eq!(validate_gps_coordinate("12.", CoordinateAxis::Latitude), "12.");
        assert_eq!(validate_gps_coordinate("4-5", CoordinateAxis::Latitude), "45");
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("Latitude".parse::<CoordinateAxis>().unwrap(), CoordinateAxis::Latitude);
        assert_eq!("lng".parse::<CoordinateAxis>().unwrap(), CoordinateAxis::Longitude);
        assert!("altitude".parse::<CoordinateAxis>().is_err());
    }

    #[test]
    fn test_tax_rate() {
        assert_eq!(validate_tax_rate("123.456"), "100");
        assert_eq!(validate_tax_rate("100"), "100");
        assert_eq!(validate_tax_rate("7.5"), "7.5");
        assert_eq!(validate_tax_rate("-5"), "0");
        assert_eq!(validate_tax_rate("-0.5"), "0");
        assert_eq!(validate_tax_rate("abc"), "");
    }

    #[test]
    fn test_phone_number() {
        assert_eq!(validate_phone_number("+1 (555) 010-9999"), "+15550109999");
        assert_eq!(validate_phone_number("555-0100"), "5550100");
        assert_eq!(validate_phone_number(&"9".repeat(20)).len(), 15);
    }

    #[test]
    fn test_zip_code() {
        assert_eq!(validate_zip_code("sw1a 1aa"), "SW1A 1AA");
        assert_eq!(validate_zip_code("12345-6789xyz"), "12345-6789");
        assert_eq!(validate_zip_code("90210!"), "90210");
    }

    #[test]
    fn test_ip_address() {
        assert_eq!(validate_ip_address("192.168.1.300"), "192.168.1.255");
        assert_eq!(validate_ip_address("1.2.3.4.5"), "1.2.3.4");
        assert_eq!(validate_ip_address("1234.5"), "123.5");
        assert_eq!(validate_ip_address("10.a0.0.1"), "10.0.0.1");
        assert_eq!(validate_ip_address(""), "");
    }
}
