//! # Sanitize Command
//!
//! Runs one of the form field normalizers by name so the view can clean a
//! value as it is typed.

use std::fmt;
use std::str::FromStr;

use backoffice_core::sanitize::{
    validate_gps_coordinate, validate_ip_address, validate_numeric_input, validate_phone_number,
    validate_tax_rate, validate_zip_code, CoordinateAxis,
};
use backoffice_core::ValidationError;

use crate::error::{AppError, AppResult};

/// Which normalizer to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeKind {
    Numeric,
    Gps,
    TaxRate,
    Phone,
    Zip,
    Ip,
}

impl SanitizeKind {
    pub const ALL: [SanitizeKind; 6] = [
        SanitizeKind::Numeric,
        SanitizeKind::Gps,
        SanitizeKind::TaxRate,
        SanitizeKind::Phone,
        SanitizeKind::Zip,
        SanitizeKind::Ip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SanitizeKind::Numeric => "numeric",
            SanitizeKind::Gps => "gps",
            SanitizeKind::TaxRate => "tax-rate",
            SanitizeKind::Phone => "phone",
            SanitizeKind::Zip => "zip",
            SanitizeKind::Ip => "ip",
        }
    }
}

impl fmt::Display for SanitizeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SanitizeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        SanitizeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "kind".to_string(),
                allowed: SanitizeKind::ALL.iter().map(|k| k.to_string()).collect(),
            })
    }
}

/// Normalizes `value`. GPS values need an `axis` (`latitude` or `longitude`).
pub fn sanitize_input(kind: &str, value: &str, axis: Option<&str>) -> AppResult<String> {
    let kind: SanitizeKind = kind.parse()?;
    let cleaned = match kind {
        SanitizeKind::Numeric => validate_numeric_input(value),
        SanitizeKind::Gps => {
            let axis: CoordinateAxis = axis
                .ok_or_else(|| AppError::validation("axis is required for gps values"))?
                .parse()?;
            validate_gps_coordinate(value, axis)
        }
        SanitizeKind::TaxRate => validate_tax_rate(value),
        SanitizeKind::Phone => validate_phone_number(value),
        SanitizeKind::Zip => validate_zip_code(value),
        SanitizeKind::Ip => validate_ip_address(value),
    };
    Ok(cleaned)
}
